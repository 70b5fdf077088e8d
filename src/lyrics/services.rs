use tracing::{info, warn};

use super::dto::SearchRecord;
use super::normalize::normalize_lyrics;
use crate::error::{AppError, AppResult};
use crate::provider::LyricsProvider;

pub const LYRICS_NOT_FOUND: &str = "Lyrics not found";
pub const COVER_NOT_FOUND: &str = "Cover not found";

const SEARCH_PAGE_SIZE: u32 = 9;

/// Normalized lyrics, or the `Lyrics not found` sentinel.
pub async fn fetch_lyrics(provider: &dyn LyricsProvider, title: &str, artist: &str) -> String {
    let lookup = async {
        match provider.find_song(title, artist).await? {
            Some(hit) => provider.lyrics(&hit).await,
            None => Ok(None),
        }
    };
    match lookup.await {
        Ok(Some(raw)) => normalize_lyrics(&raw),
        Ok(None) => {
            info!(%title, %artist, "lyrics not found");
            LYRICS_NOT_FOUND.to_string()
        }
        Err(e) => {
            warn!(error = %e, %title, %artist, "provider lookup failed");
            LYRICS_NOT_FOUND.to_string()
        }
    }
}

/// Thumbnail URL of the best match, `None` when missing or unreachable.
pub async fn cover_url(provider: &dyn LyricsProvider, title: &str, artist: &str) -> Option<String> {
    match provider.find_song(title, artist).await {
        Ok(hit) => hit.and_then(|h| h.thumbnail_url),
        Err(e) => {
            warn!(error = %e, %title, %artist, "provider lookup failed");
            None
        }
    }
}

pub async fn fetch_cover(provider: &dyn LyricsProvider, title: &str, artist: &str) -> String {
    cover_url(provider, title, artist)
        .await
        .unwrap_or_else(|| COVER_NOT_FOUND.to_string())
}

pub async fn search_by_term(
    provider: &dyn LyricsProvider,
    term: &str,
) -> AppResult<Vec<SearchRecord>> {
    let hits = provider
        .search_songs(term, SEARCH_PAGE_SIZE)
        .await
        .map_err(AppError::ProviderUnavailable)?;
    Ok(hits.into_iter().map(SearchRecord::from).collect())
}

pub async fn search_by_genre(
    provider: &dyn LyricsProvider,
    genre: &str,
) -> AppResult<Vec<SearchRecord>> {
    let hits = provider
        .songs_by_genre(genre, SEARCH_PAGE_SIZE)
        .await
        .map_err(AppError::ProviderUnavailable)?;
    Ok(hits.into_iter().map(SearchRecord::from).collect())
}
