use tracing::info;

use super::repo::{self, Song};
use crate::auth::repo::User;
use crate::error::{AppError, AppResult};
use crate::lyrics::services::cover_url;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn message(self) -> &'static str {
        match self {
            UpsertOutcome::Created => "new song",
            UpsertOutcome::Updated => "update song",
        }
    }
}

pub async fn list_songs_for_user(st: &AppState, user_id: i64) -> AppResult<Vec<Song>> {
    if User::find_by_id(&st.db, user_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(repo::list_by_user(&st.db, user_id).await?)
}

/// Updates the score of an existing (user, title, artist) song or creates it,
/// looking up cover art only for new songs.
pub async fn upsert_song(
    st: &AppState,
    user_id: i64,
    title: &str,
    artist: &str,
    score: i64,
) -> AppResult<UpsertOutcome> {
    if User::find_by_id(&st.db, user_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    if repo::update_score_by_key(&st.db, user_id, title, artist, score).await? {
        info!(user_id, score, "song updated");
        return Ok(UpsertOutcome::Updated);
    }

    let img_path = cover_url(st.provider.as_ref(), title, artist)
        .await
        .unwrap_or_default();
    if let Some(song) = repo::insert(&st.db, user_id, title, artist, &img_path, score).await? {
        info!(user_id, song_id = song.id, score, "song created");
        return Ok(UpsertOutcome::Created);
    }

    // created concurrently while the cover was looked up
    repo::update_score_by_key(&st.db, user_id, title, artist, score).await?;
    info!(user_id, score, "song updated after concurrent create");
    Ok(UpsertOutcome::Updated)
}
