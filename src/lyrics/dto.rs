use serde::Serialize;

use crate::provider::SongHit;

/// Body of `/lyrics/{title}/{artist}` (inside the envelope).
#[derive(Debug, Serialize)]
pub struct LyricsResponse {
    pub lyrics: String,
    pub cover: String,
}

/// One search hit as returned, unwrapped, by the search routes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchRecord {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub release_date: String,
    pub url: Option<String>,
    pub song_art_image_thumbnail_url: Option<String>,
    pub pageviews: u64,
    pub annotations: u64,
}

impl From<SongHit> for SearchRecord {
    fn from(h: SongHit) -> Self {
        Self {
            title: h.title,
            artist: h.artist,
            release_date: h.release_date.unwrap_or_else(|| "N/A".into()),
            url: h.url,
            song_art_image_thumbnail_url: h.thumbnail_url,
            pageviews: h.pageviews.unwrap_or(0),
            annotations: h.annotation_count.unwrap_or(0),
        }
    }
}
