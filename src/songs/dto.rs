use serde::{Deserialize, Serialize};

use super::repo::Song;

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub userid: i64,
    pub title: String,
    pub artist: String,
    pub score: i64,
}

/// `userid` may be absent or null; both count as "missing id".
#[derive(Debug, Deserialize)]
pub struct SongsRequest {
    #[serde(default)]
    pub userid: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SongList {
    pub songs: Vec<Song>,
}
