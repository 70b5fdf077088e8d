use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{AddSongRequest, SongList, SongsRequest};
use super::services::{list_songs_for_user, upsert_song};
use crate::{
    envelope::{Envelope, Message},
    error::{AppError, AppResult},
    extractors::ValidJson,
    state::AppState,
};

pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/addsong", get(add_song).post(add_song))
        .route("/songs", post(list_songs))
}

#[instrument(skip(state, payload))]
pub async fn add_song(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<AddSongRequest>,
) -> AppResult<Json<Envelope<Message>>> {
    let outcome = upsert_song(
        &state,
        payload.userid,
        &payload.title,
        &payload.artist,
        payload.score,
    )
    .await
    .map_err(|e| {
        if matches!(e, AppError::NotFound) {
            warn!(user_id = payload.userid, "addsong for unknown user");
        }
        e
    })?;
    Ok(Json(Envelope::success_message(outcome.message())))
}

#[instrument(skip(state, payload))]
pub async fn list_songs(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SongsRequest>,
) -> AppResult<Json<Envelope<SongList>>> {
    let user_id = match payload.userid {
        Some(id) if id != 0 => id,
        _ => return Err(AppError::Validation("missing id".into())),
    };
    let songs = list_songs_for_user(&state, user_id).await?;
    Ok(Json(Envelope::success(SongList { songs })))
}
