use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{LyricsResponse, SearchRecord};
use super::services::{fetch_cover, fetch_lyrics, search_by_genre, search_by_term};
use crate::{envelope::Envelope, error::AppResult, state::AppState};

pub fn lyrics_routes() -> Router<AppState> {
    Router::new()
        .route("/lyrics/:title/:artist", get(lyrics).post(lyrics))
        .route("/genius/search/:term", get(search_song).post(search_song))
        .route("/genius/genre/:genre/", get(search_genre).post(search_genre))
        .route("/genius/genre/:genre", get(search_genre).post(search_genre))
}

#[instrument(skip(state))]
pub async fn lyrics(
    State(state): State<AppState>,
    Path((title, artist)): Path<(String, String)>,
) -> Json<Envelope<LyricsResponse>> {
    let provider = state.provider.as_ref();
    let (lyrics, cover) = tokio::join!(
        fetch_lyrics(provider, &title, &artist),
        fetch_cover(provider, &title, &artist),
    );
    Json(Envelope::success(LyricsResponse { lyrics, cover }))
}

#[instrument(skip(state))]
pub async fn search_song(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> AppResult<Json<Vec<SearchRecord>>> {
    let records = search_by_term(state.provider.as_ref(), &term).await?;
    Ok(Json(records))
}

#[instrument(skip(state))]
pub async fn search_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> AppResult<Json<Vec<SearchRecord>>> {
    let records = search_by_genre(state.provider.as_ref(), &genre).await?;
    Ok(Json(records))
}
