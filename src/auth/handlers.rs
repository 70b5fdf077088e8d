use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UserId},
        password::hash_password,
        services::{create_user, verify_login},
    },
    envelope::{Empty, Envelope},
    error::{AppError, AppResult},
    extractors::ValidJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SignupRequest>,
) -> AppResult<Json<Envelope<UserId>>> {
    if payload.username.trim().is_empty() {
        warn!("signup without username");
        return Err(AppError::Validation("missing username".into()));
    }
    if payload.password.is_empty() {
        warn!(username = %payload.username, "signup without password");
        return Err(AppError::Validation("missing password".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = create_user(&state.db, &payload.username, Some(&hash)).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(Envelope::success(UserId { id: user.id })))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<Json<Envelope<UserId>>> {
    let user = verify_login(&state.db, &payload.username, &payload.password).await?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(Envelope::success(UserId { id: user.id })))
}

/// No server-side session exists, so there is nothing to tear down.
pub async fn logout() -> Json<Envelope<Empty>> {
    Json(Envelope::ok())
}
