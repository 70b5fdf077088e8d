use axum::{routing::get, Json, Router};

use crate::state::AppState;

pub mod admin;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/ping", get(ping).post(ping))
        .route("/admin", get(admin::admin))
}

async fn index() -> &'static str {
    "hello"
}

async fn ping() -> Json<&'static str> {
    Json("pong!")
}
