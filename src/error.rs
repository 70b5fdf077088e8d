//! Application error type and its mapping onto the JSON failure envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::envelope::Envelope;

#[derive(Debug, Error)]
pub enum AppError {
    /// Username already taken.
    #[error("account already exists")]
    Conflict,

    /// Unknown user id.
    #[error("user not found")]
    NotFound,

    /// Unknown user or wrong password; deliberately indistinguishable.
    #[error("wrong password")]
    BadCredentials,

    /// Lyrics provider failed or timed out.
    #[error("lyrics provider unavailable")]
    ProviderUnavailable(#[source] anyhow::Error),

    /// Missing or mistyped request field.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Conflict
            | AppError::NotFound
            | AppError::BadCredentials
            | AppError::Validation(_) => StatusCode::OK,
            AppError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "internal error".to_string()
            }
            AppError::ProviderUnavailable(e) => {
                error!(error = %e, "provider unavailable");
                self.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(Envelope::failure(message))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_client_contract() {
        assert_eq!(AppError::Conflict.to_string(), "account already exists");
        assert_eq!(AppError::NotFound.to_string(), "user not found");
        assert_eq!(AppError::BadCredentials.to_string(), "wrong password");
        assert_eq!(AppError::Validation("missing id".into()).to_string(), "missing id");
    }

    #[test]
    fn business_failures_use_200() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::OK);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ProviderUnavailable(anyhow::anyhow!("timeout"))
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
