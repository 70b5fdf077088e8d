use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::auth::{password::verify_password, repo::User};
use crate::error::{AppError, AppResult};

/// Creates a user, failing with `Conflict` when the username is taken.
pub async fn create_user(
    db: &SqlitePool,
    username: &str,
    password_hash: Option<&str>,
) -> AppResult<User> {
    if User::find_by_username(db, username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict);
    }

    // a concurrent signup can still win the race; the unique index decides
    User::create(db, username, password_hash)
        .await
        .map_err(|e| insert_error(e, username))
}

fn insert_error(err: sqlx::Error, username: &str) -> AppError {
    match err {
        sqlx::Error::Database(e) if e.is_unique_violation() => {
            warn!(%username, "username registered concurrently");
            AppError::Conflict
        }
        other => other.into(),
    }
}

/// Loads a user and checks the password. Every failure looks the same to the caller.
pub async fn verify_login(db: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::BadCredentials);
    };

    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = user.id, "login on account without password");
        return Err(AppError::BadCredentials);
    };

    match verify_password(password, hash) {
        Ok(true) => Ok(user),
        Ok(false) => {
            warn!(user_id = user.id, "login invalid password");
            Err(AppError::BadCredentials)
        }
        Err(e) => {
            error!(error = %e, user_id = user.id, "stored password hash unreadable");
            Err(AppError::BadCredentials)
        }
    }
}
