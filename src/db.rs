use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::songs::repo::insert_tx;

/// Username of the account created on first run.
pub const SEED_USERNAME: &str = "redding";

/// (title, artist, cover, score) of the songs owned by the seed account.
pub const SEED_SONGS: [(&str, &str, &str, i64); 8] = [
    (
        "symbol",
        "Adrianne Lenker",
        "https://images.genius.com/ea813421a18bde3bc39b73c110b0ab2c.300x300x1.jpg",
        100,
    ),
    (
        "Cloudbusting",
        "Kate Bush",
        "https://images.genius.com/c3e6f6097640bca27833078355fd647e.300x300x1.png",
        75,
    ),
    (
        "Simulation Swarm",
        "Big Thief",
        "https://images.genius.com/26084cc61b6b1849e2c762fd0ca709fc.300x300x1.png",
        80,
    ),
    (
        "Pump Up the Jam",
        "Technotronic",
        "https://images.genius.com/a3992138b1d56a1238150be0051cb321.300x300x1.png",
        25,
    ),
    (
        "Juna",
        "Clairo",
        "https://images.genius.com/6725f1000db2e875f4ce966f4144d41a.300x300x1.png",
        37,
    ),
    (
        "Hello Hello Hello",
        "Remi Wolf",
        "https://images.genius.com/9d9b505e394955ec1e750059846258c6.300x300x1.png",
        100,
    ),
    (
        "Linger",
        "The Cranberries",
        "https://images.genius.com/faeabffde6e1ce2c6ffafe4b5d01d4ab.300x300x1.png",
        34,
    ),
    (
        "Blister In The Sun",
        "Violent Femmes",
        "https://images.genius.com/af35b7cdb9d07071e3946098f542377b.300x295x1.jpg",
        99,
    ),
];

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Creates the seed account and its songs when `users` is empty.
/// Returns whether anything was inserted.
pub async fn seed(db: &SqlitePool) -> anyhow::Result<bool> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await
        .context("count users")?;
    if users > 0 {
        return Ok(false);
    }

    let mut tx = db.begin().await.context("begin tx")?;
    let user_id: i64 =
        sqlx::query_scalar("INSERT INTO users (username) VALUES (?1) RETURNING id")
            .bind(SEED_USERNAME)
            .fetch_one(&mut *tx)
            .await
            .context("insert seed user")?;
    for (title, artist, cover, score) in SEED_SONGS {
        insert_tx(&mut tx, user_id, title, artist, cover, score).await?;
    }
    tx.commit().await.context("commit tx")?;

    info!(user_id, songs = SEED_SONGS.len(), "seeded empty database");
    Ok(true)
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // one connection: every in-memory connection is its own database
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&db).await.unwrap();
    db
}
