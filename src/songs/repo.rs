use anyhow::Context;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub use super::repo_types::Song;

/// All songs of a user in insertion order.
pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<Song>> {
    let rows = sqlx::query_as::<_, Song>(
        r#"
        SELECT id, user_id, title, artist, img_path, score
          FROM songs
         WHERE user_id = ?1
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list songs by user")?;
    Ok(rows)
}

/// Overwrites the score of the exact, case-sensitive (user, title, artist) key.
/// Returns `false` when no such song exists.
pub async fn update_score_by_key(
    db: &SqlitePool,
    user_id: i64,
    title: &str,
    artist: &str,
    score: i64,
) -> anyhow::Result<bool> {
    let done = sqlx::query(
        r#"
        UPDATE songs SET score = ?4
         WHERE user_id = ?1 AND title = ?2 AND artist = ?3
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(artist)
    .bind(score)
    .execute(db)
    .await
    .context("update song score")?;
    Ok(done.rows_affected() > 0)
}

/// Inserts a song. `None` when the key already exists; the row is left as is.
pub async fn insert(
    db: &SqlitePool,
    user_id: i64,
    title: &str,
    artist: &str,
    img_path: &str,
    score: i64,
) -> anyhow::Result<Option<Song>> {
    let song = sqlx::query_as::<_, Song>(
        r#"
        INSERT INTO songs (user_id, title, artist, img_path, score)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (user_id, title, artist) DO NOTHING
        RETURNING id, user_id, title, artist, img_path, score
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(artist)
    .bind(img_path)
    .bind(score)
    .fetch_optional(db)
    .await
    .context("insert song")?;
    Ok(song)
}

/// Insert within a transaction, used by seeding.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    title: &str,
    artist: &str,
    img_path: &str,
    score: i64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (user_id, title, artist, img_path, score)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(artist)
    .bind(img_path)
    .bind(score)
    .execute(&mut **tx)
    .await
    .context("insert seed song")?;
    Ok(())
}
