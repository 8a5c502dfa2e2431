//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and makes sure the
//! `actors` table exists. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_actors_table(&pool).await?;

    Ok(pool)
}

/// Create the actors table
///
/// `tvmaze_id` is unique so that concurrent creates of the same upstream
/// person cannot both insert.
pub async fn create_actors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS actors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tvmaze_id INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            country TEXT,
            birthday TEXT,
            deathday TEXT,
            gender TEXT,
            last_update TEXT NOT NULL,
            shows TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
