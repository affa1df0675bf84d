//! PostgreSQL adapter for the video catalog.
//!
//! Loads raw rows and shapes them into `monynha_core` records. Durable
//! storage, vote uniqueness and the `votes_count` trigger live in the
//! database itself (see `db/migrations`).

use monynha_core::error::CoreError;
use monynha_core::types::DbId;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Unique constraint guarding one vote per user per video.
pub const VOTE_UNIQUE_CONSTRAINT: &str = "uq_suggestions_video_user";

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Whether `err` is the store rejecting a second vote by the same user.
pub fn is_duplicate_vote(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(VOTE_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

/// Map a failed vote insert to a domain error.
///
/// Duplicate votes become `CoreError::DuplicateVote`; anything else is a
/// store failure.
pub fn classify_vote_error(err: sqlx::Error, video_id: DbId) -> CoreError {
    if is_duplicate_vote(&err) {
        tracing::info!(video_id = %video_id, "Vote rejected by uniqueness constraint");
        return CoreError::DuplicateVote { video_id };
    }
    tracing::error!(video_id = %video_id, error = %err, "Vote insert failed");
    CoreError::Store(err.to_string())
}
