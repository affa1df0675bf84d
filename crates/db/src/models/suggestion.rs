use monynha_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `suggestions` table: one user's vote on one video.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Suggestion {
    pub id: DbId,
    pub video_id: DbId,
    pub user_id: DbId,
    pub vote: i16,
    pub created_at: Timestamp,
}
