//! Repository for the `suggestions` table (votes).

use monynha_core::threshold::VoteThreshold;
use monynha_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::suggestion::Suggestion;
use crate::repositories::VideoRepo;

/// Column list for suggestions queries.
const COLUMNS: &str = "id, video_id, user_id, vote, created_at";

/// Records votes and answers which videos a user voted on.
pub struct SuggestionRepo;

impl SuggestionRepo {
    /// Record one vote (weight 1) by `user_id` on `video_id`.
    ///
    /// A second vote by the same user fails with a unique violation on
    /// `uq_suggestions_video_user`; see [`crate::classify_vote_error`].
    pub async fn create<'e, E>(
        executor: E,
        video_id: DbId,
        user_id: DbId,
    ) -> Result<Suggestion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO suggestions (video_id, user_id, vote)
             VALUES ($1, $2, 1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Suggestion>(&query)
            .bind(video_id)
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Record a vote and publish the video if it reached `threshold`, in
    /// one transaction. Nothing is stored when either step fails.
    ///
    /// Returns `true` if the video was published by this vote.
    pub async fn record_vote(
        pool: &PgPool,
        video_id: DbId,
        user_id: DbId,
        threshold: VoteThreshold,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::create(&mut *tx, video_id, user_id).await?;
        let published = VideoRepo::promote_if_ready(&mut *tx, video_id, threshold).await?;
        tx.commit().await?;
        Ok(published)
    }

    /// Which of `video_ids` the user has already voted on.
    pub async fn list_voted_video_ids(
        pool: &PgPool,
        user_id: DbId,
        video_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT video_id FROM suggestions WHERE user_id = $1 AND video_id = ANY($2)",
        )
        .bind(user_id)
        .bind(video_ids)
        .fetch_all(pool)
        .await
    }

    /// Number of votes recorded for a video.
    pub async fn count_for_video(pool: &PgPool, video_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM suggestions WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(pool)
            .await
    }
}
