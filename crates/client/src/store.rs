//! Store seam used by the orchestrator.
//!
//! [`PgVideoStore`] is the production implementation; tests swap in an
//! in-memory store.

use async_trait::async_trait;
use monynha_core::submission::PreparedSubmission;
use monynha_core::threshold::VoteThreshold;
use monynha_core::types::DbId;
use monynha_core::video::{Category, Tag, VideoRecord};
use monynha_db::repositories::{CategoryRepo, SuggestionRepo, TagRepo, VideoRepo};
use monynha_db::DbPool;

use crate::error::ClientResult;

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Published videos, newest first.
    async fn approved_videos(&self) -> ClientResult<Vec<VideoRecord>>;

    /// Videos waiting for votes, most voted first.
    async fn pending_videos(&self) -> ClientResult<Vec<VideoRecord>>;

    async fn categories(&self) -> ClientResult<Vec<Category>>;

    async fn tags(&self) -> ClientResult<Vec<Tag>>;

    /// Which of `video_ids` `user_id` has voted on.
    async fn voted_video_ids(&self, user_id: DbId, video_ids: &[DbId]) -> ClientResult<Vec<DbId>>;

    /// Record one vote. A repeated vote fails with `CoreError::DuplicateVote`.
    async fn insert_vote(&self, video_id: DbId, user_id: DbId) -> ClientResult<()>;

    /// Insert a submission and return the stored record.
    async fn insert_video(&self, submission: &PreparedSubmission) -> ClientResult<VideoRecord>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`VideoStore`] backed by the `monynha_db` repositories.
///
/// Holds the same [`VoteThreshold`] the orchestrator evaluates with, so a
/// video is published exactly when the client reports it ready.
#[derive(Debug, Clone)]
pub struct PgVideoStore {
    pool: DbPool,
    threshold: VoteThreshold,
}

impl PgVideoStore {
    pub fn new(pool: DbPool, threshold: VoteThreshold) -> Self {
        Self { pool, threshold }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn approved_videos(&self) -> ClientResult<Vec<VideoRecord>> {
        Ok(VideoRepo::list_approved(&self.pool).await?)
    }

    async fn pending_videos(&self) -> ClientResult<Vec<VideoRecord>> {
        Ok(VideoRepo::list_pending(&self.pool).await?)
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        Ok(CategoryRepo::list(&self.pool).await?)
    }

    async fn tags(&self) -> ClientResult<Vec<Tag>> {
        Ok(TagRepo::list(&self.pool).await?)
    }

    async fn voted_video_ids(&self, user_id: DbId, video_ids: &[DbId]) -> ClientResult<Vec<DbId>> {
        Ok(SuggestionRepo::list_voted_video_ids(&self.pool, user_id, video_ids).await?)
    }

    async fn insert_vote(&self, video_id: DbId, user_id: DbId) -> ClientResult<()> {
        SuggestionRepo::record_vote(&self.pool, video_id, user_id, self.threshold)
            .await
            .map_err(|e| monynha_db::classify_vote_error(e, video_id))?;
        Ok(())
    }

    async fn insert_video(&self, submission: &PreparedSubmission) -> ClientResult<VideoRecord> {
        Ok(VideoRepo::create(&self.pool, submission).await?)
    }
}
