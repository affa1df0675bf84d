//! `videos` rows and their conversion into catalog records.

use std::collections::BTreeSet;

use monynha_core::error::CoreError;
use monynha_core::types::{DbId, Timestamp};
use monynha_core::video::{TagRef, VideoRecord, VideoStatus};
use sqlx::FromRow;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub embed_url: String,
    pub platform: String,
    pub platform_id: String,
    pub language: String,
    pub status: String,
    pub votes_count: i32,
    pub submitted_by: Option<DbId>,
    pub created_at: Timestamp,
}

impl VideoRow {
    /// Combine the row with its joined categories and tags.
    pub fn into_record(
        self,
        category_slugs: BTreeSet<String>,
        tags: Vec<TagRef>,
    ) -> Result<VideoRecord, CoreError> {
        let status = VideoStatus::from_str_value(&self.status)?;
        let votes_count = u32::try_from(self.votes_count).map_err(|_| {
            CoreError::Internal(format!(
                "Video {} has negative votes_count {}",
                self.id, self.votes_count
            ))
        })?;

        let mut record = VideoRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            embed_url: self.embed_url,
            platform: self.platform,
            platform_id: self.platform_id,
            language: self.language,
            status,
            votes_count,
            submitted_by: self.submitted_by,
            created_at: self.created_at,
            category_slugs,
            tags: Vec::with_capacity(tags.len()),
        };
        for tag in tags {
            record.add_tag(tag);
        }
        Ok(record)
    }
}

/// A category slug joined to one video through `video_categories`.
#[derive(Debug, Clone, FromRow)]
pub struct VideoCategoryLink {
    pub video_id: DbId,
    pub slug: String,
}
