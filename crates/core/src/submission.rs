//! Turning a raw video submission into an insertable pending video.
//!
//! The submitted link is never a reason to reject a submission: anything
//! that does not resolve to a recognized platform is stored as an external
//! reference (see [`crate::embed`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::embed::{self, NormalizedSource};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::video::{Category, Language, Tag, TagRef, VideoRecord, VideoStatus};

/// Storage mode of user-submitted links; the video is hosted elsewhere.
pub const STORAGE_MODE_REMOTE: &str = "remote";

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Raw submission as entered by the user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmissionForm {
    #[validate(length(min = 3, message = "Title must have at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "A video URL is required"))]
    pub url: String,
    pub description: Option<String>,
    #[validate(length(min = 2, message = "Select a language"))]
    pub language: String,
    #[validate(length(min = 1, message = "Choose at least one category"))]
    pub category_ids: Vec<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

impl SubmissionForm {
    /// Trim text fields and drop a blank description.
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.url = self.url.trim().to_string();
        self.language = self.language.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

// ---------------------------------------------------------------------------
// Insert payload
// ---------------------------------------------------------------------------

/// DTO for inserting a row into `videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub embed_url: String,
    pub platform: String,
    pub platform_id: String,
    pub language: Language,
    pub status: VideoStatus,
    pub storage_mode: String,
    pub submitted_by: DbId,
}

/// A validated submission: the video row plus its join rows.
///
/// The id is assigned here rather than by the store so the locally shown
/// speculative record and the stored row share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub id: DbId,
    pub video: NewVideo,
    pub category_ids: Vec<DbId>,
    pub tag_ids: Vec<DbId>,
}

impl PreparedSubmission {
    /// Build the record shown locally before the store confirms the insert.
    ///
    /// Category and tag ids are resolved against the loaded reference data;
    /// ids that are not loaded are skipped.
    pub fn speculative_record(
        &self,
        created_at: Timestamp,
        categories: &[Category],
        tags: &[Tag],
    ) -> VideoRecord {
        let category_slugs = categories
            .iter()
            .filter(|c| self.category_ids.contains(&c.id))
            .map(|c| c.slug.clone())
            .collect();

        let mut record = VideoRecord {
            id: self.id,
            title: self.video.title.clone(),
            description: self.video.description.clone(),
            embed_url: self.video.embed_url.clone(),
            platform: self.video.platform.clone(),
            platform_id: self.video.platform_id.clone(),
            language: self.video.language.code().to_string(),
            status: VideoStatus::Pending,
            votes_count: 0,
            submitted_by: Some(self.video.submitted_by),
            created_at,
            category_slugs,
            tags: Vec::new(),
        };
        for tag in tags.iter().filter(|t| self.tag_ids.contains(&t.id)) {
            record.add_tag(TagRef::from(tag));
        }
        record
    }
}

/// Validate a submission and resolve its link.
///
/// Fails with `CoreError::Unauthenticated` when nobody is signed in, and
/// with `CoreError::Validation` for missing or malformed form fields.
pub fn prepare_submission(
    form: SubmissionForm,
    submitted_by: Option<DbId>,
) -> Result<PreparedSubmission, CoreError> {
    let submitted_by = submitted_by.ok_or_else(|| {
        CoreError::Unauthenticated("Sign in to submit a video".to_string())
    })?;

    let form = form.normalized();
    form.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let language = Language::from_code(&form.language).ok_or_else(|| {
        CoreError::Validation(format!("Unsupported language '{}'", form.language))
    })?;

    let NormalizedSource {
        platform,
        platform_id,
        embed_url,
    } = embed::normalize(&form.url);

    Ok(PreparedSubmission {
        id: Uuid::new_v4(),
        video: NewVideo {
            title: form.title,
            description: form.description,
            embed_url,
            platform,
            platform_id,
            language,
            status: VideoStatus::Pending,
            storage_mode: STORAGE_MODE_REMOTE.to_string(),
            submitted_by,
        },
        category_ids: form.category_ids,
        tag_ids: form.tag_ids,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
