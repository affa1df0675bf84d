//! Video record model and read-only reference data.
//!
//! A [`VideoRecord`] is the normalized in-memory shape of one `videos` row
//! together with its category slugs and tags. Records are produced by the
//! store adapter (or by a speculative submission) and live for one
//! fetch-render cycle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::embed::VideoPlatform;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Submitted video waiting for votes.
pub const STATUS_PENDING: &str = "pending";

/// Published video, visible in the approved catalog.
pub const STATUS_APPROVED: &str = "approved";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED];

/// Tag that marks a video for highlighted rendering.
pub const SPECIAL_TAG_BISCOITO: &str = "biscoito";

/// Special tags offered as quick filters.
pub const QUICK_FILTER_TAGS: &[&str] = &[SPECIAL_TAG_BISCOITO, "viral", "clássico"];

/// Returns `true` if the tag name is one of the quick-filter special tags.
pub fn is_quick_filter_tag(name: &str) -> bool {
    QUICK_FILTER_TAGS.contains(&name)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Publication status of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Pending,
    Approved,
}

impl VideoStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_APPROVED => Ok(Self::Approved),
            _ => Err(CoreError::Validation(format!(
                "Invalid video status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Approved => STATUS_APPROVED,
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Status only ever moves forward: pending to approved. Staying in the
    /// same status is always allowed.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _) | (Self::Approved, Self::Approved)
        )
    }
}

/// Languages a video can be submitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
    Fr,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 4] = [Self::Pt, Self::En, Self::Es, Self::Fr];

    /// Two-letter code stored in `videos.language`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
        }
    }

    /// Parse a language code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Per-language display titles of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedTitles {
    pub pt: String,
    pub en: String,
    pub es: String,
    pub fr: String,
}

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: DbId,
    /// Stable machine key, used by the category facet.
    pub slug: String,
    pub titles: LocalizedTitles,
}

impl Category {
    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::Pt => &self.titles.pt,
            Language::En => &self.titles.en,
            Language::Es => &self.titles.es,
            Language::Fr => &self.titles.fr,
        }
    }
}

/// A row from the `tags` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub is_special: bool,
}

/// Tag as attached to a video. Only the fields the catalog renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
    pub is_special: bool,
    pub color: Option<String>,
}

impl From<&Tag> for TagRef {
    fn from(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            is_special: tag.is_special,
            color: tag.color.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// VideoRecord
// ---------------------------------------------------------------------------

/// A video with its categories, tags and vote state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Canonical playable reference (see [`crate::embed`]).
    pub embed_url: String,
    /// Platform tag derived from the submitted URL.
    pub platform: String,
    pub platform_id: String,
    pub language: String,
    pub status: VideoStatus,
    pub votes_count: u32,
    pub submitted_by: Option<DbId>,
    pub created_at: Timestamp,
    pub category_slugs: BTreeSet<String>,
    pub tags: Vec<TagRef>,
}

impl VideoRecord {
    pub fn is_pending(&self) -> bool {
        self.status == VideoStatus::Pending
    }

    pub fn has_category(&self, slug: &str) -> bool {
        self.category_slugs.contains(slug)
    }

    /// Exact, case-sensitive tag name lookup.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    /// Attach a tag, ignoring duplicates by name.
    pub fn add_tag(&mut self, tag: TagRef) {
        if !self.has_tag(&tag.name) {
            self.tags.push(tag);
        }
    }

    pub fn has_special_tag(&self) -> bool {
        self.tags.iter().any(|t| t.is_special)
    }

    /// Videos tagged `biscoito` get highlighted rendering.
    pub fn is_highlighted(&self) -> bool {
        self.has_tag(SPECIAL_TAG_BISCOITO)
    }

    /// Preview image for platforms with a known thumbnail convention.
    pub fn thumbnail_url(&self) -> Option<String> {
        VideoPlatform::from_tag(&self.platform)
            .and_then(|platform| platform.thumbnail_url(&self.platform_id))
    }

    /// Move the record to `next` status.
    ///
    /// Returns `CoreError::Validation` for a backward transition; the record
    /// is left untouched in that case.
    pub fn transition_to(&mut self, next: VideoStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Validation(format!(
                "Video {} cannot move from {} to {}",
                self.id,
                self.status.as_str(),
                next.as_str()
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Count one more vote locally. Only pending videos accumulate votes.
    ///
    /// Returns `true` if the count changed.
    pub fn add_local_vote(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.votes_count = self.votes_count.saturating_add(1);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    /// Minimal record used across the crate's unit tests.
    pub(crate) fn record(n: u128, title: &str) -> VideoRecord {
        VideoRecord {
            id: Uuid::from_u128(n),
            title: title.to_string(),
            description: None,
            embed_url: "https://www.youtube.com/embed/abc".to_string(),
            platform: "youtube".to_string(),
            platform_id: "abc".to_string(),
            language: "pt".to_string(),
            status: VideoStatus::Pending,
            votes_count: 0,
            submitted_by: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            category_slugs: BTreeSet::new(),
            tags: Vec::new(),
        }
    }

    pub(crate) fn tag(name: &str, is_special: bool) -> TagRef {
        TagRef {
            name: name.to_string(),
            is_special,
            color: None,
        }
    }

    // -- VideoStatus ---------------------------------------------------------

    #[test]
    fn status_round_trips_through_db_values() {
        for value in VALID_STATUSES {
            assert_eq!(VideoStatus::from_str_value(value).unwrap().as_str(), *value);
        }
    }

    #[test]
    fn status_rejects_unknown_value() {
        let err = VideoStatus::from_str_value("rejected").unwrap_err();
        assert!(err.to_string().contains("Invalid video status"));
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(VideoStatus::Pending.can_transition_to(VideoStatus::Approved));
        assert!(VideoStatus::Pending.can_transition_to(VideoStatus::Pending));
        assert!(VideoStatus::Approved.can_transition_to(VideoStatus::Approved));
        assert!(!VideoStatus::Approved.can_transition_to(VideoStatus::Pending));
    }

    #[test]
    fn backward_transition_leaves_record_unchanged() {
        let mut video = record(1, "a");
        video.transition_to(VideoStatus::Approved).unwrap();
        assert!(video.transition_to(VideoStatus::Pending).is_err());
        assert_eq!(video.status, VideoStatus::Approved);
    }

    // -- Language ------------------------------------------------------------

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!(Language::from_code("EN"), Some(Language::En));
        assert_eq!(Language::from_code(" fr "), Some(Language::Fr));
        assert_eq!(Language::from_code("de"), None);
        assert_eq!(Language::default(), Language::Pt);
    }

    #[test]
    fn category_title_follows_language() {
        let category = Category {
            id: Uuid::from_u128(9),
            slug: "musica".to_string(),
            titles: LocalizedTitles {
                pt: "Música".to_string(),
                en: "Music".to_string(),
                es: "Música".to_string(),
                fr: "Musique".to_string(),
            },
        };
        assert_eq!(category.title(Language::En), "Music");
        assert_eq!(category.title(Language::Fr), "Musique");
    }

    // -- Tags ----------------------------------------------------------------

    #[test]
    fn add_tag_ignores_duplicates() {
        let mut video = record(1, "a");
        video.add_tag(tag("cats", false));
        video.add_tag(tag("cats", true));
        assert_eq!(video.tags.len(), 1);
        assert!(!video.has_special_tag());
    }

    #[test]
    fn biscoito_tag_highlights_video() {
        let mut video = record(1, "a");
        assert!(!video.is_highlighted());
        video.add_tag(tag(SPECIAL_TAG_BISCOITO, true));
        assert!(video.is_highlighted());
        assert!(video.has_special_tag());
    }

    #[test]
    fn quick_filter_tags_are_fixed() {
        assert!(is_quick_filter_tag("viral"));
        assert!(is_quick_filter_tag("clássico"));
        assert!(!is_quick_filter_tag("cats"));
    }

    // -- Votes ---------------------------------------------------------------

    #[test]
    fn local_vote_only_counts_while_pending() {
        let mut video = record(1, "a");
        assert!(video.add_local_vote());
        assert_eq!(video.votes_count, 1);

        video.transition_to(VideoStatus::Approved).unwrap();
        assert!(!video.add_local_vote());
        assert_eq!(video.votes_count, 1);
    }

    #[test]
    fn youtube_record_has_thumbnail() {
        let video = record(1, "a");
        assert_eq!(
            video.thumbnail_url().as_deref(),
            Some("https://img.youtube.com/vi/abc/mqdefault.jpg")
        );

        let mut external = record(2, "b");
        external.platform = "example.com".to_string();
        assert_eq!(external.thumbnail_url(), None);
    }
}
