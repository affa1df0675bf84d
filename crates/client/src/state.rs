//! Explicit home state: fetched sections, facet query, vote ledger and
//! session, plus the derived views rendered from them.

use serde::Serialize;

use monynha_core::cache::{CachedVideo, Provenance, VideoCache};
use monynha_core::filter::{self, FacetQuery};
use monynha_core::ledger::VoteLedger;
use monynha_core::threshold::{VoteProgress, VoteThreshold};
use monynha_core::video::{Category, Tag, VideoRecord};

use crate::session::Session;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SectionStatus {
    Loading,
    Ready,
    Failed(String),
}

/// One independently fetched piece of the home state.
///
/// A failed fetch keeps the last good data.
#[derive(Debug, Clone)]
pub struct Section<T> {
    data: T,
    status: SectionStatus,
}

impl<T: Default> Default for Section<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            status: SectionStatus::Loading,
        }
    }
}

impl<T> Section<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn status(&self) -> &SectionStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == SectionStatus::Ready
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SectionStatus::Failed(_))
    }

    pub fn mark_loading(&mut self) {
        self.status = SectionStatus::Loading;
    }

    pub fn mark_ready(&mut self) {
        self.status = SectionStatus::Ready;
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = SectionStatus::Failed(message.into());
    }

    /// Replace the data and mark the section ready.
    pub fn set(&mut self, data: T) {
        self.data = data;
        self.status = SectionStatus::Ready;
    }
}

// ---------------------------------------------------------------------------
// HomeState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub approved: Section<VideoCache>,
    pub pending: Section<VideoCache>,
    pub categories: Section<Vec<Category>>,
    pub tags: Section<Vec<Tag>>,
    pub ledger: VoteLedger,
    pub query: FacetQuery,
    pub session: Session,
    /// Ticket of the most recently started refresh.
    pub generation: u64,
}

/// A pending video as shown in the voting list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingVideoView {
    pub record: VideoRecord,
    pub provenance: Provenance,
    pub progress: VoteProgress,
    pub has_voted: bool,
}

impl HomeState {
    /// Approved videos matching the current query, in display order.
    pub fn approved_view(&self) -> Vec<&CachedVideo> {
        filter::filter(self.approved.data().entries(), &self.query)
    }

    /// Approved videos tagged `biscoito`, for the highlights strip.
    pub fn highlighted_view(&self) -> Vec<&CachedVideo> {
        self.approved
            .data()
            .entries()
            .iter()
            .filter(|e| e.record.is_highlighted())
            .collect()
    }

    /// Pending videos with their progress toward `threshold`.
    pub fn pending_view(&self, threshold: VoteThreshold) -> Vec<PendingVideoView> {
        self.pending
            .data()
            .entries()
            .iter()
            .map(|e| PendingVideoView {
                record: e.record.clone(),
                provenance: e.provenance,
                progress: threshold.evaluate(e.record.votes_count),
                has_voted: self.ledger.has_voted(e.record.id),
            })
            .collect()
    }

    /// Category slugs for the filter bar, in loaded order.
    pub fn category_slugs(&self) -> Vec<&str> {
        self.categories
            .data()
            .iter()
            .map(|c| c.slug.as_str())
            .collect()
    }
}
