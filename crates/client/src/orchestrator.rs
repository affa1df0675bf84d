//! Home-screen orchestration over a [`VideoStore`].
//!
//! A refresh fetches approved videos, pending videos, categories and tags
//! concurrently and applies each result to its own section. The vote ledger
//! is fetched after the pending list, and only for a signed-in user. Every
//! refresh takes a generation ticket under the state lock; results carrying
//! an outdated ticket are dropped.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use monynha_core::filter::FacetQuery;
use monynha_core::ledger::VoteLedger;
use monynha_core::submission::{prepare_submission, SubmissionForm};
use monynha_core::threshold::VoteThreshold;
use monynha_core::types::DbId;
use monynha_core::video::VideoRecord;

use crate::error::{ClientError, ClientResult};
use crate::session::Session;
use crate::state::{HomeState, PendingVideoView};
use crate::store::VideoStore;

pub const SECTION_APPROVED: &str = "approved";
pub const SECTION_PENDING: &str = "pending";
pub const SECTION_CATEGORIES: &str = "categories";
pub const SECTION_TAGS: &str = "tags";
pub const SECTION_LEDGER: &str = "ledger";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Results were applied; `failed_sections` lists sections whose fetch
    /// failed and kept their previous data.
    Applied { failed_sections: Vec<&'static str> },
    /// A newer refresh or session change superseded this one.
    Stale,
}

impl RefreshOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// The store accepted the vote.
    Recorded,
    /// The ledger already holds a vote for this video; nothing was sent.
    AlreadyVoted,
    /// The store rejected the vote as a repeat.
    RejectedDuplicate,
}

pub struct Orchestrator {
    store: Arc<dyn VideoStore>,
    threshold: VoteThreshold,
    state: Mutex<HomeState>,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn VideoStore>, threshold: VoteThreshold) -> Self {
        Self {
            store,
            threshold,
            state: Mutex::new(HomeState::default()),
        }
    }

    pub fn threshold(&self) -> VoteThreshold {
        self.threshold
    }

    /// Lock the home state for reading views.
    pub async fn state(&self) -> MutexGuard<'_, HomeState> {
        self.state.lock().await
    }

    /// Clone of the current home state.
    pub async fn snapshot(&self) -> HomeState {
        self.state.lock().await.clone()
    }

    pub async fn pending_view(&self) -> Vec<PendingVideoView> {
        self.state.lock().await.pending_view(self.threshold)
    }

    pub async fn approved_view(&self) -> Vec<VideoRecord> {
        self.state
            .lock()
            .await
            .approved_view()
            .into_iter()
            .map(|e| e.record.clone())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Query
    // -----------------------------------------------------------------------

    pub async fn set_query(&self, query: FacetQuery) {
        self.state.lock().await.query = query;
    }

    /// Edit the current query in place, e.g. `|q| q.toggle_tag("viral")`.
    pub async fn update_query<F>(&self, edit: F)
    where
        F: FnOnce(&mut FacetQuery),
    {
        edit(&mut self.state.lock().await.query);
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Switch the signed-in user and refresh.
    ///
    /// The previous user's ledger is dropped at once and any refresh still
    /// in flight for them is invalidated.
    pub async fn set_session(&self, session: Session) -> RefreshOutcome {
        {
            let mut state = self.state.lock().await;
            if state.session != session {
                tracing::info!(user_id = ?session.user_id(), "Session changed");
                state.session = session;
                state.ledger = VoteLedger::empty();
                state.generation += 1;
            }
        }
        self.refresh().await
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    /// Fetch all sections and apply them unless a newer refresh started.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (generation, user) = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.approved.mark_loading();
            state.pending.mark_loading();
            state.categories.mark_loading();
            state.tags.mark_loading();
            (state.generation, state.session.user_id())
        };

        let store = self.store.as_ref();
        let pending_and_ledger = async {
            let pending = store.pending_videos().await;
            let ledger = match (&pending, user) {
                (Ok(records), Some(user_id)) => {
                    let ids: Vec<DbId> = records.iter().map(|r| r.id).collect();
                    Some(store.voted_video_ids(user_id, &ids).await)
                }
                _ => None,
            };
            (pending, ledger)
        };

        let (approved, (pending, ledger), categories, tags) = tokio::join!(
            store.approved_videos(),
            pending_and_ledger,
            store.categories(),
            store.tags(),
        );

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(
                ticket = generation,
                current = state.generation,
                "Discarding stale refresh"
            );
            return RefreshOutcome::Stale;
        }

        let mut failed_sections = Vec::new();

        match approved {
            Ok(records) => {
                state.approved.data_mut().reconcile(records);
                state.approved.mark_ready();
            }
            Err(e) => fail_section(&mut failed_sections, SECTION_APPROVED, &e, |m| {
                state.approved.mark_failed(m)
            }),
        }

        match pending {
            Ok(records) => {
                state.pending.data_mut().reconcile(records);
                state.pending.mark_ready();
            }
            Err(e) => fail_section(&mut failed_sections, SECTION_PENDING, &e, |m| {
                state.pending.mark_failed(m)
            }),
        }

        match categories {
            Ok(categories) => state.categories.set(categories),
            Err(e) => fail_section(&mut failed_sections, SECTION_CATEGORIES, &e, |m| {
                state.categories.mark_failed(m)
            }),
        }

        match tags {
            Ok(tags) => state.tags.set(tags),
            Err(e) => fail_section(&mut failed_sections, SECTION_TAGS, &e, |m| {
                state.tags.mark_failed(m)
            }),
        }

        // Signed out, a failed pending fetch and a failed ledger fetch all
        // leave an empty ledger; the store still rejects repeated votes.
        match ledger {
            Some(Ok(voted)) => state.ledger.replace(VoteLedger::from_voted(voted)),
            Some(Err(e)) => {
                state.ledger = VoteLedger::empty();
                fail_section(&mut failed_sections, SECTION_LEDGER, &e, |_| ());
            }
            None => state.ledger = VoteLedger::empty(),
        }

        tracing::debug!(
            generation,
            approved = state.approved.data().len(),
            pending = state.pending.data().len(),
            voted = state.ledger.len(),
            failed = failed_sections.len(),
            "Refresh applied"
        );
        RefreshOutcome::Applied { failed_sections }
    }

    // -----------------------------------------------------------------------
    // Votes
    // -----------------------------------------------------------------------

    /// Vote for a pending video as the signed-in user.
    ///
    /// Fails with `CoreError::Unauthenticated` without calling the store when
    /// nobody is signed in. A video already in the ledger is never sent again.
    pub async fn vote(&self, video_id: DbId) -> ClientResult<VoteOutcome> {
        let user_id = {
            let state = self.state.lock().await;
            let user_id = state.session.require_user("vote")?;
            if state.ledger.check_can_vote(video_id).is_err() {
                tracing::debug!(video_id = %video_id, "Vote skipped, already in ledger");
                return Ok(VoteOutcome::AlreadyVoted);
            }
            user_id
        };

        match self.store.insert_vote(video_id, user_id).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate_vote() => {
                tracing::info!(video_id = %video_id, "Vote rejected as duplicate");
                return Ok(VoteOutcome::RejectedDuplicate);
            }
            Err(e) => return Err(e),
        }

        {
            let mut state = self.state.lock().await;
            if state.session.user_id() == Some(user_id) {
                state.ledger.record(video_id);
                state.pending.data_mut().apply_local_vote(video_id);
            }
            // Refreshes that read the store before this vote must not apply.
            state.generation += 1;
        }
        tracing::info!(video_id = %video_id, "Vote recorded");

        self.refresh().await;
        Ok(VoteOutcome::Recorded)
    }

    // -----------------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------------

    /// Submit a video. It is shown in the pending list right away and
    /// replaced by the stored record once the insert succeeds, or removed
    /// if it fails. A successful insert is followed by a refresh; any
    /// refresh started before the insert is discarded.
    pub async fn submit(&self, form: SubmissionForm) -> ClientResult<VideoRecord> {
        let prepared = {
            let mut state = self.state.lock().await;
            let prepared = prepare_submission(form, state.session.user_id())?;
            let speculative = prepared.speculative_record(
                Utc::now(),
                state.categories.data(),
                state.tags.data(),
            );
            state.pending.data_mut().insert_speculative(speculative);
            prepared
        };

        match self.store.insert_video(&prepared).await {
            Ok(stored) => {
                {
                    let mut state = self.state.lock().await;
                    state.pending.data_mut().confirm(stored.clone());
                    // A pending list fetched before the insert lacks this
                    // video; invalidate it and fetch again.
                    state.generation += 1;
                }
                tracing::info!(video_id = %stored.id, "Submission stored");
                self.refresh().await;
                Ok(stored)
            }
            Err(e) => {
                self.state
                    .lock()
                    .await
                    .pending
                    .data_mut()
                    .discard_speculative(prepared.id);
                tracing::warn!(video_id = %prepared.id, error = %e, "Submission failed");
                Err(e)
            }
        }
    }
}

fn fail_section<F>(failed: &mut Vec<&'static str>, section: &'static str, err: &ClientError, mark: F)
where
    F: FnOnce(String),
{
    tracing::warn!(section, error = %err, "Section fetch failed");
    mark(err.to_string());
    failed.push(section);
}
