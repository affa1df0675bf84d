//! Client-side cache of the current user's votes.
//!
//! The store's `(video_id, user_id)` uniqueness constraint is the authority.
//! The ledger only mirrors it for the signed-in user so a repeated vote is
//! never sent; it is never used to compute vote counts.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    voted: HashSet<DbId>,
}

impl VoteLedger {
    /// Empty ledger, used when nobody is signed in or nothing is pending.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the video ids the store reports the user voted on.
    pub fn from_voted<I: IntoIterator<Item = DbId>>(video_ids: I) -> Self {
        Self {
            voted: video_ids.into_iter().collect(),
        }
    }

    pub fn has_voted(&self, video_id: DbId) -> bool {
        self.voted.contains(&video_id)
    }

    /// Gate a vote attempt: `CoreError::DuplicateVote` if already voted.
    pub fn check_can_vote(&self, video_id: DbId) -> Result<(), CoreError> {
        if self.has_voted(video_id) {
            return Err(CoreError::DuplicateVote { video_id });
        }
        Ok(())
    }

    /// Mark a vote the store accepted.
    pub fn record(&mut self, video_id: DbId) {
        self.voted.insert(video_id);
    }

    /// Swap in a freshly fetched set.
    pub fn replace(&mut self, fresh: VoteLedger) {
        *self = fresh;
    }

    pub fn len(&self) -> usize {
        self.voted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voted.is_empty()
    }
}
