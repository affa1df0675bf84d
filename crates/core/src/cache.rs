//! Reconciling cache for one fetched video collection.
//!
//! Locally submitted videos are shown before the store confirms them. Such
//! entries are kept as [`Provenance::Speculative`] until an authoritative
//! fetch contains the same id, at which point the speculative copy is
//! dropped. A speculative and a confirmed entry never share an id.

use serde::Serialize;

use crate::filter::Filterable;
use crate::types::DbId;
use crate::video::VideoRecord;

/// Where a cached record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Inserted locally, not yet seen in a fetch.
    Speculative,
    /// Returned by the store.
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedVideo {
    pub record: VideoRecord,
    pub provenance: Provenance,
}

impl CachedVideo {
    pub fn is_speculative(&self) -> bool {
        self.provenance == Provenance::Speculative
    }
}

impl Filterable for CachedVideo {
    fn title(&self) -> &str {
        self.record.title()
    }

    fn description(&self) -> Option<&str> {
        Filterable::description(&self.record)
    }

    fn language(&self) -> &str {
        Filterable::language(&self.record)
    }

    fn has_category(&self, slug: &str) -> bool {
        self.record.has_category(slug)
    }

    fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.record.tag_names()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoCache {
    entries: Vec<CachedVideo>,
}

impl VideoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding exactly the given authoritative records.
    pub fn from_confirmed(records: Vec<VideoRecord>) -> Self {
        let mut cache = Self::new();
        cache.reconcile(records);
        cache
    }

    /// Show a record ahead of store confirmation, in front of the list.
    ///
    /// Replaces an earlier speculative entry with the same id. Ignored when
    /// the store already returned that id.
    ///
    /// Returns `true` if the record was inserted.
    pub fn insert_speculative(&mut self, record: VideoRecord) -> bool {
        match self.position(record.id) {
            Some(idx) if self.entries[idx].provenance == Provenance::Confirmed => false,
            Some(idx) => {
                self.entries.remove(idx);
                self.entries.insert(0, speculative(record));
                true
            }
            None => {
                self.entries.insert(0, speculative(record));
                true
            }
        }
    }

    /// Replace confirmed entries with a fresh authoritative fetch.
    ///
    /// Speculative entries whose id appears in `authoritative` are dropped;
    /// the rest stay in front, in their current order.
    pub fn reconcile(&mut self, authoritative: Vec<VideoRecord>) {
        let mut entries: Vec<CachedVideo> = self
            .entries
            .drain(..)
            .filter(|e| {
                e.provenance == Provenance::Speculative
                    && !authoritative.iter().any(|r| r.id == e.record.id)
            })
            .collect();

        entries.extend(authoritative.into_iter().map(|record| CachedVideo {
            record,
            provenance: Provenance::Confirmed,
        }));
        self.entries = entries;
    }

    /// Replace the entry for `record.id` with the stored record, in place.
    /// Inserted at the front when no entry with that id exists.
    pub fn confirm(&mut self, record: VideoRecord) {
        let confirmed = CachedVideo {
            record,
            provenance: Provenance::Confirmed,
        };
        match self.position(confirmed.record.id) {
            Some(idx) => self.entries[idx] = confirmed,
            None => self.entries.insert(0, confirmed),
        }
    }

    /// Drop a speculative entry whose insert failed.
    ///
    /// Returns `true` if an entry was removed. Confirmed entries are kept.
    pub fn discard_speculative(&mut self, video_id: DbId) -> bool {
        match self.position(video_id) {
            Some(idx) if self.entries[idx].is_speculative() => {
                self.entries.remove(idx);
                true
            }
            _ => false,
        }
    }

    /// Count a vote locally until the next fetch brings the real count.
    ///
    /// Returns `true` if a pending record with that id was patched.
    pub fn apply_local_vote(&mut self, video_id: DbId) -> bool {
        self.entries
            .iter_mut()
            .find(|e| e.record.id == video_id)
            .is_some_and(|e| e.record.add_local_vote())
    }

    pub fn get(&self, video_id: DbId) -> Option<&CachedVideo> {
        self.entries.iter().find(|e| e.record.id == video_id)
    }

    pub fn entries(&self) -> &[CachedVideo] {
        &self.entries
    }

    /// Records in display order, cloned out of the cache.
    pub fn records(&self) -> Vec<VideoRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn ids(&self) -> Vec<DbId> {
        self.entries.iter().map(|e| e.record.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: DbId) -> Option<usize> {
        self.entries.iter().position(|e| e.record.id == id)
    }
}

fn speculative(record: VideoRecord) -> CachedVideo {
    CachedVideo {
        record,
        provenance: Provenance::Speculative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::tests::record;
    use crate::video::VideoStatus;
    use uuid::Uuid;

    fn provenance_of(cache: &VideoCache, n: u128) -> Option<Provenance> {
        cache.get(Uuid::from_u128(n)).map(|e| e.provenance)
    }

    #[test]
    fn speculative_entries_go_first() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "a"), record(2, "b")]);
        assert!(cache.insert_speculative(record(3, "new")));
        assert_eq!(
            cache.ids(),
            vec![Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)]
        );
        assert_eq!(provenance_of(&cache, 3), Some(Provenance::Speculative));
    }

    #[test]
    fn reconcile_confirms_speculative_entry() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "a")]);
        cache.insert_speculative(record(3, "draft title"));

        cache.reconcile(vec![record(3, "stored title"), record(1, "a")]);

        assert_eq!(cache.len(), 2);
        let entry = cache.get(Uuid::from_u128(3)).unwrap();
        assert_eq!(entry.provenance, Provenance::Confirmed);
        assert_eq!(entry.record.title, "stored title");
    }

    #[test]
    fn unconfirmed_speculative_entry_survives_reconcile() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "a")]);
        cache.insert_speculative(record(3, "new"));

        cache.reconcile(vec![record(1, "a"), record(2, "b")]);

        assert_eq!(
            cache.ids(),
            vec![Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)]
        );
        assert_eq!(provenance_of(&cache, 3), Some(Provenance::Speculative));
    }

    #[test]
    fn speculative_never_shadows_confirmed() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "stored")]);
        assert!(!cache.insert_speculative(record(1, "draft")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(Uuid::from_u128(1)).unwrap().record.title, "stored");
    }

    #[test]
    fn repeated_speculative_insert_replaces() {
        let mut cache = VideoCache::new();
        cache.insert_speculative(record(1, "first"));
        cache.insert_speculative(record(1, "second"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.records()[0].title, "second");
    }

    #[test]
    fn confirm_replaces_speculative_in_place() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "a")]);
        cache.insert_speculative(record(3, "draft"));
        cache.confirm(record(3, "stored"));

        assert_eq!(cache.ids(), vec![Uuid::from_u128(3), Uuid::from_u128(1)]);
        let entry = cache.get(Uuid::from_u128(3)).unwrap();
        assert!(!entry.is_speculative());
        assert_eq!(entry.record.title, "stored");
    }

    #[test]
    fn discard_only_removes_speculative_entries() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "a")]);
        cache.insert_speculative(record(2, "draft"));

        assert!(cache.discard_speculative(Uuid::from_u128(2)));
        assert!(!cache.discard_speculative(Uuid::from_u128(1)));
        assert_eq!(cache.ids(), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn cached_entries_are_filterable() {
        let mut tagged = record(1, "a");
        tagged.add_tag(crate::video::tests::tag("viral", true));
        let cache = VideoCache::from_confirmed(vec![tagged, record(2, "b")]);

        let query = crate::filter::FacetQuery::new().with_tags(["viral"]);
        let hits = crate::filter::filter(cache.entries(), &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, Uuid::from_u128(1));
    }

    #[test]
    fn local_vote_patches_pending_record() {
        let mut cache = VideoCache::from_confirmed(vec![record(1, "a")]);
        assert!(cache.apply_local_vote(Uuid::from_u128(1)));
        assert_eq!(cache.get(Uuid::from_u128(1)).unwrap().record.votes_count, 1);
        assert!(!cache.apply_local_vote(Uuid::from_u128(9)));
    }

    #[test]
    fn local_vote_ignores_approved_record() {
        let mut approved = record(1, "a");
        approved.status = VideoStatus::Approved;
        let mut cache = VideoCache::from_confirmed(vec![approved]);
        assert!(!cache.apply_local_vote(Uuid::from_u128(1)));
    }
}
