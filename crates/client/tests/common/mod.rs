//! In-memory [`VideoStore`] for orchestrator tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::{oneshot, Notify};
use uuid::Uuid;

use monynha_client::error::{ClientError, ClientResult};
use monynha_client::store::VideoStore;
use monynha_core::error::CoreError;
use monynha_core::submission::PreparedSubmission;
use monynha_core::threshold::VoteThreshold;
use monynha_core::types::DbId;
use monynha_core::video::{Category, LocalizedTitles, Tag, TagRef, VideoRecord, VideoStatus};

pub const OP_APPROVED: &str = "approved";
pub const OP_PENDING: &str = "pending";
pub const OP_CATEGORIES: &str = "categories";
pub const OP_TAGS: &str = "tags";
pub const OP_LEDGER: &str = "ledger";
pub const OP_VOTE: &str = "vote";
pub const OP_INSERT: &str = "insert";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn id(n: u128) -> DbId {
    Uuid::from_u128(n)
}

pub fn video(n: u128, title: &str, status: VideoStatus, votes: u32) -> VideoRecord {
    VideoRecord {
        id: id(n),
        title: title.to_string(),
        description: None,
        embed_url: format!("https://www.youtube.com/embed/v{n}"),
        platform: "youtube".to_string(),
        platform_id: format!("v{n}"),
        language: "pt".to_string(),
        status,
        votes_count: votes,
        submitted_by: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        category_slugs: BTreeSet::from(["memes".to_string()]),
        tags: Vec::new(),
    }
}

pub fn tagged(mut record: VideoRecord, name: &str, is_special: bool) -> VideoRecord {
    record.add_tag(TagRef {
        name: name.to_string(),
        is_special,
        color: None,
    });
    record
}

pub fn category(n: u128, slug: &str) -> Category {
    Category {
        id: id(n),
        slug: slug.to_string(),
        titles: LocalizedTitles {
            pt: slug.to_string(),
            en: slug.to_string(),
            es: slug.to_string(),
            fr: slug.to_string(),
        },
    }
}

pub fn tag(n: u128, name: &str, is_special: bool) -> Tag {
    Tag {
        id: id(n),
        name: name.to_string(),
        color: None,
        is_special,
    }
}

// ---------------------------------------------------------------------------
// FakeStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeData {
    videos: Vec<VideoRecord>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    votes: HashSet<(DbId, DbId)>,
    failing: HashSet<&'static str>,
}

/// Holds one store operation until released.
pub struct Hold {
    pub started: Arc<Notify>,
    release: oneshot::Sender<()>,
}

impl Hold {
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

pub struct FakeStore {
    data: Mutex<FakeData>,
    gates: Mutex<HashMap<&'static str, (Arc<Notify>, oneshot::Receiver<()>)>>,
    threshold: VoteThreshold,
    vote_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl FakeStore {
    pub fn new(threshold: VoteThreshold) -> Self {
        Self {
            data: Mutex::new(FakeData::default()),
            gates: Mutex::new(HashMap::new()),
            threshold,
            vote_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_videos(self, videos: Vec<VideoRecord>) -> Self {
        self.data.lock().unwrap().videos = videos;
        self
    }

    pub fn with_reference(self, categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        {
            let mut data = self.data.lock().unwrap();
            data.categories = categories;
            data.tags = tags;
        }
        self
    }

    pub fn seed_vote(&self, video_id: DbId, user_id: DbId) {
        self.data.lock().unwrap().votes.insert((video_id, user_id));
    }

    pub fn fail(&self, op: &'static str) {
        self.data.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.data.lock().unwrap().failing.remove(op);
    }

    /// Block the next call of `op` until the returned hold is released.
    pub fn hold(&self, op: &'static str) -> Hold {
        let started = Arc::new(Notify::new());
        let (release, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(op, (Arc::clone(&started), rx));
        Hold { started, release }
    }

    pub fn vote_calls(&self) -> usize {
        self.vote_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, op: &'static str) -> ClientResult<()> {
        let gate = self.gates.lock().unwrap().remove(op);
        if let Some((started, rx)) = gate {
            started.notify_one();
            let _ = rx.await;
        }
        if self.data.lock().unwrap().failing.contains(op) {
            return Err(ClientError::Core(CoreError::Store(format!("{op} unavailable"))));
        }
        Ok(())
    }

    fn by_status(&self, status: VideoStatus) -> Vec<VideoRecord> {
        let data = self.data.lock().unwrap();
        let mut videos: Vec<VideoRecord> = data
            .videos
            .iter()
            .filter(|v| v.status == status)
            .cloned()
            .collect();
        if status == VideoStatus::Pending {
            videos.sort_by(|a, b| b.votes_count.cmp(&a.votes_count));
        }
        videos
    }
}

#[async_trait]
impl VideoStore for FakeStore {
    async fn approved_videos(&self) -> ClientResult<Vec<VideoRecord>> {
        self.enter(OP_APPROVED).await?;
        Ok(self.by_status(VideoStatus::Approved))
    }

    async fn pending_videos(&self) -> ClientResult<Vec<VideoRecord>> {
        self.enter(OP_PENDING).await?;
        Ok(self.by_status(VideoStatus::Pending))
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.enter(OP_CATEGORIES).await?;
        Ok(self.data.lock().unwrap().categories.clone())
    }

    async fn tags(&self) -> ClientResult<Vec<Tag>> {
        self.enter(OP_TAGS).await?;
        Ok(self.data.lock().unwrap().tags.clone())
    }

    async fn voted_video_ids(&self, user_id: DbId, video_ids: &[DbId]) -> ClientResult<Vec<DbId>> {
        self.enter(OP_LEDGER).await?;
        let data = self.data.lock().unwrap();
        Ok(video_ids
            .iter()
            .copied()
            .filter(|v| data.votes.contains(&(*v, user_id)))
            .collect())
    }

    async fn insert_vote(&self, video_id: DbId, user_id: DbId) -> ClientResult<()> {
        self.vote_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(OP_VOTE).await?;

        let mut data = self.data.lock().unwrap();
        if !data.votes.insert((video_id, user_id)) {
            return Err(ClientError::Core(CoreError::DuplicateVote { video_id }));
        }
        let threshold = self.threshold;
        if let Some(video) = data.videos.iter_mut().find(|v| v.id == video_id) {
            video.votes_count += 1;
            if video.is_pending() && threshold.evaluate(video.votes_count).is_ready {
                video.status = VideoStatus::Approved;
            }
        }
        Ok(())
    }

    async fn insert_video(&self, submission: &PreparedSubmission) -> ClientResult<VideoRecord> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(OP_INSERT).await?;

        let mut data = self.data.lock().unwrap();
        let record = submission.speculative_record(Utc::now(), &data.categories, &data.tags);
        data.videos.push(record.clone());
        Ok(record)
    }
}
