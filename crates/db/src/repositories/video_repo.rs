//! Repository for the `videos` table and its category/tag joins.

use std::collections::{BTreeSet, HashMap};

use monynha_core::submission::PreparedSubmission;
use monynha_core::threshold::VoteThreshold;
use monynha_core::types::DbId;
use monynha_core::video::{TagRef, VideoRecord, VideoStatus};
use sqlx::{PgExecutor, PgPool};

use crate::models::tag::VideoTagLink;
use crate::models::video::{VideoCategoryLink, VideoRow};

/// Column list for videos queries.
const COLUMNS: &str = "id, title, description, embed_url, platform, platform_id, \
                       language, status, votes_count, submitted_by, created_at";

/// Loads videos as catalog records and inserts submissions.
pub struct VideoRepo;

impl VideoRepo {
    /// Published videos, newest first.
    pub async fn list_approved(pool: &PgPool) -> Result<Vec<VideoRecord>, sqlx::Error> {
        Self::list_by_status(pool, VideoStatus::Approved, "created_at DESC").await
    }

    /// Videos waiting for votes, most voted first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<VideoRecord>, sqlx::Error> {
        Self::list_by_status(pool, VideoStatus::Pending, "votes_count DESC, created_at DESC")
            .await
    }

    async fn list_by_status(
        pool: &PgPool,
        status: VideoStatus,
        order_by: &str,
    ) -> Result<Vec<VideoRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE status = $1 ORDER BY {order_by}");
        let rows = sqlx::query_as::<_, VideoRow>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await?;
        tracing::debug!(status = status.as_str(), count = rows.len(), "Loaded videos");
        Self::attach_links(pool, rows).await
    }

    /// Find a video by id, with its categories and tags.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VideoRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        let row = sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(row) => Ok(Self::attach_links(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Load category slugs and tags for `rows` and build records, keeping
    /// row order.
    async fn attach_links(
        pool: &PgPool,
        rows: Vec<VideoRow>,
    ) -> Result<Vec<VideoRecord>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

        let category_links = sqlx::query_as::<_, VideoCategoryLink>(
            "SELECT vc.video_id, c.slug
             FROM video_categories vc
             JOIN categories c ON c.id = vc.category_id
             WHERE vc.video_id = ANY($1)",
        )
        .bind(ids.as_slice())
        .fetch_all(pool)
        .await?;

        let tag_links = sqlx::query_as::<_, VideoTagLink>(
            "SELECT vt.video_id, t.name, t.is_special, t.color
             FROM video_tags vt
             JOIN tags t ON t.id = vt.tag_id
             WHERE vt.video_id = ANY($1)
             ORDER BY t.name",
        )
        .bind(ids.as_slice())
        .fetch_all(pool)
        .await?;

        let mut slugs: HashMap<DbId, BTreeSet<String>> = HashMap::new();
        for link in category_links {
            slugs.entry(link.video_id).or_default().insert(link.slug);
        }
        let mut tags: HashMap<DbId, Vec<TagRef>> = HashMap::new();
        for link in tag_links {
            tags.entry(link.video_id)
                .or_default()
                .push(link.into_tag_ref());
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_record(
                    slugs.remove(&id).unwrap_or_default(),
                    tags.remove(&id).unwrap_or_default(),
                )
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect()
    }

    /// Insert a submitted video with its category and tag joins in one
    /// transaction, returning the stored record.
    ///
    /// The row keeps the id assigned by `prepare_submission`.
    pub async fn create(
        pool: &PgPool,
        submission: &PreparedSubmission,
    ) -> Result<VideoRecord, sqlx::Error> {
        let video = &submission.video;
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO videos
                (id, title, description, embed_url, platform, platform_id,
                 language, status, storage_mode, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, VideoRow>(&query)
            .bind(submission.id)
            .bind(&video.title)
            .bind(&video.description)
            .bind(&video.embed_url)
            .bind(&video.platform)
            .bind(&video.platform_id)
            .bind(video.language.code())
            .bind(video.status.as_str())
            .bind(&video.storage_mode)
            .bind(video.submitted_by)
            .fetch_one(&mut *tx)
            .await?;

        if !submission.category_ids.is_empty() {
            sqlx::query(
                "INSERT INTO video_categories (video_id, category_id)
                 SELECT $1, UNNEST($2::uuid[])",
            )
            .bind(row.id)
            .bind(submission.category_ids.as_slice())
            .execute(&mut *tx)
            .await?;
        }

        if !submission.tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO video_tags (video_id, tag_id)
                 SELECT $1, UNNEST($2::uuid[])",
            )
            .bind(row.id)
            .bind(submission.tag_ids.as_slice())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(video_id = %row.id, platform = %row.platform, "Video submitted");

        Self::find_by_id(pool, row.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Publish a pending video once it has reached `threshold` votes.
    ///
    /// Returns `true` if the video was promoted by this call.
    pub async fn promote_if_ready<'e, E>(
        executor: E,
        id: DbId,
        threshold: VoteThreshold,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE videos SET status = 'approved', updated_at = now()
             WHERE id = $1 AND status = 'pending' AND votes_count >= $2",
        )
        .bind(id)
        .bind(i64::from(threshold.get()))
        .execute(executor)
        .await?;

        let promoted = result.rows_affected() > 0;
        if promoted {
            tracing::info!(video_id = %id, threshold = %threshold, "Video published");
        }
        Ok(promoted)
    }

    /// Publish every pending video that has reached `threshold` votes.
    pub async fn promote_all_ready(
        pool: &PgPool,
        threshold: VoteThreshold,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos SET status = 'approved', updated_at = now()
             WHERE status = 'pending' AND votes_count >= $1",
        )
        .bind(i64::from(threshold.get()))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
