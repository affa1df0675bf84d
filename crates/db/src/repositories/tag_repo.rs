//! Repository for the `tags` table.

use monynha_core::video::Tag;
use sqlx::PgPool;

use crate::models::tag::TagRow;

/// Column list for tags queries.
const COLUMNS: &str = "id, name, color, is_special";

/// Provides read access to the tag reference data.
pub struct TagRepo;

impl TagRepo {
    /// List all tags, ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name");
        let rows = sqlx::query_as::<_, TagRow>(&query).fetch_all(pool).await?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    /// List only the special (promotional/thematic) tags.
    pub async fn list_special(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE is_special ORDER BY name");
        let rows = sqlx::query_as::<_, TagRow>(&query).fetch_all(pool).await?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }
}
