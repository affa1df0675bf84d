//! Repository for the `categories` table.

use monynha_core::video::Category;
use sqlx::PgPool;

use crate::models::category::{CategoryRow, CreateCategory};

/// Column list for categories queries.
const COLUMNS: &str = "id, slug, title_pt, title_en, title_es, title_fr";

/// Provides read access to the category reference data.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories, ordered by their Portuguese title.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY title_pt");
        let rows = sqlx::query_as::<_, CategoryRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Insert a category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (slug, title_pt, title_en, title_es, title_fr)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(&input.slug)
            .bind(&input.titles.pt)
            .bind(&input.titles.en)
            .bind(&input.titles.es)
            .bind(&input.titles.fr)
            .fetch_one(pool)
            .await
            .map(Category::from)
    }
}
