use monynha_core::types::DbId;
use monynha_core::video::{Category, LocalizedTitles};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: DbId,
    pub slug: String,
    pub title_pt: String,
    pub title_en: String,
    pub title_es: String,
    pub title_fr: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            slug: row.slug,
            titles: LocalizedTitles {
                pt: row.title_pt,
                en: row.title_en,
                es: row.title_es,
                fr: row.title_fr,
            },
        }
    }
}

/// DTO for inserting a category. Categories are seeded by operators.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub slug: String,
    pub titles: LocalizedTitles,
}
