use monynha_core::types::DbId;
use monynha_core::video::{Tag, TagRef};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub is_special: bool,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            name: row.name,
            color: row.color,
            is_special: row.is_special,
        }
    }
}

/// A tag joined to one video through `video_tags`.
#[derive(Debug, Clone, FromRow)]
pub struct VideoTagLink {
    pub video_id: DbId,
    pub name: String,
    pub is_special: bool,
    pub color: Option<String>,
}

impl VideoTagLink {
    pub fn into_tag_ref(self) -> TagRef {
        TagRef {
            name: self.name,
            is_special: self.is_special,
            color: self.color,
        }
    }
}
