//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod suggestion_repo;
pub mod tag_repo;
pub mod video_repo;

pub use category_repo::CategoryRepo;
pub use suggestion_repo::SuggestionRepo;
pub use tag_repo::TagRepo;
pub use video_repo::VideoRepo;
