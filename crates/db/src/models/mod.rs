//! Database row structs.
//!
//! Each submodule contains a `FromRow` struct matching the table row and the
//! conversion into the corresponding `monynha_core` type.

pub mod category;
pub mod suggestion;
pub mod tag;
pub mod video;
