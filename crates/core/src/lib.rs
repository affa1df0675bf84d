//! Domain logic for the Monynha Fun video catalog.
//!
//! This crate has no database or runtime dependencies. Everything here is
//! evaluated against data already loaded by the caller, so it can be used
//! from render paths, the store adapter, and tests alike.

pub mod cache;
pub mod embed;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod submission;
pub mod threshold;
pub mod types;
pub mod video;
