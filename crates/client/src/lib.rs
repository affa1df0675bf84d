//! Catalog orchestration for the Monynha Fun client.
//!
//! Owns the explicit home state (fetched sections, facet query, vote ledger,
//! session) and drives the store through the [`store::VideoStore`] seam. The
//! binary entrypoint and the integration tests both build on this library.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod store;
