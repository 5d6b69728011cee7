//! Data adapters for the Wayfarer engine.
//!
//! Responsibilities:
//! - Fetch places from an HTTP places API ([`places::HttpPlaceSource`]).
//! - Persist slot solutions in SQLite ([`store::SqliteSolutionCache`]).
//! - Persist geocodes and search pools in SQLite ([`store::SqlitePlaceCache`]).
//!
//! Boundaries:
//! - Do not encode domain rules (live in `wayfarer-core` and the engines).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod places;
pub mod store;

pub use places::{HttpPlaceSource, HttpPlaceSourceConfig, ProviderBuildError};
pub use store::{SqliteCacheError, SqlitePlaceCache, SqliteSolutionCache};
