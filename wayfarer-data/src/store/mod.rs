//! Persistent stores for computed results and provider lookups.

mod places;
mod sqlite;

pub use places::SqlitePlaceCache;
pub use sqlite::{SqliteCacheError, SqliteSolutionCache};
