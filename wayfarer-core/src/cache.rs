//! Persist and retrieve computed slot solutions.
//!
//! The engine is cache-policy-agnostic: it recomputes on any miss and
//! always offers its result for storage. Entries never expire here.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Location, SlotSolution, SlotTag, TimeInterval, Weekday};

/// Prefix shared by every rendered storage key.
pub const STORAGE_KEY_PREFIX: &str = "slot_solution";

/// Identity of a slot query for caching.
///
/// City and country are lowercased and trimmed on construction so
/// `"Paris, France"` and `"paris,france"` share an entry. Rendered keys
/// percent-escape `%` and `:` inside each part, so distinct keys never
/// render to the same string.
///
/// # Examples
/// ```
/// use wayfarer_core::{Location, SlotTag, SolutionCacheKey, TimeInterval, Weekday};
///
/// let key = SolutionCacheKey::new(
///     &Location::parse("Paris, France")?,
///     2000,
///     &SlotTag::parse("ev")?,
///     &[TimeInterval::new(8, 10)?, TimeInterval::new(10, 12)?],
///     Weekday::Saturday,
/// );
/// assert_eq!(
///     key.storage_key(),
///     "slot_solution:paris:france:2000:EV:8-10,10-12:saturday"
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolutionCacheKey {
    /// Normalised city name.
    pub city: String,
    /// Normalised country name.
    pub country: String,
    /// Search radius in metres.
    pub radius: u32,
    /// Tag symbols in order.
    pub tag: SlotTag,
    /// Per-event stay intervals in order.
    pub intervals: Vec<TimeInterval>,
    /// Day of the visit.
    pub weekday: Weekday,
}

impl SolutionCacheKey {
    /// Build a normalised key.
    #[must_use]
    pub fn new(
        location: &Location,
        radius: u32,
        tag: &SlotTag,
        intervals: &[TimeInterval],
        weekday: Weekday,
    ) -> Self {
        Self {
            city: location.city.trim().to_lowercase(),
            country: location.country.trim().to_lowercase(),
            radius,
            tag: tag.clone(),
            intervals: intervals.to_vec(),
            weekday,
        }
    }

    /// Render the key as a stable string for key-value stores.
    #[must_use]
    pub fn storage_key(&self) -> String {
        let intervals = self
            .intervals
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{STORAGE_KEY_PREFIX}:{}:{}:{}:{}:{intervals}:{}",
            escape_segment(&self.city),
            escape_segment(&self.country),
            self.radius,
            self.tag,
            self.weekday.name().to_lowercase()
        )
    }
}

/// Escape the key separator inside one key part.
pub(crate) fn escape_segment(part: &str) -> String {
    part.replace('%', "%25").replace(':', "%3A")
}

/// Errors raised by cache backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The backing store failed.
    #[error("cache backend error: {message}")]
    Backend {
        /// Backend error description.
        message: String,
    },
    /// A stored entry could not be encoded or decoded.
    #[error("cache entry for {key} is corrupt: {message}")]
    Corrupt {
        /// Storage key of the entry.
        key: String,
        /// Codec error description.
        message: String,
    },
}

/// Key-value store for slot solutions.
pub trait SolutionCache: Send + Sync {
    /// Look up a solution; `Ok(None)` is a miss.
    fn get(&self, key: &SolutionCacheKey) -> Result<Option<SlotSolution>, CacheError>;

    /// Store `solution` under `key`, replacing any previous entry.
    fn put(&self, key: &SolutionCacheKey, solution: &SlotSolution) -> Result<(), CacheError>;
}

impl<C: SolutionCache + ?Sized> SolutionCache for &C {
    fn get(&self, key: &SolutionCacheKey) -> Result<Option<SlotSolution>, CacheError> {
        (**self).get(key)
    }

    fn put(&self, key: &SolutionCacheKey, solution: &SlotSolution) -> Result<(), CacheError> {
        (**self).put(key, solution)
    }
}

impl<C: SolutionCache + ?Sized> SolutionCache for Box<C> {
    fn get(&self, key: &SolutionCacheKey) -> Result<Option<SlotSolution>, CacheError> {
        (**self).get(key)
    }

    fn put(&self, key: &SolutionCacheKey, solution: &SlotSolution) -> Result<(), CacheError> {
        (**self).put(key, solution)
    }
}

/// Process-local cache backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemorySolutionCache {
    entries: Mutex<HashMap<String, SlotSolution>>,
}

impl MemorySolutionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached solutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CacheError {
    CacheError::Backend {
        message: "memory cache lock poisoned".to_owned(),
    }
}

impl SolutionCache for MemorySolutionCache {
    fn get(&self, key: &SolutionCacheKey) -> Result<Option<SlotSolution>, CacheError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(&key.storage_key()).cloned())
    }

    fn put(&self, key: &SolutionCacheKey, solution: &SlotSolution) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.storage_key(), solution.clone());
        Ok(())
    }
}
