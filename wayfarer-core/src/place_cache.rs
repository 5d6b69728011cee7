//! Persist geocodes and nearby-search results between place lookups.
//!
//! A place source that owns a [`PlaceCache`] answers repeated lookups for the
//! same city without calling its provider again. Cached pools are stored
//! before opening-hours filtering, so one entry serves every weekday and
//! interval. Entries never expire here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::cache::escape_segment;
use crate::{CacheError, Location, Place, PlaceCategory};

/// Prefix of rendered geocode keys.
pub const GEOCODE_KEY_PREFIX: &str = "geocode";

/// Prefix of rendered nearby-search keys.
pub const PLACES_KEY_PREFIX: &str = "places";

/// Render the storage key for the centre of `location`.
///
/// # Examples
/// ```
/// use wayfarer_core::{Location, geocode_storage_key};
///
/// let key = geocode_storage_key(&Location::parse("Paris, France")?);
/// assert_eq!(key, "geocode:paris:france");
/// # Ok::<(), wayfarer_core::LocationError>(())
/// ```
#[must_use]
pub fn geocode_storage_key(location: &Location) -> String {
    format!(
        "{GEOCODE_KEY_PREFIX}:{}:{}",
        escape_segment(&normalise(&location.city)),
        escape_segment(&normalise(&location.country))
    )
}

fn normalise(part: &str) -> String {
    part.trim().to_lowercase()
}

/// Identity of one category's nearby search around a city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceCacheKey {
    /// Normalised city name.
    pub city: String,
    /// Normalised country name.
    pub country: String,
    /// Search radius in metres, as sent to the provider.
    pub radius: u32,
    /// Category whose provider types were searched.
    pub category: PlaceCategory,
}

impl PlaceCacheKey {
    /// Build a normalised key.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::{Location, PlaceCacheKey, PlaceCategory};
    ///
    /// let key = PlaceCacheKey::new(&Location::parse("Paris,France")?, 2000, PlaceCategory::Visit);
    /// assert_eq!(key.storage_key(), "places:paris:france:2000:visit");
    /// # Ok::<(), wayfarer_core::LocationError>(())
    /// ```
    #[must_use]
    pub fn new(location: &Location, radius: u32, category: PlaceCategory) -> Self {
        Self {
            city: normalise(&location.city),
            country: normalise(&location.country),
            radius,
            category,
        }
    }

    /// Render the key as a stable string for key-value stores.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!(
            "{PLACES_KEY_PREFIX}:{}:{}:{}:{}",
            escape_segment(&self.city),
            escape_segment(&self.country),
            self.radius,
            self.category
        )
    }
}

/// Key-value store for geocoded centres and nearby-search pools.
pub trait PlaceCache: Send + Sync {
    /// Look up the centre of `location`; `Ok(None)` is a miss.
    fn geocode(&self, location: &Location) -> Result<Option<Coord<f64>>, CacheError>;

    /// Store the centre of `location`, replacing any previous entry.
    fn put_geocode(&self, location: &Location, centre: Coord<f64>) -> Result<(), CacheError>;

    /// Look up a search pool; `Ok(None)` is a miss.
    fn places(&self, key: &PlaceCacheKey) -> Result<Option<Vec<Place>>, CacheError>;

    /// Store a search pool under `key`, replacing any previous entry.
    fn put_places(&self, key: &PlaceCacheKey, places: &[Place]) -> Result<(), CacheError>;
}

macro_rules! forward_place_cache {
    ($($wrapper:ty),+) => {$(
        impl<C: PlaceCache + ?Sized> PlaceCache for $wrapper {
            fn geocode(&self, location: &Location) -> Result<Option<Coord<f64>>, CacheError> {
                (**self).geocode(location)
            }

            fn put_geocode(&self, location: &Location, centre: Coord<f64>) -> Result<(), CacheError> {
                (**self).put_geocode(location, centre)
            }

            fn places(&self, key: &PlaceCacheKey) -> Result<Option<Vec<Place>>, CacheError> {
                (**self).places(key)
            }

            fn put_places(&self, key: &PlaceCacheKey, places: &[Place]) -> Result<(), CacheError> {
                (**self).put_places(key, places)
            }
        }
    )+};
}

forward_place_cache!(&C, Box<C>, Arc<C>);

/// Process-local place cache backed by mutex-guarded maps.
#[derive(Debug, Default)]
pub struct MemoryPlaceCache {
    centres: Mutex<HashMap<String, Coord<f64>>>,
    pools: Mutex<HashMap<String, Vec<Place>>>,
}

impl MemoryPlaceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached search pools.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.lock().map_or(0, |pools| pools.len())
    }
}

fn poisoned() -> CacheError {
    CacheError::Backend {
        message: "memory place cache lock poisoned".to_owned(),
    }
}

impl PlaceCache for MemoryPlaceCache {
    fn geocode(&self, location: &Location) -> Result<Option<Coord<f64>>, CacheError> {
        let centres = self.centres.lock().map_err(|_| poisoned())?;
        Ok(centres.get(&geocode_storage_key(location)).copied())
    }

    fn put_geocode(&self, location: &Location, centre: Coord<f64>) -> Result<(), CacheError> {
        let mut centres = self.centres.lock().map_err(|_| poisoned())?;
        centres.insert(geocode_storage_key(location), centre);
        Ok(())
    }

    fn places(&self, key: &PlaceCacheKey) -> Result<Option<Vec<Place>>, CacheError> {
        let pools = self.pools.lock().map_err(|_| poisoned())?;
        Ok(pools.get(&key.storage_key()).cloned())
    }

    fn put_places(&self, key: &PlaceCacheKey, places: &[Place]) -> Result<(), CacheError> {
        let mut pools = self.pools.lock().map_err(|_| poisoned())?;
        pools.insert(key.storage_key(), places.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::place;
    use rstest::{fixture, rstest};

    #[fixture]
    fn paris() -> Location {
        Location::parse("Paris,France").expect("valid location")
    }

    #[rstest]
    fn geocode_keys_ignore_case_and_padding(paris: Location) {
        let shouted = Location::parse(" PARIS , France ").expect("valid location");
        assert_eq!(geocode_storage_key(&paris), geocode_storage_key(&shouted));
    }

    #[rstest]
    fn separators_in_names_do_not_collide() {
        let left = Location {
            city: "a:b".to_owned(),
            country: "c".to_owned(),
        };
        let right = Location {
            city: "a".to_owned(),
            country: "b:c".to_owned(),
        };
        assert_ne!(geocode_storage_key(&left), geocode_storage_key(&right));
        assert_ne!(
            PlaceCacheKey::new(&left, 500, PlaceCategory::Eatery).storage_key(),
            PlaceCacheKey::new(&right, 500, PlaceCategory::Eatery).storage_key()
        );
    }

    #[rstest]
    fn memory_cache_round_trips_centres(paris: Location) {
        let cache = MemoryPlaceCache::new();
        assert_eq!(cache.geocode(&paris).expect("get"), None);

        let centre = Coord { x: 2.35, y: 48.85 };
        cache.put_geocode(&paris, centre).expect("put");
        assert_eq!(cache.geocode(&paris).expect("get"), Some(centre));
    }

    #[rstest]
    fn pools_are_keyed_by_category_and_radius(paris: Location) {
        let cache = MemoryPlaceCache::new();
        let eateries = PlaceCacheKey::new(&paris, 2000, PlaceCategory::Eatery);
        let pool = vec![place("cafe", PlaceCategory::Eatery, 4.0)];
        cache.put_places(&eateries, &pool).expect("put");

        assert_eq!(cache.places(&eateries).expect("get"), Some(pool));
        let visits = PlaceCacheKey::new(&paris, 2000, PlaceCategory::Visit);
        assert_eq!(cache.places(&visits).expect("get"), None);
        let wider = PlaceCacheKey::new(&paris, 4000, PlaceCategory::Eatery);
        assert_eq!(cache.places(&wider).expect("get"), None);
        assert_eq!(cache.pool_count(), 1);
    }

    #[rstest]
    fn shared_handles_see_the_same_entries(paris: Location) {
        let cache = Arc::new(MemoryPlaceCache::new());
        let writer: Box<dyn PlaceCache> = Box::new(Arc::clone(&cache));
        writer
            .put_geocode(&paris, Coord { x: 1.0, y: 2.0 })
            .expect("put");

        assert!(cache.geocode(&paris).expect("get").is_some());
    }
}
