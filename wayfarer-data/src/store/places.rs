//! SQLite-backed geocode and nearby-search cache.
#![forbid(unsafe_code)]

use std::sync::{Mutex, MutexGuard};

use camino::Utf8Path;
use geo::Coord;
use rusqlite::{Connection, OptionalExtension};
use wayfarer_core::{CacheError, Location, Place, PlaceCache, PlaceCacheKey, geocode_storage_key};

use super::sqlite::{
    SqliteCacheError, backend, lock_connection, open_connection, open_in_memory_connection,
};

/// Geocoded centres and search pools, one row per storage key.
///
/// Centres are stored as `lng`/`lat` columns and pools as JSON arrays of
/// places. Rows are written with `INSERT OR REPLACE` and never expire. The
/// tables may share a database file with
/// [`SqliteSolutionCache`](super::SqliteSolutionCache).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{Location, PlaceCache};
/// use wayfarer_data::SqlitePlaceCache;
///
/// let cache = SqlitePlaceCache::open_in_memory()?;
/// let paris = Location::parse("Paris,France")?;
/// cache.put_geocode(&paris, Coord { x: 2.35, y: 48.85 })?;
/// assert_eq!(cache.geocode(&paris)?, Some(Coord { x: 2.35, y: 48.85 }));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SqlitePlaceCache {
    connection: Mutex<Connection>,
}

impl SqlitePlaceCache {
    /// Open or create a cache database at `path`.
    ///
    /// # Errors
    /// Returns [`SqliteCacheError`] when the directory, database or schema
    /// cannot be created.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteCacheError> {
        let connection = open_connection(path)?;
        log::debug!("opened place cache at {path}");
        Self::from_connection(connection)
    }

    /// Open a private in-memory cache.
    ///
    /// # Errors
    /// Returns [`SqliteCacheError`] when SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqliteCacheError> {
        Self::from_connection(open_in_memory_connection()?)
    }

    fn from_connection(connection: Connection) -> Result<Self, SqliteCacheError> {
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS geocodes (
                    key TEXT PRIMARY KEY,
                    lng REAL NOT NULL,
                    lat REAL NOT NULL
                )",
                [],
            )
            .map_err(|source| SqliteCacheError::CreateSchema {
                table: "geocodes",
                source,
            })?;
        connection
            .execute(
                "CREATE TABLE IF NOT EXISTS place_searches (
                    key TEXT PRIMARY KEY,
                    payload TEXT NOT NULL
                )",
                [],
            )
            .map_err(|source| SqliteCacheError::CreateSchema {
                table: "place_searches",
                source,
            })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        lock_connection(&self.connection)
    }
}

impl PlaceCache for SqlitePlaceCache {
    fn geocode(&self, location: &Location) -> Result<Option<Coord<f64>>, CacheError> {
        self.lock()?
            .query_row(
                "SELECT lng, lat FROM geocodes WHERE key = ?1",
                [geocode_storage_key(location)],
                |row| {
                    Ok(Coord {
                        x: row.get(0)?,
                        y: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(backend)
    }

    fn put_geocode(&self, location: &Location, centre: Coord<f64>) -> Result<(), CacheError> {
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO geocodes (key, lng, lat) VALUES (?1, ?2, ?3)",
                (geocode_storage_key(location), centre.x, centre.y),
            )
            .map_err(backend)?;
        Ok(())
    }

    fn places(&self, key: &PlaceCacheKey) -> Result<Option<Vec<Place>>, CacheError> {
        let storage_key = key.storage_key();
        let payload: Option<String> = self
            .lock()?
            .query_row(
                "SELECT payload FROM place_searches WHERE key = ?1",
                [&storage_key],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        payload
            .map(|json| {
                serde_json::from_str(&json).map_err(|err| CacheError::Corrupt {
                    key: storage_key.clone(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }

    fn put_places(&self, key: &PlaceCacheKey, places: &[Place]) -> Result<(), CacheError> {
        let storage_key = key.storage_key();
        let payload = serde_json::to_string(places).map_err(|err| CacheError::Corrupt {
            key: storage_key.clone(),
            message: err.to_string(),
        })?;
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO place_searches (key, payload) VALUES (?1, ?2)",
                (&storage_key, &payload),
            )
            .map_err(backend)?;
        log::debug!("stored {} places under {storage_key}", places.len());
        Ok(())
    }
}
