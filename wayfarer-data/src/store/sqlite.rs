//! SQLite-backed slot solution cache.
#![forbid(unsafe_code)]

use std::sync::{Mutex, MutexGuard};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use rusqlite::{Connection, Error as SqliteError, OptionalExtension};
use thiserror::Error;
use wayfarer_core::{CacheError, SlotSolution, SolutionCache, SolutionCacheKey};

/// Errors raised while opening a SQLite-backed cache.
#[derive(Debug, Error)]
pub enum SqliteCacheError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory {path:?}")]
    CreateDirectory {
        /// Path of the directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating a cache table failed.
    #[error("failed to create {table} table")]
    CreateSchema {
        /// Name of the table.
        table: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Slot solutions stored as JSON, one row per storage key.
///
/// Rows are written with `INSERT OR REPLACE`, so a later `put` for the same
/// key overwrites the earlier entry. Entries never expire.
///
/// # Examples
/// ```
/// use wayfarer_core::{
///     Location, SlotSolution, SlotTag, SolutionCache, SolutionCacheKey, TimeInterval, Weekday,
/// };
/// use wayfarer_data::SqliteSolutionCache;
///
/// let cache = SqliteSolutionCache::open_in_memory()?;
/// let tag = SlotTag::parse("EV")?;
/// let key = SolutionCacheKey::new(
///     &Location::parse("Paris,France")?,
///     2000,
///     &tag,
///     &[TimeInterval::new(8, 10)?, TimeInterval::new(10, 12)?],
///     Weekday::Sunday,
/// );
/// cache.put(&key, &SlotSolution::empty(tag))?;
/// assert!(cache.get(&key)?.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SqliteSolutionCache {
    connection: Mutex<Connection>,
}

impl SqliteSolutionCache {
    /// Open or create a cache database at `path`.
    ///
    /// Parent directories are created automatically and the table is
    /// initialised if missing.
    ///
    /// # Errors
    /// Returns [`SqliteCacheError`] when the directory, database or schema
    /// cannot be created.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteCacheError> {
        let connection = open_connection(path)?;
        log::debug!("opened solution cache at {path}");
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
                "CREATE TABLE IF NOT EXISTS slot_solutions (
                    key TEXT PRIMARY KEY,
                    payload TEXT NOT NULL
                )",
                [],
            )
            .map_err(|source| SqliteCacheError::CreateSchema {
                table: "slot_solutions",
                source,
            })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Number of stored solutions.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when the count query fails.
    pub fn len(&self) -> Result<usize, CacheError> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM slot_solutions", [], |row| row.get(0))
            .map_err(backend)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Whether the cache holds no solutions.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when the count query fails.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        self.len().map(|count| count == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        lock_connection(&self.connection)
    }
}

pub(super) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, CacheError> {
    connection.lock().map_err(|_| CacheError::Backend {
        message: "SQLite connection lock poisoned".to_owned(),
    })
}

/// Create the parent directory of `path` and open the database there.
pub(super) fn open_connection(path: &Utf8Path) -> Result<Connection, SqliteCacheError> {
    ensure_parent_dir(path)?;
    Connection::open(path.as_std_path()).map_err(|source| SqliteCacheError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn open_in_memory_connection() -> Result<Connection, SqliteCacheError> {
    Connection::open_in_memory().map_err(|source| SqliteCacheError::Open {
        path: Utf8PathBuf::from(":memory:"),
        source,
    })
}

pub(super) fn backend(source: SqliteError) -> CacheError {
    CacheError::Backend {
        message: source.to_string(),
    }
}

impl SolutionCache for SqliteSolutionCache {
    fn get(&self, key: &SolutionCacheKey) -> Result<Option<SlotSolution>, CacheError> {
        let storage_key = key.storage_key();
        let payload: Option<String> = self
            .lock()?
            .query_row(
                "SELECT payload FROM slot_solutions WHERE key = ?1",
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

    fn put(&self, key: &SolutionCacheKey, solution: &SlotSolution) -> Result<(), CacheError> {
        let storage_key = key.storage_key();
        let payload = serde_json::to_string(solution).map_err(|err| CacheError::Corrupt {
            key: storage_key.clone(),
            message: err.to_string(),
        })?;
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO slot_solutions (key, payload) VALUES (?1, ?2)",
                (&storage_key, &payload),
            )
            .map_err(backend)?;
        log::debug!("stored solution under {storage_key}");
        Ok(())
    }
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), SqliteCacheError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    base_dir
        .create_dir_all(&relative)
        .map_err(|source| SqliteCacheError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })
}

fn base_dir_and_relative(
    parent: &Utf8Path,
) -> Result<(fs_utf8::Dir, Utf8PathBuf), SqliteCacheError> {
    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };

    let dir = fs_utf8::Dir::open_ambient_dir(base, ambient_authority()).map_err(|source| {
        SqliteCacheError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        }
    })?;

    Ok((dir, relative.to_path_buf()))
}
