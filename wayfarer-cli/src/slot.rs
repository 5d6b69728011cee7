//! `slot` command implementation.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfarer_core::{
    DEFAULT_SPEED_KMH, DistanceTravelTime, MemorySolutionCache, PlaceSource, RatingScorer,
    SlotRequest, SlotSolution, SolutionCache, StaticPlaceSource,
};
use wayfarer_data::places::DEFAULT_BASE_URL;
use wayfarer_data::{
    HttpPlaceSource, HttpPlaceSourceConfig, SqlitePlaceCache, SqliteSolutionCache,
};
use wayfarer_slots::SlotPlanner;

use crate::inputs::{load_json, load_places, require_existing, write_json};
use crate::{
    ARG_API_KEY, ARG_CACHE_DB, ARG_PLACES_FILE, ARG_PLACES_URL, ARG_REQUEST, ARG_SPEED_KMH,
    CliError, ENV_SLOT_API_KEY, ENV_SLOT_REQUEST,
};

/// CLI arguments for the `slot` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "slot",
    long_about = "Plan one slot of a trip from a JSON-encoded SlotRequest. \
                 Places come from a JSON file or, by default, from the \
                 places HTTP API. Solutions, geocodes and place searches \
                 are cached in SQLite when --cache-db is given.",
    about = "Rank the best ways to fill one slot of a trip"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct SlotArgs {
    /// Path to a JSON file containing a SlotRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// JSON array of places to plan from instead of the HTTP API.
    #[arg(long = ARG_PLACES_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) places_file: Option<Utf8PathBuf>,
    /// Root of the places HTTP API.
    #[arg(long = ARG_PLACES_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) places_url: Option<String>,
    /// Key for the places HTTP API.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// SQLite database caching solutions and place lookups.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Travel speed between places in km/h.
    #[arg(long = ARG_SPEED_KMH, value_name = "kmh")]
    #[serde(default)]
    pub(crate) speed_kmh: Option<f64>,
}

impl SlotArgs {
    pub(crate) fn into_config(self) -> Result<SlotConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SlotConfig::try_from(merged)
    }
}

/// Where places for the slot come from.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum PlacesInput {
    /// A JSON array of places on disk.
    File(Utf8PathBuf),
    /// The places HTTP API.
    Http {
        /// API root.
        base_url: String,
        /// API key.
        api_key: String,
    },
}

impl std::fmt::Debug for PlacesInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Http { base_url, .. } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Resolved `slot` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlotConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Place pool to plan from.
    pub(crate) places: PlacesInput,
    /// Optional SQLite cache location.
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Travel speed in km/h.
    pub(crate) speed_kmh: f64,
}

impl SlotConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        if let PlacesInput::File(path) = &self.places {
            require_existing(path, ARG_PLACES_FILE)?;
        }
        Ok(())
    }
}

impl TryFrom<SlotArgs> for SlotConfig {
    type Error = CliError;

    fn try_from(args: SlotArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_SLOT_REQUEST,
        })?;

        let places = match (args.places_file, args.places_url) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_PLACES_FILE,
                    second: ARG_PLACES_URL,
                });
            }
            (Some(path), None) => PlacesInput::File(path),
            (None, url) => PlacesInput::Http {
                base_url: url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
                api_key: args.api_key.ok_or(CliError::MissingArgument {
                    field: ARG_API_KEY,
                    env: ENV_SLOT_API_KEY,
                })?,
            },
        };

        let speed_kmh = args.speed_kmh.unwrap_or(DEFAULT_SPEED_KMH);
        if !(speed_kmh.is_finite() && speed_kmh > 0.0) {
            return Err(CliError::InvalidSpeed { value: speed_kmh });
        }

        Ok(Self {
            request_path,
            places,
            cache_db: args.cache_db,
            speed_kmh,
        })
    }
}

/// Build the configured place source; HTTP lookups share `cache_db`.
pub(crate) fn build_place_source(
    places: &PlacesInput,
    cache_db: Option<&Utf8Path>,
) -> Result<Box<dyn PlaceSource>, CliError> {
    match places {
        PlacesInput::File(path) => Ok(Box::new(StaticPlaceSource::new(load_places(path)?))),
        PlacesInput::Http { base_url, api_key } => {
            let config = HttpPlaceSourceConfig::new(api_key.clone()).with_base_url(base_url.clone());
            let source = HttpPlaceSource::with_config(config).map_err(|source| {
                CliError::BuildPlaceSource {
                    base_url: base_url.clone(),
                    source,
                }
            })?;
            match cache_db {
                Some(path) => Ok(Box::new(source.with_cache(SqlitePlaceCache::open(path)?))),
                None => Ok(Box::new(source)),
            }
        }
    }
}

fn open_cache(cache_db: Option<&Utf8Path>) -> Result<Box<dyn SolutionCache>, CliError> {
    match cache_db {
        Some(path) => Ok(Box::new(SqliteSolutionCache::open(path)?)),
        None => Ok(Box::new(MemorySolutionCache::new())),
    }
}

pub(crate) fn run_slot_with(args: SlotArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let solution = execute_slot(args)?;
    write_json(writer, &solution)
}

fn execute_slot(args: SlotArgs) -> Result<SlotSolution, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request: SlotRequest = load_json(&config.request_path, ARG_REQUEST)?;
    let planner = SlotPlanner::new(
        build_place_source(&config.places, config.cache_db.as_deref())?,
        RatingScorer,
        DistanceTravelTime::new(config.speed_kmh),
        open_cache(config.cache_db.as_deref())?,
    );
    Ok(planner.plan(&request)?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SlotConfig, CliError> {
    let merged = SlotArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SlotConfig::try_from(merged)
}
