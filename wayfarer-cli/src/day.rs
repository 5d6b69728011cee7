//! `day` command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfarer_core::{DayRequest, Place};
use wayfarer_day::{DayKnapsackSelector, KnapsackSelection};

use crate::inputs::{load_json, load_places, require_existing, write_json};
use crate::{ARG_PLACES_FILE, ARG_REQUEST, CliError, ENV_DAY_PLACES_FILE, ENV_DAY_REQUEST};

/// CLI arguments for the `day` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "day",
    long_about = "Select the most valuable set of places for a whole day. \
                 The request is a JSON-encoded DayRequest; the place pool \
                 is a JSON array of places.",
    about = "Pick the most valuable set of places for a day"
)]
#[ortho_config(prefix = "WAYFARER")]
pub(crate) struct DayArgs {
    /// Path to a JSON file containing a DayRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// JSON array of places to choose from.
    #[arg(long = ARG_PLACES_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) places_file: Option<Utf8PathBuf>,
}

impl DayArgs {
    pub(crate) fn into_config(self) -> Result<DayConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DayConfig::try_from(merged)
    }
}

/// Resolved `day` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DayConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) places_file: Utf8PathBuf,
}

impl DayConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        require_existing(&self.places_file, ARG_PLACES_FILE)
    }
}

impl TryFrom<DayArgs> for DayConfig {
    type Error = CliError;

    fn try_from(args: DayArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_DAY_REQUEST,
        })?;
        let places_file = args.places_file.ok_or(CliError::MissingArgument {
            field: ARG_PLACES_FILE,
            env: ENV_DAY_PLACES_FILE,
        })?;
        Ok(Self {
            request_path,
            places_file,
        })
    }
}

/// JSON shape printed by `wayfarer day`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DayResponse {
    /// Chosen places in pool order.
    pub(crate) places: Vec<Place>,
    pub(crate) total_hours: u32,
    pub(crate) total_cost: u32,
    pub(crate) total_value: u64,
}

impl From<KnapsackSelection> for DayResponse {
    fn from(selection: KnapsackSelection) -> Self {
        Self {
            places: selection.items.into_iter().map(|item| item.place).collect(),
            total_hours: selection.total_hours,
            total_cost: selection.total_cost,
            total_value: selection.total_value,
        }
    }
}

pub(crate) fn run_day_with(args: DayArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let request: DayRequest = load_json(&config.request_path, ARG_REQUEST)?;
    let places = load_places(&config.places_file)?;
    let selection = DayKnapsackSelector::new().select(&places, &request)?;
    log::info!(
        "selected {} places worth {} for {}",
        selection.items.len(),
        selection.total_value,
        request.weekday
    );
    write_json(writer, &DayResponse::from(selection))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<DayConfig, CliError> {
    let merged = DayArgs::merge_from_layers(layers).map_err(CliError::from)?;
    DayConfig::try_from(merged)
}
