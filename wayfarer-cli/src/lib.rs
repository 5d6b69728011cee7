//! Command-line interface for the Wayfarer engines.
//!
//! `wayfarer slot` plans one slot from a JSON [`wayfarer_core::SlotRequest`];
//! `wayfarer day` selects a whole day from a JSON
//! [`wayfarer_core::DayRequest`]. Both print their result as JSON on stdout.
//! Options layer from flags, `WAYFARER_CMDS_<COMMAND>_<FIELD>` environment
//! variables and configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod day;
mod error;
mod inputs;
mod slot;

pub use error::CliError;

use day::DayArgs;
use slot::SlotArgs;

pub(crate) const ARG_REQUEST: &str = "request-path";
pub(crate) const ARG_PLACES_FILE: &str = "places-file";
pub(crate) const ARG_PLACES_URL: &str = "places-url";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_CACHE_DB: &str = "cache-db";
pub(crate) const ARG_SPEED_KMH: &str = "speed-kmh";
pub(crate) const ENV_SLOT_REQUEST: &str = "WAYFARER_CMDS_SLOT_REQUEST_PATH";
pub(crate) const ENV_SLOT_API_KEY: &str = "WAYFARER_CMDS_SLOT_API_KEY";
pub(crate) const ENV_DAY_REQUEST: &str = "WAYFARER_CMDS_DAY_REQUEST_PATH";
pub(crate) const ENV_DAY_PLACES_FILE: &str = "WAYFARER_CMDS_DAY_PLACES_FILE";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or inputs are invalid,
/// or when planning or writing the output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Slot(args) => slot::run_slot_with(args, &mut stdout),
        Command::Day(args) => day::run_day_with(args, &mut stdout),
    }
}

/// Install a stderr `tracing` subscriber that also receives `log` records.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        log::debug!("a global subscriber is already installed");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfarer",
    about = "Plan trip slots and whole days from place pools",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank the best ways to fill one slot of a trip.
    Slot(SlotArgs),
    /// Pick the most valuable set of places for a day.
    Day(DayArgs),
}

#[cfg(test)]
mod tests;
