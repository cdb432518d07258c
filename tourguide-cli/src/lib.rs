//! Command-line interface for the TourGuide reward engine.
//!
//! The `simulate` subcommand loads an attraction catalog, generates a
//! population of internal users with random visit histories, and runs the
//! full reward pipeline over them: optional cache preload, scheduled reward
//! calculation, and a JSON summary on stdout.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod catalog;
mod error;
mod oracle;
mod population;
mod simulate;

pub use error::CliError;

use simulate::{SimulateArgs, run_simulate};

pub(crate) const ARG_ATTRACTIONS: &str = "attractions";
pub(crate) const ARG_USERS: &str = "users";
pub(crate) const ARG_LOCATIONS_PER_USER: &str = "locations-per-user";
pub(crate) const ARG_REWARD_BUFFER: &str = "reward-buffer";
pub(crate) const ARG_WORKERS: &str = "workers";
pub(crate) const ARG_PROGRESS_INTERVAL_SECS: &str = "progress-interval-secs";
pub(crate) const ARG_PRELOAD: &str = "preload";
pub(crate) const ARG_ORACLE_LATENCY_MS: &str = "oracle-latency-ms";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ENV_ATTRACTIONS: &str = "TOURGUIDE_CMDS_SIMULATE_ATTRACTIONS";

/// Run the TourGuide CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration loading, or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Simulate(args) => run_simulate(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tourguide",
    about = "Reward calculation tooling for the TourGuide engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate rewards for a generated population of users.
    Simulate(SimulateArgs),
}

#[cfg(test)]
mod tests;
