//! Simulate command implementation for the TourGuide CLI.

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tourguide_core::{
    AttractionCatalog, DEFAULT_REWARD_BUFFER_MILES, ProximityConfig, ProximityEvaluator,
    RewardPointsOracle, User,
};
use tourguide_rewards::{
    CacheConfig, CalculationScheduler, RewardAttributor, RewardPointsCache, SchedulerConfig,
    scheduler::{DEFAULT_PROGRESS_INTERVAL, DEFAULT_WORKERS},
};

use crate::catalog::load_catalog;
use crate::oracle::SimulatedOracle;
use crate::population::generate_users;
use crate::{
    ARG_ATTRACTIONS, ARG_LOCATIONS_PER_USER, ARG_ORACLE_LATENCY_MS, ARG_PRELOAD,
    ARG_PROGRESS_INTERVAL_SECS, ARG_REWARD_BUFFER, ARG_SEED, ARG_USERS, ARG_WORKERS, CliError,
    ENV_ATTRACTIONS,
};

/// Users generated when `--users` is not given.
pub(crate) const DEFAULT_USERS: usize = 100;
/// Visits generated per user when `--locations-per-user` is not given.
pub(crate) const DEFAULT_LOCATIONS_PER_USER: usize = 3;

/// CLI arguments for the `simulate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate internal users with random visit histories and \
                 calculate their rewards against an attraction catalog. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Calculate rewards for a generated population"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct SimulateArgs {
    /// Path to a JSON array of attractions.
    #[arg(long = ARG_ATTRACTIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) attractions: Option<Utf8PathBuf>,
    /// Number of internal users to generate.
    #[arg(long = ARG_USERS, value_name = "n")]
    #[serde(default)]
    pub(crate) users: Option<usize>,
    /// Number of visited locations generated per user.
    #[arg(long = ARG_LOCATIONS_PER_USER, value_name = "n")]
    #[serde(default)]
    pub(crate) locations_per_user: Option<usize>,
    /// Reward buffer in statute miles.
    #[arg(long = ARG_REWARD_BUFFER, value_name = "miles")]
    #[serde(default)]
    pub(crate) reward_buffer: Option<f64>,
    /// Worker threads in the reward calculation pool.
    #[arg(long = ARG_WORKERS, value_name = "n")]
    #[serde(default)]
    pub(crate) workers: Option<usize>,
    /// Seconds between progress reports while waiting on the batch.
    #[arg(long = ARG_PROGRESS_INTERVAL_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) progress_interval_secs: Option<u64>,
    /// Enable the reward-points cache and preload it before calculating.
    #[arg(long = ARG_PRELOAD, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default)]
    pub(crate) preload: Option<bool>,
    /// Delay added to every simulated reward-point lookup.
    #[arg(long = ARG_ORACLE_LATENCY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) oracle_latency_ms: Option<u64>,
    /// Seed for the generated population; random when omitted.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl SimulateArgs {
    pub(crate) fn into_config(self) -> Result<SimulateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SimulateConfig::try_from(merged)
    }
}

/// Resolved `simulate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SimulateConfig {
    /// Path to the attraction catalog.
    pub(crate) attractions: Utf8PathBuf,
    /// Users to generate.
    pub(crate) users: usize,
    /// Visits per generated user.
    pub(crate) locations_per_user: usize,
    /// Reward buffer in statute miles.
    pub(crate) reward_buffer: f64,
    /// Reward calculation workers.
    pub(crate) workers: usize,
    /// Progress report interval.
    pub(crate) progress_interval: Duration,
    /// Whether to enable and preload the cache.
    pub(crate) preload: bool,
    /// Simulated oracle latency.
    pub(crate) oracle_latency: Duration,
    /// Population seed.
    pub(crate) seed: u64,
}

impl TryFrom<SimulateArgs> for SimulateConfig {
    type Error = CliError;

    fn try_from(args: SimulateArgs) -> Result<Self, Self::Error> {
        let attractions = args.attractions.ok_or(CliError::MissingArgument {
            field: ARG_ATTRACTIONS,
            env: ENV_ATTRACTIONS,
        })?;
        let workers = args.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(CliError::InvalidConfig {
                field: ARG_WORKERS,
                reason: "at least one worker is required",
            });
        }
        let progress_interval = args
            .progress_interval_secs
            .map_or(DEFAULT_PROGRESS_INTERVAL, Duration::from_secs);

        Ok(Self {
            attractions,
            users: args.users.unwrap_or(DEFAULT_USERS),
            locations_per_user: args
                .locations_per_user
                .unwrap_or(DEFAULT_LOCATIONS_PER_USER),
            reward_buffer: args.reward_buffer.unwrap_or(DEFAULT_REWARD_BUFFER_MILES),
            workers,
            progress_interval,
            preload: args.preload.unwrap_or(false),
            oracle_latency: Duration::from_millis(args.oracle_latency_ms.unwrap_or(0)),
            seed: args.seed.unwrap_or_else(rand::random),
        })
    }
}

/// JSON summary printed once the simulation finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SimulationSummary {
    /// Users whose rewards were calculated.
    pub(crate) users: usize,
    /// Attractions in the catalog.
    pub(crate) attractions: usize,
    /// Rewards held by the users after the batch.
    pub(crate) rewards: usize,
    /// Sum of the users' reward points.
    pub(crate) total_points: i64,
    /// First job failure of the batch, if any.
    pub(crate) first_failure: Option<String>,
    /// Lookups served from the cache.
    pub(crate) cache_hits: u64,
    /// Lookups that fell through to the oracle while caching was enabled.
    pub(crate) cache_misses: u64,
    /// Seed the population was generated from.
    pub(crate) seed: u64,
    /// Wall-clock time spent preloading and calculating.
    pub(crate) elapsed_ms: u64,
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_simulate_with(args, &mut stdout)
}

pub(crate) fn run_simulate_with(
    args: SimulateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = simulate(&config)?;
    write_summary(writer, &summary)
}

/// Run the reward pipeline for a generated population.
pub(crate) fn simulate(config: &SimulateConfig) -> Result<SimulationSummary, CliError> {
    let attractions = load_catalog(&config.attractions)?;
    let attraction_count = attractions.len();
    let evaluator = ProximityEvaluator::with_config(ProximityConfig {
        reward_buffer_miles: config.reward_buffer,
        ..ProximityConfig::default()
    })?;

    let catalog: Arc<dyn AttractionCatalog> = Arc::new(attractions);
    let oracle: Arc<dyn RewardPointsOracle> = Arc::new(SimulatedOracle::new(config.oracle_latency));
    let cache = Arc::new(RewardPointsCache::with_config(
        oracle,
        Arc::clone(&catalog),
        CacheConfig {
            enabled: config.preload,
            ..CacheConfig::default()
        },
    ));
    let attributor = Arc::new(RewardAttributor::new(
        Arc::new(evaluator),
        catalog,
        Arc::clone(&cache),
    ));
    let scheduler = CalculationScheduler::new(
        attributor,
        SchedulerConfig {
            workers: config.workers,
            progress_interval: config.progress_interval,
        },
    )?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let users: Vec<Arc<User>> =
        generate_users(&mut rng, config.users, config.locations_per_user)
            .into_iter()
            .map(Arc::new)
            .collect();
    info!(
        "simulating {} users against {attraction_count} attractions (seed {})",
        users.len(),
        config.seed
    );

    let started = Instant::now();
    if config.preload {
        cache.preload(&users)?.wait();
    }
    for user in &users {
        scheduler.submit(Arc::clone(user));
    }
    let first_failure = match scheduler.await_all() {
        Ok(_) => None,
        Err(err) => {
            warn!("simulation batch reported a failure: {err}");
            Some(err.to_string())
        }
    };
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let stats = cache.stats();
    Ok(SimulationSummary {
        users: users.len(),
        attractions: attraction_count,
        rewards: users.iter().map(|user| user.rewards().len()).sum(),
        total_points: users.iter().map(|user| user.total_reward_points()).sum(),
        first_failure,
        cache_hits: stats.hits,
        cache_misses: stats.misses,
        seed: config.seed,
        elapsed_ms,
    })
}

fn write_summary(writer: &mut dyn Write, summary: &SimulationSummary) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(summary).map_err(CliError::SerialiseSummary)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSummary)?;
    writer.write_all(b"\n").map_err(CliError::WriteSummary)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SimulateConfig, CliError> {
    let merged = SimulateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SimulateConfig::try_from(merged)
}
