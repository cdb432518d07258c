//! Error types emitted by the TourGuide CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tourguide_core::ProximityError;
use tourguide_rewards::{CacheError, SchedulerError};

/// Errors emitted by the TourGuide CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// An option holds a value the simulation cannot run with.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        /// Long flag name of the rejected option.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
    /// Opening the attraction catalog failed.
    #[error("failed to open attraction catalog at {path:?}: {source}")]
    OpenCatalog {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The attraction catalog JSON could not be decoded.
    #[error("failed to parse attraction catalog JSON at {path:?}: {source}")]
    ParseCatalog {
        /// Catalog path.
        path: Utf8PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The proximity thresholds were rejected.
    #[error(transparent)]
    Proximity(#[from] ProximityError),
    /// The reward calculation pool could not be built.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    /// The preload pool could not be built.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// Serialising the simulation summary failed.
    #[error("failed to serialise simulation summary: {0}")]
    SerialiseSummary(#[source] serde_json::Error),
    /// Writing the simulation summary failed.
    #[error("failed to write simulation summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
