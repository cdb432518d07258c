//! Error types raised while attributing rewards and running reward jobs.
#![forbid(unsafe_code)]

use thiserror::Error;
use tourguide_core::OracleError;
use uuid::Uuid;

/// Errors raised while computing a single user's rewards.
#[derive(Debug, Error)]
pub enum RewardsError {
    /// Resolving the points for an eligible attraction failed. Rewards
    /// appended before the failure are kept.
    #[error("failed to resolve reward points for user {user_id}")]
    Oracle {
        /// User whose computation was aborted.
        user_id: Uuid,
        /// Source error from the reward-point oracle.
        #[source]
        source: OracleError,
    },
}

/// Errors surfaced by the calculation scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Building the worker pool failed.
    #[error("failed to build the reward calculation worker pool")]
    BuildPool(#[source] rayon::ThreadPoolBuildError),
    /// A reward job returned an error.
    #[error("reward calculation for user {user_id} failed")]
    Job {
        /// User whose job failed.
        user_id: Uuid,
        /// Error returned by the job.
        #[source]
        source: RewardsError,
    },
    /// A reward job panicked before completing.
    #[error("reward calculation for user {user_id} panicked")]
    JobPanicked {
        /// User whose job panicked.
        user_id: Uuid,
    },
}

/// Errors raised by the reward-points cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Building the preload worker pool failed.
    #[error("failed to build the preload worker pool")]
    BuildPool(#[source] rayon::ThreadPoolBuildError),
}
