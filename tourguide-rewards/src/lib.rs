//! Reward calculation for TourGuide users.
//!
//! The crate turns users' visit histories into rewards:
//! - [`RewardAttributor`] walks one user's visited locations against the
//!   attraction catalog and appends a reward for every attraction visited
//!   within the reward buffer, at most once per attraction.
//! - [`CalculationScheduler`] runs attributions for many users on a bounded
//!   worker pool and offers a barrier that reports progress while it waits.
//! - [`RewardPointsCache`] sits in front of the reward-point oracle and can
//!   be warmed for a batch of users ahead of time.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use tourguide_core::test_support::{CountingOracle, attraction, user_with_visits};
//! use tourguide_core::{AttractionCatalog, ProximityEvaluator, RewardPointsOracle};
//! use tourguide_rewards::{
//!     CalculationScheduler, RewardAttributor, RewardPointsCache, SchedulerConfig,
//! };
//!
//! let catalog: Arc<dyn AttractionCatalog> = Arc::new(vec![attraction("Museum", 0.0, 0.0)]);
//! let oracle: Arc<dyn RewardPointsOracle> = Arc::new(CountingOracle::new(100));
//! let cache = Arc::new(RewardPointsCache::new(oracle, Arc::clone(&catalog)));
//! let attributor = Arc::new(RewardAttributor::new(
//!     Arc::new(ProximityEvaluator::new()),
//!     catalog,
//!     cache,
//! ));
//! let scheduler = CalculationScheduler::new(
//!     attributor,
//!     SchedulerConfig { workers: 4, ..SchedulerConfig::default() },
//! )?;
//!
//! let user = Arc::new(user_with_visits("internalUser0", &[(0.0, 0.01)]));
//! scheduler.submit(Arc::clone(&user));
//! let report = scheduler.await_all()?;
//!
//! assert_eq!(report.rewards_appended, 1);
//! assert_eq!(user.total_reward_points(), 100);
//! # Ok::<(), tourguide_rewards::SchedulerError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attributor;
pub mod cache;
mod error;
pub mod nearby;
pub mod scheduler;
mod sync;

pub use attributor::RewardAttributor;
pub use cache::{CacheConfig, CacheStats, PreloadHandle, RewardPointsCache};
pub use error::{CacheError, RewardsError, SchedulerError};
pub use nearby::{
    DEFAULT_NEARBY_LIMIT, NearbyAttraction, attractions_in_display_range, nearby_attractions,
};
pub use scheduler::{BatchReport, CalculationScheduler, SchedulerConfig};
