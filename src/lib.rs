//! Facade crate for the TourGuide reward engine.
//!
//! This crate re-exports the domain model and proximity rules from
//! `tourguide-core` together with the reward attribution, caching, and
//! scheduling machinery from `tourguide-rewards`.

#![forbid(unsafe_code)]

pub use tourguide_core::{
    Attraction, AttractionCatalog, GeoPoint, OracleError, ProximityConfig, ProximityError,
    ProximityEvaluator, RewardPointsOracle, User, UserReward, VisitedLocation, distance,
};

pub use tourguide_rewards::{
    BatchReport, CacheConfig, CacheError, CacheStats, CalculationScheduler, NearbyAttraction,
    PreloadHandle, RewardAttributor, RewardPointsCache, RewardsError, SchedulerConfig,
    SchedulerError, attractions_in_display_range, nearby_attractions,
};

#[cfg(feature = "test-support")]
pub use tourguide_core::test_support;
