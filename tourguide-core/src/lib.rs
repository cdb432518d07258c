//! Core domain types for the TourGuide reward engine.
//!
//! The crate models attractions, users and their visit history, and the
//! rewards earned by visiting attractions. It also defines the boundaries to
//! the external collaborators the engine consumes, namely the
//! [`AttractionCatalog`] and the [`RewardPointsOracle`], and the pure
//! geographic [`ProximityEvaluator`] every reward decision relies on.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attraction;
pub mod catalog;
mod location;
pub mod oracle;
pub mod proximity;
mod user;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use attraction::Attraction;
pub use catalog::AttractionCatalog;
pub use location::{GeoPoint, VisitedLocation};
pub use oracle::{OracleError, RewardPointsOracle};
pub use proximity::{
    DEFAULT_DISPLAY_RANGE_MILES, DEFAULT_REWARD_BUFFER_MILES, ProximityConfig, ProximityError,
    ProximityEvaluator, distance,
};
pub use user::{User, UserReward};
