//! The authority that decides how many points an attraction is worth.

use thiserror::Error;
use uuid::Uuid;

/// Errors from [`RewardPointsOracle::reward_points`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The lookup failed or timed out.
    #[error("reward points unavailable for attraction {attraction_id} and user {user_id}: {message}")]
    Unavailable {
        /// Attraction the lookup was for.
        attraction_id: Uuid,
        /// User the lookup was for.
        user_id: Uuid,
        /// Description supplied by the oracle.
        message: String,
    },
}

/// Resolve the reward points a user earns at an attraction.
///
/// Lookups are synchronous and may be slow; implementations do no caching of
/// their own. They must be `Send + Sync` because reward jobs query them from
/// many worker threads at once.
///
/// # Examples
///
/// ```rust
/// use tourguide_core::{OracleError, RewardPointsOracle};
/// use uuid::Uuid;
///
/// struct FlatOracle;
///
/// impl RewardPointsOracle for FlatOracle {
///     fn reward_points(&self, _attraction_id: Uuid, _user_id: Uuid) -> Result<i32, OracleError> {
///         Ok(100)
///     }
/// }
///
/// assert_eq!(FlatOracle.reward_points(Uuid::nil(), Uuid::nil()), Ok(100));
/// ```
pub trait RewardPointsOracle: Send + Sync {
    /// Return the points `user_id` earns for visiting `attraction_id`.
    fn reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<i32, OracleError>;
}
