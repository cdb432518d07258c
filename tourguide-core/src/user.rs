//! Tracked users, their visit history, and the rewards they have earned.
//!
//! A [`User`] is shared between the tracking subsystem, which appends visits,
//! and the reward engine, which appends rewards. Both sequences sit behind
//! their own reader/writer lock so the two writers never block each other.

use parking_lot::RwLock;
use uuid::Uuid;

use crate::{Attraction, VisitedLocation};

/// Points granted to a user for having been near an attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserReward {
    /// The visit that qualified the user for the reward.
    pub visited_location: VisitedLocation,
    /// The attraction the reward is for.
    pub attraction: Attraction,
    /// Points resolved from the reward-point oracle.
    pub reward_points: i32,
}

impl UserReward {
    /// Construct a reward.
    #[must_use]
    pub const fn new(
        visited_location: VisitedLocation,
        attraction: Attraction,
        reward_points: i32,
    ) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }
}

/// A tracked user.
///
/// Visited locations are append-only and keep their recording order. Rewards
/// are append-only as well and are owned by the reward engine: nothing else
/// should call [`User::add_reward`].
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use tourguide_core::{GeoPoint, User, VisitedLocation};
/// use uuid::Uuid;
///
/// let user = User::new(Uuid::new_v4(), "jon");
/// user.add_visited_location(VisitedLocation::new(
///     user.id(),
///     GeoPoint::new(10.0, 20.0),
///     Utc::now(),
/// ));
///
/// assert_eq!(user.visited_locations().len(), 1);
/// assert!(user.rewards().is_empty());
/// ```
#[derive(Debug)]
pub struct User {
    id: Uuid,
    user_name: String,
    visited_locations: RwLock<Vec<VisitedLocation>>,
    rewards: RwLock<Vec<UserReward>>,
}

impl User {
    /// Create a user without any history.
    pub fn new(id: Uuid, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            visited_locations: RwLock::new(Vec::new()),
            rewards: RwLock::new(Vec::new()),
        }
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Login name.
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Append a visit to the history.
    pub fn add_visited_location(&self, visited_location: VisitedLocation) {
        self.visited_locations.write().push(visited_location);
    }

    /// Snapshot of the visit history in recording order.
    #[must_use]
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().clone()
    }

    /// The most recent visit, if any.
    #[must_use]
    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().last().copied()
    }

    /// Snapshot of the rewards earned so far.
    #[must_use]
    pub fn rewards(&self) -> Vec<UserReward> {
        self.rewards.read().clone()
    }

    /// Whether a reward for `attraction` has already been recorded.
    ///
    /// The check looks at the rewards recorded so far only. It is not atomic
    /// with a later [`User::add_reward`].
    #[must_use]
    pub fn is_rewarded_for(&self, attraction: &Attraction) -> bool {
        self.rewards
            .read()
            .iter()
            .any(|reward| reward.attraction.id == attraction.id)
    }

    /// Append a reward. Rewards are never removed or rewritten.
    pub fn add_reward(&self, reward: UserReward) {
        self.rewards.write().push(reward);
    }

    /// Sum of the points over every recorded reward.
    #[must_use]
    pub fn total_reward_points(&self) -> i64 {
        self.rewards
            .read()
            .iter()
            .map(|reward| i64::from(reward.reward_points))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoPoint;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn user() -> User {
        User::new(Uuid::new_v4(), "internalUser0")
    }

    fn visit(user: &User, latitude: f64) -> VisitedLocation {
        VisitedLocation::new(user.id(), GeoPoint::new(latitude, 0.0), Utc::now())
    }

    #[rstest]
    fn visits_keep_recording_order(user: User) {
        user.add_visited_location(visit(&user, 1.0));
        user.add_visited_location(visit(&user, 2.0));

        let latitudes: Vec<f64> = user
            .visited_locations()
            .iter()
            .map(|visit| visit.location.latitude())
            .collect();
        assert_eq!(latitudes, vec![1.0, 2.0]);
        assert_eq!(
            user.last_visited_location().map(|v| v.location.latitude()),
            Some(2.0)
        );
    }

    #[rstest]
    fn rewarded_check_matches_on_attraction_id(user: User) {
        let attraction = Attraction::new(Uuid::new_v4(), "Museum", GeoPoint::new(0.0, 0.0));
        let other = Attraction::new(Uuid::new_v4(), "Museum", GeoPoint::new(0.0, 0.0));
        user.add_reward(UserReward::new(visit(&user, 0.0), attraction.clone(), 42));

        assert!(user.is_rewarded_for(&attraction));
        assert!(!user.is_rewarded_for(&other));
        assert_eq!(user.total_reward_points(), 42);
    }
}
