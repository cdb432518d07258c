//! Rewards attribution: match a user's visited locations against the
//! attraction catalog and append the rewards they earned.
#![forbid(unsafe_code)]

use std::sync::Arc;

use log::debug;
use tourguide_core::{AttractionCatalog, ProximityEvaluator, User, UserReward};

use crate::{RewardPointsCache, RewardsError};

/// Appends rewards for attractions a user has visited within the reward
/// buffer.
///
/// A user is rewarded at most once per attraction. Running the attributor
/// again over an unchanged history is a no-op.
#[derive(Clone)]
pub struct RewardAttributor {
    evaluator: Arc<ProximityEvaluator>,
    catalog: Arc<dyn AttractionCatalog>,
    cache: Arc<RewardPointsCache>,
}

impl RewardAttributor {
    /// Build an attributor from its collaborators.
    pub fn new(
        evaluator: Arc<ProximityEvaluator>,
        catalog: Arc<dyn AttractionCatalog>,
        cache: Arc<RewardPointsCache>,
    ) -> Self {
        Self {
            evaluator,
            catalog,
            cache,
        }
    }

    /// Proximity thresholds used to decide eligibility.
    #[must_use]
    pub fn evaluator(&self) -> &ProximityEvaluator {
        &self.evaluator
    }

    /// Catalog the attributor matches visits against.
    #[must_use]
    pub fn catalog(&self) -> &dyn AttractionCatalog {
        self.catalog.as_ref()
    }

    /// Cache consulted for reward points.
    #[must_use]
    pub fn cache(&self) -> &RewardPointsCache {
        &self.cache
    }

    /// Append a reward for every attraction within the reward buffer of one
    /// of `user`'s visited locations that the user was not already rewarded
    /// for.
    ///
    /// The history and the catalog are snapshotted on entry, so visits
    /// recorded while the computation runs are left for the next run. Visits
    /// are walked in recording order, so when several visits qualify for the
    /// same attraction the earliest one is attached to the reward. Returns
    /// the number of rewards appended.
    ///
    /// # Errors
    /// Returns [`RewardsError::Oracle`] when the points for an eligible
    /// attraction cannot be resolved. Rewards appended before the failure are
    /// kept and the remaining pairs are not examined.
    pub fn compute_rewards(&self, user: &User) -> Result<usize, RewardsError> {
        let visited_locations = user.visited_locations();
        let attractions = self.catalog.attractions();
        let mut appended = 0_usize;

        for visited_location in &visited_locations {
            for attraction in &attractions {
                if user.is_rewarded_for(attraction)
                    || !self
                        .evaluator
                        .is_within_reward_buffer(attraction, visited_location)
                {
                    continue;
                }
                let reward_points = self.cache.get_points(attraction, user).map_err(|source| {
                    RewardsError::Oracle {
                        user_id: user.id(),
                        source,
                    }
                })?;
                debug!(
                    "user {} earned {reward_points} points at {}",
                    user.user_name(),
                    attraction.name
                );
                user.add_reward(UserReward::new(
                    *visited_location,
                    attraction.clone(),
                    reward_points,
                ));
                appended = appended.saturating_add(1);
            }
        }
        Ok(appended)
    }
}

impl std::fmt::Debug for RewardAttributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardAttributor")
            .field("evaluator", &self.evaluator)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
