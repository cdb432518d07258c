//! Attractions near a user's most recent position.
#![forbid(unsafe_code)]

use tourguide_core::{Attraction, GeoPoint, User};

use crate::{RewardAttributor, RewardsError};

/// Number of attractions listed when no limit is given.
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// An attraction listed for a user, with the distance to it and the points a
/// visit would earn.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearbyAttraction {
    /// Attraction name.
    pub name: String,
    /// Attraction position.
    pub location: GeoPoint,
    /// Position the distance was measured from.
    pub user_location: GeoPoint,
    /// Distance between the two positions in statute miles.
    pub distance_miles: f64,
    /// Points the user would earn at this attraction.
    pub reward_points: i32,
}

/// The `limit` attractions closest to `user`'s last visited location,
/// nearest first, regardless of how far away they are.
///
/// Returns an empty list for a user without history. Points are resolved
/// through the attributor's cache, so preloaded users do not reach the
/// oracle.
///
/// # Errors
/// Returns [`RewardsError::Oracle`] when the points for a listed attraction
/// cannot be resolved.
pub fn nearby_attractions(
    attributor: &RewardAttributor,
    user: &User,
    limit: usize,
) -> Result<Vec<NearbyAttraction>, RewardsError> {
    let Some(last) = user.last_visited_location() else {
        return Ok(Vec::new());
    };
    let origin = last.location;
    let evaluator = attributor.evaluator();

    let mut ranked: Vec<(f64, Attraction)> = attributor
        .catalog()
        .attractions()
        .into_iter()
        .map(|attraction| (evaluator.distance(attraction.location, origin), attraction))
        .collect();
    ranked.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(distance_miles, attraction)| {
            let reward_points = attributor
                .cache()
                .get_points(&attraction, user)
                .map_err(|source| RewardsError::Oracle {
                    user_id: user.id(),
                    source,
                })?;
            Ok(NearbyAttraction {
                name: attraction.name,
                location: attraction.location,
                user_location: origin,
                distance_miles,
                reward_points,
            })
        })
        .collect()
}

/// Catalog attractions within the display range of `location`, in catalog
/// order.
#[must_use]
pub fn attractions_in_display_range(
    attributor: &RewardAttributor,
    location: GeoPoint,
) -> Vec<Attraction> {
    let evaluator = attributor.evaluator();
    attributor
        .catalog()
        .attractions()
        .into_iter()
        .filter(|attraction| evaluator.is_within_display_range(attraction, location))
        .collect()
}
