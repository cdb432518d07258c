//! Generated internal users with random visit histories.

use chrono::{TimeDelta, Utc};
use rand::Rng;
use tourguide_core::{GeoPoint, User, VisitedLocation};
use uuid::{Builder, Uuid};

/// Oldest visit generated, in days before now.
const HISTORY_DAYS: i64 = 30;

fn random_id(rng: &mut impl Rng) -> Uuid {
    Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

fn random_location(rng: &mut impl Rng) -> GeoPoint {
    GeoPoint::new(rng.gen_range(-85.0..=85.0), rng.gen_range(-180.0..=180.0))
}

/// Build `count` users named `internalUser{index}`, each with
/// `locations_per_user` visits at random positions within the last month.
pub(crate) fn generate_users(
    rng: &mut impl Rng,
    count: usize,
    locations_per_user: usize,
) -> Vec<User> {
    let now = Utc::now();
    (0..count)
        .map(|index| {
            let user = User::new(random_id(rng), format!("internalUser{index}"));
            for _ in 0..locations_per_user {
                let age = TimeDelta::seconds(rng.gen_range(0..=HISTORY_DAYS * 24 * 60 * 60));
                let time_visited = now.checked_sub_signed(age).unwrap_or(now);
                user.add_visited_location(VisitedLocation::new(
                    user.id(),
                    random_location(rng),
                    time_visited,
                ));
            }
            user
        })
        .collect()
}
