//! Test-only collaborators: a call-counting reward-point oracle and helpers
//! for building attractions and users.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::{Attraction, GeoPoint, OracleError, RewardPointsOracle, User, VisitedLocation};

/// Oracle returning a fixed number of points and counting every lookup.
///
/// Lookups for attractions registered with [`CountingOracle::failing_for`]
/// return [`OracleError::Unavailable`]. An optional latency simulates a slow
/// remote authority.
#[derive(Debug, Default)]
pub struct CountingOracle {
    points: i32,
    calls: AtomicUsize,
    failing: HashSet<Uuid>,
    latency: Duration,
}

impl CountingOracle {
    /// Oracle returning `points` for every lookup.
    #[must_use]
    pub fn new(points: i32) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Make lookups for `attraction_id` fail.
    #[must_use]
    pub fn failing_for(mut self, attraction_id: Uuid) -> Self {
        self.failing.insert(attraction_id);
        self
    }

    /// Sleep for `latency` on every lookup.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of lookups served so far, failures included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RewardPointsOracle for CountingOracle {
    fn reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<i32, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        if self.failing.contains(&attraction_id) {
            return Err(OracleError::Unavailable {
                attraction_id,
                user_id,
                message: "stub failure".to_owned(),
            });
        }
        Ok(self.points)
    }
}

/// Build an attraction with a fresh identifier.
#[must_use]
pub fn attraction(name: &str, latitude: f64, longitude: f64) -> Attraction {
    Attraction::new(Uuid::new_v4(), name, GeoPoint::new(latitude, longitude))
}

/// Build a user whose history holds one visit per `(latitude, longitude)`
/// pair, recorded in the given order.
#[must_use]
pub fn user_with_visits(user_name: &str, visits: &[(f64, f64)]) -> User {
    let user = User::new(Uuid::new_v4(), user_name);
    for &(latitude, longitude) in visits {
        user.add_visited_location(VisitedLocation::new(
            user.id(),
            GeoPoint::new(latitude, longitude),
            Utc::now(),
        ));
    }
    user
}
