//! Stand-in for the remote reward-point authority.

use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tourguide_core::{OracleError, RewardPointsOracle};
use uuid::Uuid;

/// Smallest number of points the simulated authority awards.
pub(crate) const MIN_POINTS: i32 = 1;
/// Largest number of points the simulated authority awards.
pub(crate) const MAX_POINTS: i32 = 1_000;

/// Awards a pseudo-random but repeatable number of points per
/// (attraction, user) pair, optionally after a fixed delay.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SimulatedOracle {
    latency: Duration,
}

impl SimulatedOracle {
    pub(crate) const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl RewardPointsOracle for SimulatedOracle {
    fn reward_points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<i32, OracleError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let (attraction_high, attraction_low) = attraction_id.as_u64_pair();
        let (user_high, user_low) = user_id.as_u64_pair();
        let seed = attraction_high
            ^ attraction_low.rotate_left(17)
            ^ user_high.rotate_left(31)
            ^ user_low;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(rng.gen_range(MIN_POINTS..=MAX_POINTS))
    }
}
