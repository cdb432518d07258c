//! Great-circle distances and the proximity thresholds built on them.
//!
//! Distances are statute miles computed with the spherical law of cosines.
//! Two thresholds are applied to them: the reward buffer, which decides
//! whether a visit earns a reward, and the wider display range, which only
//! decides whether an attraction is listed as nearby.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::{Attraction, GeoPoint, VisitedLocation};

/// Statute miles in one nautical mile.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Reward buffer applied until reconfigured, in statute miles.
pub const DEFAULT_REWARD_BUFFER_MILES: f64 = 10.0;

/// Range within which attractions are listed as nearby, in statute miles.
pub const DEFAULT_DISPLAY_RANGE_MILES: f64 = 200.0;

/// Errors raised when configuring proximity thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProximityError {
    /// The reward buffer was negative or not a finite number.
    #[error("reward buffer must be a finite, non-negative distance (got {miles})")]
    InvalidRewardBuffer {
        /// Rejected value in statute miles.
        miles: f64,
    },
    /// The display range was negative or not a finite number.
    #[error("display range must be a finite, non-negative distance (got {miles})")]
    InvalidDisplayRange {
        /// Rejected value in statute miles.
        miles: f64,
    },
}

/// Thresholds used by [`ProximityEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Maximum distance at which a visit earns a reward.
    pub reward_buffer_miles: f64,
    /// Maximum distance at which an attraction is listed as nearby.
    pub display_range_miles: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            reward_buffer_miles: DEFAULT_REWARD_BUFFER_MILES,
            display_range_miles: DEFAULT_DISPLAY_RANGE_MILES,
        }
    }
}

/// Great-circle distance between two points in statute miles.
///
/// The cosine of the central angle is clamped into `[-1, 1]` so rounding can
/// never push `acos` out of its domain; identical points are exactly `0.0`.
///
/// # Examples
/// ```
/// use tourguide_core::{GeoPoint, proximity::distance};
///
/// let origin = GeoPoint::new(0.0, 0.0);
/// assert_eq!(distance(origin, origin), 0.0);
///
/// // One degree of longitude along the equator is sixty nautical miles.
/// let miles = distance(origin, GeoPoint::new(0.0, 1.0));
/// assert!((miles - 69.046_767).abs() < 1e-3);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the spherical law of cosines is floating-point trigonometry"
)]
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.latitude().to_radians();
    let lon1 = a.longitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let lon2 = b.longitude().to_radians();

    let cos_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    let nautical_miles = 60.0 * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

const fn validate(miles: f64) -> bool {
    miles.is_finite() && miles >= 0.0
}

/// Evaluates whether positions are close enough to attractions.
///
/// The reward buffer can be changed at runtime, for example by tests that
/// need a wider or narrower radius. It is stored as the bit pattern of an
/// `f64` inside an atomic so an evaluator shared by many reward jobs can be
/// reconfigured without a lock. The display range is fixed at construction.
#[derive(Debug)]
pub struct ProximityEvaluator {
    default_reward_buffer: f64,
    reward_buffer: AtomicU64,
    display_range: f64,
}

impl ProximityEvaluator {
    /// Build an evaluator with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        let config = ProximityConfig::default();
        Self {
            default_reward_buffer: config.reward_buffer_miles,
            reward_buffer: AtomicU64::new(config.reward_buffer_miles.to_bits()),
            display_range: config.display_range_miles,
        }
    }

    /// Build an evaluator from explicit thresholds.
    ///
    /// The configured reward buffer becomes the value restored by
    /// [`ProximityEvaluator::reset_to_default`].
    ///
    /// # Errors
    /// Returns [`ProximityError`] when either threshold is negative or not
    /// finite.
    pub fn with_config(config: ProximityConfig) -> Result<Self, ProximityError> {
        if !validate(config.reward_buffer_miles) {
            return Err(ProximityError::InvalidRewardBuffer {
                miles: config.reward_buffer_miles,
            });
        }
        if !validate(config.display_range_miles) {
            return Err(ProximityError::InvalidDisplayRange {
                miles: config.display_range_miles,
            });
        }
        Ok(Self {
            default_reward_buffer: config.reward_buffer_miles,
            reward_buffer: AtomicU64::new(config.reward_buffer_miles.to_bits()),
            display_range: config.display_range_miles,
        })
    }

    /// Current reward buffer in statute miles.
    #[must_use]
    pub fn reward_buffer(&self) -> f64 {
        f64::from_bits(self.reward_buffer.load(Ordering::Relaxed))
    }

    /// Display range in statute miles.
    #[must_use]
    pub const fn display_range(&self) -> f64 {
        self.display_range
    }

    /// Change the reward buffer.
    ///
    /// # Errors
    /// Returns [`ProximityError::InvalidRewardBuffer`] for negative or
    /// non-finite distances; the previous buffer stays in effect.
    pub fn set_reward_buffer(&self, miles: f64) -> Result<(), ProximityError> {
        if !validate(miles) {
            return Err(ProximityError::InvalidRewardBuffer { miles });
        }
        self.reward_buffer.store(miles.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Restore the reward buffer this evaluator was built with.
    pub fn reset_to_default(&self) {
        self.reward_buffer
            .store(self.default_reward_buffer.to_bits(), Ordering::Relaxed);
    }

    /// Distance in statute miles; see [`distance`].
    #[must_use]
    pub fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        distance(a, b)
    }

    /// Whether `visited_location` is within the reward buffer of
    /// `attraction`. The boundary counts as inside.
    #[must_use]
    pub fn is_within_reward_buffer(
        &self,
        attraction: &Attraction,
        visited_location: &VisitedLocation,
    ) -> bool {
        distance(attraction.location, visited_location.location) <= self.reward_buffer()
    }

    /// Whether `location` is within the display range of `attraction`. The
    /// boundary counts as inside.
    #[must_use]
    pub fn is_within_display_range(&self, attraction: &Attraction, location: GeoPoint) -> bool {
        distance(attraction.location, location) <= self.display_range
    }
}

impl Default for ProximityEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
