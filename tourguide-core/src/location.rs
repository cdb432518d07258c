//! Geographic positions and the visits recorded against them.

use chrono::{DateTime, Utc};
use geo::{Coord, Point};
use uuid::Uuid;

/// A position on the globe expressed in degrees.
///
/// The value is backed by a [`geo::Point`] using the WGS84 convention of
/// `x = longitude` and `y = latitude`, so it converts freely to and from the
/// `geo` types callers already hold.
///
/// # Examples
/// ```
/// use tourguide_core::GeoPoint;
///
/// let louvre = GeoPoint::new(48.8606, 2.3376);
/// assert_eq!(louvre.latitude(), 48.8606);
/// assert_eq!(louvre.longitude(), 2.3376);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "LatLon", into = "LatLon")
)]
pub struct GeoPoint(Point<f64>);

impl GeoPoint {
    /// Build a point from a latitude and a longitude in degrees.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Point::new(longitude, latitude))
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(self) -> f64 {
        self.0.y()
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(self) -> f64 {
        self.0.x()
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(point: Point<f64>) -> Self {
        Self(point)
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self(Point::from(coord))
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.0
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        point.0.into()
    }
}

/// Wire shape used when the `serde` feature is enabled.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct LatLon {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl From<LatLon> for GeoPoint {
    fn from(value: LatLon) -> Self {
        Self::new(value.latitude, value.longitude)
    }
}

#[cfg(feature = "serde")]
impl From<GeoPoint> for LatLon {
    fn from(value: GeoPoint) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}

/// A position a user was observed at.
///
/// Visits are produced by the tracking subsystem and are never modified
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisitedLocation {
    /// Identifier of the user who made the visit.
    pub user_id: Uuid,
    /// Where the user was.
    pub location: GeoPoint,
    /// When the user was there.
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    /// Record a visit.
    #[must_use]
    pub const fn new(user_id: Uuid, location: GeoPoint, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn point_round_trips_through_geo_coordinates() {
        let point = GeoPoint::new(-33.8568, 151.2153);
        let coord: Coord<f64> = point.into();
        assert_eq!(coord.x, 151.2153);
        assert_eq!(coord.y, -33.8568);
        assert_eq!(GeoPoint::from(coord), point);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn point_serialises_as_latitude_and_longitude() {
        let point = GeoPoint::new(1.5, -2.25);
        let json = serde_json::to_value(point).expect("serialise point");
        assert_eq!(
            json,
            serde_json::json!({ "latitude": 1.5, "longitude": -2.25 })
        );
        let back: GeoPoint = serde_json::from_value(json).expect("deserialise point");
        assert_eq!(back, point);
    }
}
