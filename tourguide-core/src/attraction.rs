use uuid::Uuid;

use crate::GeoPoint;

/// A place worth visiting that users can earn reward points at.
///
/// Attractions come from an external catalog that is loaded once per process
/// and never changes afterwards.
///
/// # Examples
/// ```
/// use tourguide_core::{Attraction, GeoPoint};
/// use uuid::Uuid;
///
/// let id = Uuid::new_v4();
/// let attraction = Attraction::new(id, "Disneyland", GeoPoint::new(33.817595, -117.922008));
///
/// assert_eq!(attraction.id, id);
/// assert_eq!(attraction.name, "Disneyland");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attraction {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name, also used as the reward-points cache key.
    pub name: String,
    /// Geospatial position.
    pub location: GeoPoint,
}

impl Attraction {
    /// Construct an `Attraction`.
    pub fn new(id: Uuid, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}
