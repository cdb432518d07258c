//! Source of the attractions rewards can be earned at.

use std::sync::Arc;

use crate::Attraction;

/// Provide the fixed set of attractions known to the process.
///
/// The catalog is assumed static: implementations must return the same
/// attractions, in the same order, on every call. Reward attribution walks
/// the catalog in that order.
///
/// # Examples
///
/// ```rust
/// use tourguide_core::{Attraction, AttractionCatalog, GeoPoint};
/// use uuid::Uuid;
///
/// let catalog = vec![Attraction::new(Uuid::nil(), "Museum", GeoPoint::new(0.0, 0.0))];
/// assert_eq!(catalog.attractions().len(), 1);
/// ```
pub trait AttractionCatalog: Send + Sync {
    /// Return every attraction in catalog order.
    fn attractions(&self) -> Vec<Attraction>;
}

impl AttractionCatalog for Vec<Attraction> {
    fn attractions(&self) -> Vec<Attraction> {
        self.clone()
    }
}

impl<T: AttractionCatalog + ?Sized> AttractionCatalog for Arc<T> {
    fn attractions(&self) -> Vec<Attraction> {
        (**self).attractions()
    }
}
