//! Traceable trait.

use nalgebra::RealField;

use crate::{
    error::Result,
    rt::{Hit, Ray},
};

/// Trait for types which can be intersected by `Ray`s.
pub trait Traceable<T: RealField + Copy> {
    /// Test for an intersection between a `Ray` and this geometry, returning the closest hit.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying intersection math produces an invalid `Hit`.
    fn intersect(&self, ray: &Ray<T>) -> Result<Option<Hit<T>>>;

    /// Test whether a `Ray` intersects this geometry at a distance no greater than `max_distance`.
    ///
    /// The default implementation defers to [`Traceable::intersect`]; implementors with a cheaper
    /// any-hit test (e.g. an aggregate with its own traversal) should override it.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Traceable::intersect`].
    fn intersect_any(&self, ray: &Ray<T>, max_distance: T) -> Result<bool> {
        Ok(self
            .intersect(ray)?
            .is_some_and(|hit| hit.distance <= max_distance))
    }
}
