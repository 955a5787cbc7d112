//! Volume containment trait.

use nalgebra::{Point3, RealField};

use crate::error::Result;

/// Types implementing this trait can answer whether a point lies within the volume they enclose.
///
/// Unlike [`crate::traits::Traceable`], which only tests ray intersections with a surface, this
/// trait is for CSG composition (`Primitive::Csg`) and the `Bvh::contains` query, both of which
/// need to know whether an arbitrary point is inside a solid without casting a ray.
pub trait Insideable<T: RealField + Copy> {
    /// Test whether `point` lies within (or on the boundary of) the volume enclosed by `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying test cannot be evaluated for this type.
    fn inside(&self, point: &Point3<T>) -> Result<bool>;
}
