//! World-frame intersection record produced by [`crate::object::Object::intersect`].

use nalgebra::{RealField, Unit, Vector3};

use crate::rt::Ray;

/// Records a world-space ray/object intersection: the ray that produced it, the distance along
/// that ray, the world-space unit normal at the hit point, and a back-reference to the object
/// that was hit (an index into the scene's object array, filled in by the caller).
#[derive(Debug, Clone)]
pub struct Intersection<T: RealField + Copy> {
    /// The ray that was cast, in world space.
    pub ray: Ray<T>,
    /// Distance along `ray` to the intersection point.
    pub t: T,
    /// World-space unit surface normal at the intersection point.
    pub normal: Unit<Vector3<T>>,
    /// Index of the object that was hit, within the scene's object array.
    pub object: usize,
}

impl<T: RealField + Copy> Intersection<T> {
    /// Construct a new `Intersection`.
    pub const fn new(ray: Ray<T>, t: T, normal: Unit<Vector3<T>>, object: usize) -> Self {
        Self { ray, t, normal, object }
    }

    /// The world-space point at which this intersection occurred.
    #[must_use]
    pub fn point(&self) -> nalgebra::Point3<T> {
        self.ray.origin + self.ray.direction.scale(self.t)
    }

    /// Return `self` with `object` overwritten, for the dispatch wrapper to record which scene
    /// object produced this intersection.
    #[must_use]
    pub fn with_object(mut self, object: usize) -> Self {
        self.object = object;
        self
    }
}
