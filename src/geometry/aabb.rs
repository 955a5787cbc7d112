//! Axis-aligned bounding box structure.

use nalgebra::{Matrix4, Point3, RealField, Vector3};
use std::borrow::Cow;

use crate::{
    error::Result,
    rt::Ray,
    traits::{Bounded, FallibleNumeric},
};

/// Threshold above which a coordinate is treated as "the infinite sentinel", matching the
/// large-but-finite bound [`Plane::aabb`](crate::geometry::Plane::aabb) and [`Aabb::infinite`] use
/// in place of a literal `±∞`, which would poison the slab test's arithmetic.
const INFINITE_THRESHOLD: f64 = 1.0e11;

/// Axis-aligned bounding box.
#[derive(Debug, Clone)]
pub struct Aabb<T: RealField + Copy> {
    /// Minimum corner.
    pub mins: Point3<T>,
    /// Maximum corner.
    pub maxs: Point3<T>,
}

impl<T: RealField + Copy> Aabb<T> {
    /// Construct a new `Aabb` instance.
    pub fn new(mins: Point3<T>, maxs: Point3<T>) -> Self {
        debug_assert!(
            mins.x <= maxs.x && mins.y <= maxs.y && mins.z <= maxs.z,
            "Invalid AABB bounds"
        );
        Self { mins, maxs }
    }

    /// Create an 'empty' `Aabb` with extreme (inverted) bounds, ready to be [`Aabb::merge`]d into.
    ///
    /// # Errors
    ///
    /// Returns an error if `T`'s numeric bounds are unavailable.
    pub fn empty() -> Result<Self> {
        let min_value = T::try_min_value()?;
        let max_value = T::try_max_value()?;
        Ok(Self {
            mins: Point3::new(max_value, max_value, max_value),
            maxs: Point3::new(min_value, min_value, min_value),
        })
    }

    /// Calculate the center of the `Aabb`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the value `2`.
    pub fn centre(&self) -> Result<Point3<T>> {
        let two = T::try_from_u8(2)?;
        Ok(Point3::new(
            (self.mins.x + self.maxs.x) / two,
            (self.mins.y + self.maxs.y) / two,
            (self.mins.z + self.maxs.z) / two,
        ))
    }

    /// Calculate the surface area of an `Aabb`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the value `2`.
    pub fn surface_area(&self) -> Result<T> {
        let extent = self.extent();
        let two = T::try_from_u8(2)?;
        Ok(two * ((extent[0] * extent[1]) + (extent[1] * extent[2]) + (extent[2] * extent[0])))
    }

    /// Calculate the volume of an `Aabb`.
    pub fn volume(&self) -> T {
        let extent = self.extent();
        extent[0] * extent[1] * extent[2]
    }

    /// Per-axis extents of the box.
    fn extent(&self) -> [T; 3] {
        [
            self.maxs[0] - self.mins[0],
            self.maxs[1] - self.mins[1],
            self.maxs[2] - self.mins[2],
        ]
    }

    /// Return a new `Aabb` which encapsulates this `Aabb` and another `Aabb`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let new_mins = Point3::new(
            self.mins.x.min(other.mins.x),
            self.mins.y.min(other.mins.y),
            self.mins.z.min(other.mins.z),
        );
        let new_maxs = Point3::new(
            self.maxs.x.max(other.maxs.x),
            self.maxs.y.max(other.maxs.y),
            self.maxs.z.max(other.maxs.z),
        );
        Self::new(new_mins, new_maxs)
    }

    /// Test whether a point lies within (or on the boundary of) the box.
    #[must_use]
    pub fn contains_point(&self, point: &Point3<T>) -> bool {
        (self.mins.x..=self.maxs.x).contains(&point.x)
            && (self.mins.y..=self.maxs.y).contains(&point.y)
            && (self.mins.z..=self.maxs.z).contains(&point.z)
    }

    /// Construct the "infinite" sentinel box used for unbounded primitives (e.g. [`Plane`](crate::geometry::Plane)),
    /// a large-but-finite box rather than a literal `±∞` bound, since the latter would turn the
    /// slab test's `(box - origin) * inv_dir` arithmetic into `NaN`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent `1e12`.
    pub fn infinite() -> Result<Self> {
        let large = T::try_from_f64(1.0e12)?;
        Ok(Self {
            mins: Point3::new(-large, -large, -large),
            maxs: Point3::new(large, large, large),
        })
    }

    /// Whether this box is (or exceeds) the [`Aabb::infinite`] sentinel on any axis, identifying
    /// objects (planes, unbounded CSG halves) that must be kept out of the spatial index and
    /// tested against every ray directly.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        let Some(threshold) = T::try_from_f64(INFINITE_THRESHOLD).ok() else {
            return false;
        };
        self.mins.x <= -threshold
            || self.mins.y <= -threshold
            || self.mins.z <= -threshold
            || self.maxs.x >= threshold
            || self.maxs.y >= threshold
            || self.maxs.z >= threshold
    }

    /// Apply a transformation to the `Aabb`, re-deriving an axis-aligned box around the 8 transformed corners.
    #[must_use]
    pub fn transform(&self, transform: &Matrix4<T>) -> Self {
        let first_corner = Point3::new(self.mins.x, self.mins.y, self.mins.z);
        let transformed_first = transform.transform_point(&first_corner);

        let mut min_x = transformed_first.x;
        let mut min_y = transformed_first.y;
        let mut min_z = transformed_first.z;
        let mut max_x = transformed_first.x;
        let mut max_y = transformed_first.y;
        let mut max_z = transformed_first.z;

        let corners = [
            (self.maxs.x, self.mins.y, self.mins.z),
            (self.mins.x, self.maxs.y, self.mins.z),
            (self.maxs.x, self.maxs.y, self.mins.z),
            (self.mins.x, self.mins.y, self.maxs.z),
            (self.maxs.x, self.mins.y, self.maxs.z),
            (self.mins.x, self.maxs.y, self.maxs.z),
            (self.maxs.x, self.maxs.y, self.maxs.z),
        ];

        for &(x, y, z) in &corners {
            let corner = Point3::new(x, y, z);
            let transformed = transform.transform_point(&corner);

            min_x = min_x.min(transformed.x);
            min_y = min_y.min(transformed.y);
            min_z = min_z.min(transformed.z);
            max_x = max_x.max(transformed.x);
            max_y = max_y.max(transformed.y);
            max_z = max_z.max(transformed.z);
        }

        Self::new(Point3::new(min_x, min_y, min_z), Point3::new(max_x, max_y, max_z))
    }

    /// Test for any intersection, ignoring distance.
    ///
    /// Tolerant of axis-parallel rays: when `ray.inv_direction[i]` is `±∞` the `0 * ±∞ = NaN`
    /// case is routed around explicitly rather than relying on `min`/`max` to absorb it, since
    /// `f64::min`/`f64::max` propagate the *other* argument when one side is `NaN`, which would
    /// silently accept a ray that is parallel to, and outside of, a slab.
    #[must_use]
    pub fn intersect_any(&self, ray: &Ray<T>) -> bool {
        self.slab_test(ray).is_some()
    }

    /// Test for an intersection between a `Ray` and the `Aabb`, returning the entry distance
    /// (or the exit distance, if the ray origin is inside the box).
    #[must_use]
    pub fn intersect_distance(&self, ray: &Ray<T>) -> Option<T> {
        self.slab_test(ray)
    }

    /// Shared slab-test implementation used by both `intersect_any` and `intersect_distance`.
    fn slab_test(&self, ray: &Ray<T>) -> Option<T> {
        let mut t_min = T::zero();
        let mut t_max = T::max_value()?;

        for i in 0..3 {
            let ray_origin_i = ray.origin[i];
            let inv_dir_i = ray.inv_direction[i];
            let box_min_i = self.mins[i];
            let box_max_i = self.maxs[i];

            if !inv_dir_i.is_finite() {
                // Ray is parallel to this pair of slabs: the only way through is to already lie
                // between them, since `(box - origin) * inv_dir` would otherwise be `NaN`.
                if ray_origin_i < box_min_i || ray_origin_i > box_max_i {
                    return None;
                }
                continue;
            }

            let t0 = (box_min_i - ray_origin_i) * inv_dir_i;
            let t1 = (box_max_i - ray_origin_i) * inv_dir_i;

            let t_near = if ray.sign[i] == 0 { t0 } else { t1 };
            let t_far = if ray.sign[i] == 0 { t1 } else { t0 };

            t_min = t_min.max(t_near);
            t_max = t_max.min(t_far);

            if t_min > t_max {
                return None;
            }
        }

        if t_max < T::zero() {
            return None;
        }

        Some(if t_min >= T::zero() { t_min } else { t_max })
    }
}

impl<T: RealField + Copy> Bounded<T> for Aabb<T> {
    fn aabb(&self) -> Result<Cow<Self>> {
        Ok(Cow::Borrowed(self))
    }
}
