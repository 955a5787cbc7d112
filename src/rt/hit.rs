use nalgebra::{RealField, Unit, Vector3};

use crate::error::{GeometryError, Result};

/// Records details of a ray intersection with a geometric surface.
#[derive(Debug, Clone)]
pub struct Hit<T: RealField + Copy> {
    /// Index of the leaf geometry which was hit, within whatever slice produced it.
    ///
    /// Aggregates (`Mesh`, `Bvh`) overwrite this after construction with the index of the
    /// child they delegated to; primitives leave it at its default of zero.
    pub index: usize,
    /// The distance to intersection.
    pub distance: T,
    /// The geometric normal at the intersection point.
    pub geometric_normal: Unit<Vector3<T>>,
    /// The shading (interpolated) normal at the intersection point.
    pub interpolated_normal: Unit<Vector3<T>>,
}

impl<T: RealField + Copy> Hit<T> {
    /// Construct a new `Hit` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the distance is negative.
    pub fn new(distance: T, geometric_normal: Unit<Vector3<T>>, interpolated_normal: Unit<Vector3<T>>) -> Result<Self> {
        if distance < T::zero() {
            return Err(GeometryError::NegativeIntersectionDistance {
                distance: distance.to_string(),
            }
            .into());
        }

        Ok(Self {
            index: 0,
            distance,
            geometric_normal,
            interpolated_normal,
        })
    }

    /// Return `self` with `index` overwritten, for aggregates forwarding a child's index.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}
