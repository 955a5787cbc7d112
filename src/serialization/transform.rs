//! Serialized representation of an affine transform.

use nalgebra::{Matrix4, RealField, Rotation3, Translation3};
use serde::{Deserialize, Serialize};

use crate::{error::Result, traits::FallibleNumeric};

const DEGREES_TO_RADIANS: f64 = std::f64::consts::PI / 180.0;

/// Serialized representation of a three-dimensional transformation: translate, then rotate
/// (Euler angles, degrees), then scale, each optional and defaulting to the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedTransform<T: RealField + Copy> {
    /// Translation vector [x, y, z].
    pub translation: Option<[T; 3]>,
    /// Euler rotation around axes [x, y, z] (degrees).
    pub rotation: Option<[T; 3]>,
    /// Uniform scaling factor.
    pub scale: Option<T>,
}

impl<T: RealField + Copy> SerializedTransform<T> {
    /// Build the combined homogeneous transform: `translation * rotation * scale`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the degrees-to-radians conversion factor.
    pub fn build(self) -> Result<Matrix4<T>> {
        let translation = self.translation.map_or_else(Translation3::identity, |translation| {
            Translation3::new(translation[0], translation[1], translation[2])
        });

        let rotation = match self.rotation {
            Some(rotation) => {
                let to_rad = T::try_from_f64(DEGREES_TO_RADIANS)?;
                Rotation3::from_euler_angles(rotation[0] * to_rad, rotation[1] * to_rad, rotation[2] * to_rad)
            }
            None => Rotation3::identity(),
        };

        let scale_matrix = self.scale.map_or_else(Matrix4::identity, Matrix4::new_scaling);

        Ok(translation.to_homogeneous() * rotation.to_homogeneous() * scale_matrix)
    }
}
