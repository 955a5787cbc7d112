//! Light source contracts.

use nalgebra::{Point3, RealField, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::traits::FallibleNumeric;
use crate::error::Result;

/// Tagged union of supported light source kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Light<T: RealField + Copy> {
    /// An idealized point light with no falloff beyond inverse-square.
    Point { position: Point3<T>, color: Vector3<T> },
    /// A directional (infinitely distant) light, e.g. a sun.
    Directional { direction: Unit<Vector3<T>>, color: Vector3<T> },
}

/// A sampled direction and unattenuated color contribution from a light, at a given surface point.
pub struct Illumination<T: RealField + Copy> {
    /// Unit vector from the surface point toward the light.
    pub direction: Unit<Vector3<T>>,
    /// Color contribution, attenuated for distance falloff but not yet for shadowing.
    pub color: Vector3<T>,
    /// Distance to the light, or `None` for directional lights (effectively infinite).
    pub distance: Option<T>,
}

impl<T: RealField + Copy> Light<T> {
    /// Sample this light's contribution at a surface point.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the constant `4`.
    pub fn illuminate(&self, point: &Point3<T>) -> Result<Illumination<T>> {
        match self {
            Self::Point { position, color } => {
                let to_light = position - point;
                let distance_sq = to_light.norm_squared();
                let distance = distance_sq.sqrt();
                let direction = Unit::new_normalize(to_light);

                // Inverse-square falloff, matching the point-light model used throughout.
                let four_pi = T::try_from_u8(4)? * T::pi();
                let attenuation = T::one() / (four_pi * distance_sq.max(T::default_epsilon()));
                Ok(Illumination {
                    direction,
                    color: color.scale(attenuation),
                    distance: Some(distance),
                })
            }
            Self::Directional { direction, color } => Ok(Illumination {
                direction: Unit::new_unchecked(-direction.into_inner()),
                color: *color,
                distance: None,
            }),
        }
    }
}
