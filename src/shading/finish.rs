//! Surface finish: the local reflectance model parameters.

use nalgebra::{RealField, Unit, Vector3};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::traits::FallibleNumeric;

/// Phong-style local illumination coefficients, plus mirror reflectivity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Finish<T: RealField + Copy> {
    /// Ambient light contribution (fraction of pigment color, independent of lights).
    pub ambient: T,
    /// Diffuse (Lambertian) reflectance coefficient.
    pub diffuse: T,
    /// Specular highlight intensity.
    pub specular: T,
    /// Specular highlight tightness (higher is a tighter, shinier highlight).
    pub roughness: T,
    /// Mirror reflection coefficient, attenuating a recursively traced reflected ray.
    pub reflective: T,
}

impl<T: RealField + Copy> Finish<T> {
    /// Construct a new `Finish`.
    pub const fn new(ambient: T, diffuse: T, specular: T, roughness: T, reflective: T) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            roughness,
            reflective,
        }
    }

    /// Flat ambient term: the pigment color weighted by `ambient`, independent of any light.
    #[must_use]
    pub fn ambient(&self, pigment_color: &Vector3<T>) -> Vector3<T> {
        pigment_color.scale(self.ambient)
    }

    /// Lambertian diffuse contribution of one light.
    #[must_use]
    pub fn diffuse(&self, light_color: &Vector3<T>, pigment_color: &Vector3<T>, light_direction: &Unit<Vector3<T>>, normal: &Unit<Vector3<T>>) -> Vector3<T> {
        let cos_theta = light_direction.dot(normal).max(T::zero());
        light_color.component_mul(pigment_color).scale(self.diffuse * cos_theta)
    }
}

impl<T: RealField + Copy + ToPrimitive> Finish<T> {
    /// Phong specular highlight contribution of one light.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the constant `2`.
    pub fn specular(
        &self,
        light_color: &Vector3<T>,
        light_direction: &Unit<Vector3<T>>,
        normal: &Unit<Vector3<T>>,
        viewer: &Unit<Vector3<T>>,
    ) -> crate::error::Result<Vector3<T>> {
        let two = T::try_from_u8(2)?;
        let incidence = light_direction.dot(normal);
        let reflected = normal.into_inner().scale(two * incidence) - light_direction.into_inner();
        let alignment = reflected.dot(viewer).max(T::zero());
        let intensity = alignment.powf(self.roughness);
        Ok(light_color.scale(self.specular * intensity))
    }

    /// Reflection contribution: the reflective coefficient applied to a recursively traced color.
    #[must_use]
    pub fn reflection(&self, incoming_color: &Vector3<T>, pigment_color: &Vector3<T>) -> Vector3<T> {
        incoming_color.component_mul(pigment_color).scale(self.reflective)
    }
}
