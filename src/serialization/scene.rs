//! Serialized representation of a `Scene`.

use nalgebra::RealField;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    bvh::BvhConfig,
    error::Result,
    scene::{Assets, Scene, SceneBuilder},
    serialization::{SerializedCamera, SerializedObject},
    shading::{Light, Pigment, Quality},
};

/// Serialized representation of a `Scene`: objects, lights, camera, and render configuration.
/// Every field beyond `objects` and `camera` is optional and falls back to `SceneBuilder`'s
/// defaults (spec §6's `DEFAULT_RECLIMIT`/`DEFAULT_ADC_BAILOUT`/full `Quality`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedScene<T: RealField + Copy + ToPrimitive> {
    /// Objects within the `Scene`.
    pub objects: Vec<SerializedObject<T>>,
    /// Light sources.
    #[serde(default)]
    pub lights: Vec<Light<T>>,
    /// The camera generating primary rays.
    pub camera: SerializedCamera<T>,
    /// Background pigment, evaluated in a ray's direction when it hits nothing.
    pub background: Option<Pigment<T>>,
    /// Which shading contributions `shoot` evaluates.
    pub quality: Option<Quality>,
    /// Recursion cap for the shading engine.
    pub reclimit: Option<u32>,
    /// Adaptive-depth-control bailout intensity.
    pub adc_bailout: Option<T>,
    /// Top-level `Bvh` configuration; defaults to the asset collection's own.
    pub bvh_config: Option<BvhConfig>,
    /// Sub-region offset and full-image dimensions, `(region_x, region_y, outer_width,
    /// outer_height)`, for distributed/tiled rendering.
    pub region: Option<(usize, usize, usize, usize)>,
}

impl<T: RealField + Copy + ToPrimitive> SerializedScene<T> {
    /// Construct a `Scene` instance, resolving mesh references against `assets`.
    ///
    /// # Errors
    ///
    /// Returns an error if any object fails to build, the camera's projection conversion fails,
    /// or the resulting `Scene` construction fails (no objects, no camera, or a failed `Bvh`
    /// build).
    pub fn build(self, assets: &Assets<T>) -> Result<Scene<T>> {
        let mut builder = Scene::builder()
            .with_bvh_config(self.bvh_config.unwrap_or(assets.bvh_config))
            .with_camera(self.camera.build()?);

        if let Some(background) = self.background {
            builder = builder.with_background(background);
        }
        if let Some(quality) = self.quality {
            builder = builder.with_quality(quality);
        }
        if let Some(reclimit) = self.reclimit {
            builder = builder.with_reclimit(reclimit);
        }
        if let Some(adc_bailout) = self.adc_bailout {
            builder = builder.with_adc_bailout(adc_bailout);
        }
        if let Some((region_x, region_y, outer_width, outer_height)) = self.region {
            builder = builder.with_region(region_x, region_y, outer_width, outer_height);
        }

        for light in self.lights {
            builder = builder.add_light(light);
        }
        for object in self.objects {
            builder = builder.add_object(object.build(assets)?);
        }

        builder.build()
    }
}
