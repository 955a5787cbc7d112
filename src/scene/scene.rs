//! Scene structure for ray tracing: objects, lights, camera, and render configuration.

use nalgebra::RealField;
use num_traits::ToPrimitive;
use std::borrow::Cow;

use crate::{
    bvh::{Bvh, BvhConfig},
    config::{DEFAULT_ADC_BAILOUT, DEFAULT_RECLIMIT},
    error::Result,
    geometry::Aabb,
    object::Object,
    rt::{Hit, Ray},
    scene::{Camera, SceneBuilder},
    shading::{Light, Pigment, Quality, TColor},
    traits::{Bounded, FallibleNumeric},
};

/// A complete, immutable scene ready to render: objects with a BVH over them, lights, a camera,
/// a background, and the render-quality/recursion knobs of spec §6.
pub struct Scene<T: RealField + Copy + ToPrimitive> {
    /// Every object in the scene, indexed identically to `bvh`'s shape slice.
    pub objects: Vec<Object<T>>,
    /// Acceleration structure over `objects`.
    pub bvh: Bvh<T>,
    /// Light sources.
    pub lights: Vec<Light<T>>,
    /// The camera used to generate primary rays.
    pub camera: Camera<T>,
    /// Pigment evaluated in the ray's direction when nothing is hit.
    pub background: Pigment<T>,
    /// Which shading contributions are evaluated.
    pub quality: Quality,
    /// Recursion cap for the shading engine.
    pub reclimit: u32,
    /// Adaptive-depth-control bailout intensity.
    pub adc_bailout: T,
    /// Horizontal offset of this render's region within the full image.
    pub region_x: usize,
    /// Vertical offset of this render's region within the full image.
    pub region_y: usize,
    /// Full image width the camera computes rays against (may exceed the rendered region).
    pub outer_width: usize,
    /// Full image height the camera computes rays against (may exceed the rendered region).
    pub outer_height: usize,
}

impl<T: RealField + Copy + ToPrimitive> Scene<T> {
    /// Construct a new `Scene`, building its `Bvh` over `objects`.
    ///
    /// # Errors
    ///
    /// Returns an error if `objects` is empty or the `Bvh` fails to build.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &BvhConfig,
        objects: Vec<Object<T>>,
        lights: Vec<Light<T>>,
        camera: Camera<T>,
        background: Pigment<T>,
        quality: Quality,
        reclimit: u32,
        adc_bailout: T,
        region_x: usize,
        region_y: usize,
        outer_width: usize,
        outer_height: usize,
    ) -> Result<Self> {
        let bvh = Bvh::new(config, &objects)?;
        Ok(Self {
            objects,
            bvh,
            lights,
            camera,
            background,
            quality,
            reclimit,
            adc_bailout,
            region_x,
            region_y,
            outer_width,
            outer_height,
        })
    }

    /// Return a builder for constructing a `Scene`.
    #[must_use]
    pub fn builder() -> SceneBuilder<T> {
        SceneBuilder::new()
    }

    /// Test for an intersection between a ray and any object in the scene, consulting the BVH's
    /// last-hit cache. `reset` should be `true` for the first ray cast toward a given pixel.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying traversal fails.
    pub fn intersect(&self, ray: &Ray<T>, reset: bool) -> Result<Option<(usize, Hit<T>)>> {
        self.bvh.closest_intersection_cached(ray, &self.objects, reset)
    }

    /// Test if a ray intersects any object in the scene, without finding the closest one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying traversal fails.
    pub fn intersect_any(&self, ray: &Ray<T>, max_distance: T) -> Result<bool> {
        self.bvh.intersect_any(ray, &self.objects, max_distance)
    }

    /// Test whether `point` lies inside any object in the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if containment testing fails for an object.
    pub fn contains(&self, point: &nalgebra::Point3<T>) -> Result<bool> {
        self.bvh.contains(point, &self.objects)
    }
}

impl<T: RealField + Copy + ToPrimitive> Bounded<T> for Scene<T> {
    fn aabb(&self) -> Result<Cow<Aabb<T>>> {
        self.bvh.aabb()
    }
}

/// Render-quality/recursion defaults shared by [`SceneBuilder`] and serialized scene
/// descriptions with fields left unspecified.
pub struct RenderDefaults;

impl RenderDefaults {
    /// Default recursion cap.
    ///
    /// # Errors
    ///
    /// Never actually fails for realistic `T`; returns a `Result` so callers can propagate
    /// numeric-conversion failures uniformly.
    pub fn reclimit() -> u32 {
        DEFAULT_RECLIMIT
    }

    /// Default ADC bailout intensity, converted into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the constant.
    pub fn adc_bailout<T: RealField + Copy>() -> Result<T> {
        Ok(T::try_from_f64(DEFAULT_ADC_BAILOUT)?)
    }

    /// The clear/black `TColor` used as a scene's default background when none is specified.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the constant `0`.
    pub fn background<T: RealField + Copy>() -> Result<Pigment<T>> {
        Ok(Pigment::Solid(TColor::default()))
    }
}
