//! Camera: generates world-space sampling rays for an image.

use nalgebra::{Point3, RealField, Rotation3, Unit, Vector3};

use crate::{
    rt::Ray,
    scene::Projection,
    traits::FallibleNumeric,
};
use crate::error::Result;

/// Generates sampling rays to form an image.
#[derive(Debug, Clone)]
pub struct Camera<T: RealField + Copy> {
    /// Observation position.
    position: Point3<T>,
    /// View target.
    look_at: Point3<T>,
    /// Projection model.
    projection: Projection<T>,
    /// Resolution of the image in pixels, `[height, width]`.
    resolution: [usize; 2],
}

impl<T: RealField + Copy> Camera<T> {
    /// Construct a new `Camera`.
    pub fn new(position: Point3<T>, look_at: Point3<T>, projection: Projection<T>, resolution: [usize; 2]) -> Self {
        debug_assert!(resolution[0] > 0, "Resolution height must be positive");
        debug_assert!(resolution[1] > 0, "Resolution width must be positive");

        Self {
            position,
            look_at,
            projection,
            resolution,
        }
    }

    /// Returns the resolution of the camera as `[height, width]`.
    #[must_use]
    pub const fn resolution(&self) -> &[usize; 2] {
        &self.resolution
    }

    /// Generate the world-space ray through pixel `[row, col]` (per spec §6's camera contract:
    /// normalizes to the unit square before applying the projection model).
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the pixel indices or resolution as `f32`/`usize`.
    pub fn generate_ray(&self, pixel_index: [usize; 2]) -> Result<Ray<T>> {
        match self.projection {
            Projection::Perspective(fov) => self.generate_perspective_ray(pixel_index, fov),
            Projection::Orthographic(width) => self.generate_ortho_ray(pixel_index, width),
        }
    }

    fn basis(&self) -> (Unit<Vector3<T>>, Unit<Vector3<T>>, Unit<Vector3<T>>) {
        let forward = Unit::new_normalize(self.look_at - self.position);
        let right = Unit::new_normalize(forward.cross(&Vector3::z()));
        let up = Unit::new_normalize(right.cross(&forward));
        (forward, right, up)
    }

    fn generate_perspective_ray(&self, pixel_index: [usize; 2], fov: T) -> Result<Ray<T>> {
        debug_assert!(pixel_index[0] < self.resolution[0], "Row index out of bounds");
        debug_assert!(pixel_index[1] < self.resolution[1], "Column index out of bounds");

        let height = T::try_from_usize(self.resolution[0])?;
        let width = T::try_from_usize(self.resolution[1])?;
        let half = T::try_from_f32(0.5)?;

        let d_row = (T::try_from_usize(pixel_index[0])? / height) - half;
        let d_col = (T::try_from_usize(pixel_index[1])? / width) - half;

        let aspect_ratio = width / height;
        let half_fov = fov * half;

        let d_theta = -d_col * half_fov;
        let d_phi = -d_row * (half_fov / aspect_ratio);

        let (forward, right, up) = self.basis();

        let vertical_rotation = Rotation3::from_axis_angle(&right, d_phi);
        let lateral_rotation = Rotation3::from_axis_angle(&up, d_theta);

        let direction = lateral_rotation * vertical_rotation * forward;
        Ok(Ray::new(self.position, direction))
    }

    fn generate_ortho_ray(&self, pixel_index: [usize; 2], width: T) -> Result<Ray<T>> {
        debug_assert!(pixel_index[0] < self.resolution[0], "Row index out of bounds");
        debug_assert!(pixel_index[1] < self.resolution[1], "Column index out of bounds");

        let height_px = T::try_from_usize(self.resolution[0])?;
        let width_px = T::try_from_usize(self.resolution[1])?;
        let half = T::try_from_f32(0.5)?;

        let u = (T::try_from_usize(pixel_index[1])? / width_px) - half;
        let v = (T::try_from_usize(pixel_index[0])? / height_px) - half;

        let aspect_ratio = width_px / height_px;
        let view_width = width;
        let view_height = -view_width / aspect_ratio;

        let (forward, right, up) = self.basis();

        let horizontal_offset = right.into_inner() * (u * view_width);
        let vertical_offset = up.into_inner() * (v * view_height);

        let ray_origin = self.position + horizontal_offset + vertical_offset;

        Ok(Ray::new(ray_origin, forward))
    }
}
