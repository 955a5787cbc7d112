//! A placed, textured primitive: the renderer's unit of "thing in the scene".

use nalgebra::{Matrix3, Matrix4, Point3, RealField, Unit};
use num_traits::ToPrimitive;
use std::borrow::Cow;

use crate::{
    error::{Result, TransformationError},
    geometry::Aabb,
    object::Primitive,
    rt::{Hit, Ray},
    shading::{Interior, Texture},
    traits::{Bounded, Insideable, Traceable},
};

/// A [`Primitive`] placed in the scene with a texture, an interior (for refraction), and an
/// affine transform from the primitive's local frame into its parent's frame (world space for a
/// top-level object; the enclosing [`crate::object::Csg`]'s own local frame for a CSG child).
///
/// `trans_inv`, `aabb`, and the normal transform are derived once at construction time (folding
/// the source library's one-shot `precompute_fn` into the constructor, since every field this
/// renderer needs from it is already knowable from `trans` and the primitive alone).
#[derive(Debug)]
pub struct Object<T: RealField + Copy> {
    /// The wrapped geometry, evaluated in local space.
    pub primitive: Primitive<T>,
    /// Surface appearance.
    pub texture: Texture<T>,
    /// Volumetric (refractive) properties of the enclosed solid.
    pub interior: Interior<T>,
    /// Local-to-parent affine transform.
    pub trans: Matrix4<T>,
    /// Parent-to-local affine transform (`trans`'s inverse).
    pub trans_inv: Matrix4<T>,
    /// Parent-to-local affine transform used to place pigment pattern evaluation points,
    /// independent of `trans_inv` so CSG union children can share one continuous pattern space
    /// (defaults to `trans_inv`, i.e. the primitive's own local frame).
    pub pigment_trans: Matrix4<T>,
    /// Transpose of `trans_inv`'s upper-left 3x3: maps local-space normals into the parent frame.
    normal_transform: Matrix3<T>,
    /// Parent-space bounding box (`primitive`'s local aabb, transformed by `trans`).
    pub aabb: Aabb<T>,
    /// Whether the scene builder should expand this object into its constituent leaves before
    /// building the top-level `Bvh`, rather than keep it as one opaque leaf (set for union-type
    /// CSG nodes, whose children can each be queried independently; see §4.3's builder contract).
    pub split_children: bool,
}

impl<T: RealField + Copy + ToPrimitive> Object<T> {
    /// Construct a new `Object`, eagerly deriving its inverse transform and world-space bound.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible, or if the primitive's local `Aabb` cannot be
    /// computed.
    pub fn new(primitive: Primitive<T>, texture: Texture<T>, interior: Interior<T>, trans: Matrix4<T>) -> Result<Self> {
        let trans_inv = trans.try_inverse().ok_or(TransformationError::NonInvertibleMatrix)?;
        let upper_3x3 = trans_inv.fixed_view::<3, 3>(0, 0);
        let normal_transform = upper_3x3.transpose().into_owned();

        let local_aabb = primitive.aabb()?.into_owned();
        let aabb = local_aabb.transform(&trans);
        let split_children = primitive.is_splittable_union();

        #[cfg(debug_assertions)]
        crate::config::DEBUG_ALLOCATIONS.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        Ok(Self {
            primitive,
            texture,
            interior,
            trans,
            trans_inv,
            pigment_trans: trans_inv,
            normal_transform,
            aabb,
            split_children,
        })
    }

    /// Construct a new `Object` at the identity transform.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Object::new`].
    pub fn identity(primitive: Primitive<T>, texture: Texture<T>, interior: Interior<T>) -> Result<Self> {
        Self::new(primitive, texture, interior, Matrix4::identity())
    }

    /// Override the pattern-space transform used to place pigment evaluation points, independent
    /// of the primitive's own local frame.
    #[must_use]
    pub fn with_pattern_transform(mut self, pigment_trans: Matrix4<T>) -> Self {
        self.pigment_trans = pigment_trans;
        self
    }

    /// Transform a parent-space ray into this object's local frame.
    fn to_local(&self, ray: &Ray<T>) -> Ray<T> {
        let origin = self.trans_inv.transform_point(&ray.origin);
        let direction = Unit::new_normalize(self.trans_inv.transform_vector(&ray.direction));
        Ray::new(origin, direction)
    }

    /// Map a parent-space point into the frame used to evaluate this object's pigment pattern.
    #[must_use]
    pub fn pigment_point(&self, point: &Point3<T>) -> Point3<T> {
        self.pigment_trans.transform_point(point)
    }
}

impl<T: RealField + Copy + ToPrimitive> Bounded<T> for Object<T> {
    fn aabb(&self) -> Result<Cow<Aabb<T>>> {
        Ok(Cow::Borrowed(&self.aabb))
    }
}

impl<T: RealField + Copy + ToPrimitive> Traceable<T> for Object<T> {
    /// Transform `ray` into local space, delegate to the wrapped primitive, then transform the
    /// resulting normal and distance back into the caller's frame. This wrapper is the only
    /// caller of `Primitive::intersect` outside a primitive's own code, matching §4.1's contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying primitive's intersection test fails.
    fn intersect(&self, ray: &Ray<T>) -> Result<Option<Hit<T>>> {
        let local_ray = self.to_local(ray);
        let Some(hit) = self.primitive.intersect(&local_ray)? else {
            return Ok(None);
        };

        let world_geometric_vector = self.normal_transform * hit.geometric_normal.into_inner();
        let world_geometric_normal = Unit::new_normalize(world_geometric_vector);
        let world_interpolated_vector = self.normal_transform * hit.interpolated_normal.into_inner();
        let world_interpolated_normal = Unit::new_normalize(world_interpolated_vector);

        // The hit distance is measured along the (possibly rescaled) local ray; re-derive the
        // distance along the caller's ray by transforming the local hit point back out.
        let local_point = local_ray.origin + local_ray.direction.scale(hit.distance);
        let world_point = self.trans.transform_point(&local_point);
        let distance = (world_point - ray.origin).dot(&ray.direction);

        Ok(Some(Hit::new(distance, world_geometric_normal, world_interpolated_normal)?))
    }

    fn intersect_any(&self, ray: &Ray<T>, max_distance: T) -> Result<bool> {
        let local_ray = self.to_local(ray);
        let world_endpoint = ray.origin + ray.direction.scale(max_distance);
        let local_endpoint = self.trans_inv.transform_point(&world_endpoint);
        let local_max_distance = (local_endpoint - local_ray.origin).norm();
        self.primitive.intersect_any(&local_ray, local_max_distance)
    }
}

impl<T: RealField + Copy + ToPrimitive> Insideable<T> for Object<T> {
    fn inside(&self, point: &Point3<T>) -> Result<bool> {
        let local_point = self.trans_inv.transform_point(point);
        self.primitive.inside(&local_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Translation3, Unit, Vector3};

    use crate::geometry::Sphere;
    use crate::shading::{Finish, Interior, Pigment, TColor, Texture};

    fn unit_texture() -> Texture<f64> {
        Texture::new(Pigment::Solid(TColor::opaque(Vector3::new(1.0, 0.0, 0.0))), Finish::new(0.1, 0.9, 0.0, 1.0, 0.0))
    }

    #[test]
    fn translated_sphere_hit_normal_points_outward_in_world_space() {
        let sphere = Sphere::new(Point3::origin(), 1.0);
        let trans = Translation3::new(5.0, 0.0, 0.0).to_homogeneous();
        let object = Object::new(Primitive::Sphere(sphere), unit_texture(), Interior::vacuum(), trans).unwrap();

        let ray = Ray::new(Point3::new(5.0, 0.0, -5.0), Unit::new_normalize(Vector3::new(0.0, 0.0, 1.0)));
        let hit = object.intersect(&ray).unwrap().expect("ray should hit the translated sphere");

        assert!((hit.distance - 4.0).abs() < 1e-9);
        assert!((hit.geometric_normal.z + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pigment_point_defaults_to_local_frame() {
        let sphere = Sphere::new(Point3::origin(), 1.0);
        let trans = Translation3::new(2.0, 0.0, 0.0).to_homogeneous();
        let object = Object::new(Primitive::Sphere(sphere), unit_texture(), Interior::vacuum(), trans).unwrap();

        let local = object.pigment_point(&Point3::new(2.0, 0.0, 0.0));
        assert!(local.coords.norm() < 1e-9, "world-space center should map to the local origin");
    }

    #[test]
    fn non_invertible_transform_is_rejected() {
        let sphere = Sphere::new(Point3::origin(), 1.0);
        let singular = Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        let result = Object::new(Primitive::Sphere(sphere), unit_texture(), Interior::vacuum(), singular);
        assert!(result.is_err());
    }
}
