//! Tagged union of the primitive shapes an [`crate::object::Object`] may wrap.

use nalgebra::{Point3, RealField};
use num_traits::ToPrimitive;
use std::{borrow::Cow, sync::Arc};

use crate::{
    error::Result,
    geometry::{Aabb, Mesh, Plane, Sphere, Triangle},
    object::Csg,
    rt::{Hit, Ray},
    traits::{Bounded, Insideable, Traceable},
};

/// Every kind of geometry an [`crate::object::Object`] can carry, evaluated entirely in the
/// object's local frame; the enclosing `Object` handles the world-space transform.
#[derive(Debug)]
pub enum Primitive<T: RealField + Copy> {
    /// A sphere.
    Sphere(Sphere<T>),
    /// An infinite plane.
    Plane(Plane<T>),
    /// A single triangle.
    Triangle(Triangle<T>),
    /// A triangle mesh owned outright by this object.
    Mesh(Mesh<T>),
    /// A triangle mesh shared with other objects (mesh instancing): the geometry and its own
    /// internal `Bvh` are built once and referenced by every instance, each supplying its own
    /// `Object::trans`.
    MeshRef(Arc<Mesh<T>>),
    /// A boolean combination of two child objects.
    Csg(Box<Csg<T>>),
}

impl<T: RealField + Copy + ToPrimitive> Primitive<T> {
    /// Whether this primitive is a union-type CSG node, eligible to be expanded into its
    /// constituent leaves by the scene builder rather than kept as one opaque `Bvh` leaf (see
    /// `Object::split_children`, and the PRT builder's `entries` contract in §4.3 of the
    /// acceleration-core design, which assumes CSG unions have already been expanded).
    #[must_use]
    pub fn is_splittable_union(&self) -> bool {
        matches!(self, Self::Csg(csg) if csg.op == crate::object::CsgOp::Union)
    }
}

impl<T: RealField + Copy + ToPrimitive> Bounded<T> for Primitive<T> {
    fn aabb(&self) -> Result<Cow<Aabb<T>>> {
        match self {
            Self::Sphere(sphere) => sphere.aabb(),
            Self::Plane(plane) => plane.aabb(),
            Self::Triangle(triangle) => triangle.aabb(),
            Self::Mesh(mesh) => mesh.aabb(),
            Self::MeshRef(mesh) => mesh.aabb(),
            Self::Csg(csg) => csg.aabb(),
        }
    }
}

impl<T: RealField + Copy + ToPrimitive> Traceable<T> for Primitive<T> {
    fn intersect(&self, ray: &Ray<T>) -> Result<Option<Hit<T>>> {
        match self {
            Self::Sphere(sphere) => sphere.intersect(ray),
            Self::Plane(plane) => plane.intersect(ray),
            Self::Triangle(triangle) => triangle.intersect(ray),
            Self::Mesh(mesh) => mesh.intersect(ray),
            Self::MeshRef(mesh) => mesh.intersect(ray),
            Self::Csg(csg) => csg.intersect(ray),
        }
    }

    fn intersect_any(&self, ray: &Ray<T>, max_distance: T) -> Result<bool> {
        match self {
            Self::Sphere(sphere) => sphere.intersect_any(ray, max_distance),
            Self::Plane(plane) => plane.intersect_any(ray, max_distance),
            Self::Triangle(triangle) => triangle.intersect_any(ray, max_distance),
            Self::Mesh(mesh) => mesh.intersect_any(ray, max_distance),
            Self::MeshRef(mesh) => mesh.intersect_any(ray, max_distance),
            Self::Csg(csg) => csg.intersect_any(ray, max_distance),
        }
    }
}

impl<T: RealField + Copy + ToPrimitive> Insideable<T> for Primitive<T> {
    fn inside(&self, point: &Point3<T>) -> Result<bool> {
        match self {
            Self::Sphere(sphere) => sphere.inside(point),
            Self::Plane(plane) => plane.inside(point),
            Self::Triangle(triangle) => triangle.inside(point),
            Self::Mesh(mesh) => mesh.inside(point),
            Self::MeshRef(mesh) => mesh.inside(point),
            Self::Csg(csg) => csg.inside(point),
        }
    }
}
