//! Serialized representation of an `Object`: primitive geometry, texture, interior, and transform.

use nalgebra::{Matrix4, Point3, RealField, Unit, Vector3};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SceneError},
    geometry::{Plane, Sphere, Triangle},
    object::{Csg, CsgOp, Object, Primitive},
    scene::Assets,
    serialization::SerializedTransform,
    shading::{Interior, Texture},
};

/// Enumeration of all primitive shapes a serialized object can wrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SerializedPrimitive<T: RealField + Copy> {
    /// A sphere primitive: center and radius.
    Sphere([T; 3], T),
    /// An infinite plane primitive: a point on the plane and its normal.
    Plane([T; 3], [T; 3]),
    /// A triangle primitive: vertex positions and per-vertex normals.
    Triangle([[T; 3]; 3], [[T; 3]; 3]),
    /// A reference to a named mesh previously loaded into `Assets`.
    MeshInstance(String),
    /// A boolean combination of two serialized objects.
    Csg(CsgOp, Box<SerializedObject<T>>, Box<SerializedObject<T>>),
}

/// Serialized representation of an `Object`: geometry, texture, interior, and transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedObject<T: RealField + Copy> {
    /// The wrapped primitive geometry.
    pub primitive: SerializedPrimitive<T>,
    /// Surface appearance.
    pub texture: Texture<T>,
    /// Volumetric (refractive) properties.
    pub interior: Interior<T>,
    /// Local-to-parent transform; defaults to the identity when absent.
    pub transform: Option<SerializedTransform<T>>,
}

impl<T: RealField + Copy + ToPrimitive> SerializedObject<T> {
    /// Construct an `Object` instance, resolving any mesh references against `assets`.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced mesh is not present in `assets`, if the transform is not
    /// invertible, or if a nested CSG operand fails to build.
    pub fn build(self, assets: &Assets<T>) -> Result<Object<T>> {
        let trans = self.transform.map_or_else(|| Ok(Matrix4::identity()), SerializedTransform::build)?;

        let primitive = match self.primitive {
            SerializedPrimitive::Sphere(center, radius) => {
                Primitive::Sphere(Sphere::new(Point3::new(center[0], center[1], center[2]), radius))
            }
            SerializedPrimitive::Plane(point, normal) => {
                let point = Point3::new(point[0], point[1], point[2]);
                let normal = Unit::new_normalize(Vector3::new(normal[0], normal[1], normal[2]));
                Primitive::Plane(Plane::new(point, normal))
            }
            SerializedPrimitive::Triangle(positions, normals) => Primitive::Triangle(Triangle::new(
                positions.map(|p| Point3::new(p[0], p[1], p[2])),
                normals.map(|n| Unit::new_normalize(Vector3::new(n[0], n[1], n[2]))),
            )),
            SerializedPrimitive::MeshInstance(mesh_id) => {
                let mesh = assets.mesh(&mesh_id).ok_or_else(|| SceneError::AssetNotFound { id: mesh_id.clone() })?;
                Primitive::MeshRef(mesh.clone())
            }
            SerializedPrimitive::Csg(op, left, right) => {
                let left = left.build(assets)?;
                let right = right.build(assets)?;
                Primitive::Csg(Box::new(Csg::new(op, left, right)))
            }
        };

        Object::new(primitive, self.texture, self.interior, trans)
    }
}
