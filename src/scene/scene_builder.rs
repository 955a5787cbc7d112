//! Builder for constructing `Scene` instances.

use nalgebra::{Matrix4, Point3, RealField, Unit, Vector3};
use num_traits::ToPrimitive;
use std::sync::Arc;

use crate::{
    bvh::BvhConfig,
    error::{Result, SceneError},
    geometry::{Mesh, Plane, Sphere, Triangle},
    object::{Csg, CsgOp, Object, Primitive},
    scene::{Camera, Scene},
    shading::{Interior, Light, Pigment, Quality, TColor, Texture},
    traits::FallibleNumeric,
};

/// Builder for constructing `Scene` instances: accumulates objects, lights, and render
/// configuration before `build` expands any CSG unions and constructs the top-level `Bvh`.
pub struct SceneBuilder<T: RealField + Copy + ToPrimitive> {
    objects: Vec<Object<T>>,
    lights: Vec<Light<T>>,
    camera: Option<Camera<T>>,
    background: Pigment<T>,
    quality: Quality,
    reclimit: u32,
    adc_bailout: T,
    bvh_config: BvhConfig,
    region_x: usize,
    region_y: usize,
    outer_width: Option<usize>,
    outer_height: Option<usize>,
}

impl<T: RealField + Copy + ToPrimitive> SceneBuilder<T> {
    /// Construct a new, empty `SceneBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `Bvh` configuration for the scene's top-level acceleration structure.
    #[must_use]
    pub const fn with_bvh_config(mut self, config: BvhConfig) -> Self {
        self.bvh_config = config;
        self
    }

    /// Set the camera generating primary rays.
    #[must_use]
    pub fn with_camera(mut self, camera: Camera<T>) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Set the background pigment, evaluated in a ray's direction when it hits nothing.
    #[must_use]
    pub fn with_background(mut self, background: Pigment<T>) -> Self {
        self.background = background;
        self
    }

    /// Set which shading contributions `shoot` evaluates.
    #[must_use]
    pub const fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the recursion cap for the shading engine.
    #[must_use]
    pub const fn with_reclimit(mut self, reclimit: u32) -> Self {
        self.reclimit = reclimit;
        self
    }

    /// Set the adaptive-depth-control bailout intensity.
    #[must_use]
    pub const fn with_adc_bailout(mut self, adc_bailout: T) -> Self {
        self.adc_bailout = adc_bailout;
        self
    }

    /// Set the region of a larger outer image this scene renders, for distributed/tiled
    /// rendering: `(region_x, region_y)` is this region's offset and `(outer_width, outer_height)`
    /// the full image's dimensions, both consulted by the camera's ray generation.
    #[must_use]
    pub const fn with_region(mut self, region_x: usize, region_y: usize, outer_width: usize, outer_height: usize) -> Self {
        self.region_x = region_x;
        self.region_y = region_y;
        self.outer_width = Some(outer_width);
        self.outer_height = Some(outer_height);
        self
    }

    /// Add a light source to the scene.
    #[must_use]
    pub fn add_light(mut self, light: Light<T>) -> Self {
        self.lights.push(light);
        self
    }

    /// Add an already-constructed `Object` to the scene.
    #[must_use]
    pub fn add_object(mut self, object: Object<T>) -> Self {
        self.objects.push(object);
        self
    }

    /// Add a `Sphere` object to the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible.
    pub fn add_sphere(self, center: Point3<T>, radius: T, texture: Texture<T>, interior: Interior<T>, trans: Matrix4<T>) -> Result<Self> {
        let sphere = Sphere::new(center, radius);
        let object = Object::new(Primitive::Sphere(sphere), texture, interior, trans)?;
        Ok(self.add_object(object))
    }

    /// Add an infinite `Plane` object to the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible.
    pub fn add_plane(self, point: Point3<T>, normal: Unit<Vector3<T>>, texture: Texture<T>, interior: Interior<T>, trans: Matrix4<T>) -> Result<Self> {
        let plane = Plane::new(point, normal);
        let object = Object::new(Primitive::Plane(plane), texture, interior, trans)?;
        Ok(self.add_object(object))
    }

    /// Add a single `Triangle` object to the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible.
    pub fn add_triangle(
        self,
        vertices: [Point3<T>; 3],
        normals: [Unit<Vector3<T>>; 3],
        texture: Texture<T>,
        interior: Interior<T>,
        trans: Matrix4<T>,
    ) -> Result<Self> {
        let triangle = Triangle::new(vertices, normals);
        let object = Object::new(Primitive::Triangle(triangle), texture, interior, trans)?;
        Ok(self.add_object(object))
    }

    /// Add a `Mesh` owned outright by this object.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible.
    pub fn add_mesh(self, mesh: Mesh<T>, texture: Texture<T>, interior: Interior<T>, trans: Matrix4<T>) -> Result<Self> {
        let object = Object::new(Primitive::Mesh(mesh), texture, interior, trans)?;
        Ok(self.add_object(object))
    }

    /// Add an instance referencing a shared `Mesh` (mesh instancing): `mesh`'s geometry and
    /// internal `Bvh` are not duplicated, only `trans` differs between instances.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible.
    pub fn add_mesh_instance(self, mesh: Arc<Mesh<T>>, texture: Texture<T>, interior: Interior<T>, trans: Matrix4<T>) -> Result<Self> {
        let object = Object::new(Primitive::MeshRef(mesh), texture, interior, trans)?;
        Ok(self.add_object(object))
    }

    /// Add a CSG combination of two already-constructed objects.
    ///
    /// # Errors
    ///
    /// Returns an error if `trans` is not invertible.
    pub fn add_csg(self, op: CsgOp, left: Object<T>, right: Object<T>, texture: Texture<T>, interior: Interior<T>, trans: Matrix4<T>) -> Result<Self> {
        let csg = Csg::new(op, left, right);
        let object = Object::new(Primitive::Csg(Box::new(csg)), texture, interior, trans)?;
        Ok(self.add_object(object))
    }

    /// Build the `Scene`: expand CSG unions into their constituent leaves, then construct the
    /// top-level `Bvh` over the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder has no objects, no camera was set, or construction of the
    /// expanded objects or `Bvh` fails.
    pub fn build(self) -> Result<Scene<T>> {
        if self.objects.is_empty() {
            return Err(SceneError::EmptyScene.into());
        }
        let camera = self.camera.ok_or(SceneError::MissingCamera)?;

        let mut expanded = Vec::with_capacity(self.objects.len());
        for object in self.objects {
            expanded.extend(flatten_union(object)?);
        }

        let resolution = *camera.resolution();
        let outer_width = self.outer_width.unwrap_or(resolution[1]);
        let outer_height = self.outer_height.unwrap_or(resolution[0]);

        Scene::new(
            &self.bvh_config,
            expanded,
            self.lights,
            camera,
            self.background,
            self.quality,
            self.reclimit,
            self.adc_bailout,
            self.region_x,
            self.region_y,
            outer_width,
            outer_height,
        )
    }
}

impl<T: RealField + Copy + ToPrimitive> Default for SceneBuilder<T> {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera: None,
            background: Pigment::Solid(TColor::default()),
            quality: Quality::default(),
            reclimit: crate::config::DEFAULT_RECLIMIT,
            adc_bailout: T::try_from_f64(crate::config::DEFAULT_ADC_BAILOUT).unwrap_or_else(|_| T::default_epsilon()),
            bvh_config: BvhConfig::default(),
            region_x: 0,
            region_y: 0,
            outer_width: None,
            outer_height: None,
        }
    }
}

/// Recursively expand a CSG-union `Object` into its constituent leaves, per `Object::split_children`
/// (the top-level `Bvh` assumes CSG unions have already been flattened into independent leaves; see
/// `Primitive::is_splittable_union`). Non-union objects, and CSG nodes using any other operator,
/// pass through unchanged as a single-element vector.
///
/// A child's pattern transform is not preserved through flattening: each flattened leaf recovers
/// the identity pigment mapping, since the original `pigment_trans` was expressed relative to a
/// parent frame that no longer exists once the union is split apart.
fn flatten_union<T: RealField + Copy + ToPrimitive>(object: Object<T>) -> Result<Vec<Object<T>>> {
    if !object.split_children {
        return Ok(vec![object]);
    }
    let Primitive::Csg(csg) = object.primitive else {
        return Ok(vec![object]);
    };
    let outer_trans = object.trans;
    let Csg { left, right, .. } = *csg;

    let mut out = flatten_union(reparent(left, outer_trans)?)?;
    out.extend(flatten_union(reparent(right, outer_trans)?)?);
    Ok(out)
}

/// Rebuild `child` with its transform composed under `outer_trans`, as required each time
/// [`flatten_union`] lifts a CSG child out of its parent's local frame into the grandparent's.
fn reparent<T: RealField + Copy + ToPrimitive>(child: Object<T>, outer_trans: Matrix4<T>) -> Result<Object<T>> {
    let trans = outer_trans * child.trans;
    Object::new(child.primitive, child.texture, child.interior, trans)
}
