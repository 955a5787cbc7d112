//! Shared mesh storage for instancing: meshes are loaded once and referenced by any number of
//! scene objects via `Arc`, so the triangle data and its internal `Bvh` are never duplicated.

use nalgebra::RealField;
use num_traits::ToPrimitive;
use std::{collections::HashMap, sync::Arc};

use crate::{bvh::BvhConfig, geometry::Mesh};

/// Named collection of loaded `Mesh` assets, referenced by `object::Primitive::MeshRef`.
pub struct Assets<T: RealField + Copy + ToPrimitive> {
    /// `Bvh` configuration applied to each mesh's own internal `Bvh` and to the scene's top-level
    /// `Bvh` when none is supplied explicitly.
    pub bvh_config: BvhConfig,
    /// Loaded meshes, keyed by the identifier used to reference them from a scene description.
    pub meshes: HashMap<String, Arc<Mesh<T>>>,
}

impl<T: RealField + Copy + ToPrimitive> Assets<T> {
    /// Construct a new empty `Assets` instance.
    #[must_use]
    pub fn empty(bvh_config: BvhConfig) -> Self {
        Self {
            bvh_config,
            meshes: HashMap::new(),
        }
    }

    /// Add a mesh to the assets, under `name`.
    #[must_use]
    pub fn add_mesh(mut self, name: &str, mesh: Mesh<T>) -> Self {
        self.meshes.insert(name.into(), Arc::new(mesh));
        self
    }

    /// Look up a previously-added mesh by name.
    #[must_use]
    pub fn mesh(&self, name: &str) -> Option<&Arc<Mesh<T>>> {
        self.meshes.get(name)
    }
}

impl<T: RealField + Copy + ToPrimitive> Default for Assets<T> {
    fn default() -> Self {
        Self::empty(BvhConfig::default())
    }
}
