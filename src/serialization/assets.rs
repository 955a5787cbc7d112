//! Serialized representation of an `Assets` collection.

use nalgebra::RealField;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{bvh::BvhConfig, error::Result, geometry::Mesh, scene::Assets};

/// Serialized representation of `Assets` used by `Scene`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedAssets<T: RealField + Copy + ToPrimitive> {
    /// Bounding Volume Hierarchy configuration applied to every loaded mesh's own internal `Bvh`.
    pub bvh_config: Option<BvhConfig>,
    /// Meshes to load, keyed by the identifier scene objects reference them by.
    pub meshes: Vec<(String, PathBuf)>,
}

impl<T: RealField + Copy + ToPrimitive> SerializedAssets<T> {
    /// Construct an `Assets` instance, loading every listed mesh from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the `Mesh` files cannot be loaded or parsed.
    pub fn build(self) -> Result<Assets<T>> {
        let bvh_config = self.bvh_config.unwrap_or_default();
        let mut assets = Assets::empty(bvh_config);
        for (name, path) in self.meshes {
            let mesh = Mesh::load(&bvh_config, path)?;
            assets = assets.add_mesh(&name, mesh);
        }
        Ok(assets)
    }
}
