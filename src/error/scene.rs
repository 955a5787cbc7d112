use thiserror::Error;

/// Specific error type for `Scene` construction.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Scene must contain at least one object")]
    EmptyScene,

    #[error("BVH must contain at least one geometry")]
    EmptyBvh,

    #[error("Asset with ID '{id}' already exists")]
    DuplicateAssetId { id: String },

    #[error("Asset with ID '{id}' not found")]
    AssetNotFound { id: String },

    #[error("scene has no camera configured")]
    MissingCamera,

    #[error("scene has no canvas/region configured to render into")]
    MissingCanvas,
}
