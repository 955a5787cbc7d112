//! Serde mirrors of the runtime scene types, each with a fallible `build()` conversion.

mod assets;
mod camera;
mod projection;
mod scene;
mod scene_object;
mod transform;

pub use assets::SerializedAssets;
pub use camera::SerializedCamera;
pub use projection::SerializedProjection;
pub use scene::SerializedScene;
pub use scene_object::{SerializedObject, SerializedPrimitive};
pub use transform::SerializedTransform;
