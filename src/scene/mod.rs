//! Scene assembly: objects, lights, camera, and the top-level `Bvh` over them.

mod assets;
mod camera;
mod projection;
mod scene;
mod scene_builder;

pub use assets::Assets;
pub use camera::Camera;
pub use projection::Projection;
pub use scene::{RenderDefaults, Scene};
pub use scene_builder::SceneBuilder;
