//! Surface appearance and the recursive shading engine that evaluates it.

mod finish;
mod interior;
mod light;
mod pigment;
mod quality;
mod shoot;
mod state;
mod tcolor;
mod texture;

pub use finish::Finish;
pub use interior::Interior;
pub use light::{Illumination, Light};
pub use pigment::Pigment;
pub use quality::Quality;
pub use shoot::shoot;
pub use state::ShadingState;
pub use tcolor::TColor;
pub use texture::Texture;
