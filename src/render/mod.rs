//! Concurrent render driver: a fixed worker pool shading a scene into a canvas, row by row.

mod canvas;
mod driver;
mod future;

pub use canvas::Canvas;
pub use driver::{render, render_async};
pub use future::Future;
