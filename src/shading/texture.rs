//! Surface texture: pigment plus finish.

use nalgebra::RealField;
use serde::{Deserialize, Serialize};

use crate::shading::{Finish, Pigment};

/// A complete surface appearance: what color it is ([`Pigment`]) and how it responds to light
/// ([`Finish`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Texture<T: RealField + Copy> {
    /// The surface's base color function.
    pub pigment: Pigment<T>,
    /// The surface's reflectance model.
    pub finish: Finish<T>,
}

impl<T: RealField + Copy> Texture<T> {
    /// Construct a new `Texture`.
    pub const fn new(pigment: Pigment<T>, finish: Finish<T>) -> Self {
        Self { pigment, finish }
    }
}
