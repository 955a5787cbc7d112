//! Interior (volumetric) properties of a solid object: governs refraction.

use nalgebra::RealField;
use serde::{Deserialize, Serialize};

/// Properties of the volume enclosed by an object, consulted when a ray transmits through its
/// surface rather than reflecting off it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interior<T: RealField + Copy> {
    /// Index of refraction, used by Snell's law at the entry/exit surface.
    pub ior: T,
}

impl<T: RealField + Copy> Interior<T> {
    /// Construct a new `Interior`.
    pub const fn new(ior: T) -> Self {
        Self { ior }
    }

    /// The vacuum/air interior: index of refraction 1, i.e. no bending.
    pub fn vacuum() -> Self {
        Self::new(T::one())
    }
}
