//! Surface pigment: maps a surface point to a base color.

use nalgebra::{Point3, RealField};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::shading::TColor;

/// Tagged union of supported pigment functions, evaluated in object space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Pigment<T: RealField + Copy> {
    /// A single uniform color.
    Solid(TColor<T>),
    /// A 3D checkerboard of two colors, with a given cell size.
    Checker { a: TColor<T>, b: TColor<T>, scale: T },
}

impl<T: RealField + Copy + ToPrimitive> Pigment<T> {
    /// Evaluate the pigment at an object-space point.
    pub fn evaluate(&self, point: &Point3<T>) -> TColor<T> {
        match self {
            Self::Solid(color) => *color,
            Self::Checker { a, b, scale } => {
                let cell = |v: T| (v / *scale).floor().to_i64().unwrap_or(0);
                let parity = (cell(point.x) + cell(point.y) + cell(point.z)).rem_euclid(2);
                if parity == 0 { *a } else { *b }
            }
        }
    }
}
