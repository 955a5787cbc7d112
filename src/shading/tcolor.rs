//! Transparent color: an RGB color plus a transmission coefficient and filter proportion.

use nalgebra::{RealField, Vector3};
use serde::{Deserialize, Serialize};

use crate::{error::Result, traits::FallibleNumeric};

/// A color carrying transparency information, following the `{color, T, F}` model: `T` is the
/// fraction of light transmitted through the surface, and `F` is the fraction of that
/// transmission which is filtered (tinted by `color`) rather than simply passed straight through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TColor<T: RealField + Copy> {
    /// Linear RGB color.
    pub color: Vector3<T>,
    /// Transmittance: 0 is fully opaque, 1 is fully transparent.
    pub trans: T,
    /// Filter proportion: 0 is clear transmission (no tint), 1 is fully filtered (tinted).
    pub filter: T,
}

impl<T: RealField + Copy> TColor<T> {
    /// Construct a new `TColor`.
    pub const fn new(color: Vector3<T>, trans: T, filter: T) -> Self {
        Self { color, trans, filter }
    }

    /// Construct an opaque `TColor` from an RGB color.
    pub fn opaque(color: Vector3<T>) -> Self {
        Self::new(color, T::zero(), T::zero())
    }

    /// The "clear" color: fully transparent, contributes no tint of its own.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the value `1`.
    pub fn clear() -> Result<Self> {
        Ok(Self::new(Vector3::zeros(), T::one(), T::try_from_u8(0)?))
    }

    /// Attenuate an incoming light contribution `light` as it passes through a surface with this
    /// `TColor`, splitting into the filtered (tinted) and transmitted (clear) components and
    /// summing them, per the standard filter/transmit decomposition.
    ///
    /// `illuminate` is the illumination function: given the surface's own `color`, returns the
    /// tinted contribution (usually `self.color.component_mul(&light)` with finish applied
    /// upstream).
    pub fn filter_illuminate(&self, light: Vector3<T>, illuminate: impl FnOnce(Vector3<T>) -> Vector3<T>) -> Vector3<T> {
        let filtered = illuminate(self.color).scale(self.trans * self.filter);
        let transmitted = light.scale(self.trans * (T::one() - self.filter));
        filtered + transmitted
    }

    /// Remove the filtering component, returning just the fraction of light that passes through
    /// unfiltered. Used when accumulating the "remaining" light budget for further recursion.
    pub fn remove_filter(&self, light: Vector3<T>) -> Vector3<T> {
        light.scale(self.trans)
    }

    /// Clamp each color channel into `[0, 1]`.
    #[must_use]
    pub fn clamp(&self) -> Self {
        let clamp01 = |v: T| v.max(T::zero()).min(T::one());
        Self {
            color: Vector3::new(clamp01(self.color.x), clamp01(self.color.y), clamp01(self.color.z)),
            trans: clamp01(self.trans),
            filter: clamp01(self.filter),
        }
    }

    /// Whether any channel is not-a-number; used to detect and discard corrupted samples.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.color.x.is_nan() || self.color.y.is_nan() || self.color.z.is_nan() || self.trans.is_nan() || self.filter.is_nan()
    }
}

impl<T: RealField + Copy> Default for TColor<T> {
    fn default() -> Self {
        Self::new(Vector3::zeros(), T::zero(), T::zero())
    }
}
