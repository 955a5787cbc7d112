//! Render quality bitmask: gates which branches of `shoot` run.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which shading contributions a render evaluates. Dropping a flag is a performance/quality
    /// knob, not a correctness concern: every branch `shoot` takes is still well-defined with any
    /// subset of flags set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Quality: u8 {
        /// Evaluate the pigment at the hit point at all (otherwise surfaces render black).
        const PIGMENT = 0b0000_0001;
        /// Accumulate per-light diffuse/specular contributions and shadow feelers.
        const LIGHTS = 0b0000_0010;
        /// Apply the finish's ambient/diffuse/specular coefficients (otherwise lighting
        /// contributes raw, unweighted pigment color).
        const FINISH = 0b0000_0100;
        /// Trace transmitted (refracted) rays through transparent surfaces.
        const TRANSPARENCY = 0b0000_1000;
        /// Trace reflected rays off finishes with a reflective component.
        const REFLECTION = 0b0001_0000;
    }
}

impl Default for Quality {
    /// All contributions enabled, matching a full-quality render.
    fn default() -> Self {
        Self::all()
    }
}
