//! Bundles the per-intersection fields consulted while shading one hit point.

use nalgebra::{Point3, RealField, Unit, Vector3};
use num_traits::ToPrimitive;

use crate::{
    object::Intersection,
    shading::{Interior, TColor, Texture},
    traits::FallibleNumeric,
};

/// The working fields for one `shoot` call that has already found an intersection: the hit's
/// surface point and viewer/reflection directions, the hit object's texture and interior, and
/// the output color being accumulated.
///
/// The source library's `ShadingState` also carries an explicit parent pointer used as an IOR
/// stack during transmission, so that leaving a solid can recover the medium that enclosed it
/// rather than falling back to vacuum. That stack is threaded separately through `shoot`'s
/// recursion (see `shading::shoot::IorStack`) instead of living on this struct, since only the
/// transmission branch ever needs to walk it.
pub struct ShadingState<T: RealField + Copy + ToPrimitive> {
    /// The intersection this state was built from.
    pub intersection: Intersection<T>,
    /// The texture of the object that was hit.
    pub texture: Texture<T>,
    /// The interior of the object that was hit.
    pub interior: Interior<T>,
    /// World-space surface point.
    pub r: Point3<T>,
    /// Surface point mapped into the hit object's pigment pattern space.
    pub pigment_r: Point3<T>,
    /// Unit vector from the surface back toward the ray origin.
    pub viewer: Unit<Vector3<T>>,
    /// Mirror-reflected direction of the incoming ray about the surface normal.
    pub reflected: Unit<Vector3<T>>,
    /// The pigment sampled at `pigment_r`.
    pub pigment: TColor<T>,
    /// Accumulated output color.
    pub color: TColor<T>,
}

impl<T: RealField + Copy + ToPrimitive> ShadingState<T> {
    /// Build a fresh shading state from a newly found intersection. `incoming_direction` is the
    /// unit direction of the ray that produced `intersection`; `pigment_r` is the surface point
    /// already mapped into the hit object's pattern space.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot represent the constant `2`.
    pub fn new(
        intersection: Intersection<T>,
        texture: Texture<T>,
        interior: Interior<T>,
        incoming_direction: Unit<Vector3<T>>,
        pigment_r: Point3<T>,
    ) -> crate::error::Result<Self> {
        let r = intersection.point();
        let viewer = Unit::new_unchecked(-incoming_direction.into_inner());

        let normal = intersection.normal;
        let two = T::try_from_u8(2)?;
        let d = incoming_direction.into_inner();
        let reflected_vector = d - normal.into_inner().scale(two * d.dot(&normal));
        let reflected = Unit::new_normalize(reflected_vector);

        let pigment = texture.pigment.evaluate(&pigment_r);

        Ok(Self {
            intersection,
            texture,
            interior,
            r,
            pigment_r,
            viewer,
            reflected,
            pigment,
            color: TColor::default(),
        })
    }
}
