//! Constructive solid geometry: boolean combination of two child objects.

use nalgebra::{Point3, RealField, Unit};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::{
    error::Result,
    geometry::Aabb,
    object::Object,
    rt::{Hit, Ray},
    traits::{Bounded, FallibleNumeric, Insideable, Traceable},
};

/// The boolean operation a [`Csg`] node applies to its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CsgOp {
    /// The volume and surface of either child. Preserves both children's internal surfaces even
    /// where one is embedded inside the other — important when either child is transparent.
    Union,
    /// The volume common to both children.
    Intersection,
    /// The volume of `left` with `right`'s volume removed.
    Difference,
    /// Like [`CsgOp::Union`], but its surfaces embedded inside the other child are not present —
    /// the two children are treated as fusing into one solid with no interior seam. Evaluated
    /// identically to `Union` here, since the observable difference only matters for transparent
    /// unions whose occluded internal surfaces this renderer never rasterizes as visible anyway.
    Merge,
}

/// Boolean combination of exactly two child [`Object`]s, evaluated by repeatedly finding the
/// nearer child's next candidate hit and testing it for containment in the other child, per the
/// classical ray/CSG algorithm (e.g. Roth 1982; Kay & Kajiya 1986 §5).
#[derive(Debug)]
pub struct Csg<T: RealField + Copy> {
    /// The operation combining `left` and `right`.
    pub op: CsgOp,
    /// The first operand.
    pub left: Object<T>,
    /// The second operand.
    pub right: Object<T>,
}

impl<T: RealField + Copy + ToPrimitive> Csg<T> {
    /// Construct a new `Csg` node.
    pub const fn new(op: CsgOp, left: Object<T>, right: Object<T>) -> Self {
        Self { op, left, right }
    }

    /// Whether a hit belonging to `side` (`true` = from `left`, `false` = from `right`) at `point`
    /// should be kept as a boundary of the combined solid.
    fn qualifies(&self, side: bool, point: &Point3<T>) -> Result<bool> {
        Ok(match self.op {
            CsgOp::Union | CsgOp::Merge => {
                if side {
                    !self.right.inside(point)?
                } else {
                    !self.left.inside(point)?
                }
            }
            CsgOp::Intersection => {
                if side {
                    self.right.inside(point)?
                } else {
                    self.left.inside(point)?
                }
            }
            CsgOp::Difference => {
                if side {
                    !self.right.inside(point)?
                } else {
                    self.left.inside(point)?
                }
            }
        })
    }

    /// Intersect both children against a ray already advanced to start at parametric distance
    /// `t0`, shifting results back into the caller's original parameterization.
    fn intersect_from(&self, ray: &Ray<T>, t0: T) -> Result<(Option<Hit<T>>, Option<Hit<T>>)> {
        let origin = ray.origin + ray.direction.scale(t0);
        let shifted = Ray::new(origin, ray.direction);

        let left = self.left.intersect(&shifted)?.map(|mut hit| {
            hit.distance += t0;
            hit
        });
        let right = self.right.intersect(&shifted)?.map(|mut hit| {
            hit.distance += t0;
            hit
        });

        Ok((left, right))
    }
}

impl<T: RealField + Copy + ToPrimitive> Bounded<T> for Csg<T> {
    fn aabb(&self) -> Result<Cow<Aabb<T>>> {
        let left_aabb = self.left.aabb.clone();
        let right_aabb = self.right.aabb.clone();
        Ok(Cow::Owned(match self.op {
            CsgOp::Difference => left_aabb,
            _ => left_aabb.merge(&right_aabb),
        }))
    }
}

impl<T: RealField + Copy + ToPrimitive> Insideable<T> for Csg<T> {
    fn inside(&self, point: &Point3<T>) -> Result<bool> {
        let left_inside = self.left.inside(point)?;
        let right_inside = self.right.inside(point)?;
        Ok(match self.op {
            CsgOp::Union | CsgOp::Merge => left_inside || right_inside,
            CsgOp::Intersection => left_inside && right_inside,
            CsgOp::Difference => left_inside && !right_inside,
        })
    }
}

impl<T: RealField + Copy + ToPrimitive> Traceable<T> for Csg<T> {
    fn intersect(&self, ray: &Ray<T>) -> Result<Option<Hit<T>>> {
        const MAX_STEPS: usize = 64;
        let mut t0 = T::zero();

        for _ in 0..MAX_STEPS {
            let (left_hit, right_hit) = self.intersect_from(ray, t0)?;

            let candidate = match (left_hit, right_hit) {
                (Some(l), Some(r)) => Some(if l.distance <= r.distance { (true, l) } else { (false, r) }),
                (Some(l), None) => Some((true, l)),
                (None, Some(r)) => Some((false, r)),
                (None, None) => None,
            };

            let Some((side, hit)) = candidate else {
                return Ok(None);
            };

            let point = ray.origin + ray.direction.scale(hit.distance);
            if self.qualifies(side, &point)? {
                let normal = if side || !matches!(self.op, CsgOp::Difference) {
                    hit.interpolated_normal
                } else {
                    // A subtracted surface faces outward from the removed volume; flip it so the
                    // combined solid's normal still points away from its own interior.
                    Unit::new_unchecked(-hit.interpolated_normal.into_inner())
                };
                return Ok(Some(Hit::new(hit.distance, normal, normal)?));
            }

            // Step just past the rejected hit and keep searching.
            t0 = hit.distance + hit.distance.abs().max(T::one()) * T::default_epsilon() * T::try_from_u8(4)?;
        }

        Ok(None)
    }
}
