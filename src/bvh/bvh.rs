//! Flattened Bounding Volume Hierarchy: pre-order array, unbounded side list, last-hit cache.

use nalgebra::{Point3, RealField};
use num_traits::ToPrimitive;
use std::{borrow::Cow, cell::RefCell, collections::HashMap};

use crate::{
    bvh::{BuilderNode, BvhConfig, FlatNode, PrtBuilder},
    config::LAST_HIT_CACHE_SIZE,
    error::{BvhError, Result},
    geometry::Aabb,
    rt::{Hit, Ray},
    traits::{Bounded, FallibleNumeric, Insideable, Traceable},
};

/// One thread's view of the last-hit cache for one [`Bvh`]: the sequence of objects found during
/// the previous ray's traversal, replayed in order across the recursion chain of the current ray.
#[derive(Clone, Copy)]
struct CacheEntry {
    objects: [Option<usize>; LAST_HIT_CACHE_SIZE],
    i: usize,
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            objects: [None; LAST_HIT_CACHE_SIZE],
            i: 0,
        }
    }
}

thread_local! {
    /// Per-BVH, per-thread last-hit cache, keyed by the owning `Bvh`'s address (a worker thread may
    /// hold distinct caches for the scene's `Bvh` and each `Mesh`'s internal `Bvh` simultaneously).
    static LAST_HIT_CACHE: RefCell<HashMap<usize, CacheEntry>> = RefCell::new(HashMap::new());
}

/// Bounding Volume Hierarchy (BVH) structure used to accelerate ray tracing by reducing the number
/// of intersection tests required: a pre-order flattened array of [`FlatNode`]s with skip
/// pointers, plus a side list of shapes whose `Aabb` is unbounded (e.g. infinite planes), which are
/// tested against every query directly since they cannot be meaningfully bounded by the index.
#[derive(Debug)]
pub struct Bvh<T: RealField + Copy> {
    /// Pre-order flattened nodes.
    nodes: Vec<FlatNode<T>>,
    /// Indices of shapes with an unbounded `Aabb`, excluded from the spatial index.
    unbounded: Vec<usize>,
    /// Depth of the builder tree this array was flattened from.
    depth: usize,
}

impl<T: RealField + Copy + ToPrimitive> Bvh<T> {
    /// Construct a new `Bvh` instance from a collection of `Bounded` shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if `shapes` is empty, or if any shape's `Aabb` cannot be computed.
    pub fn new<B: Bounded<T>>(config: &BvhConfig, shapes: &[B]) -> Result<Self> {
        if shapes.is_empty() {
            return Err(BvhError::EmptyGeometry.into());
        }

        let mut bounded = Vec::new();
        let mut unbounded = Vec::new();
        for (index, shape) in shapes.iter().enumerate() {
            let aabb = shape.aabb()?.into_owned();
            if aabb.is_infinite() {
                unbounded.push(index);
            } else {
                bounded.push((index, aabb));
            }
        }

        if bounded.is_empty() {
            return Ok(Self {
                nodes: Vec::new(),
                unbounded,
                depth: 0,
            });
        }

        let root = PrtBuilder::build(&bounded, config)?;
        let depth = Self::builder_depth(&root);
        let nodes = PrtBuilder::flatten(&root);

        Ok(Self { nodes, unbounded, depth })
    }

    /// Construct a new `Bvh` instance directly from already-flattened parts, for tests and
    /// serialization round-trips.
    ///
    /// # Errors
    ///
    /// Returns an error if both `nodes` and `unbounded` are empty.
    pub fn construct_directly(nodes: Vec<FlatNode<T>>, unbounded: Vec<usize>, depth: usize) -> Result<Self> {
        if nodes.is_empty() && unbounded.is_empty() {
            return Err(BvhError::EmptyGeometry.into());
        }
        Ok(Self { nodes, unbounded, depth })
    }

    /// Get the depth of the builder tree this `Bvh` was flattened from.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The flattened node count, including interior and leaf nodes (not the unbounded side list).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Test for intersections between a `Ray` and geometries in the `Bvh`, without consulting the
    /// last-hit cache across calls (each call behaves as though it is the first ray of a pixel).
    ///
    /// Used by aggregates (e.g. [`crate::geometry::Mesh`]) whose internal `Bvh` is queried once
    /// per enclosing object intersection rather than once per recursion chain.
    ///
    /// # Errors
    ///
    /// Returns an error if any candidate shape's intersection test fails, or if `T`'s numeric
    /// bounds are unavailable.
    pub fn closest_intersection<B>(&self, ray: &Ray<T>, shapes: &[B]) -> Result<Option<(usize, Hit<T>)>>
    where
        B: Bounded<T> + Traceable<T>,
    {
        self.closest_intersection_cached(ray, shapes, true)
    }

    /// Test for the closest intersection between a `Ray` and geometries in the `Bvh`, consulting
    /// (and updating) the thread-local last-hit cache.
    ///
    /// `reset` marks the first ray of a new camera pixel: the cache's replay cursor rewinds to 0,
    /// discarding the previous pixel's recursion-chain sequence. Subsequent calls for the same
    /// pixel's reflection/refraction/shadow rays advance the cursor and try the object recorded at
    /// the same position in the previous ray's sequence before falling back to full traversal.
    ///
    /// # Errors
    ///
    /// Returns an error if any candidate shape's intersection test fails, or if `T`'s numeric
    /// bounds are unavailable.
    pub fn closest_intersection_cached<B>(&self, ray: &Ray<T>, shapes: &[B], reset: bool) -> Result<Option<(usize, Hit<T>)>>
    where
        B: Bounded<T> + Traceable<T>,
    {
        let mut best: Option<(usize, Hit<T>)> = None;
        let mut best_distance = T::try_max_value()?;

        for &index in &self.unbounded {
            if let Some(hit) = shapes[index].intersect(ray)? {
                if hit.distance < best_distance {
                    best_distance = hit.distance;
                    best = Some((index, hit));
                }
            }
        }

        let cache_key = self.cache_key();
        let (slot, cached) = LAST_HIT_CACHE.with(|cache| {
            let mut cache = cache.borrow_mut();
            let entry = cache.entry(cache_key).or_default();
            if reset {
                entry.i = 0;
            }
            let slot = entry.i;
            let cached = if slot < LAST_HIT_CACHE_SIZE { entry.objects[slot] } else { None };
            (slot, cached)
        });

        // Try the previous ray's cached hit (at this position in the recursion chain) first: if
        // it still intersects, it tightens `best_distance` before traversal begins, letting the
        // slab test prune subtrees that cannot possibly beat it, and the traversal below skips
        // re-testing the same object once it reaches it.
        if let Some(index) = cached {
            if index < shapes.len() {
                if let Some(hit) = shapes[index].intersect(ray)? {
                    if hit.distance < best_distance {
                        best_distance = hit.distance;
                        best = Some((index, hit));
                    }
                }
            }
        }

        let mut i = 0;
        while i < self.nodes.len() {
            let node = &self.nodes[i];
            let Some(entry_distance) = node.aabb.intersect_distance(ray) else {
                i = node.skip;
                continue;
            };
            if entry_distance >= best_distance {
                i = node.skip;
                continue;
            }

            if let Some(object) = node.object {
                if Some(object) != cached {
                    if let Some(hit) = shapes[object].intersect(ray)? {
                        if hit.distance < best_distance {
                            best_distance = hit.distance;
                            best = Some((object, hit));
                        }
                    }
                }
            }
            i += 1;
        }

        if slot < LAST_HIT_CACHE_SIZE {
            LAST_HIT_CACHE.with(|cache| {
                let mut cache = cache.borrow_mut();
                let entry = cache.entry(cache_key).or_default();
                entry.objects[slot] = best.as_ref().map(|(index, _)| *index);
                entry.i = slot + 1;
            });
        }

        Ok(best)
    }

    /// Test if a `Ray` intersects any geometry in the `Bvh` within `max_distance` (shadow ray
    /// optimization: stops at the first qualifying hit rather than finding the closest).
    ///
    /// # Errors
    ///
    /// Returns an error if any candidate shape's intersection test fails.
    pub fn intersect_any<B>(&self, ray: &Ray<T>, shapes: &[B], max_distance: T) -> Result<bool>
    where
        B: Bounded<T> + Traceable<T>,
    {
        for &index in &self.unbounded {
            if shapes[index].intersect_any(ray, max_distance)? {
                return Ok(true);
            }
        }

        let mut i = 0;
        while i < self.nodes.len() {
            let node = &self.nodes[i];
            let Some(entry_distance) = node.aabb.intersect_distance(ray) else {
                i = node.skip;
                continue;
            };
            if entry_distance > max_distance {
                i = node.skip;
                continue;
            }

            if let Some(object) = node.object {
                if shapes[object].intersect_any(ray, max_distance)? {
                    return Ok(true);
                }
            }
            i += 1;
        }

        Ok(false)
    }

    /// Test whether `point` lies within any shape contained in the `Bvh`.
    ///
    /// # Errors
    ///
    /// Returns an error if any candidate shape's containment test fails.
    pub fn contains<B>(&self, point: &Point3<T>, shapes: &[B]) -> Result<bool>
    where
        B: Bounded<T> + Insideable<T>,
    {
        for &index in &self.unbounded {
            if shapes[index].inside(point)? {
                return Ok(true);
            }
        }

        let mut i = 0;
        while i < self.nodes.len() {
            let node = &self.nodes[i];
            if !node.aabb.contains_point(point) {
                i = node.skip;
                continue;
            }

            if let Some(object) = node.object {
                if shapes[object].inside(point)? {
                    return Ok(true);
                }
            }
            i += 1;
        }

        Ok(false)
    }

    fn cache_key(&self) -> usize {
        std::ptr::from_ref(self) as usize
    }

    fn builder_depth(node: &BuilderNode<T>) -> usize {
        match node {
            BuilderNode::Leaf { .. } => 1,
            BuilderNode::Interior { children, .. } => 1 + children.iter().map(Self::builder_depth).max().unwrap_or(0),
        }
    }
}

impl<T: RealField + Copy + ToPrimitive> Bounded<T> for Bvh<T> {
    fn aabb(&self) -> Result<Cow<Aabb<T>>> {
        if !self.unbounded.is_empty() {
            return Ok(Cow::Owned(Aabb::infinite()?));
        }
        self.nodes.first().map_or_else(|| Err(BvhError::EmptyNodes.into()), |root| Ok(Cow::Owned(root.aabb.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Unit, Vector3};

    use crate::geometry::Sphere;

    fn ray(origin: [f64; 3], direction: [f64; 3]) -> Ray<f64> {
        Ray::new(
            Point3::new(origin[0], origin[1], origin[2]),
            Unit::new_normalize(Vector3::new(direction[0], direction[1], direction[2])),
        )
    }

    #[test]
    fn closest_intersection_matches_linear_scan() {
        let spheres: Vec<Sphere<f64>> = (0..40)
            .map(|i| {
                let x = f64::from(i % 5) - 2.0;
                let y = f64::from((i / 5) % 4) - 1.5;
                let z = f64::from(i / 20);
                Sphere::new(Point3::new(x, y, z), 0.3)
            })
            .collect();

        let config = BvhConfig::new(4, 1024, 32).unwrap();
        let bvh = Bvh::new(&config, &spheres).unwrap();

        let query = ray([-2.0, -1.5, -5.0], [0.0, 0.0, 1.0]);

        let accelerated = bvh.closest_intersection(&query, &spheres).unwrap();

        let mut linear: Option<(usize, Hit<f64>)> = None;
        for (index, sphere) in spheres.iter().enumerate() {
            if let Some(hit) = sphere.intersect(&query).unwrap() {
                if linear.as_ref().is_none_or(|(_, best)| hit.distance < best.distance) {
                    linear = Some((index, hit));
                }
            }
        }

        match (accelerated, linear) {
            (Some((ai, ah)), Some((li, lh))) => {
                assert_eq!(ai, li);
                assert!((ah.distance - lh.distance).abs() < 1e-9);
            }
            (None, None) => {}
            other => panic!("accelerated/linear mismatch: {other:?}"),
        }
    }

    #[test]
    fn contains_matches_inside_fn() {
        use crate::traits::Insideable;

        let spheres = vec![
            Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0),
            Sphere::new(Point3::new(3.0, 0.0, 0.0), 1.0),
        ];
        let config = BvhConfig::default();
        let bvh = Bvh::new(&config, &spheres).unwrap();

        assert!(bvh.contains(&Point3::new(0.1, 0.0, 0.0), &spheres).unwrap());
        assert!(bvh.contains(&Point3::new(3.0, 0.0, 0.0), &spheres).unwrap());
        assert!(!bvh.contains(&Point3::new(10.0, 0.0, 0.0), &spheres).unwrap());
        assert!(spheres[0].inside(&Point3::new(0.1, 0.0, 0.0)).unwrap());
    }
}
