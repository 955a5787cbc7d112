//! Mutable n-ary construction node used only while building a `Bvh`.

use nalgebra::RealField;

#[cfg(debug_assertions)]
use std::sync::atomic::Ordering;

use crate::geometry::Aabb;
#[cfg(debug_assertions)]
use crate::config::DEBUG_ALLOCATIONS;

/// Transient node produced by [`crate::bvh::PrtBuilder`], consumed by flattening into a
/// [`crate::bvh::FlatNode`] array. Owns its children; dropped wholesale once flattening completes.
#[derive(Debug)]
pub enum BuilderNode<T: RealField + Copy> {
    /// A single shape, identified by its index into the caller's shape slice.
    Leaf { aabb: Aabb<T>, object: usize },
    /// An interior node bounding the union of its children.
    Interior { aabb: Aabb<T>, children: Vec<BuilderNode<T>> },
}

impl<T: RealField + Copy> BuilderNode<T> {
    /// Construct a new leaf node wrapping a single shape.
    pub fn new_leaf(aabb: Aabb<T>, object: usize) -> Self {
        #[cfg(debug_assertions)]
        DEBUG_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);

        Self::Leaf { aabb, object }
    }

    /// Construct a new interior node from a non-empty set of children, unioning their `Aabb`s.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new_interior(children: Vec<Self>) -> Self {
        debug_assert!(!children.is_empty(), "interior node must have at least one child");

        #[cfg(debug_assertions)]
        DEBUG_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);

        let mut children = children;
        let mut aabb = children[0].aabb().clone();
        for child in &children[1..] {
            aabb = aabb.merge(child.aabb());
        }
        children.shrink_to_fit();

        Self::Interior { aabb, children }
    }

    /// The bounding box of this node (leaf shape bound, or union of children).
    pub const fn aabb(&self) -> &Aabb<T> {
        match self {
            Self::Leaf { aabb, .. } | Self::Interior { aabb, .. } => aabb,
        }
    }
}
