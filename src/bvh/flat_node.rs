//! Pre-order flattened representation of a built BVH.

use nalgebra::RealField;

use crate::geometry::Aabb;

/// One entry of the pre-order flattened array produced by [`crate::bvh::PrtBuilder::flatten`].
///
/// Traversal rule: if `aabb` rejects the query (ray miss, or point not contained), jump to
/// `skip`; an interior node whose children all pass falls through one index at a time. `skip` is
/// always either the index of the next sibling subtree, or one past the end of the array.
#[derive(Debug, Clone)]
pub struct FlatNode<T: RealField + Copy> {
    /// Bounding box of this node (leaf shape bound, or union of children).
    pub aabb: Aabb<T>,
    /// Index into the caller's shape slice, set iff this is a leaf.
    pub object: Option<usize>,
    /// Index of the array entry immediately following this node's subtree.
    pub skip: usize,
}
