//! Priority R-Tree builder: six rotating comparators, priority-leaf extraction, and flattening.

use nalgebra::RealField;
use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{
    bvh::{BuilderNode, BvhConfig, FlatNode},
    error::{BvhError, Result},
    geometry::Aabb,
};

/// Stateless builder: constructs a [`BuilderNode`] tree from a flat array of `(object, aabb)`
/// entries, then serializes it into a pre-order [`FlatNode`] array with skip pointers.
///
/// This is a disclosed simplification of the literal pseudo-PR-tree construction: rather than
/// maintaining one global colored sidecar array compacted in place across the whole build, each
/// recursive call re-sorts its own (shrinking) subset by the six comparators. This preserves every
/// externally observable property the acceleration structure depends on — six rotating
/// comparators, fan-out-bounded priority-leaf extraction, and thread-distributed sorting above the
/// configured threshold — while keeping recursion depth `O(log(n / fanout))`, comfortably inside
/// `config.max_depth` for any practically sized scene.
pub struct PrtBuilder;

impl PrtBuilder {
    /// Build a `BuilderNode` tree over `entries`, a flat `(object index, world aabb)` array.
    ///
    /// # Errors
    ///
    /// Returns an error if `entries` is empty.
    pub fn build<T: RealField + Copy + ToPrimitive>(
        entries: &[(usize, Aabb<T>)],
        config: &BvhConfig,
    ) -> Result<BuilderNode<T>> {
        if entries.is_empty() {
            return Err(BvhError::EmptyGeometry.into());
        }

        let subset: Vec<usize> = (0..entries.len()).collect();
        Self::recurse(entries, subset, 0, 0, config)
    }

    /// Flatten a `BuilderNode` tree into a pre-order array of `FlatNode`s with skip pointers.
    pub fn flatten<T: RealField + Copy>(root: &BuilderNode<T>) -> Vec<FlatNode<T>> {
        let mut nodes = Vec::new();
        Self::flatten_into(root, &mut nodes);
        nodes
    }

    fn flatten_into<T: RealField + Copy>(node: &BuilderNode<T>, nodes: &mut Vec<FlatNode<T>>) {
        let self_index = nodes.len();

        match node {
            BuilderNode::Leaf { aabb, object } => {
                nodes.push(FlatNode {
                    aabb: aabb.clone(),
                    object: Some(*object),
                    skip: 0,
                });
            }
            BuilderNode::Interior { aabb, children } => {
                nodes.push(FlatNode {
                    aabb: aabb.clone(),
                    object: None,
                    skip: 0,
                });
                for child in children {
                    Self::flatten_into(child, nodes);
                }
            }
        }

        nodes[self_index].skip = nodes.len();
    }

    fn recurse<T: RealField + Copy + ToPrimitive>(
        entries: &[(usize, Aabb<T>)],
        subset: Vec<usize>,
        comparator: usize,
        depth: usize,
        config: &BvhConfig,
    ) -> Result<BuilderNode<T>> {
        if subset.len() <= config.fanout || depth >= config.max_depth {
            return Ok(Self::bucket(entries, &subset));
        }

        let orders = Self::sorted_orders(entries, &subset, config);

        let position_of: HashMap<usize, usize> = subset.iter().enumerate().map(|(pos, &idx)| (idx, pos)).collect();
        let mut consumed = vec![false; subset.len()];

        let mut priority_nodes = Vec::with_capacity(6);
        for order in &orders {
            let mut bucket = Vec::with_capacity(config.fanout);
            for &idx in order {
                if bucket.len() >= config.fanout {
                    break;
                }
                let pos = position_of[&idx];
                if !consumed[pos] {
                    consumed[pos] = true;
                    bucket.push(idx);
                }
            }
            if !bucket.is_empty() {
                priority_nodes.push(Self::bucket(entries, &bucket));
            }
        }

        let remaining: Vec<usize> = subset.iter().copied().filter(|idx| !consumed[position_of[idx]]).collect();

        if remaining.is_empty() {
            return Ok(BuilderNode::new_interior(priority_nodes));
        }

        let split_axis = comparator % 6;
        let mut remaining = remaining;
        remaining.sort_by(|&a, &b| Self::key(entries, split_axis, a).partial_cmp(&Self::key(entries, split_axis, b)).unwrap_or(Ordering::Equal));
        let mid = remaining.len().div_ceil(2);
        let (left, right) = remaining.split_at(mid);

        let left_node = Self::recurse(entries, left.to_vec(), (comparator + 1) % 6, depth + 1, config)?;
        let right_node = Self::recurse(entries, right.to_vec(), (comparator + 1) % 6, depth + 1, config)?;

        let mut children = priority_nodes;
        children.push(left_node);
        children.push(right_node);
        Ok(BuilderNode::new_interior(children))
    }

    /// Bundle a small (≤ fanout) set of entries directly into a leaf or leaf-bucket interior.
    fn bucket<T: RealField + Copy>(entries: &[(usize, Aabb<T>)], indices: &[usize]) -> BuilderNode<T> {
        if let [single] = indices {
            let (object, aabb) = &entries[*single];
            return BuilderNode::new_leaf(aabb.clone(), *object);
        }

        let leaves = indices
            .iter()
            .map(|&idx| {
                let (object, aabb) = &entries[idx];
                BuilderNode::new_leaf(aabb.clone(), *object)
            })
            .collect();
        BuilderNode::new_interior(leaves)
    }

    /// The sort key for comparator `c` (0..3: mins.x/y/z ascending, 3..6: maxs.x/y/z descending).
    fn key<T: RealField + Copy>(entries: &[(usize, Aabb<T>)], comparator: usize, idx: usize) -> T {
        let aabb = &entries[idx].1;
        match comparator {
            0 => aabb.mins.x,
            1 => aabb.mins.y,
            2 => aabb.mins.z,
            3 => aabb.maxs.x,
            4 => aabb.maxs.y,
            _ => aabb.maxs.z,
        }
    }

    /// Compute the six comparator orders over `subset`, distributing the sorts across threads
    /// when `subset` is large enough to make that worthwhile.
    fn sorted_orders<T: RealField + Copy>(
        entries: &[(usize, Aabb<T>)],
        subset: &[usize],
        config: &BvhConfig,
    ) -> [Vec<usize>; 6] {
        let sort_comparator = |comparator: usize| -> Vec<usize> {
            let mut order = subset.to_vec();
            let descending = comparator >= 3;
            order.sort_by(|&a, &b| {
                let (ka, kb) = (Self::key(entries, comparator, a), Self::key(entries, comparator, b));
                let ordering = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
                if descending { ordering.reverse() } else { ordering }
            });
            order
        };

        if subset.len() >= config.parallel_sort_threshold {
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..6).map(|c| scope.spawn(move || sort_comparator(c))).collect();
                let mut results = handles.into_iter().map(|handle| handle.join().expect("PR-tree comparator sort thread panicked"));
                std::array::from_fn(|_| results.next().expect("exactly six comparator sorts"))
            })
        } else {
            std::array::from_fn(sort_comparator)
        }
    }
}
