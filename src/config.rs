//! Tunable constants for the acceleration structure and renderer.
//!
//! These mirror the defaults used throughout the crate; callers building a
//! [`crate::bvh::BvhConfig`] or [`crate::scene::Scene`] may override any of them.

use std::sync::atomic::AtomicUsize;

/// Fan-out of a PR-tree node: the number of leaves collected per priority bucket.
pub const PRTREE_FANOUT: usize = 8;
/// Number of comparators (and thus priority buckets per pseudo-PR-node): one per extremal face.
pub const PSEUDO_ARITY: usize = 6;
/// Minimum leaf count before the six per-dimension sorts are distributed across threads.
pub const PARALLEL_SORT_THRESHOLD: usize = 1024;
/// Maximum depth of a [`crate::bvh::BuilderNode`] tree before construction is aborted as malformed.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Capacity of the thread-local last-hit cache consulted before a full traversal.
pub const LAST_HIT_CACHE_SIZE: usize = 32;

/// General-purpose epsilon used for self-intersection avoidance and transparency thresholds.
pub const EPSILON: f64 = 1.0e-10;
/// Multiple of [`EPSILON`] used to nudge shadow-ray origins off the surface they left.
pub const SHADOW_RAY_EPSILON_SCALE: f64 = 1000.0;

/// Default recursion limit for the shading engine.
pub const DEFAULT_RECLIMIT: u32 = 5;
/// Default adaptive depth control bailout intensity (matches `1/255`).
pub const DEFAULT_ADC_BAILOUT: f64 = 1.0 / 255.0;

/// Default number of worker threads for a render driver, when not otherwise specified.
pub const DEFAULT_RENDER_THREADS: usize = 4;

/// Process-wide count of live accelerated objects, maintained only in debug builds.
///
/// Mirrors the single C global the original library used to sanity-check that every allocated
/// node is eventually freed; in Rust, ownership already guarantees that, so this is kept purely
/// as a diagnostic counter (see [`crate::object::Object::new`] and
/// [`crate::bvh::BuilderNode::new_leaf`]).
#[cfg(debug_assertions)]
pub static DEBUG_ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
