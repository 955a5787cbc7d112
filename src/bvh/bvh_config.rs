//! Bounding Volume Hierarchy configuration structure.

use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_MAX_DEPTH, PARALLEL_SORT_THRESHOLD, PRTREE_FANOUT},
    error::{BvhConfigError, Result},
};

/// Configuration structure for constructing a Bounding Volume Hierarchy (BVH).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BvhConfig {
    /// Fan-out of a PR-tree node: the number of leaves collected per priority bucket.
    pub fanout: usize,
    /// Minimum leaf count before the six per-dimension sorts are distributed across threads.
    pub parallel_sort_threshold: usize,
    /// Maximum recursion depth of the builder before remaining entries are bundled as-is.
    pub max_depth: usize,
}

impl BvhConfig {
    /// Construct a new `BvhConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `fanout < 2`, `parallel_sort_threshold == 0`, or `max_depth == 0`.
    pub fn new(fanout: usize, parallel_sort_threshold: usize, max_depth: usize) -> Result<Self> {
        if fanout < 2 {
            return Err(BvhConfigError::InvalidFanout { fanout }.into());
        }
        if parallel_sort_threshold == 0 {
            return Err(BvhConfigError::InvalidParallelSortThreshold {
                threshold: parallel_sort_threshold,
            }
            .into());
        }
        if max_depth == 0 {
            return Err(BvhConfigError::InvalidMaxDepth { depth: max_depth }.into());
        }

        Ok(Self {
            fanout,
            parallel_sort_threshold,
            max_depth,
        })
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            fanout: PRTREE_FANOUT,
            parallel_sort_threshold: PARALLEL_SORT_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
