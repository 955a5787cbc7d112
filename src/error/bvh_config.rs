use thiserror::Error;

/// Specific error type for `BvhConfig` validation.
#[derive(Error, Debug, Clone, Copy)]
pub enum BvhConfigError {
    #[error("PR-tree fanout must be at least 2, got: {fanout}")]
    InvalidFanout { fanout: usize },

    #[error("Parallel sort threshold must be positive, got: {threshold}")]
    InvalidParallelSortThreshold { threshold: usize },

    #[error("Max depth must be positive, got: {depth}")]
    InvalidMaxDepth { depth: usize },
}
