use thiserror::Error;

/// Specific error type for the render driver and its `Future` handle.
#[derive(Error, Debug, Clone, Copy)]
pub enum RenderError {
    #[error("render was cancelled before completion")]
    Cancelled,

    #[error("a worker thread panicked during rendering")]
    WorkerPanicked,

    #[error("nthreads must be at least 1, got: {nthreads}")]
    InvalidThreadCount { nthreads: usize },

    #[error("recursion limit must be at least 1, got: {reclimit}")]
    InvalidReclimit { reclimit: u32 },

    #[error("adc_bailout must be in (0, 1], got: {adc_bailout}")]
    InvalidAdcBailout { adc_bailout: f64 },

    #[error("a Future was polled or joined after being dropped by its render thread")]
    FutureAbandoned,

    #[error("shading engine produced a NaN color channel at pixel ({row}, {col})")]
    NanColorWritten { row: usize, col: usize },

    #[error("shading engine produced a non-finite surface normal at pixel ({row}, {col})")]
    InfiniteNormal { row: usize, col: usize },
}
