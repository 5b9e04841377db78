use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid display extent: {0} (must be > 0)")]
    InvalidDisplayExtent(u32),

    #[error("row {row} failed: {reason}")]
    RowComputation { row: u32, reason: String },

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Core(#[from] fractex_core::CoreError),
}
