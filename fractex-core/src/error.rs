use thiserror::Error;

/// Errors originating from the core fractal engine.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid zoom factor: {0} (must be positive and finite)")]
    InvalidZoomFactor(f64),
}
