pub mod burning_ship;
pub mod complex;
pub mod error;
pub mod fractal;
pub mod mandelbrot;
pub mod tricorn;
pub mod viewport;

// Re-export primary types for convenience.
pub use burning_ship::BurningShip;
pub use complex::Complex;
pub use error::CoreError;
pub use fractal::{Fractal, FractalKind, IterationResult, ESCAPE_NORM_SQ};
pub use mandelbrot::Mandelbrot;
pub use tricorn::Tricorn;
pub use viewport::{map_coordinate, unmap_coordinate, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
