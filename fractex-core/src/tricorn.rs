use crate::fractal::{Fractal, IterationResult, ESCAPE_NORM_SQ};
use crate::viewport::Viewport;

/// The Tricorn (Mandelbar): `z ← conj(z)² + c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tricorn;

impl Tricorn {
    pub const MAX_ITERATIONS: u32 = 2000;
    pub const INITIAL_RANGE: Viewport = Viewport::from_const(-2.0, -2.0, 4.0, 4.0);
}

impl Fractal for Tricorn {
    fn initial_range(&self) -> Viewport {
        Self::INITIAL_RANGE
    }

    fn max_iterations(&self) -> u32 {
        Self::MAX_ITERATIONS
    }

    fn escape_iterations(&self, x: f64, y: f64) -> IterationResult {
        let mut iteration = 0;
        let (mut zr, mut zi) = (0.0_f64, 0.0_f64);
        let (mut zr2, mut zi2) = (0.0_f64, 0.0_f64);

        while iteration < Self::MAX_ITERATIONS && zr2 + zi2 < ESCAPE_NORM_SQ {
            // Conjugation flips the sign of the cross term.
            zi = -2.0 * zr * zi + y;
            zr = zr2 - zi2 + x;
            zr2 = zr * zr;
            zi2 = zi * zi;
            iteration += 1;
        }

        if iteration == Self::MAX_ITERATIONS {
            IterationResult::Bounded
        } else {
            IterationResult::Escaped {
                iterations: iteration,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mandelbrot::Mandelbrot;

    #[test]
    fn origin_is_bounded() {
        assert_eq!(Tricorn.escape_iterations(0.0, 0.0), IterationResult::Bounded);
    }

    #[test]
    fn real_axis_matches_mandelbrot() {
        // With y = 0 the imaginary part stays zero, so conjugation is a no-op.
        for x in [-1.9, -1.0, -0.5, 0.2, 0.3, 1.0] {
            assert_eq!(
                Tricorn.escape_iterations(x, 0.0),
                Mandelbrot.escape_iterations(x, 0.0),
                "x = {x}"
            );
        }
    }

    #[test]
    fn symmetric_about_real_axis() {
        for &(x, y) in &[(0.3, 0.4), (-0.8, 0.9), (0.1, 1.1)] {
            assert_eq!(Tricorn.escape_iterations(x, y), Tricorn.escape_iterations(x, -y));
        }
    }

    #[test]
    fn default_range_is_symmetric() {
        let r = Tricorn.initial_range();
        assert_eq!((r.x(), r.y(), r.width(), r.height()), (-2.0, -2.0, 4.0, 4.0));
    }
}
