use crate::fractal::{Fractal, IterationResult, ESCAPE_NORM_SQ};
use crate::viewport::Viewport;

/// The Burning Ship: `z ← (|Re z| + i·|Im z|)² + c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BurningShip;

impl BurningShip {
    pub const MAX_ITERATIONS: u32 = 2000;
    pub const INITIAL_RANGE: Viewport = Viewport::from_const(-2.0, -2.5, 4.0, 4.0);
}

impl Fractal for BurningShip {
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
            zi = 2.0 * (zr * zi).abs() + y;
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
