use serde::{Deserialize, Serialize};

use crate::burning_ship::BurningShip;
use crate::mandelbrot::Mandelbrot;
use crate::tricorn::Tricorn;
use crate::viewport::Viewport;

/// Squared bailout radius: an orbit has escaped once `|z|² >= 4`.
pub const ESCAPE_NORM_SQ: f64 = 4.0;

/// The escape time of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationResult {
    /// `|z|²` reached the bailout after `iterations` steps.
    Escaped { iterations: u32 },

    /// The iteration cap was hit without escaping; the point is taken to be
    /// inside the set.
    Bounded,
}

impl IterationResult {
    /// Raw integer form used by the classic API: `-1` for bounded points.
    pub const BOUNDED_SENTINEL: i32 = -1;

    #[inline]
    pub fn raw(self) -> i32 {
        match self {
            Self::Escaped { iterations } => i32::try_from(iterations).unwrap_or(i32::MAX),
            Self::Bounded => Self::BOUNDED_SENTINEL,
        }
    }

    #[inline]
    pub fn iterations(self) -> Option<u32> {
        match self {
            Self::Escaped { iterations } => Some(iterations),
            Self::Bounded => None,
        }
    }
}

/// An escape-time fractal variant.
///
/// Variants are stateless. Renderers are generic over `F: Fractal` so the hot
/// loop is monomorphised per variant; runtime selection goes through
/// [`FractalKind`].
pub trait Fractal {
    /// The fixed default rectangle shown on start and after a reset.
    fn initial_range(&self) -> Viewport;

    /// Iteration cap after which a point counts as bounded.
    fn max_iterations(&self) -> u32;

    /// Run the recurrence from `z = 0` with `c = x + iy`.
    fn escape_iterations(&self, x: f64, y: f64) -> IterationResult;
}

/// The closed set of fractal variants the viewer can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    #[default]
    Mandelbrot,
    Tricorn,
    BurningShip,
}

impl FractalKind {
    /// All variants, in selector order.
    pub const ALL: [Self; 3] = [Self::Mandelbrot, Self::Tricorn, Self::BurningShip];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Tricorn => "Tricorn",
            Self::BurningShip => "Burning Ship",
        }
    }

    pub fn initial_range(self) -> Viewport {
        match self {
            Self::Mandelbrot => Mandelbrot.initial_range(),
            Self::Tricorn => Tricorn.initial_range(),
            Self::BurningShip => BurningShip.initial_range(),
        }
    }

    pub fn max_iterations(self) -> u32 {
        match self {
            Self::Mandelbrot => Mandelbrot.max_iterations(),
            Self::Tricorn => Tricorn.max_iterations(),
            Self::BurningShip => BurningShip.max_iterations(),
        }
    }

    #[inline]
    pub fn escape_iterations(self, x: f64, y: f64) -> IterationResult {
        match self {
            Self::Mandelbrot => Mandelbrot.escape_iterations(x, y),
            Self::Tricorn => Tricorn.escape_iterations(x, y),
            Self::BurningShip => BurningShip.escape_iterations(x, y),
        }
    }
}

impl std::fmt::Display for FractalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
