use fractex_core::{
    map_coordinate, BurningShip, Fractal, FractalKind, Mandelbrot, Tricorn, Viewport,
};

use crate::color::{iterations_to_color, Rgb};
use crate::error::RenderError;

/// Compute the colors of one row of a square `extent × extent` display.
///
/// The imaginary coordinate is mapped once for the whole row. A coordinate
/// that is not finite (an overflowing viewport, for instance) fails the row.
pub fn render_row<F: Fractal>(
    fractal: &F,
    viewport: &Viewport,
    extent: u32,
    row: u32,
) -> crate::Result<Vec<Rgb>> {
    let (x_min, x_max) = (viewport.x(), viewport.x_max());
    let y = map_coordinate(viewport.y(), viewport.y_max(), extent, row);
    if !y.is_finite() {
        return Err(RenderError::RowComputation {
            row,
            reason: format!("imaginary coordinate is not finite ({y})"),
        });
    }

    let mut colors = Vec::with_capacity(extent as usize);
    for px in 0..extent {
        let x = map_coordinate(x_min, x_max, extent, px);
        if !x.is_finite() {
            return Err(RenderError::RowComputation {
                row,
                reason: format!("real coordinate of column {px} is not finite ({x})"),
            });
        }
        colors.push(iterations_to_color(fractal.escape_iterations(x, y)));
    }
    Ok(colors)
}

/// Dispatch [`render_row`] on the selected variant.
pub fn render_row_for(
    kind: FractalKind,
    viewport: &Viewport,
    extent: u32,
    row: u32,
) -> crate::Result<Vec<Rgb>> {
    match kind {
        FractalKind::Mandelbrot => render_row(&Mandelbrot, viewport, extent, row),
        FractalKind::Tricorn => render_row(&Tricorn, viewport, extent, row),
        FractalKind::BurningShip => render_row(&BurningShip, viewport, extent, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_has_extent_pixels() {
        let vp = FractalKind::Mandelbrot.initial_range();
        let row = render_row_for(FractalKind::Mandelbrot, &vp, 32, 5).unwrap();
        assert_eq!(row.len(), 32);
    }

    #[test]
    fn middle_row_of_mandelbrot_has_bounded_points() {
        let vp = FractalKind::Mandelbrot.initial_range();
        // Row 2 of 4 sits on the real axis.
        let row = render_row(&Mandelbrot, &vp, 4, 2).unwrap();
        assert_eq!(
            row,
            vec![Rgb(0x3B00FF), Rgb::BACKGROUND, Rgb::BACKGROUND, Rgb::BACKGROUND]
        );
    }

    #[test]
    fn overflowing_viewport_fails_the_row() {
        let vp = Viewport::new(f64::MAX, 0.0, f64::MAX, 1.0).unwrap();
        let err = render_row(&Tricorn, &vp, 8, 0).unwrap_err();
        assert!(matches!(err, RenderError::RowComputation { row: 0, .. }));
    }

    #[test]
    fn dispatch_matches_direct_call() {
        let vp = FractalKind::BurningShip.initial_range();
        assert_eq!(
            render_row_for(FractalKind::BurningShip, &vp, 16, 7).unwrap(),
            render_row(&BurningShip, &vp, 16, 7).unwrap()
        );
    }
}
