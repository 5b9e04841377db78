use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

/// Map a pixel index onto a complex-plane axis.
///
/// Computes `range_min + (pixel / display_extent) · (range_max − range_min)`.
/// Indices outside `0..display_extent` extrapolate linearly; that is not an
/// error. `display_extent` must be non-zero.
#[inline]
pub fn map_coordinate(range_min: f64, range_max: f64, display_extent: u32, pixel: u32) -> f64 {
    debug_assert!(display_extent > 0, "display extent must be non-zero");
    range_min + (pixel as f64 / display_extent as f64) * (range_max - range_min)
}

/// Inverse of [`map_coordinate`]: the (fractional) pixel index of `value`.
#[inline]
pub fn unmap_coordinate(range_min: f64, range_max: f64, display_extent: u32, value: f64) -> f64 {
    (value - range_min) / (range_max - range_min) * display_extent as f64
}

/// The visible rectangle of the complex plane.
///
/// `(x, y)` is the corner mapped to pixel `(0, 0)`; `width` and `height` are
/// the extents in complex-plane units. Both extents are always positive and
/// every field is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    /// Create a viewport, rejecting non-finite values and non-positive extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> crate::Result<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("origin must be finite, got ({x}, {y})"),
            });
        }
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: format!("extent must be positive and finite, got {width}×{height}"),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Build a fixed default range. Only for literals known to be valid.
    pub(crate) const fn from_const(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Right edge, `x + width`.
    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Complex {
        Complex::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Map a pixel of a square `extent × extent` display to the complex plane.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32, extent: u32) -> Complex {
        Complex::new(
            map_coordinate(self.x, self.x_max(), extent, px),
            map_coordinate(self.y, self.y_max(), extent, py),
        )
    }

    /// Map a complex-plane point back to fractional pixel coordinates.
    pub fn complex_to_pixel(&self, point: Complex, extent: u32) -> (f64, f64) {
        (
            unmap_coordinate(self.x, self.x_max(), extent, point.re),
            unmap_coordinate(self.y, self.y_max(), extent, point.im),
        )
    }

    /// A copy centred on `(center_x, center_y)` with both extents multiplied
    /// by `factor`. Factors below 1 zoom in.
    pub fn recentered(&self, center_x: f64, center_y: f64, factor: f64) -> crate::Result<Self> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(CoreError::InvalidZoomFactor(factor));
        }
        if !Complex::new(center_x, center_y).is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("zoom centre must be finite, got ({center_x}, {center_y})"),
            });
        }
        let width = self.width * factor;
        let height = self.height * factor;
        Self::new(
            center_x - width / 2.0,
            center_y - height / 2.0,
            width,
            height,
        )
    }

    /// Recentre on a point and scale in place. On error `self` is unchanged.
    pub fn recenter_and_zoom(
        &mut self,
        center_x: f64,
        center_y: f64,
        factor: f64,
    ) -> crate::Result<()> {
        *self = self.recentered(center_x, center_y, factor)?;
        debug!(
            x = self.x,
            y = self.y,
            width = self.width,
            height = self.height,
            "Viewport recentred"
        );
        Ok(())
    }
}
