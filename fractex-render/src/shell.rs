use crate::color::Rgb;

/// The boundary between the render core and whatever displays its output.
///
/// Row tasks call into the shell from worker threads, so implementations must
/// be `Send + Sync`. Each row task writes a disjoint row; the scheduler never
/// writes the same pixel concurrently from two tasks of the current pass.
///
/// Callbacks should not panic. A panic is caught and the row counted as
/// failed, but the shell may be left with a partially written row.
pub trait HostShell: Send + Sync {
    /// Store one pixel of the raster.
    fn write_pixel(&self, x: u32, y: u32, color: Rgb);

    /// The given region has been fully written and can be repainted.
    fn notify_region_ready(&self, _x: u32, _y: u32, _width: u32, _height: u32) {}

    /// Enable or disable viewport-mutating input (buttons, clicks).
    fn set_input_enabled(&self, _enabled: bool) {}
}
