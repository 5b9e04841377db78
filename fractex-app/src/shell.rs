//! Host shell backed by an egui context.

use std::sync::atomic::{AtomicBool, Ordering};

use eframe::egui;

use fractex_render::{HostShell, Raster, Rgb};

/// Receives pixels from row workers and wakes the UI thread.
///
/// Workers only touch atomics; the UI thread uploads the raster to a
/// texture when [`take_dirty`](Self::take_dirty) reports new pixels.
pub struct EguiShell {
    raster: Raster,
    ctx: egui::Context,
    input_enabled: AtomicBool,
    dirty: AtomicBool,
}

impl EguiShell {
    pub fn new(ctx: egui::Context, size: u32) -> Self {
        Self {
            raster: Raster::new(size),
            ctx,
            input_enabled: AtomicBool::new(true),
            dirty: AtomicBool::new(true),
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.load(Ordering::Acquire)
    }

    /// Clear the canvas to background before a new pass.
    pub fn clear(&self) {
        self.raster.clear();
        self.dirty.store(true, Ordering::Release);
        self.ctx.request_repaint();
    }

    /// True once per batch of new pixels.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

impl HostShell for EguiShell {
    fn write_pixel(&self, x: u32, y: u32, color: Rgb) {
        self.raster.set_pixel(x, y, color);
    }

    fn notify_region_ready(&self, _x: u32, _y: u32, _width: u32, _height: u32) {
        self.dirty.store(true, Ordering::Release);
        self.ctx.request_repaint();
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.store(enabled, Ordering::Release);
        self.ctx.request_repaint();
    }
}
