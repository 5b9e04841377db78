use std::sync::Arc;

use tracing::{debug, info, warn};

use fractex_core::{map_coordinate, CoreError, FractalKind, Viewport};

use crate::error::RenderError;
use crate::scheduler::{RenderPass, RenderPhase, RenderScheduler};
use crate::shell::HostShell;

/// The session controller: owns the active fractal, the viewport, and the
/// scheduler, and turns user actions into render passes.
///
/// The viewport and active fractal are only changed here, and each pass gets
/// its own snapshot of them, so changing them never affects rows in flight.
pub struct Session {
    extent: u32,
    zoom_factor: f64,
    active: FractalKind,
    viewport: Viewport,
    scheduler: RenderScheduler,
    shell: Arc<dyn HostShell>,
    current: Option<RenderPass>,
}

impl Session {
    /// Create a session showing `kind` at its default range. No pass is
    /// started until [`render`](Self::render) is called.
    pub fn new(
        extent: u32,
        kind: FractalKind,
        zoom_factor: f64,
        scheduler: RenderScheduler,
        shell: Arc<dyn HostShell>,
    ) -> crate::Result<Self> {
        if extent == 0 {
            return Err(RenderError::InvalidDisplayExtent(extent));
        }
        if !(zoom_factor > 0.0 && zoom_factor.is_finite()) {
            return Err(CoreError::InvalidZoomFactor(zoom_factor).into());
        }
        info!(extent, %kind, zoom_factor, "Session created");
        Ok(Self {
            extent,
            zoom_factor,
            active: kind,
            viewport: kind.initial_range(),
            scheduler,
            shell,
            current: None,
        })
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    pub fn active(&self) -> FractalKind {
        self.active
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn current_pass(&self) -> Option<&RenderPass> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> RenderPhase {
        self.scheduler.phase()
    }

    pub fn is_rendering(&self) -> bool {
        self.phase() == RenderPhase::Rendering
    }

    /// Start a pass for the current fractal and viewport.
    pub fn render(&mut self) -> crate::Result<&RenderPass> {
        let pass = self.scheduler.start_render_pass(
            self.active,
            self.viewport,
            self.extent,
            Arc::clone(&self.shell),
        )?;
        let pass = self.current.insert(pass);
        Ok(&*pass)
    }

    /// Restore the active fractal's default range and render.
    pub fn reset(&mut self) -> crate::Result<&RenderPass> {
        debug!(kind = %self.active, "Resetting view");
        self.viewport = self.active.initial_range();
        self.render()
    }

    /// Make `kind` the active fractal, show its default range, and render.
    pub fn select_function(&mut self, kind: FractalKind) -> crate::Result<&RenderPass> {
        debug!(from = %self.active, to = %kind, "Selecting fractal");
        self.active = kind;
        self.viewport = kind.initial_range();
        self.render()
    }

    /// Recentre on the clicked pixel, zoom by the session's factor, and render.
    ///
    /// Returns `Ok(None)` without touching the viewport while a pass is still
    /// rendering. On an invalid resulting viewport the prior one is kept.
    pub fn recenter_and_zoom(&mut self, px: u32, py: u32) -> crate::Result<Option<&RenderPass>> {
        if self.is_rendering() {
            warn!(px, py, "Ignoring zoom request while rendering");
            return Ok(None);
        }
        let vp = self.viewport;
        let cx = map_coordinate(vp.x(), vp.x_max(), self.extent, px);
        let cy = map_coordinate(vp.y(), vp.y_max(), self.extent, py);
        self.viewport.recenter_and_zoom(cx, cy, self.zoom_factor)?;
        self.render().map(Some)
    }
}
