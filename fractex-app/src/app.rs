use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{error, info, warn};

use fractex_core::FractalKind;
use fractex_render::{RenderScheduler, Session};

use crate::export::{export_png, with_png_extension, ExportMetadata};
use crate::preferences::AppPreferences;
use crate::shell::EguiShell;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Height reserved for each of the top and bottom panels.
pub const PANEL_HEIGHT: f32 = 36.0;
/// How long a status message stays visible.
const STATUS_DURATION: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    session: Session,
    shell: Arc<EguiShell>,
    texture: Option<egui::TextureHandle>,
    preferences: AppPreferences,
    status: Option<(String, Instant)>,
}

impl ExplorerApp {
    /// Build the session and start the first pass.
    pub fn new(ctx: &egui::Context, preferences: AppPreferences) -> fractex_render::Result<Self> {
        let size = preferences.display_size;
        let shell = Arc::new(EguiShell::new(ctx.clone(), size));
        let scheduler = RenderScheduler::new(preferences.render_threads)?;
        let mut session = Session::new(
            size,
            preferences.default_fractal,
            preferences.zoom_factor,
            scheduler,
            shell.clone(),
        )?;
        session.render()?;

        Ok(Self {
            session,
            shell,
            texture: None,
            preferences,
            status: None,
        })
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    /// Surface a failed session operation without ending the app.
    fn report(&mut self, what: &str, result: fractex_render::Result<()>) {
        if let Err(e) = result {
            error!("{what} failed: {e}");
            self.set_status(format!("{what} failed: {e}"));
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    fn select_fractal(&mut self, kind: FractalKind) {
        self.shell.clear();
        let result = self.session.select_function(kind).map(|_| ());
        self.report("Switching fractal", result);
    }

    fn reset_view(&mut self) {
        let result = self.session.reset().map(|_| ());
        self.report("Reset", result);
    }

    fn zoom_at(&mut self, px: u32, py: u32) {
        // Only the UI thread starts passes, so an idle session stays idle
        // until the zoom below starts one.
        if self.session.is_rendering() {
            warn!(px, py, "Click ignored while rendering");
            return;
        }
        self.shell.clear();
        match self.session.recenter_and_zoom(px, py) {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(px, py, "Click ignored while rendering");
                self.redraw_current_view();
            }
            Err(e) => {
                error!("Zoom failed: {e}");
                self.set_status(format!("Cannot zoom further: {e}"));
                self.redraw_current_view();
            }
        }
    }

    /// Re-render the unchanged view after the raster was cleared for nothing.
    fn redraw_current_view(&mut self) {
        let result = self.session.render().map(|_| ());
        self.report("Render", result);
    }

    fn save_image(&mut self) {
        let dir = self.preferences.export_directory();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Cannot create {}: {e}", dir.display());
        }
        let kind = self.session.active();
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_directory(&dir)
            .set_file_name(format!("{}.png", kind.label().replace(' ', "_").to_lowercase()))
            .save_file()
        else {
            return;
        };
        let path = with_png_extension(path);

        let metadata = ExportMetadata {
            fractal: kind,
            viewport: self.session.viewport(),
            size: self.session.extent(),
        };
        let pixels = self.shell.raster().to_rgba_bytes();
        match export_png(&pixels, &path, &metadata) {
            Ok(()) => {
                info!("Saved image to {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!("Export failed: {e}");
                self.set_status(format!("Export failed: {e}"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.shell.take_dirty() && self.texture.is_some() {
            return;
        }
        let size = self.session.extent() as usize;
        let bytes = self.shell.raster().to_rgba_bytes();
        let image = egui::ColorImage::from_rgba_unmultiplied([size, size], &bytes);
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("fractal", image, egui::TextureOptions::NEAREST));
            }
        }
    }

    fn draw_top_panel(&mut self, ctx: &egui::Context, enabled: bool) {
        let mut selected = self.session.active();
        egui::TopBottomPanel::top("fractal_select")
            .exact_height(PANEL_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label("Fractal:");
                    ui.add_enabled_ui(enabled, |ui| {
                        egui::ComboBox::from_id_salt("fractal_kind")
                            .selected_text(selected.label())
                            .show_ui(ui, |ui| {
                                for kind in FractalKind::ALL {
                                    ui.selectable_value(&mut selected, kind, kind.label());
                                }
                            });
                    });
                });
            });
        if selected != self.session.active() {
            self.select_fractal(selected);
        }
    }

    fn draw_bottom_panel(&mut self, ctx: &egui::Context, enabled: bool) {
        let mut save = false;
        let mut reset = false;
        let status = self
            .status
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_DURATION)
            .map(|(msg, _)| msg.clone());

        egui::TopBottomPanel::bottom("actions")
            .exact_height(PANEL_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    save = ui.add_enabled(enabled, egui::Button::new("Save")).clicked();
                    reset = ui.add_enabled(enabled, egui::Button::new("Reset")).clicked();
                    ui.separator();
                    match &status {
                        Some(msg) => ui.label(msg.as_str()),
                        None => ui.weak(self.session.phase().label()),
                    };
                });
            });

        if status.is_some() {
            ctx.request_repaint_after(STATUS_DURATION);
        }
        if save {
            self.save_image();
        }
        if reset {
            self.reset_view();
        }
    }

    fn draw_canvas(&mut self, ctx: &egui::Context, enabled: bool) {
        let size = self.session.extent();
        let mut clicked_at = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let side = size as f32;
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::click());
                if let Some(texture) = &self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
                }
                if enabled && response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let local = pos - rect.min;
                        let px = (local.x.max(0.0) as u32).min(size - 1);
                        let py = (local.y.max(0.0) as u32).min(size - 1);
                        clicked_at = Some((px, py));
                    }
                }
            });
        if let Some((px, py)) = clicked_at {
            self.zoom_at(px, py);
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_texture(ctx);
        let enabled = self.shell.input_enabled();

        self.draw_top_panel(ctx, enabled);
        self.draw_bottom_panel(ctx, enabled);
        self.draw_canvas(ctx, enabled);
    }
}
