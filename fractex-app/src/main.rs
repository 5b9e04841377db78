mod app;
mod app_dir;
mod export;
mod preferences;
mod shell;

use eframe::egui;
use tracing::info;

use app::{ExplorerApp, PANEL_HEIGHT};
use preferences::AppPreferences;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Fractex");

    let prefs = AppPreferences::load();
    let side = prefs.display_size as f32;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Fractal Explorer")
            .with_inner_size([side, side + 2.0 * PANEL_HEIGHT])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Fractex",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(&cc.egui_ctx, prefs)?))),
    )
}
