use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use fractex_core::FractalKind;

/// Smallest and largest accepted canvas side, in pixels.
pub const MIN_DISPLAY_SIZE: u32 = 16;
pub const MAX_DISPLAY_SIZE: u32 = 4096;

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

/// Session-start settings. The viewport itself is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    /// Side of the square canvas in pixels.
    #[serde(default = "default_display_size")]
    pub display_size: u32,
    /// Viewport scale applied on each click; `0.5` halves width and height.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    #[serde(default)]
    pub default_fractal: FractalKind,
    /// Row workers; `0` means one per CPU.
    #[serde(default)]
    pub render_threads: usize,
    /// Initial folder of the save dialog. When empty, `images/` next to the executable.
    #[serde(default)]
    pub export_dir: String,
}

fn default_display_size() -> u32 {
    600
}
fn default_zoom_factor() -> f64 {
    0.5
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            display_size: default_display_size(),
            zoom_factor: default_zoom_factor(),
            default_fractal: FractalKind::default(),
            render_threads: 0,
            export_dir: String::new(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            let prefs = Self::default();
            prefs.save_to(path);
            return prefs;
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs.validated();
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    /// Persist preferences to `path`.
    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Clamp the canvas size and replace an unusable zoom factor.
    pub fn validated(mut self) -> Self {
        let size = self.display_size.clamp(MIN_DISPLAY_SIZE, MAX_DISPLAY_SIZE);
        if size != self.display_size {
            warn!(requested = self.display_size, size, "display_size out of range, clamped");
            self.display_size = size;
        }
        if !(self.zoom_factor > 0.0 && self.zoom_factor <= 1.0) {
            warn!(zoom_factor = self.zoom_factor, "zoom_factor must be in (0, 1], using default");
            self.zoom_factor = default_zoom_factor();
        }
        self
    }

    /// Folder the save dialog opens in.
    pub fn export_directory(&self) -> PathBuf {
        let dir = self.export_dir.trim();
        if dir.is_empty() {
            crate::app_dir::images_directory()
        } else {
            PathBuf::from(dir)
        }
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
