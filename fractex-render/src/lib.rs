pub mod color;
pub mod error;
pub mod raster;
pub mod row;
pub mod scheduler;
pub mod session;
pub mod shell;

pub use color::{hsb_to_rgb, iterations_to_color, Rgb};
pub use error::RenderError;
pub use raster::Raster;
pub use row::{render_row, render_row_for};
pub use scheduler::{RenderPass, RenderPhase, RenderScheduler};
pub use session::Session;
pub use shell::HostShell;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
