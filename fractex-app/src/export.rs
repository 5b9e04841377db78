//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::debug;

use fractex_core::{FractalKind, Viewport};

/// What was on screen when the image was saved.
pub struct ExportMetadata {
    pub fractal: FractalKind,
    pub viewport: Viewport,
    pub size: u32,
}

/// Append `.png` unless the path already ends with it (any case).
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    let has_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if has_png {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".png");
        PathBuf::from(name)
    }
}

/// Write a square RGBA buffer as a PNG file with fractal metadata.
pub fn export_png(pixels: &[u8], path: &Path, metadata: &ExportMetadata) -> Result<(), String> {
    let size = metadata.size;
    if pixels.len() != (size as usize) * (size as usize) * 4 {
        return Err(format!(
            "Pixel buffer holds {} bytes, expected {size}x{size} RGBA",
            pixels.len()
        ));
    }

    let file = std::fs::File::create(path).map_err(|e| format!("Failed to create file: {e}"))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, size, size);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder
        .add_text_chunk("Software".to_string(), "Fractex".to_string())
        .map_err(|e| format!("Failed to add text chunk: {e}"))?;
    for (key, value) in metadata_pairs(metadata) {
        encoder
            .add_text_chunk(key.clone(), value)
            .map_err(|e| format!("Failed to add text chunk '{key}': {e}"))?;
    }

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {e}"))?;
    png_writer
        .write_image_data(pixels)
        .map_err(|e| format!("Failed to write PNG image data: {e}"))?;

    debug!("Exported PNG {size}x{size} to {}", path.display());
    Ok(())
}

fn metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    let vp = &meta.viewport;
    vec![
        ("Fractex.Fractal".into(), meta.fractal.label().to_string()),
        (
            "Fractex.Viewport".into(),
            format!("x={} y={} width={} height={}", vp.x(), vp.y(), vp.width(), vp.height()),
        ),
        ("Fractex.Center".into(), vp.center().to_string()),
        ("Fractex.MaxIterations".into(), meta.fractal.max_iterations().to_string()),
        ("Fractex.Resolution".into(), format!("{0}x{0}", meta.size)),
    ]
}
