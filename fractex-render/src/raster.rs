use std::sync::atomic::{AtomicU32, Ordering};

use crate::color::Rgb;
use crate::shell::HostShell;

/// A square `size × size` grid of packed colors, row-major.
///
/// Pixels are individual atomics so row tasks can write their disjoint rows
/// through a shared reference without locking. Ordering between a pass's
/// writes and a reader is established by the pass's completion, not by the
/// pixel stores themselves.
#[derive(Debug)]
pub struct Raster {
    size: u32,
    pixels: Box<[AtomicU32]>,
}

impl Raster {
    /// Create a raster filled with the background color.
    pub fn new(size: u32) -> Self {
        let len = size as usize * size as usize;
        Self {
            size,
            pixels: (0..len).map(|_| AtomicU32::new(Rgb::BACKGROUND.0)).collect(),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y as usize * self.size as usize + x as usize)
    }

    /// Read one pixel. Out-of-range coordinates yield `None`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x, y)
            .map(|i| Rgb(self.pixels[i].load(Ordering::Relaxed)))
    }

    /// Store one pixel. Out-of-range writes are ignored.
    #[inline]
    pub fn set_pixel(&self, x: u32, y: u32, color: Rgb) {
        debug_assert!(x < self.size && y < self.size, "pixel ({x}, {y}) out of range");
        if let Some(i) = self.index(x, y) {
            self.pixels[i].store(color.0, Ordering::Relaxed);
        }
    }

    /// Reset every pixel to the background color.
    pub fn clear(&self) {
        for p in self.pixels.iter() {
            p.store(Rgb::BACKGROUND.0, Ordering::Relaxed);
        }
    }

    /// Copy out the current contents, row-major.
    pub fn snapshot(&self) -> Vec<Rgb> {
        self.pixels
            .iter()
            .map(|p| Rgb(p.load(Ordering::Relaxed)))
            .collect()
    }

    /// Opaque RGBA bytes, 4 per pixel, row-major. Used for display and export.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in self.pixels.iter() {
            bytes.extend_from_slice(&Rgb(p.load(Ordering::Relaxed)).to_rgba());
        }
        bytes
    }
}

impl HostShell for Raster {
    fn write_pixel(&self, x: u32, y: u32, color: Rgb) {
        self.set_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_raster_is_background() {
        let raster = Raster::new(4);
        assert_eq!(raster.snapshot(), vec![Rgb::BACKGROUND; 16]);
        for chunk in raster.to_rgba_bytes().chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn write_pixel_lands_at_row_major_index() {
        let raster = Raster::new(8);
        raster.write_pixel(2, 1, Rgb(0xFF0000));
        assert_eq!(raster.pixel(2, 1), Some(Rgb(0xFF0000)));
        assert_eq!(raster.snapshot()[8 + 2], Rgb(0xFF0000));
        assert_eq!(raster.pixel(0, 0), Some(Rgb::BACKGROUND));
    }

    #[test]
    fn out_of_range_read_is_none() {
        let raster = Raster::new(4);
        assert_eq!(raster.pixel(4, 0), None);
        assert_eq!(raster.pixel(0, 4), None);
    }

    #[test]
    fn clear_resets_pixels() {
        let raster = Raster::new(3);
        raster.write_pixel(1, 1, Rgb(0x123456));
        raster.clear();
        assert_eq!(raster.pixel(1, 1), Some(Rgb::BACKGROUND));
    }
}
