use fractex_core::IterationResult;

/// Hue of the first escape band.
const HUE_OFFSET: f32 = 0.7;
/// Iterations per full turn of the hue wheel.
const HUE_PERIOD: f32 = 200.0;

/// A color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Background used for bounded points and failed rows.
    pub const BACKGROUND: Self = Self(0);

    #[inline]
    pub fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self((r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub fn b(self) -> u8 {
        self.0 as u8
    }

    /// Opaque RGBA bytes.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), 255]
    }
}

/// Map an escape time to a display color.
///
/// Bounded points (and a zero count) are background. Otherwise the hue is
/// `0.7 + n / 200`, wrapped onto the color wheel, at full saturation and
/// brightness.
pub fn iterations_to_color(result: IterationResult) -> Rgb {
    match result {
        IterationResult::Bounded | IterationResult::Escaped { iterations: 0 } => Rgb::BACKGROUND,
        IterationResult::Escaped { iterations } => {
            let hue = HUE_OFFSET + iterations as f32 / HUE_PERIOD;
            hsb_to_rgb(hue, 1.0, 1.0)
        }
    }
}

/// Six-sector HSB → RGB conversion. Only the fractional part of `hue` is used.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Rgb {
    let channel = |v: f32| (v * 255.0 + 0.5) as u8;
    if saturation == 0.0 {
        let v = channel(brightness);
        return Rgb::from_channels(v, v, v);
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match h as u32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    Rgb::from_channels(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_and_zero_are_background() {
        assert_eq!(iterations_to_color(IterationResult::Bounded), Rgb::BACKGROUND);
        assert_eq!(
            iterations_to_color(IterationResult::Escaped { iterations: 0 }),
            Rgb::BACKGROUND
        );
    }

    #[test]
    fn known_escape_colors() {
        let cases = [(1, 0x3B00FF), (2, 0x4200FF), (3, 0x4A00FF), (60, 0xFF0000), (100, 0xCCFF00)];
        for (iterations, expected) in cases {
            assert_eq!(
                iterations_to_color(IterationResult::Escaped { iterations }),
                Rgb(expected),
                "iterations = {iterations}"
            );
        }
    }

    #[test]
    fn hue_wraps_around() {
        assert_eq!(hsb_to_rgb(1.25, 1.0, 1.0), hsb_to_rgb(0.25, 1.0, 1.0));
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), Rgb(0xFF0000));
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hsb_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb(0x00FF00));
        assert_eq!(hsb_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb(0x0000FF));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsb_to_rgb(0.4, 0.0, 0.5), Rgb(0x808080));
    }

    #[test]
    fn channel_accessors() {
        let c = Rgb::from_channels(0x12, 0x34, 0x56);
        assert_eq!(c, Rgb(0x123456));
        assert_eq!(c.to_rgba(), [0x12, 0x34, 0x56, 255]);
    }
}
