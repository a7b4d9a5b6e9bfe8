/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::from_rgb_u32(0x0080_0000);
    pub const GREEN: Self = Self::from_rgb_u32(0x0000_8000);
    pub const YELLOW: Self = Self::from_rgb_u32(0x00FF_FF00);
    pub const BROWN: Self = Self::from_rgb_u32(0x0080_8000);
    pub const BLUE: Self = Self::from_rgb_u32(0x0000_0080);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opaque color from a packed `0xRRGGBB` value; the top byte is ignored.
    #[must_use]
    pub const fn from_rgb_u32(packed: u32) -> Self {
        Self::rgb(
            ((packed >> 16) & 0xFF) as f64 / 255.0,
            ((packed >> 8) & 0xFF) as f64 / 255.0,
            (packed & 0xFF) as f64 / 255.0,
        )
    }

    /// Reads a fill-color property value (a packed `0xRRGGBB` stored as a
    /// number). NaN and out-of-range values yield `None`.
    #[must_use]
    pub fn from_property_value(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
            return None;
        }
        Some(Self::from_rgb_u32(value as u32))
    }
}

/// Per-series bar colors, cycled by series index.
pub const SERIES_PALETTE: [Color; 5] = [
    Color::RED,
    Color::GREEN,
    Color::YELLOW,
    Color::BROWN,
    Color::BLUE,
];

#[must_use]
pub fn series_color(series_index: usize) -> Color {
    SERIES_PALETTE[series_index % SERIES_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::{Color, series_color};

    #[test]
    fn packed_colors_unpack_per_channel() {
        let color = Color::from_rgb_u32(0x00FF_8000);
        assert_eq!(color.red, 1.0);
        assert!((color.green - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(color.blue, 0.0);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn nan_property_value_is_not_a_color() {
        assert_eq!(Color::from_property_value(f64::NAN), None);
        assert_eq!(Color::from_property_value(-1.0), None);
        assert_eq!(
            Color::from_property_value(f64::from(0x0000_00FF_u32)),
            Some(Color::from_rgb_u32(0xFF))
        );
    }

    #[test]
    fn palette_cycles_every_five_series() {
        assert_eq!(series_color(0), series_color(5));
        assert_ne!(series_color(0), series_color(1));
    }
}
