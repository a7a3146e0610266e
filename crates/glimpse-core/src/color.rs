#![forbid(unsafe_code)]

//! RGB color with the small set of operations the renderer needs.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Scale each channel by `factor` (0.0 = black, 1.0 = unchanged).
    #[must_use]
    pub fn dim(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self::new(
            (self.r as f32 * f) as u8,
            (self.g as f32 * f) as u8,
            (self.b as f32 * f) as u8,
        )
    }

    /// Linear blend toward `other` (0.0 = self, 1.0 = other).
    #[must_use]
    pub fn blend(self, other: Self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f) as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Perceptual luminance (ITU-R BT.601 weights), 0-255.
    #[must_use]
    pub fn luminance_u8(self) -> u8 {
        let y = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_scales_channels() {
        let c = Rgb::new(200, 100, 50).dim(0.5);
        assert_eq!(c, Rgb::new(100, 50, 25));
    }

    #[test]
    fn dim_clamps_factor() {
        assert_eq!(Rgb::WHITE.dim(2.0), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.dim(-1.0), Rgb::BLACK);
    }

    #[test]
    fn blend_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 255, 255);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
    }

    #[test]
    fn luminance_orders_gray_levels() {
        assert!(Rgb::WHITE.luminance_u8() > Rgb::new(128, 128, 128).luminance_u8());
        assert_eq!(Rgb::BLACK.luminance_u8(), 0);
    }

    #[test]
    fn serde_round_trip() {
        let c = Rgb::new(0, 212, 255);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<Rgb>(&json).unwrap(), c);
    }
}
