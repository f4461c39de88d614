use bytemuck::{Pod, Zeroable};

/// A 32-bit RGBA quadruple.
///
/// `a` is opaque (255) by convention; nothing in the core blends against it,
/// it only exists because the final presented surface is an RGBA8 texture.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Parses an `AARRGGBB` hex string, as used by the config/asset tooling.
    pub fn parse_argb(argb: &str) -> Option<Self> {
        if argb.len() != 8 {
            return None;
        }
        let a = u8::from_str_radix(&argb[0..2], 16).ok()?;
        let r = u8::from_str_radix(&argb[2..4], 16).ok()?;
        let g = u8::from_str_radix(&argb[4..6], 16).ok()?;
        let b = u8::from_str_radix(&argb[6..8], 16).ok()?;
        Some(Color { r, g, b, a })
    }
}
