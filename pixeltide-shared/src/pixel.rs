use bytemuck::{Pod, Zeroable};

/// An 8-bit index into a palette slot.
///
/// `Pixel` is the currency of the whole indexed-graphics pipeline: surfaces
/// store it, the shifting table permutes it, the transparency table gates
/// writes on it, and the palette finally resolves it to a [`crate::Color`].
#[repr(transparent)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel(pub u8);

impl Pixel {
    pub const ZERO: Pixel = Pixel(0);

    #[inline]
    pub const fn new(index: u8) -> Self {
        Pixel(index)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for Pixel {
    fn from(value: u8) -> Self {
        Pixel(value)
    }
}

impl From<Pixel> for u8 {
    fn from(value: Pixel) -> Self {
        value.0
    }
}
