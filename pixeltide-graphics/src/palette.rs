use pixeltide_shared::{Color, Pixel, PALETTE_ENTRIES};

/// A dense mapping from [`Pixel`] to [`Color`], one of up to
/// `MAX_PALETTE_SLOTS` held by a canvas.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [Color; PALETTE_ENTRIES],
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: [Color::BLACK; PALETTE_ENTRIES],
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, pixel: Pixel) -> Color {
        self.colors[pixel.as_usize()]
    }

    #[inline]
    pub fn set(&mut self, pixel: Pixel, color: Color) {
        self.colors[pixel.as_usize()] = color;
    }

    /// Wholesale replacement of every slot not covered by `colors`.
    ///
    /// Entries beyond `colors.len()` keep their previous value, matching the
    /// "poke a prefix of the table" convention used when loading a palette
    /// with fewer than 256 colors.
    pub fn replace(&mut self, colors: &[Color]) {
        for (dst, src) in self.colors.iter_mut().zip(colors.iter()) {
            *dst = *src;
        }
    }

    pub fn as_slice(&self) -> &[Color; PALETTE_ENTRIES] {
        &self.colors
    }
}

/// A Pixel→Pixel permutation applied before palette lookup. Identity by
/// default.
#[derive(Debug, Clone)]
pub struct ShiftingTable {
    map: [Pixel; PALETTE_ENTRIES],
}

impl Default for ShiftingTable {
    fn default() -> Self {
        let mut map = [Pixel::ZERO; PALETTE_ENTRIES];
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = Pixel::new(i as u8);
        }
        ShiftingTable { map }
    }
}

impl ShiftingTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn resolve(&self, pixel: Pixel) -> Pixel {
        self.map[pixel.as_usize()]
    }

    #[inline]
    pub fn set(&mut self, from: Pixel, to: Pixel) {
        self.map[from.as_usize()] = to;
    }

    /// Resets every entry to identity, then applies `pairs` on top.
    ///
    /// An empty `pairs` therefore fully restores the identity table, per the
    /// round-trip invariant that `set_shifting(identity)` is equivalent to an
    /// unset shifting table.
    pub fn replace(&mut self, pairs: impl IntoIterator<Item = (Pixel, Pixel)>) {
        *self = Self::default();
        for (from, to) in pairs {
            self.set(from, to);
        }
    }

    pub fn as_array(&self) -> &[Pixel; PALETTE_ENTRIES] {
        &self.map
    }
}

/// A Pixel→bool table consulted on every drawing write. By default only
/// index 0 is transparent.
#[derive(Debug, Clone)]
pub struct TransparencyTable {
    transparent: [bool; PALETTE_ENTRIES],
}

impl Default for TransparencyTable {
    fn default() -> Self {
        let mut transparent = [false; PALETTE_ENTRIES];
        transparent[0] = true;
        TransparencyTable { transparent }
    }
}

impl TransparencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_transparent(&self, pixel: Pixel) -> bool {
        self.transparent[pixel.as_usize()]
    }

    #[inline]
    pub fn set(&mut self, pixel: Pixel, transparent: bool) {
        self.transparent[pixel.as_usize()] = transparent;
    }

    pub fn replace(&mut self, pairs: impl IntoIterator<Item = (Pixel, bool)>) {
        *self = Self::default();
        for (pixel, transparent) in pairs {
            self.set(pixel, transparent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifting_defaults_to_identity() {
        let t = ShiftingTable::new();
        for i in 0..=255u8 {
            assert_eq!(t.resolve(Pixel::new(i)), Pixel::new(i));
        }
    }

    #[test]
    fn transparency_defaults_to_index_zero_only() {
        let t = TransparencyTable::new();
        assert!(t.is_transparent(Pixel::new(0)));
        assert!(!t.is_transparent(Pixel::new(1)));
    }

    #[test]
    fn shifting_replace_empty_restores_identity() {
        let mut t = ShiftingTable::new();
        t.set(Pixel::new(0), Pixel::new(5));
        t.replace(std::iter::empty());
        assert_eq!(t.resolve(Pixel::new(0)), Pixel::new(0));
    }
}
