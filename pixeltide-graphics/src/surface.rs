use pixeltide_shared::{Pixel, Point, Rect};

/// An owned 2D buffer of [`Pixel`] with row stride equal to `width`.
///
/// Invariants: `width > 0`, `height > 0`, `data.len() == width * height`.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<Pixel>,
}

impl Surface {
    /// Creates a surface filled with index 0.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero; a zero-area surface violates
    /// the invariant every drawing primitive relies on.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "surface dimensions must be non-zero");
        Surface {
            width,
            height,
            data: vec![Pixel::ZERO; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    pub fn data(&self) -> &[Pixel] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    #[inline]
    fn index_of(&self, p: Point) -> usize {
        p.y as usize * self.width as usize + p.x as usize
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    #[inline]
    pub fn get(&self, p: Point) -> Option<Pixel> {
        self.in_bounds(p).then(|| self.data[self.index_of(p)])
    }

    /// Writes a pixel with no clipping, shifting or transparency check.
    ///
    /// Only safe to call on a point already validated against the drawing
    /// clip; callers in `crate::raster` always do so.
    #[inline]
    pub fn put_unchecked(&mut self, p: Point, pixel: Pixel) {
        let idx = self.index_of(p);
        self.data[idx] = pixel;
    }

    #[inline]
    pub fn put(&mut self, p: Point, pixel: Pixel) {
        if self.in_bounds(p) {
            self.put_unchecked(p, pixel);
        }
    }

    pub fn fill(&mut self, pixel: Pixel) {
        self.data.fill(pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_zeroed() {
        let s = Surface::new(4, 4);
        assert!(s.data().iter().all(|p| *p == Pixel::ZERO));
    }

    #[test]
    #[should_panic]
    fn zero_dimension_panics() {
        Surface::new(0, 4);
    }

    #[test]
    fn put_outside_bounds_is_noop() {
        let mut s = Surface::new(2, 2);
        s.put(Point::new(5, 5), Pixel::new(9));
        assert!(s.data().iter().all(|p| *p == Pixel::ZERO));
    }
}
