use pixeltide_shared::{Pixel, Point};

use crate::canvas::Canvas;

/// Writes `index` at `p` if it lies within the clip and its post-shift value
/// is not transparent. Returns whether the write actually happened.
///
/// Every primitive in `raster` funnels through this so shifting and
/// transparency behave identically everywhere the contract requires it.
#[inline]
pub(crate) fn try_write(canvas: &mut Canvas, p: Point, index: Pixel) -> bool {
    if !canvas.clip().contains(p) {
        return false;
    }
    let resolved = canvas.resolve_write(index);
    if canvas.transparency().is_transparent(resolved) {
        return false;
    }
    canvas.surface_mut().put_unchecked(p, resolved);
    true
}

/// Like [`try_write`] but bypasses shifting and transparency — used by
/// `copy`, which assumes both buffers already use the same palette
/// convention.
#[inline]
pub(crate) fn write_raw(canvas: &mut Canvas, p: Point, index: Pixel) -> bool {
    if !canvas.clip().contains(p) {
        return false;
    }
    canvas.surface_mut().put_unchecked(p, index);
    true
}
