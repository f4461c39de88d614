use pixeltide_shared::{Pixel, Point};

use crate::canvas::Canvas;

use super::write::try_write;

/// Writes a single pixel if it lies within the clip.
pub fn point(canvas: &mut Canvas, p: Point, index: Pixel) {
    try_write(canvas, p, index);
}

/// Bresenham line; endpoints inclusive, exact for axis-aligned lines.
pub fn line(canvas: &mut Canvas, a: Point, b: Point, index: Pixel) {
    if a.y == b.y {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        hline(canvas, Point::new(x0, a.y), (x1 - x0 + 1) as u32, index);
        return;
    }
    if a.x == b.x {
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        vline(canvas, Point::new(a.x, y0), (y1 - y0 + 1) as u32, index);
        return;
    }

    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (a.x, a.y);
    loop {
        try_write(canvas, Point::new(x, y), index);
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fast axis-aligned horizontal run, `w` pixels starting at `p`.
pub fn hline(canvas: &mut Canvas, p: Point, w: u32, index: Pixel) {
    for i in 0..w as i32 {
        try_write(canvas, Point::new(p.x + i, p.y), index);
    }
}

/// Fast axis-aligned vertical run, `h` pixels starting at `p`.
pub fn vline(canvas: &mut Canvas, p: Point, h: u32, index: Pixel) {
    for i in 0..h as i32 {
        try_write(canvas, Point::new(p.x, p.y + i), index);
    }
}

/// Outlines or fills a rectangle. The outline walks the four edges once —
/// no pixel is written twice, so blend functions are idempotent on it.
pub fn rectangle(canvas: &mut Canvas, r: pixeltide_shared::Rect, index: Pixel, filled: bool) {
    if r.is_empty() {
        return;
    }
    if filled {
        for y in r.top()..r.bottom() {
            hline(canvas, Point::new(r.left(), y), r.width, index);
        }
        return;
    }

    hline(canvas, Point::new(r.left(), r.top()), r.width, index);
    if r.height > 1 {
        hline(canvas, Point::new(r.left(), r.bottom() - 1), r.width, index);
    }
    if r.height > 2 {
        vline(canvas, Point::new(r.left(), r.top() + 1), r.height - 2, index);
        if r.width > 1 {
            vline(canvas, Point::new(r.right() - 1, r.top() + 1), r.height - 2, index);
        }
    }
}

/// Midpoint circle. The filled variant draws symmetric horizontal spans so
/// no scanline is ever touched twice.
pub fn circle(canvas: &mut Canvas, c: Point, radius: i32, index: Pixel, filled: bool) {
    if radius < 0 {
        return;
    }
    if radius == 0 {
        try_write(canvas, c, index);
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    let mut plot = |canvas: &mut Canvas, x: i32, y: i32| {
        if filled {
            hline(canvas, Point::new(c.x - x, c.y + y), (2 * x + 1) as u32, index);
            if y != 0 {
                hline(canvas, Point::new(c.x - x, c.y - y), (2 * x + 1) as u32, index);
            }
        } else {
            try_write(canvas, Point::new(c.x + x, c.y + y), index);
            try_write(canvas, Point::new(c.x - x, c.y + y), index);
            try_write(canvas, Point::new(c.x + x, c.y - y), index);
            try_write(canvas, Point::new(c.x - x, c.y - y), index);
            try_write(canvas, Point::new(c.x + y, c.y + x), index);
            try_write(canvas, Point::new(c.x - y, c.y + x), index);
            try_write(canvas, Point::new(c.x + y, c.y - x), index);
            try_write(canvas, Point::new(c.x - y, c.y - x), index);
        }
    };

    if filled {
        // Walk octants top-to-bottom so `plot`'s symmetric hline pairs cover
        // every row exactly once.
        while y <= x {
            plot(canvas, x, y);
            if x != y {
                plot(canvas, y, x);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    } else {
        while x >= y {
            plot(canvas, x, y);
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }
}

/// Signed twice-area of the triangle, used both for the fill rasterizer and
/// to detect degenerate (zero-area) triangles.
fn edge(a: Point, b: Point, c: Point) -> i64 {
    (b.x as i64 - a.x as i64) * (c.y as i64 - a.y as i64)
        - (b.y as i64 - a.y as i64) * (c.x as i64 - a.x as i64)
}

/// Filled triangle uses a top-left fill convention over its bounding box;
/// outline draws the three edges via `line`. Winding for the filled
/// renderer is counter-clockwise; degenerate (zero-area) triangles draw
/// nothing.
pub fn triangle(canvas: &mut Canvas, a: Point, b: Point, c: Point, index: Pixel, filled: bool) {
    if !filled {
        line(canvas, a, b, index);
        line(canvas, b, c, index);
        line(canvas, c, a, index);
        return;
    }

    let area = edge(a, b, c);
    if area == 0 {
        return;
    }

    // Normalize to counter-clockwise winding so edge signs agree with the
    // top-left rule below regardless of how the caller wound the triangle.
    let (a, b, c) = if area < 0 { (a, c, b) } else { (a, b, c) };

    let min_x = a.x.min(b.x).min(c.x);
    let max_x = a.x.max(b.x).max(c.x);
    let min_y = a.y.min(b.y).min(c.y);
    let max_y = a.y.max(b.y).max(c.y);

    let is_top_left = |from: Point, to: Point| {
        let is_left = to.y > from.y;
        let is_top = to.y == from.y && to.x < from.x;
        is_left || is_top
    };

    let bias = [
        if is_top_left(a, b) { 0 } else { -1 },
        if is_top_left(b, c) { 0 } else { -1 },
        if is_top_left(c, a) { 0 } else { -1 },
    ];

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x, y);
            let w0 = edge(b, c, p) + bias[1] as i64;
            let w1 = edge(c, a, p) + bias[2] as i64;
            let w2 = edge(a, b, p) + bias[0] as i64;
            if w0 >= 0 && w1 >= 0 && w2 >= 0 {
                try_write(canvas, p, index);
            }
        }
    }
}

/// Scanline 4-connected flood fill. Initial color is the post-shift value at
/// `seed`; if `seed` already equals `index` (post shift), or `seed` is
/// outside the clip, nothing is written.
pub fn flood_fill(canvas: &mut Canvas, seed: Point, index: Pixel) {
    if !canvas.clip().contains(seed) {
        return;
    }
    let Some(target) = canvas.surface().get(seed) else {
        return;
    };
    let replacement = canvas.resolve_write(index);
    if target == replacement {
        return;
    }
    if canvas.transparency().is_transparent(replacement) {
        return;
    }

    let clip = canvas.clip();
    let mut stack = vec![seed];
    while let Some(p) = stack.pop() {
        if !clip.contains(p) {
            continue;
        }
        if canvas.surface().get(p) != Some(target) {
            continue;
        }
        canvas.surface_mut().put_unchecked(p, replacement);
        stack.push(Point::new(p.x + 1, p.y));
        stack.push(Point::new(p.x - 1, p.y));
        stack.push(Point::new(p.x, p.y + 1));
        stack.push(Point::new(p.x, p.y - 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeltide_shared::Rect;

    #[test]
    fn point_outside_clip_is_noop() {
        let mut c = Canvas::new(4, 4);
        c.set_clipping(Some(Rect::new(0, 0, 2, 2)));
        point(&mut c, Point::new(3, 3), Pixel::new(7));
        assert_eq!(c.surface().get(Point::new(3, 3)), Some(Pixel::ZERO));
    }

    #[test]
    fn clipped_line_only_touches_clip_interior() {
        let mut c = Canvas::new(10, 10);
        c.set_clipping(Some(Rect::new(2, 2, 5, 5)));
        line(&mut c, Point::new(0, 5), Point::new(9, 5), Pixel::new(7));
        for x in 2..=6 {
            assert_eq!(c.surface().get(Point::new(x, 5)), Some(Pixel::new(7)));
        }
        for x in [0, 1, 7, 8, 9] {
            assert_eq!(c.surface().get(Point::new(x, 5)), Some(Pixel::ZERO));
        }
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut c = Canvas::new(8, 8);
        triangle(&mut c, Point::new(1, 1), Point::new(1, 1), Point::new(1, 1), Pixel::new(3), true);
        assert!(c.surface().data().iter().all(|p| *p == Pixel::ZERO));
    }

    #[test]
    fn flood_fill_seed_already_target_color_is_noop() {
        let mut c = Canvas::new(4, 4);
        flood_fill(&mut c, Point::new(0, 0), Pixel::ZERO);
        assert!(c.surface().data().iter().all(|p| *p == Pixel::ZERO));
    }

    #[test]
    fn flood_fill_basic() {
        let mut c = Canvas::new(4, 4);
        flood_fill(&mut c, Point::new(1, 1), Pixel::new(3));
        assert!(c.surface().data().iter().all(|p| *p == Pixel::new(3)));
    }

    #[test]
    fn flood_fill_seed_outside_clip_is_noop() {
        let mut c = Canvas::new(4, 4);
        c.set_clipping(Some(Rect::new(0, 0, 2, 2)));
        flood_fill(&mut c, Point::new(3, 3), Pixel::new(5));
        assert!(c.surface().data().iter().all(|p| *p == Pixel::ZERO));
    }
}
