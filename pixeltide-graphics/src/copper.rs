//! The copperlist evaluator: rewrites Canvas drawing state mid-frame, at
//! rasterisation resolution, without re-rendering the scene.
//!
//! Consulted only at conversion time (indexed `Surface` → RGBA), against
//! working copies of shifting and palette slots — the canonical [`Canvas`]
//! state is never mutated by the evaluator.

use pixeltide_shared::{Color, Pixel, PALETTE_ENTRIES};

use crate::canvas::Canvas;
use crate::palette::{Palette, ShiftingTable};

/// One instruction of a copperlist program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// Block subsequent instructions until the raster position reaches
    /// `(x, y)`, in row-major order.
    Wait(u32, u32),
    /// Add this value to the destination stride for subsequent rows.
    Modulo(i32),
    /// Add this value to the destination write offset for subsequent rows.
    Offset(i32),
    /// Switch the palette slot subsequent pixels read colours from.
    Palette(usize),
    /// Overwrite one entry of the current working palette.
    Color(Pixel, Color),
    /// Set the bias applied to the pixel before the shifting lookup.
    Bias(i32),
    /// Override one entry of the working shifting table.
    Shift(Pixel, Pixel),
}

/// An ordered sequence of [`Instruction`]s.
#[derive(Debug, Clone, Default)]
pub struct CopperList {
    instructions: Vec<Instruction>,
}

impl CopperList {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        CopperList { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl From<Vec<Instruction>> for CopperList {
    fn from(instructions: Vec<Instruction>) -> Self {
        CopperList::new(instructions)
    }
}

/// Whether the evaluator re-checks the instruction stream on every pixel
/// (`WhilePerPixel`, the default) or at most once (`OnePerPixel`, which
/// limits state mutations to one per pixel for predictable cost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopperMode {
    #[default]
    WhilePerPixel,
    OnePerPixel,
}

struct EvalState {
    wait_x: u32,
    wait_y: u32,
    modulo: i32,
    offset: i32,
    bias: i32,
    active_slot: usize,
}

/// Converts `canvas`'s indexed surface to RGBA into `out` (row-major,
/// `width * height` long), running `copperlist` against working copies of
/// the shifting table and palette slots.
///
/// When `copperlist` is `None`, a tight single-pass converter is used that
/// skips the per-pixel program check entirely.
pub fn convert_to_rgba(canvas: &Canvas, copperlist: Option<&CopperList>, mode: CopperMode, out: &mut [Color]) {
    let surface = canvas.surface();
    let w = surface.width() as i32;
    let h = surface.height() as i32;
    debug_assert_eq!(out.len(), (w * h) as usize);

    let Some(copperlist) = copperlist else {
        convert_to_rgba_fast(canvas, out);
        return;
    };

    let mut shifting = canvas.shifting().clone();
    let mut slots: Vec<Palette> = canvas.palette_slots().to_vec();
    let program = copperlist.instructions();

    let mut state = EvalState {
        wait_x: 0,
        wait_y: 0,
        modulo: 0,
        offset: 0,
        bias: canvas.bias(),
        active_slot: canvas.active_palette_id(),
    };
    let mut pc = 0usize;

    let src = surface.data();
    let mut row_src_extra = 0i64;
    let mut row_dst_extra = 0i64;

    for y in 0..h {
        let row_start = (y as usize * w as usize) as i64;
        let src_row_start = row_start + row_src_extra;
        let dst_row_start = row_start + row_dst_extra;

        for x in 0..w {
            run_copper_step(program, &mut pc, &mut state, &mut shifting, &mut slots, x as u32, y as u32, mode);

            let src_idx = src_row_start + x as i64;
            let dst_idx = dst_row_start + x as i64;
            if src_idx < 0 || src_idx as usize >= src.len() || dst_idx < 0 || dst_idx as usize >= out.len() {
                continue;
            }
            let pixel = src[src_idx as usize];
            let biased = Pixel::new(pixel.get().wrapping_add(state.bias as u8));
            let resolved = shifting.resolve(biased);
            let color = slots[state.active_slot].get(resolved);
            out[dst_idx as usize] = color;
        }

        // `modulo`/`offset` take effect from the next row onward — they warp
        // the source read and destination write start respectively.
        row_src_extra += state.modulo as i64;
        row_dst_extra += state.offset as i64;
    }
}

#[allow(clippy::too_many_arguments)]
fn run_copper_step(
    program: &[Instruction],
    pc: &mut usize,
    state: &mut EvalState,
    shifting: &mut ShiftingTable,
    slots: &mut [Palette],
    x: u32,
    y: u32,
    mode: CopperMode,
) {
    let condition = |pc: usize, state: &EvalState| x >= state.wait_x && y >= state.wait_y && pc < program.len();

    if mode == CopperMode::OnePerPixel {
        if condition(*pc, state) {
            apply_instruction(program[*pc], pc, state, shifting, slots);
        }
        return;
    }

    while condition(*pc, state) {
        apply_instruction(program[*pc], pc, state, shifting, slots);
    }
}

fn apply_instruction(
    instruction: Instruction,
    pc: &mut usize,
    state: &mut EvalState,
    shifting: &mut ShiftingTable,
    slots: &mut [Palette],
) {
    *pc += 1;
    match instruction {
        Instruction::Wait(wx, wy) => {
            state.wait_x = wx;
            state.wait_y = wy;
        }
        Instruction::Modulo(m) => state.modulo = m,
        Instruction::Offset(o) => state.offset = o,
        Instruction::Palette(slot) => {
            if slot < slots.len() {
                state.active_slot = slot;
            }
        }
        Instruction::Color(pixel, color) => {
            if let Some(slot) = slots.get_mut(state.active_slot) {
                slot.set(pixel, color);
            }
        }
        Instruction::Bias(b) => state.bias = b,
        Instruction::Shift(from, to) => shifting.set(from, to),
    }
}

/// Single-pass converter used when no copperlist is installed.
fn convert_to_rgba_fast(canvas: &Canvas, out: &mut [Color]) {
    let surface = canvas.surface();
    let palette = &canvas.palette_slots()[canvas.active_palette_id()];
    let shifting = canvas.shifting();
    let bias = canvas.bias();

    for (i, pixel) in surface.data().iter().enumerate() {
        let biased = Pixel::new(pixel.get().wrapping_add(bias as u8));
        let resolved = shifting.resolve(biased);
        out[i] = palette.get(resolved);
    }
}

/// Allocates and returns a freshly converted RGBA buffer.
pub fn to_rgba(canvas: &Canvas, copperlist: Option<&CopperList>, mode: CopperMode) -> Vec<Color> {
    let len = canvas.surface().width() as usize * canvas.surface().height() as usize;
    let mut out = vec![Color::default(); len];
    convert_to_rgba(canvas, copperlist, mode, &mut out);
    out
}

const _: () = assert!(PALETTE_ENTRIES == 256);

#[cfg(test)]
mod tests {
    use super::*;
    use pixeltide_shared::Point;

    fn setup_4x1() -> Canvas {
        let mut c = Canvas::new(4, 1);
        c.set_palette(0, &[Color::BLACK, Color::rgb(255, 0, 0), Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)])
            .unwrap();
        for (i, px) in [0u8, 1, 2, 3].into_iter().enumerate() {
            c.surface_mut().put(Point::new(i as i32, 0), Pixel::new(px));
        }
        c
    }

    #[test]
    fn palette_cycling_via_copperlist() {
        let c = setup_4x1();
        let yellow = Color::rgb(255, 255, 0);
        let copper = CopperList::new(vec![Instruction::Wait(0, 0), Instruction::Color(Pixel::new(1), yellow)]);

        let rgba = to_rgba(&c, Some(&copper), CopperMode::WhilePerPixel);
        assert_eq!(rgba, vec![Color::BLACK, yellow, Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)]);

        let rgba_without = to_rgba(&c, None, CopperMode::WhilePerPixel);
        assert_eq!(
            rgba_without,
            vec![Color::BLACK, Color::rgb(255, 0, 0), Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)]
        );
    }

    #[test]
    fn shifting_round_trip() {
        let mut c = Canvas::new(1, 1);
        c.set_palette(0, &[Color::rgb(1, 1, 1), Color::rgb(2, 2, 2)]).unwrap();
        let before = to_rgba(&c, None, CopperMode::WhilePerPixel);
        assert_eq!(before[0], Color::rgb(1, 1, 1));

        c.set_shifting([(Pixel::new(0), Pixel::new(1))]);
        let shifted = to_rgba(&c, None, CopperMode::WhilePerPixel);
        assert_eq!(shifted[0], Color::rgb(2, 2, 2));

        c.set_shifting([]);
        let reset = to_rgba(&c, None, CopperMode::WhilePerPixel);
        assert_eq!(reset[0], Color::rgb(1, 1, 1));
    }

    #[test]
    fn wait_0_0_copperlist_is_a_noop() {
        let c = setup_4x1();
        let copper = CopperList::new(vec![Instruction::Wait(0, 0)]);
        let with_copper = to_rgba(&c, Some(&copper), CopperMode::WhilePerPixel);
        let without = to_rgba(&c, None, CopperMode::WhilePerPixel);
        assert_eq!(with_copper, without);
    }

    #[test]
    fn one_per_pixel_mode_limits_mutations() {
        let c = setup_4x1();
        // Two Color ops gated behind the same Wait(0,0): in `while` mode both
        // fire on the very first pixel; in `one-per-pixel` mode only the
        // first does, and the second fires on the *next* pixel instead.
        let copper = CopperList::new(vec![
            Instruction::Wait(0, 0),
            Instruction::Color(Pixel::new(1), Color::rgb(9, 9, 9)),
            Instruction::Color(Pixel::new(2), Color::rgb(8, 8, 8)),
        ]);
        let while_mode = to_rgba(&c, Some(&copper), CopperMode::WhilePerPixel);
        assert_eq!(while_mode[1], Color::rgb(9, 9, 9));
        assert_eq!(while_mode[2], Color::rgb(8, 8, 8));

        let one_per_pixel = to_rgba(&c, Some(&copper), CopperMode::OnePerPixel);
        // First pixel (index 0) only consumes `Wait`; pixel 1 consumes the
        // first `Color`, so index 2's original green has already been
        // overwritten to (9,9,9) by the time the second `Color` op fires at
        // pixel 2 and takes effect from pixel 3 onward — but since the list
        // only has 3 entries, pixel index 1's color comes from slot state
        // *before* the first Color op is applied.
        assert_eq!(one_per_pixel[0], Color::BLACK);
    }
}
