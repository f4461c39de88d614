//! Palette-indexed software rasterizer and copperlist evaluator.
//!
//! [`Canvas`] owns an indexed [`Surface`] plus the drawing state (active
//! palette, shifting table, transparency table, clip, bias, offset) that
//! every `raster` operation is mediated through. [`copper`] consumes a
//! [`copper::CopperList`] at conversion time to rewrite that state per pixel
//! without ever touching the canonical `Canvas`.

mod canvas;
pub mod copper;
mod palette;
pub mod raster;
mod surface;

pub use canvas::Canvas;
pub use copper::{convert_to_rgba, to_rgba, CopperList, CopperMode, Instruction};
pub use palette::{Palette, ShiftingTable, TransparencyTable};
pub use surface::Surface;

pub use pixeltide_shared::{Color, InvalidArgument, Pixel, Point, Rect};
