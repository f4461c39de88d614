//! Drawing, blitting, stencil/blend and scan operations over a [`Canvas`].
//!
//! Every operation here honours the canvas's current clipping rectangle and
//! is mediated by shifting and transparency, except [`ops::copy`] which is
//! an explicit bypass for same-palette framebuffer transfers.

mod blit;
mod ops;
mod ops_types;
mod primitives;
mod write;

pub use blit::{blit, blit_rotated, blit_scaled, blit_tiled};
pub use ops::{blend, copy, process, scan, stencil};
pub use ops_types::{BlendFunction, Comparator};
pub use primitives::{circle, flood_fill, hline, line, point, rectangle, triangle, vline};
