//! Shared geometry, color and palette types for the Pixeltide fantasy console core.
//!
//! Nothing in this crate owns any runtime state; it exists so that
//! `pixeltide-graphics`, `pixeltide-audio` and `pixeltide-engine` can agree on
//! the same vocabulary without depending on each other.

mod color;
mod constants;
mod geometry;
mod pixel;
mod stream;

pub use color::Color;
pub use constants::{GROUPS_AMOUNT, MAX_PALETTE_SLOTS, PALETTE_ENTRIES};
pub use geometry::{Point, Rect};
pub use pixel::Pixel;
pub use stream::{ByteStream, SeekFrom};

/// Errors that any setter in the graphics or audio data model can report.
///
/// Per the component contracts, an invalid argument is a logged no-op, never
/// a panic; this type exists so callers can decide how to surface that.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidArgument {
    #[error("palette slot {0} out of range (max {})", MAX_PALETTE_SLOTS - 1)]
    PaletteSlot(usize),
    #[error("group id {0} out of range (max {})", GROUPS_AMOUNT - 1)]
    GroupId(usize),
    #[error("pixel index {0} out of range (0..={})", PALETTE_ENTRIES - 1)]
    PixelIndex(usize),
}
