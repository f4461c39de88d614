/// Number of palette slots a [`crate::Pixel`] table is addressable over.
pub const PALETTE_ENTRIES: usize = 256;

/// Minimum number of palette slots a canvas must support.
pub const MAX_PALETTE_SLOTS: usize = 8;

/// Number of audio mixer groups. Group 0 is the default.
pub const GROUPS_AMOUNT: usize = 256;
