// Board geometry
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const CELLS: usize = COLS * ROWS;
pub const CONNECT: usize = 4;

// Score bounds used as the initial alpha-beta window.
pub const MINUS_INFINITY: i32 = -(1 << 30);
pub const PLUS_INFINITY: i32 = 1 << 30;

// Terminal scores, always from Red's point of view.
pub const WIN_SCORE: i32 = 10_000;
pub const DRAW_SCORE: i32 = 0;

// Value of an uncontested length-4 window, indexed by the number of stones
// one player has in it. Four in a window is terminal and scored separately.
pub const WINDOW_WEIGHTS: [i32; CONNECT + 1] = [0, 0x04, 0x10, 0x40, 0xFF];

// Center column, played on an empty board instead of searching.
pub const OPENING_COLUMN: usize = 3;

// Packed layout: one byte per column, metadata in the top byte.
pub const COLUMN_BITS: u32 = 8;
pub const META_SHIFT: u32 = COLUMN_BITS * COLS as u32;
pub const BOARD_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;
pub const META_COLUMN_MASK: u8 = 0x07;
pub const META_PLAYER_BIT: u8 = 0x08;
pub const NO_COLUMN: u8 = 0x07;
