//! Packed identifier of one matrix cell
//!
//! The low 4 bits carry the column as a one-hot bit, bits 4 to 8 carry the
//! row the same way, so row 4 column 3 packs to `0x108`.

use crate::pins::{COLS, ROWS};

const COL_BITS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keycode(u16);

impl Keycode {
    /// No key closed
    pub const NO_KEY: Keycode = Keycode(0xFF);

    pub const fn from_cell(row: usize, col: usize) -> Self {
        assert!(row < ROWS && col < COLS);
        Keycode((1 << col) | (1 << (row as u16 + COL_BITS)))
    }

    pub const fn from_raw(raw: u16) -> Self {
        Keycode(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == Self::NO_KEY.0
    }

    pub fn row(self) -> Option<usize> {
        one_hot(self.0 >> COL_BITS, ROWS)
    }

    pub fn col(self) -> Option<usize> {
        one_hot(self.0 & ((1 << COL_BITS) - 1), COLS)
    }
}

impl Default for Keycode {
    fn default() -> Self {
        Self::NO_KEY
    }
}

fn one_hot(bits: u16, width: usize) -> Option<usize> {
    if bits.count_ones() == 1 && (bits.trailing_zeros() as usize) < width {
        Some(bits.trailing_zeros() as usize)
    } else {
        None
    }
}
