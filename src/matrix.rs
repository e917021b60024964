//! Decodes the keypad matrix
//!
//! A column is active when driven high. While the driver is idle every column
//! is an output driven high, so closing any cell raises its row and fires the
//! row interrupt. Both scan modes leave the columns in that state on exit.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::InputPin;
use heapless::Vec;

use crate::keycode::Keycode;
use crate::pins::{ColumnPin, Direction, COLS, ROWS};

/// Cells a full scan can report at once
pub const SCAN_CAPACITY: usize = 20;

pub type ScanResult = Vec<Keycode, SCAN_CAPACITY>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScanFlags {
    /// A full scan found more closed cells than it could report
    pub rollover: bool,
}

/// Resolves the closed cell seen by a single key debouncer
pub trait Scan {
    type Error;

    /// First closed cell in column-major, row-minor order, or
    /// [`Keycode::NO_KEY`]
    fn scan_first(&mut self) -> Result<Keycode, Self::Error>;
}

pub struct Matrix<RowT, ColT, D> {
    rows: [RowT; ROWS],
    cols: [ColT; COLS],
    delay: D,
    settle_us: u32,
    pub flags: ScanFlags,
}

impl<E, RowT, ColT, D> Matrix<RowT, ColT, D>
where
    RowT: InputPin<Error = E>,
    ColT: ColumnPin<Error = E>,
    D: DelayUs<u32>,
{
    pub fn new(rows: [RowT; ROWS], cols: [ColT; COLS], delay: D, settle_us: u32) -> Self {
        Matrix {
            rows,
            cols,
            delay,
            settle_us,
            flags: ScanFlags::default(),
        }
    }

    /// Puts the columns in the idle state. Call before enabling row
    /// interrupts.
    pub fn init(&mut self) -> Result<(), E> {
        self.idle()
    }

    /// Samples every row, bit `i` set when row `i` reads high
    pub fn read_rows(&self) -> Result<u8, E> {
        sample(&self.rows)
    }

    /// Scans every column and reports all closed cells in column-major,
    /// row-minor order. Cells beyond the capacity of `keys` are dropped and
    /// flagged in [`ScanFlags::rollover`].
    pub fn scan_all<const N: usize>(&mut self, keys: &mut Vec<Keycode, N>) -> Result<(), E> {
        keys.clear();
        let scanned = self.walk_columns(|col, rows| {
            for row in (0..ROWS).filter(|row| rows & (1 << row) != 0) {
                if keys.push(Keycode::from_cell(row, col)).is_err() {
                    return Some(true);
                }
            }
            None
        });
        let restored = self.idle();

        let rollover = scanned?.unwrap_or(false);
        restored?;

        self.flags.rollover = rollover;
        if rollover {
            warn!("more than {} keys closed, dropping the rest", N);
        }
        Ok(())
    }

    /// Full scan into a fresh [`ScanResult`]
    pub fn scan(&mut self) -> Result<ScanResult, E> {
        let mut keys = Vec::new();
        self.scan_all(&mut keys)?;
        Ok(keys)
    }

    fn first_closed(&mut self) -> Result<Keycode, E> {
        // With the columns idle they are all active, so an open matrix shows
        // up as no row high and the column walk can be skipped.
        self.idle()?;
        self.delay.delay_us(self.settle_us);
        if sample(&self.rows)? == 0 {
            return Ok(Keycode::NO_KEY);
        }

        let found = self.walk_columns(|col, rows| {
            (rows != 0).then(|| Keycode::from_cell(rows.trailing_zeros() as usize, col))
        })?;
        Ok(found.unwrap_or(Keycode::NO_KEY))
    }

    /// Drives each column active in turn, calling `f` with the column index
    /// and the sampled rows. Stops at the first `Some`.
    fn walk_columns<T>(&mut self, mut f: impl FnMut(usize, u8) -> Option<T>) -> Result<Option<T>, E> {
        for col in self.cols.iter_mut() {
            col.set_direction(Direction::Output)?;
            col.set_low()?;
        }

        for (c, col) in self.cols.iter_mut().enumerate() {
            col.set_high()?;
            self.delay.delay_us(self.settle_us);
            let rows = sample(&self.rows)?;
            col.set_low()?;

            if let Some(found) = f(c, rows) {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn idle(&mut self) -> Result<(), E> {
        for col in self.cols.iter_mut() {
            col.set_direction(Direction::Output)?;
            col.set_high()?;
        }
        Ok(())
    }
}

impl<E, RowT, ColT, D> Scan for Matrix<RowT, ColT, D>
where
    RowT: InputPin<Error = E>,
    ColT: ColumnPin<Error = E>,
    D: DelayUs<u32>,
{
    type Error = E;

    fn scan_first(&mut self) -> Result<Keycode, E> {
        let found = self.first_closed();
        let restored = self.idle();

        let found = found?;
        restored?;
        Ok(found)
    }
}

fn sample<E, RowT: InputPin<Error = E>>(rows: &[RowT; ROWS]) -> Result<u8, E> {
    let mut levels = 0;
    for (i, row) in rows.iter().enumerate() {
        if row.is_high()? {
            levels |= 1 << i;
        }
    }
    Ok(levels)
}
