//! Simulated keypad board for host tests
//!
//! Cells close and open on a time script. A row reads high when a closed
//! cell connects it to a column that is an output driven high. Time only moves
//! through the settle delay and the task's sleeps.

extern crate std;

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::keymap::Keyboard;
use crate::matrix::Matrix;
use crate::output::KeyOutput;
use crate::pins::{ColumnPin, Direction, PinId, RowInterrupts, COLS, ROWS};
use crate::timer::{Duration, Instant, Timer};

const SETTLE_US: u32 = 10;

/// Error of a simulated pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

pub fn ms(millis: u64) -> Instant {
    Instant::from_ticks(millis * 1000)
}

struct State {
    now: Instant,
    contacts: Vec<(Instant, Vec<(usize, usize)>)>,
    col_direction: [Direction; COLS],
    col_high: [bool; COLS],
    last_drive: Instant,
    unsettled_reads: usize,
    /// Row reads left before the pins start failing
    reads_left: Option<usize>,
}

impl State {
    fn closed(&self, row: usize, col: usize) -> bool {
        self.contacts
            .iter()
            .rev()
            .find(|(at, _)| *at <= self.now)
            .map_or(false, |(_, cells)| cells.contains(&(row, col)))
    }

    fn row_high(&self, row: usize) -> bool {
        (0..COLS).any(|col| {
            self.col_direction[col] == Direction::Output
                && self.col_high[col]
                && self.closed(row, col)
        })
    }

    fn drive(&mut self, col: usize, direction: Direction, high: bool) {
        if self.col_direction[col] != direction || self.col_high[col] != high {
            self.col_direction[col] = direction;
            self.col_high[col] = high;
            self.last_drive = self.now;
        }
    }
}

#[derive(Clone)]
pub struct Board(Rc<RefCell<State>>);

impl Board {
    pub fn new() -> Self {
        Board(Rc::new(RefCell::new(State {
            now: ms(0),
            contacts: Vec::new(),
            col_direction: [Direction::Input; COLS],
            col_high: [false; COLS],
            last_drive: ms(0),
            unsettled_reads: 0,
            reads_left: None,
        })))
    }

    /// From `at` on, exactly `cells` (row, column) are closed
    pub fn contacts_at(&self, at: Instant, cells: &[(usize, usize)]) {
        let mut state = self.0.borrow_mut();
        state.contacts.retain(|(time, _)| *time != at);
        state.contacts.push((at, cells.to_vec()));
        state.contacts.sort_by_key(|(time, _)| time.ticks());
    }

    pub fn now(&self) -> Instant {
        self.0.borrow().now
    }

    pub fn columns_idle(&self) -> bool {
        let state = self.0.borrow();
        (0..COLS).all(|col| state.col_direction[col] == Direction::Output && state.col_high[col])
    }

    /// Row reads that happened before a column change had settled
    pub fn unsettled_reads(&self) -> usize {
        self.0.borrow().unsettled_reads
    }

    /// Row reads fail once `reads` more of them have succeeded
    pub fn fail_reads_after(&self, reads: usize) {
        self.0.borrow_mut().reads_left = Some(reads);
    }

    pub fn repair(&self) {
        self.0.borrow_mut().reads_left = None;
    }

    pub fn matrix(&self) -> Matrix<SimRow, SimCol, SimDelay> {
        Matrix::new(
            core::array::from_fn(|row| SimRow {
                board: self.clone(),
                row,
            }),
            core::array::from_fn(|col| SimCol {
                board: self.clone(),
                col,
            }),
            SimDelay {
                board: self.clone(),
            },
            SETTLE_US,
        )
    }

    pub fn timer(&self) -> SimTimer {
        SimTimer {
            board: self.clone(),
        }
    }

    pub fn interrupts(&self) -> SimInterrupts {
        SimInterrupts::default()
    }
}

pub struct SimRow {
    board: Board,
    row: usize,
}

impl InputPin for SimRow {
    type Error = PinFault;

    fn is_high(&self) -> Result<bool, PinFault> {
        let mut state = self.board.0.borrow_mut();
        match state.reads_left {
            Some(0) => return Err(PinFault),
            Some(n) => state.reads_left = Some(n - 1),
            None => {}
        }
        let since_drive = state
            .now
            .checked_duration_since(state.last_drive)
            .unwrap_or(Duration::from_ticks(0));
        if since_drive < Duration::micros(SETTLE_US as u64) {
            state.unsettled_reads += 1;
        }
        Ok(state.row_high(self.row))
    }

    fn is_low(&self) -> Result<bool, PinFault> {
        self.is_high().map(|high| !high)
    }
}

pub struct SimCol {
    board: Board,
    col: usize,
}

impl OutputPin for SimCol {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), PinFault> {
        let mut state = self.board.0.borrow_mut();
        let direction = state.col_direction[self.col];
        state.drive(self.col, direction, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        let mut state = self.board.0.borrow_mut();
        let direction = state.col_direction[self.col];
        state.drive(self.col, direction, true);
        Ok(())
    }
}

impl ColumnPin for SimCol {
    fn set_direction(&mut self, direction: Direction) -> Result<(), PinFault> {
        let mut state = self.board.0.borrow_mut();
        let high = state.col_high[self.col];
        state.drive(self.col, direction, high);
        Ok(())
    }
}

pub struct SimDelay {
    board: Board,
}

impl DelayUs<u32> for SimDelay {
    fn delay_us(&mut self, us: u32) {
        let mut state = self.board.0.borrow_mut();
        state.now = state.now + Duration::micros(us as u64);
    }
}

pub struct SimTimer {
    board: Board,
}

impl Timer for SimTimer {
    fn now(&self) -> Instant {
        self.board.now()
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let mut state = self.board.0.borrow_mut();
        if deadline > state.now {
            state.now = deadline;
        }
    }
}

/// Row interrupt masks, all masked at reset
#[derive(Default)]
pub struct SimInterrupts {
    enabled: Cell<u8>,
}

impl SimInterrupts {
    pub fn is_enabled(&self, pin: PinId) -> bool {
        pin.row_index()
            .map_or(false, |row| self.enabled.get() & (1 << row) != 0)
    }

    pub fn all_enabled(&self) -> bool {
        self.enabled.get() == (1 << ROWS) - 1
    }

    pub fn all_disabled(&self) -> bool {
        self.enabled.get() == 0
    }
}

impl RowInterrupts for SimInterrupts {
    fn enable(&self, pin: PinId) {
        if let Some(row) = pin.row_index() {
            self.enabled.set(self.enabled.get() | 1 << row);
        }
    }

    fn disable(&self, pin: PinId) {
        if let Some(row) = pin.row_index() {
            self.enabled.set(self.enabled.get() & !(1 << row));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Down(Keyboard),
    Up,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl KeyOutput for Recorder {
    type Error = Infallible;

    fn key_down(&mut self, key: Keyboard) -> Result<(), Infallible> {
        self.events.push(Event::Down(key));
        Ok(())
    }

    fn key_up(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::Up);
        Ok(())
    }
}
