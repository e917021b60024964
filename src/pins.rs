//! Pin assignment and the pin-control capability the driver needs

use embedded_hal::digital::v2::OutputPin;

pub const ROWS: usize = 5;
pub const COLS: usize = 4;

/// GPIO number of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Columns, in scan order. Driven high while idle so a key press raises its row.
pub const COL_PINS: [PinId; COLS] = [PinId(10), PinId(17), PinId(18), PinId(21)];

/// Rows, pulled down, interrupting on a rising edge
pub const ROW_PINS: [PinId; ROWS] = [PinId(5), PinId(6), PinId(7), PinId(8), PinId(9)];

impl PinId {
    /// Position of this pin in [`ROW_PINS`]
    pub fn row_index(self) -> Option<usize> {
        ROW_PINS.iter().position(|pin| *pin == self)
    }

    /// Position of this pin in [`COL_PINS`]
    pub fn col_index(self) -> Option<usize> {
        COL_PINS.iter().position(|pin| *pin == self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// A column line: an output whose direction can be switched at runtime.
pub trait ColumnPin: OutputPin {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
}

/// Edge interrupt control for the row pins.
///
/// Takes `&self` because it is shared between the interrupt handler, which
/// masks the row that fired, and the polling task, which unmasks all rows once
/// it is idle again. Implementations must be safe to call from both.
pub trait RowInterrupts {
    fn enable(&self, pin: PinId);
    fn disable(&self, pin: PinId);

    fn enable_all(&self) {
        for pin in ROW_PINS {
            self.enable(pin);
        }
    }

    fn disable_all(&self) {
        for pin in ROW_PINS {
            self.disable(pin);
        }
    }
}
