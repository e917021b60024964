//! Translates matrix keycodes to HID keyboard usages

pub use usbd_human_interface_device::page::Keyboard;

use crate::keycode::Keycode;

/// Charcode reported for a keycode with no mapping
pub const NO_KEY: Keyboard = Keyboard::NoEventIndicated;

/// Upper bound on the number of table entries, one per matrix cell
pub const MAX_MAPPINGS: usize = crate::pins::ROWS * crate::pins::COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub keycode: Keycode,
    pub primary: Keyboard,
    /// Meaning of the key with Num Lock off. Nothing selects it yet.
    pub alternate: Keyboard,
}

const fn map(row: usize, col: usize, primary: Keyboard, alternate: Keyboard) -> Mapping {
    Mapping {
        keycode: Keycode::from_cell(row, col),
        primary,
        alternate,
    }
}

use Keyboard::*;

/// The keypad layout. Row 2 column 3 sits under the double height `+` key
/// and is not populated.
#[rustfmt::skip]
pub const NUMPAD: [Mapping; 19] = [
    map(0, 0, KeypadNumLockAndClear, KeypadNumLockAndClear),
    map(0, 1, KeypadDivide,          KeypadDivide),
    map(0, 2, KeypadMultiply,        KeypadMultiply),
    map(0, 3, KeypadSubtract,        KeypadSubtract),
    map(1, 0, Keypad7,               Home),
    map(1, 1, Keypad8,               UpArrow),
    map(1, 2, Keypad9,               PageUp),
    map(1, 3, KeypadAdd,             KeypadAdd),
    map(2, 0, Keypad4,               LeftArrow),
    map(2, 1, Keypad5,               NoEventIndicated),
    map(2, 2, Keypad6,               RightArrow),
    map(3, 0, Keypad1,               End),
    map(3, 1, Keypad2,               DownArrow),
    map(3, 2, Keypad3,               PageDown),
    map(3, 3, KeypadEnter,           KeypadEnter),
    map(4, 0, Keypad0,               Insert),
    map(4, 1, KeypadDot,             DeleteForward),
    map(4, 2, KeypadEqual,           KeypadEqual),
    map(4, 3, DeleteBackspace,       DeleteBackspace),
];

#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    entries: &'static [Mapping],
}

impl Keymap {
    pub const fn new(entries: &'static [Mapping]) -> Self {
        assert!(entries.len() <= MAX_MAPPINGS);
        Keymap { entries }
    }

    pub const fn numpad() -> Self {
        Self::new(&NUMPAD)
    }

    /// First entry whose keycode matches exactly
    pub fn entry(&self, keycode: Keycode) -> Option<&Mapping> {
        self.entries.iter().find(|entry| entry.keycode == keycode)
    }

    /// Primary charcode for `keycode`, [`NO_KEY`] if unmapped
    pub fn lookup(&self, keycode: Keycode) -> Keyboard {
        self.entry(keycode).map_or(NO_KEY, |entry| entry.primary)
    }

    pub fn alternate(&self, keycode: Keycode) -> Keyboard {
        self.entry(keycode).map_or(NO_KEY, |entry| entry.alternate)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::numpad()
    }
}
