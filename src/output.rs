//! Where confirmed key events go

use core::convert::Infallible;

use crate::keymap::Keyboard;

/// Output transport for confirmed key events, typically a USB HID keyboard.
pub trait KeyOutput {
    type Error;

    fn key_down(&mut self, key: Keyboard) -> Result<(), Self::Error>;
    fn key_up(&mut self) -> Result<(), Self::Error>;
}

/// Holds the key to put in the next keyboard report.
///
/// The HID class writes `keys()` on every report tick, so a held key keeps
/// being reported until `key_up`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HidReport {
    held: Option<Keyboard>,
}

impl HidReport {
    pub const fn new() -> Self {
        HidReport { held: None }
    }

    pub fn held(&self) -> Option<Keyboard> {
        self.held
    }

    pub fn keys(&self) -> impl Iterator<Item = Keyboard> {
        self.held.into_iter()
    }
}

impl KeyOutput for HidReport {
    type Error = Infallible;

    fn key_down(&mut self, key: Keyboard) -> Result<(), Infallible> {
        self.held = Some(key);
        Ok(())
    }

    fn key_up(&mut self) -> Result<(), Infallible> {
        self.held = None;
        Ok(())
    }
}
