//! Driver for a 5 row by 4 column diode matrix numeric keypad.
//!
//! A rising edge on a row pin wakes the polling task through a bounded
//! channel, the task debounces by rescanning the matrix on a timer and reports
//! confirmed key-down/key-up events to a [`output::KeyOutput`].

#![no_std]

#[macro_use]
mod fmt;

pub mod channel;
pub mod config;
pub mod debounce;
pub mod error;
pub mod interrupt;
pub mod keycode;
pub mod keymap;
pub mod matrix;
pub mod output;
pub mod pins;
pub mod task;
pub mod timer;

#[cfg(test)]
mod sim;

pub use config::Config;
pub use error::Error;
pub use keycode::Keycode;
