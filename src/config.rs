//! Tunable timing of the driver

use crate::timer::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How long the task waits for an edge notification before polling anyway
    pub poll_period: Duration,
    /// How long a contact must hold before a press or release is accepted
    pub stability: Duration,
    /// Shortest wait between two iterations of the task loop
    pub quantum: Duration,
    /// Time between driving a column and sampling the rows
    pub settle_us: u32,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            poll_period: Duration::millis(10),
            stability: Duration::millis(10),
            quantum: Duration::millis(1),
            settle_us: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
