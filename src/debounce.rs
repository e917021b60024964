//! Turns noisy contacts into confirmed key-down/key-up events
//!
//! A single key is tracked at a time. An edge notification starts a press;
//! the press and the release are each accepted only if a rescan after the
//! stability window still agrees. Row interrupts stay masked from the first
//! edge until the machine is back in [`DebounceState::Idle`].

use crate::config::Config;
use crate::error::Error;
use crate::keycode::Keycode;
use crate::keymap::{Keymap, NO_KEY};
use crate::matrix::Scan;
use crate::output::KeyOutput;
use crate::pins::RowInterrupts;
use crate::timer::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Waiting for an edge notification
    Idle,
    /// Edge seen at `since`, waiting for the contact to settle
    AwaitPressStable { since: Instant },
    /// A key is down
    Pressed,
    /// Matrix went open at `since`, waiting to confirm the release
    AwaitReleaseStable { since: Instant },
}

pub struct Debouncer {
    state: DebounceState,
    confirmed: Keycode,
    /// Whether a key-down went out for `confirmed`
    reported: bool,
    keymap: Keymap,
    poll_period: Duration,
    stability: Duration,
    quantum: Duration,
}

impl Debouncer {
    pub fn new(config: &Config, keymap: Keymap) -> Self {
        Debouncer {
            state: DebounceState::Idle,
            confirmed: Keycode::NO_KEY,
            reported: false,
            keymap,
            poll_period: config.poll_period,
            stability: config.stability,
            quantum: config.quantum,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Key accepted by the last press, [`Keycode::NO_KEY`] when idle
    pub fn confirmed(&self) -> Keycode {
        self.confirmed
    }

    /// Shortest wait between two iterations of the task loop
    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// How long the task may wait for a notification before calling
    /// [`Debouncer::step`] again. Never shorter than the quantum.
    pub fn timeout(&self, now: Instant) -> Duration {
        let timeout = match self.state {
            DebounceState::Idle | DebounceState::Pressed => self.poll_period,
            DebounceState::AwaitPressStable { since }
            | DebounceState::AwaitReleaseStable { since } => {
                let elapsed = elapsed(since, now);
                if elapsed < self.stability {
                    self.stability - elapsed
                } else {
                    Duration::from_ticks(0)
                }
            }
        };

        if timeout < self.quantum {
            self.quantum
        } else {
            timeout
        }
    }

    /// Advances the machine. `edge` tells whether at least one edge
    /// notification arrived since the previous step; only `Idle` looks at it.
    pub fn step<S, O, I>(
        &mut self,
        edge: bool,
        now: Instant,
        scanner: &mut S,
        output: &mut O,
        interrupts: &I,
    ) -> Result<(), Error<S::Error, O::Error>>
    where
        S: Scan,
        O: KeyOutput,
        I: RowInterrupts,
    {
        match self.state {
            DebounceState::Idle => {
                if edge {
                    interrupts.disable_all();
                    self.state = DebounceState::AwaitPressStable { since: now };
                    trace!("edge, waiting for contact to settle");
                }
            }

            DebounceState::AwaitPressStable { since } => {
                if elapsed(since, now) < self.stability {
                    return Ok(());
                }

                let keycode = scanner.scan_first().map_err(Error::Scan)?;
                if keycode.is_none() {
                    debug!("no key after settling, ignoring edge");
                    self.enter_idle(interrupts);
                    return Ok(());
                }

                self.confirmed = keycode;
                self.state = DebounceState::Pressed;

                let key = self.keymap.lookup(keycode);
                if key == NO_KEY {
                    warn!("keycode {:#x} is not mapped", keycode.raw());
                    self.reported = false;
                } else {
                    info!("key down {:#x} -> {}", keycode.raw(), u8::from(key));
                    self.reported = true;
                    output.key_down(key).map_err(Error::Output)?;
                }
            }

            DebounceState::Pressed => {
                if scanner.scan_first().map_err(Error::Scan)?.is_none() {
                    self.state = DebounceState::AwaitReleaseStable { since: now };
                    trace!("matrix open, waiting to confirm release");
                }
            }

            DebounceState::AwaitReleaseStable { since } => {
                if elapsed(since, now) < self.stability {
                    return Ok(());
                }

                if !scanner.scan_first().map_err(Error::Scan)?.is_none() {
                    debug!("release bounced, key still down");
                    self.state = DebounceState::Pressed;
                    return Ok(());
                }

                let released = self.confirmed;
                let reported = self.reported;
                self.confirmed = Keycode::NO_KEY;
                self.reported = false;
                self.enter_idle(interrupts);

                if reported {
                    info!("key up {:#x}", released.raw());
                    output.key_up().map_err(Error::Output)?;
                }
            }
        }
        Ok(())
    }

    fn enter_idle<I: RowInterrupts>(&mut self, interrupts: &I) {
        self.state = DebounceState::Idle;
        interrupts.enable_all();
    }
}

fn elapsed(since: Instant, now: Instant) -> Duration {
    now.checked_duration_since(since)
        .unwrap_or(Duration::from_ticks(0))
}
