//! The polling task that owns the debouncer and the matrix

use crate::channel::EventReceiver;
use crate::debounce::Debouncer;
use crate::error::Error;
use crate::matrix::Scan;
use crate::output::KeyOutput;
use crate::pins::RowInterrupts;
use crate::timer::Timer;

pub struct KeypadTask<'a, S, O, I, T> {
    events: EventReceiver<'a>,
    scanner: S,
    output: O,
    interrupts: &'a I,
    timer: T,
    debouncer: Debouncer,
}

impl<'a, S, O, I, T> KeypadTask<'a, S, O, I, T>
where
    S: Scan,
    O: KeyOutput,
    I: RowInterrupts,
    T: Timer,
{
    pub fn new(
        events: EventReceiver<'a>,
        scanner: S,
        output: O,
        interrupts: &'a I,
        timer: T,
        debouncer: Debouncer,
    ) -> Self {
        KeypadTask {
            events,
            scanner,
            output,
            interrupts,
            timer,
            debouncer,
        }
    }

    /// Unmasks the row interrupts and runs forever.
    pub fn run(mut self) -> ! {
        self.interrupts.enable_all();
        loop {
            if let Err(e) = self.poll() {
                match e {
                    Error::Scan(_) => warn!("matrix scan failed"),
                    Error::Output(_) => warn!("key output failed"),
                }
            }
        }
    }

    /// One iteration: wait for an edge or the debouncer's timeout, then step.
    ///
    /// Edges queued behind the first are folded into the same step. Waits at
    /// least one quantum even when an edge is already pending.
    pub fn poll(&mut self) -> Result<(), Error<S::Error, O::Error>> {
        let start = self.timer.now();
        let timeout = self.debouncer.timeout(start);
        let edge = self.events.recv_timeout(&mut self.timer, timeout).is_some();

        let earliest = start + self.debouncer.quantum();
        if self.timer.now() < earliest {
            self.timer.sleep_until(earliest);
        }

        if edge {
            let coalesced = self.events.drain();
            if coalesced > 0 {
                debug!("coalesced {} edge notifications", coalesced);
            }
        }

        let now = self.timer.now();
        self.debouncer.step(
            edge,
            now,
            &mut self.scanner,
            &mut self.output,
            self.interrupts,
        )
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn scanner(&mut self) -> &mut S {
        &mut self.scanner
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
