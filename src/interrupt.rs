//! Row edge interrupt handling
//!
//! Runs in interrupt context: it masks the row that fired and posts a
//! notification. Scanning and column control stay in the polling task.

use crate::channel::{EdgeEvent, EventSender};
use crate::pins::{PinId, RowInterrupts};

pub struct InterruptGateway<'a, I> {
    sender: EventSender<'a>,
    interrupts: &'a I,
    dropped: u32,
}

impl<'a, I: RowInterrupts> InterruptGateway<'a, I> {
    pub fn new(sender: EventSender<'a>, interrupts: &'a I) -> Self {
        InterruptGateway {
            sender,
            interrupts,
            dropped: 0,
        }
    }

    /// Call from the GPIO interrupt handler with the row pin that fired.
    pub fn on_edge(&mut self, row: PinId) {
        self.interrupts.disable(row);
        if self.sender.try_send(EdgeEvent { row }).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    /// Notifications lost to a full channel
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
