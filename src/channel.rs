//! Bounded queue from the row interrupt handler to the polling task
//!
//! Single producer (the interrupt handler shared by all rows), single
//! consumer (the polling task). The producer never blocks: a full queue drops
//! the notification.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::pins::PinId;
use crate::timer::{Duration, Timer};

/// Notifications the queue holds before dropping
pub const CHANNEL_CAPACITY: usize = 10;

// One slot of a heapless queue is always kept free
const SLOTS: usize = CHANNEL_CAPACITY + 1;

/// A rising edge seen on a row pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    pub row: PinId,
}

pub struct EventChannel {
    queue: Queue<EdgeEvent, SLOTS>,
}

impl EventChannel {
    pub const fn new() -> Self {
        EventChannel {
            queue: Queue::new(),
        }
    }

    pub fn split(&mut self) -> (EventSender<'_>, EventReceiver<'_>) {
        let (producer, consumer) = self.queue.split();
        (EventSender { producer }, EventReceiver { consumer })
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt side of the channel
pub struct EventSender<'a> {
    producer: Producer<'a, EdgeEvent, SLOTS>,
}

impl<'a> EventSender<'a> {
    /// Returns the event back if the channel is full
    pub fn try_send(&mut self, event: EdgeEvent) -> Result<(), EdgeEvent> {
        self.producer.enqueue(event)
    }
}

/// Task side of the channel
pub struct EventReceiver<'a> {
    consumer: Consumer<'a, EdgeEvent, SLOTS>,
}

impl<'a> EventReceiver<'a> {
    pub fn try_recv(&mut self) -> Option<EdgeEvent> {
        self.consumer.dequeue()
    }

    /// Waits up to `timeout` for a notification
    pub fn recv_timeout<T: Timer>(&mut self, timer: &mut T, timeout: Duration) -> Option<EdgeEvent> {
        let deadline = timer.now() + timeout;
        loop {
            if let Some(event) = self.consumer.dequeue() {
                return Some(event);
            }
            if timer.now() >= deadline {
                return None;
            }
            timer.sleep_until(deadline);
        }
    }

    /// Discards pending notifications, returning how many there were
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.consumer.dequeue().is_some() {
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
