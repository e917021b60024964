/// Time base of the polling task
pub type Instant = fugit::Instant<u64, 1, 1_000_000>;
pub type Duration = fugit::Duration<u64, 1, 1_000_000>;

/// Clock and sleep of the polling task's context.
pub trait Timer {
    fn now(&self) -> Instant;

    /// Sleeps until `deadline`. May return early when an interrupt fires, the
    /// caller rechecks its condition and sleeps again.
    fn sleep_until(&mut self, deadline: Instant);
}
