use std::time::{Duration, Instant};

/// The dispatch loop's time source.
///
/// Abstracted so tests can drive the scheduler with simulated time; real
/// playback uses [`MonotonicClock`].
pub trait Clock {
    /// Time elapsed since playback start.
    fn elapsed(&self) -> Duration;

    /// Block until `deadline` (measured from playback start) has passed.
    /// Returns immediately if it already has.
    fn wait_until(&mut self, deadline: Duration);
}

/// Wall-clock time from a monotonic [`Instant`], sleeping between deadlines
/// rather than spinning.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    /// Start the clock now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn wait_until(&mut self, deadline: Duration) {
        if let Some(remaining) = deadline.checked_sub(self.started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}
