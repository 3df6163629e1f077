use std::time::{Duration, Instant};

/// Enforces a minimum interval between calls made through one instance.
///
/// Local to the instance: two clients (or two processes) each get their own
/// budget and together can exceed the remote limit.
#[derive(Debug)]
pub struct MinIntervalLimiter {
    min_interval: Duration,
    next_allowed_at: Option<Instant>,
}

impl MinIntervalLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed_at: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Blocks until the next call is allowed, then books the following slot.
    pub fn wait(&mut self) {
        if let Some(next) = self.next_allowed_at {
            let now = Instant::now();
            if now < next {
                std::thread::sleep(next - now);
            }
        }
        self.next_allowed_at = Some(Instant::now() + self.min_interval);
    }
}
