use std::time::Duration;

use rand::Rng;

/// Exponential backoff with additive jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub cap: Duration,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// `min(cap, base * 2^attempt)`.
    pub fn exponential(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt.min(62) as i32);
        let secs = (self.base.as_secs_f64() * factor).min(self.cap.as_secs_f64());
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Sleep before retry number `attempt + 1`.
    ///
    /// A server-provided `Retry-After` that parses as seconds replaces the
    /// exponential term (capped); jitter in `[0, 0.25 * exponential)` is
    /// added either way.
    pub fn delay<R: Rng>(
        &self,
        attempt: u32,
        retry_after: Option<&str>,
        rng: &mut R,
    ) -> Duration {
        let backoff = self.exponential(attempt);
        let base = retry_after
            .and_then(parse_retry_after)
            .map(|server| server.min(self.cap))
            .unwrap_or(backoff);

        let jitter_upper = 0.25 * backoff.as_secs_f64();
        let jitter = if jitter_upper > 0.0 {
            rng.gen_range(0.0..jitter_upper)
        } else {
            0.0
        };
        base + Duration::from_secs_f64(jitter)
    }
}

/// Retry-After in (possibly fractional) seconds. HTTP-date values are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}
