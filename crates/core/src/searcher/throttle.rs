//! Minimum-interval request throttle.

use tokio::time::{Duration, Instant};

/// Spaces consecutive requests by at least `min_interval`.
///
/// The last-request timestamp starts at construction time, so the first
/// request after creation also waits out the interval.
#[derive(Debug)]
pub struct MinIntervalThrottle {
    min_interval: Duration,
    last_request: Instant,
}

impl MinIntervalThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Instant::now(),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Time left before the next request may start.
    pub fn remaining(&self) -> Duration {
        self.min_interval
            .saturating_sub(Instant::now().duration_since(self.last_request))
    }

    /// Sleep until the interval since the last request has passed.
    pub async fn wait(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }
    }

    /// Mark a request as finished now.
    pub fn record(&mut self) {
        self.last_request = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_never_waits() {
        let throttle = MinIntervalThrottle::new(Duration::ZERO);
        assert_eq!(throttle.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_waits_from_construction() {
        let throttle = MinIntervalThrottle::new(Duration::from_millis(1200));
        assert_eq!(throttle.remaining(), Duration::from_millis(1200));

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(throttle.remaining(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_remaining_delta() {
        let mut throttle = MinIntervalThrottle::new(Duration::from_millis(1000));
        let start = Instant::now();
        throttle.wait().await;
        throttle.record();
        assert!(start.elapsed() >= Duration::from_millis(1000));

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(throttle.remaining(), Duration::ZERO);
        let before = Instant::now();
        throttle.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
