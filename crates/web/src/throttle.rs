// ABOUTME: Minimum-delay request throttle shared by fetchers.
// ABOUTME: Tracks the completion time of the last request and blocks callers until the delay has elapsed.

use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Enforces a minimum delay between consecutive completed requests.
///
/// The delay is measured from the *completion* of the previous request to
/// the start of the next one. The lock is held for the whole wait/request
/// cycle, so callers sharing a limiter are serialized.
#[derive(Debug, Default)]
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with no request history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion time of the most recent successful request, if any.
    pub fn last_request(&self) -> Option<Instant> {
        *self.last_request.lock()
    }

    /// How long a request issued now would have to wait for `delay`.
    pub fn wait_time(&self, delay: Duration) -> Duration {
        remaining(*self.last_request.lock(), delay, Instant::now())
    }

    /// Forget the previous request so the next one proceeds immediately.
    pub fn reset(&self) {
        *self.last_request.lock() = None;
    }

    /// Wait out the remainder of `delay`, run `request`, and record its
    /// completion time when it succeeds.
    ///
    /// A failed request leaves the timestamp untouched.
    pub fn run<T, E>(&self, delay: Duration, request: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let mut last = self.last_request.lock();

        let wait = remaining(*last, delay, Instant::now());
        if !wait.is_zero() {
            log::debug!("throttle: sleeping {:?} before next request", wait);
            thread::sleep(wait);
        }

        let out = request()?;

        let now = Instant::now();
        // Instant is monotonic, but keep the invariant explicit.
        *last = Some(match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        });

        Ok(out)
    }
}

fn remaining(last: Option<Instant>, delay: Duration, now: Instant) -> Duration {
    match last {
        None => Duration::ZERO,
        Some(prev) => delay.saturating_sub(now.saturating_duration_since(prev)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_request_is_not_delayed() {
        let limiter = RateLimiter::new();
        assert_eq!(limiter.wait_time(Duration::from_secs(5)), Duration::ZERO);

        let start = Instant::now();
        let out: Result<u32, ()> = limiter.run(Duration::from_secs(5), || Ok(7));
        assert_eq!(out, Ok(7));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(limiter.last_request().is_some());
    }

    #[test]
    fn sequential_requests_respect_delay() {
        let limiter = RateLimiter::new();
        let delay = Duration::from_millis(60);

        let start = Instant::now();
        for _ in 0..4 {
            let _: Result<(), ()> = limiter.run(delay, || Ok(()));
        }
        assert!(
            start.elapsed() >= delay * 3,
            "4 requests should span at least 3 delays, took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn delay_is_measured_from_completion() {
        let limiter = RateLimiter::new();
        let delay = Duration::from_millis(50);

        let _: Result<(), ()> = limiter.run(delay, || {
            thread::sleep(Duration::from_millis(80));
            Ok(())
        });

        // The previous request took longer than the delay, but the clock
        // restarts when it completed.
        let wait = limiter.wait_time(delay);
        assert!(wait > Duration::ZERO && wait <= delay);
    }

    #[test]
    fn failed_request_does_not_update_timestamp() {
        let limiter = RateLimiter::new();
        let out: Result<(), &str> = limiter.run(Duration::from_secs(5), || Err("boom"));
        assert_eq!(out, Err("boom"));
        assert!(limiter.last_request().is_none());
        assert_eq!(limiter.wait_time(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn zero_delay_never_waits() {
        let limiter = RateLimiter::new();
        let _: Result<(), ()> = limiter.run(Duration::ZERO, || Ok(()));
        assert_eq!(limiter.wait_time(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn reset_clears_history() {
        let limiter = RateLimiter::new();
        let _: Result<(), ()> = limiter.run(Duration::from_secs(5), || Ok(()));
        assert!(limiter.wait_time(Duration::from_secs(5)) > Duration::ZERO);

        limiter.reset();
        assert_eq!(limiter.wait_time(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let limiter = RateLimiter::new();
        let mut prev = None;
        for _ in 0..5 {
            let _: Result<(), ()> = limiter.run(Duration::from_millis(1), || Ok(()));
            let last = limiter.last_request();
            assert!(last >= prev);
            prev = last;
        }
    }

    #[test]
    fn concurrent_callers_are_serialized() {
        let limiter = Arc::new(RateLimiter::new());
        let delay = Duration::from_millis(40);

        let start = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    let _: Result<(), ()> = limiter.run(delay, || Ok(()));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert!(
            start.elapsed() >= delay * 3,
            "concurrent requests should still be spaced, took {:?}",
            start.elapsed()
        );
    }
}
