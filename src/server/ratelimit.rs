//! A token-bucket limiter that shapes data-channel throughput.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::time::Instant;

/// Shapes traffic to a configured number of bytes per second. A rate of 0
/// means unlimited. Cloning yields a handle onto the same bucket, so both
/// directions of a session's data channel draw from one budget.
#[derive(Debug, Clone, Default)]
pub(crate) struct Limiter {
    bucket: Option<Arc<Mutex<Bucket>>>,
}

#[derive(Debug)]
struct Bucket {
    rate: f64,
    tokens: f64,
    last: Instant,
}

impl Limiter {
    pub(crate) fn new(bytes_per_second: i64) -> Limiter {
        if bytes_per_second <= 0 {
            return Limiter { bucket: None };
        }
        let rate = bytes_per_second as f64;
        Limiter {
            bucket: Some(Arc::new(Mutex::new(Bucket {
                rate,
                // Start with a full second worth of burst.
                tokens: rate,
                last: Instant::now(),
            }))),
        }
    }

    /// Accounts for `n` transferred bytes. Returns how long the caller
    /// should pause before transferring more, if the budget is exhausted.
    pub(crate) fn charge(&self, n: usize) -> Option<Duration> {
        let bucket = self.bucket.as_ref()?;
        let mut bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * bucket.rate).min(bucket.rate);
        bucket.last = now;
        bucket.tokens -= n as f64;
        if bucket.tokens >= 0.0 {
            None
        } else {
            Some(Duration::from_secs_f64(-bucket.tokens / bucket.rate))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_delays() {
        let limiter = Limiter::new(0);
        for _ in 0..100 {
            assert!(limiter.charge(1 << 20).is_none());
        }
    }

    #[test]
    fn burst_then_delay() {
        let limiter = Limiter::new(1000);
        // The initial burst budget covers one second worth of bytes.
        assert!(limiter.charge(1000).is_none());
        // The next chunk overdraws the bucket and must wait roughly its
        // own transfer time.
        let delay = limiter.charge(500).expect("bucket should be empty");
        assert!(delay >= Duration::from_millis(400), "delay was {:?}", delay);
        assert!(delay <= Duration::from_millis(600), "delay was {:?}", delay);
    }

    #[test]
    fn clones_share_one_bucket() {
        let a = Limiter::new(1000);
        let b = a.clone();
        assert!(a.charge(1000).is_none());
        assert!(b.charge(1).is_some());
    }
}
