use std::time::{SystemTime, UNIX_EPOCH};

/// Clock seam for salt and timestamp generation.
///
/// The order salt is the current millisecond count; two orders signed within
/// the same tick would collide, so anything needing deterministic or
/// sub-millisecond behavior injects its own implementation.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u128;
    fn now_secs(&self) -> u64;
}

/// Wall-clock implementation used everywhere outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_millis()
    }

    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_secs()
    }
}

/// Fixed clock for deterministic salts in tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub millis: u128,
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now_millis(&self) -> u128 {
        self.millis
    }

    fn now_secs(&self) -> u64 {
        (self.millis / 1000) as u64
    }
}
