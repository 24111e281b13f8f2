/// Wall-clock source used to seed the rotation.
pub trait Clock: Send + Sync {
    fn now_unix_secs(&self) -> u64;

    fn now_unix_millis(&self) -> u64 {
        self.now_unix_secs().saturating_mul(1_000)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }

    fn now_unix_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> u64 {
        self.0
    }
}
