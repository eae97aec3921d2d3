use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Token issuance and expiry checks go through this trait so tests can
/// substitute a fixed or advancing clock instead of sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
