use chrono::{DateTime, Utc};

/// Time source for `created_at` / `applied_at` stamps.
///
/// The ledger never calls `Utc::now()` directly; tests substitute a fixed
/// clock to get deterministic expiry math.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The default for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
