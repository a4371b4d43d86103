use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

/// Time source for timestamps and retry back-off; swapped for a manual clock in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, delay: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

pub fn timestamp(clock: &dyn Clock) -> String {
    clock.now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
