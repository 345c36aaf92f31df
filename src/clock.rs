//! Time source for the engine.
//!
//! Lifecycle mutations stamp actual check-in/out times and derive the daily
//! identifier prefix from "today". Both go through this trait so tests can
//! pin the calendar.

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and benchmarks.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock mutex poisoned") = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_settable() {
        let t0 = "2025-06-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let t1 = "2025-06-02T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let clock = FixedClock::at(t0);
        assert_eq!(clock.now(), t0);
        assert_eq!(clock.today(), t0.date_naive());
        clock.set(t1);
        assert_eq!(clock.today(), t1.date_naive());
    }
}
