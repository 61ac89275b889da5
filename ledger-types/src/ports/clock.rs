//! Time source port.
//!
//! "Current time" is injected instead of read from a global so components
//! that stamp quotes stay deterministic under test.

use chrono::{DateTime, Utc};

/// Port trait for reading the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
