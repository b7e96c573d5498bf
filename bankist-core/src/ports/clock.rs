//! Clock port - source of "now"

use chrono::{DateTime, Utc};

/// Supplies the current time for timestamping movements and for
/// day-difference labels. Substitute a fixed clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
