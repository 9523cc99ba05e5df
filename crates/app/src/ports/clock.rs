//! Clock port: local wall-clock time.

use blindhub_domain::time::{self, Timestamp};

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<T: Clock + Send + Sync> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}
