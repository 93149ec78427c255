//! Clock adapters for time operations.
//!
//! `SystemClock` is the production time source. For tests, see `MockClock`
//! in `crate::infrastructure::mocks`, available with the `test-helpers`
//! feature:
//!
//! ```toml
//! [dev-dependencies]
//! crash-dispatch = { version = "*", features = ["test-helpers"] }
//! ```

use crate::application::ports::Clock;
use std::time::{Instant, SystemTime};

/// System clock backed by `Instant::now()` and `SystemTime::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();

        assert!(t2 > t1);
    }

    #[test]
    fn test_wall_time_is_after_epoch() {
        let wall = SystemClock::new().wall_now();
        assert!(wall > SystemTime::UNIX_EPOCH);
    }
}
