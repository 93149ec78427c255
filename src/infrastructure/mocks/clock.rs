//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};

#[derive(Debug)]
struct ClockState {
    instant: Instant,
    wall: SystemTime,
}

/// Mock clock for testing.
///
/// Lets tests drive the dedup window and record timestamps explicitly.
/// Monotonic and wall time advance together.
///
/// # Examples
///
/// ```
/// use crash_dispatch::infrastructure::mocks::MockClock;
/// use crash_dispatch::application::ports::Clock;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let clock = MockClock::new(start);
/// assert_eq!(clock.now(), start);
///
/// let wall = clock.wall_now();
/// clock.advance(Duration::from_millis(2500));
/// assert_eq!(clock.now(), start + Duration::from_millis(2500));
/// assert_eq!(clock.wall_now(), wall + Duration::from_millis(2500));
/// ```
///
/// All clones share the same time, so advancing one clone advances them all.
#[derive(Debug, Clone)]
pub struct MockClock {
    state: Arc<Mutex<ClockState>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific instant.
    ///
    /// Wall time starts at the Unix epoch plus one day.
    pub fn new(start: Instant) -> Self {
        Self::with_wall_time(start, SystemTime::UNIX_EPOCH + Duration::from_secs(86_400))
    }

    /// Create a mock clock with explicit monotonic and wall start times.
    pub fn with_wall_time(start: Instant, wall: SystemTime) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState {
                instant: start,
                wall,
            })),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        state.instant += duration;
        state.wall += duration;
    }

    /// Set the monotonic time to a specific instant. Wall time is unchanged.
    pub fn set(&self, instant: Instant) {
        self.lock().instant = instant;
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.lock().instant
    }

    fn wall_now(&self) -> SystemTime {
        self.lock().wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock() {
        let start = Instant::now();
        let clock = MockClock::new(start);

        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));

        let new_time = start + Duration::from_secs(100);
        clock.set(new_time);
        assert_eq!(clock.now(), new_time);
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::new(Instant::now());
        let clone = clock.clone();
        let wall = clock.wall_now();

        let handle = std::thread::spawn(move || clone.advance(Duration::from_secs(5)));
        handle.join().unwrap();

        assert_eq!(clock.wall_now(), wall + Duration::from_secs(5));
    }
}
