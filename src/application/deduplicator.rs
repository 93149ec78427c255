//! Short-window deduplication of crash callbacks.
//!
//! Several independent interception points can fire for one real crash. The
//! deduplicator collapses them: the first caller for a token within the
//! window proceeds, every other caller is told to stop.

use crate::application::ports::Clock;
use crate::domain::token::DedupToken;
use ahash::AHashSet;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Window within which repeated tokens are treated as the same crash.
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_millis(2500);

#[derive(Debug, Default)]
struct DedupState {
    /// Tokens in insertion order with the time they were first seen
    order: VecDeque<(DedupToken, Instant)>,
    /// Membership index over `order`
    seen: AHashSet<DedupToken>,
}

impl DedupState {
    /// Remove every entry older than the window.
    ///
    /// Entries are not guaranteed to be in timestamp order, so the whole
    /// queue is scanned rather than only its front.
    fn expire_old_tokens(&mut self, current_time: Instant, window: Duration) {
        let seen = &mut self.seen;
        self.order.retain(|(token, first_seen)| {
            let fresh = current_time.saturating_duration_since(*first_seen) <= window;
            if !fresh {
                seen.remove(token);
            }
            fresh
        });
    }
}

/// Token-based deduplicator shared by every dispatching thread.
///
/// Eviction, lookup and insertion happen under one lock so that concurrent
/// callers with the same token can never both be told to proceed.
#[derive(Debug)]
pub struct EventDeduplicator {
    state: Mutex<DedupState>,
    clock: Arc<dyn Clock>,
    window: Duration,
}

impl EventDeduplicator {
    /// Create a deduplicator with the default 2500 ms window.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, DEFAULT_DEDUP_WINDOW)
    }

    /// Create a deduplicator with a custom window.
    pub fn with_window(clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            state: Mutex::new(DedupState::default()),
            clock,
            window,
        }
    }

    /// Decide whether a callback carrying `token` should be dispatched.
    ///
    /// Returns `true` exactly once per token within any window; the token is
    /// remembered from that call. Duplicates do not refresh the timestamp.
    pub fn should_dispatch(&self, token: &DedupToken) -> bool {
        let mut state = self.lock();
        let now = self.clock.now();

        state.expire_old_tokens(now, self.window);

        if state.seen.contains(token) {
            return false;
        }

        state.seen.insert(token.clone());
        state.order.push_back((token.clone(), now));
        true
    }

    /// Get the configured window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of tokens currently remembered (including not yet pruned ones).
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Check if no tokens are remembered.
    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    /// Forget all tokens.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.order.clear();
        state.seen.clear();
    }

    fn lock(&self) -> MutexGuard<'_, DedupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::mocks::MockClock;

    fn mock_dedup() -> (EventDeduplicator, Arc<MockClock>) {
        let clock = Arc::new(MockClock::new(Instant::now()));
        (EventDeduplicator::new(clock.clone()), clock)
    }

    #[test]
    fn test_second_call_within_window_is_duplicate() {
        let (dedup, clock) = mock_dedup();
        let token = DedupToken::new(100, 0, "com.example");

        assert!(dedup.should_dispatch(&token));
        clock.advance(Duration::from_millis(1200));
        assert!(!dedup.should_dispatch(&token));
    }

    #[test]
    fn test_call_after_window_dispatches_again() {
        let (dedup, clock) = mock_dedup();
        let token = DedupToken::new(100, 0, "com.example");

        assert!(dedup.should_dispatch(&token));
        assert!(!dedup.should_dispatch(&token));

        clock.advance(Duration::from_millis(2501));
        assert!(dedup.should_dispatch(&token));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let (dedup, clock) = mock_dedup();
        let token = DedupToken::new(1, 0, "p");

        assert!(dedup.should_dispatch(&token));
        clock.advance(DEFAULT_DEDUP_WINDOW);
        assert!(!dedup.should_dispatch(&token));
    }

    #[test]
    fn test_duplicates_do_not_extend_window() {
        let (dedup, clock) = mock_dedup();
        let token = DedupToken::new(1, 0, "p");

        assert!(dedup.should_dispatch(&token));
        clock.advance(Duration::from_millis(2000));
        assert!(!dedup.should_dispatch(&token));
        clock.advance(Duration::from_millis(600));
        assert!(dedup.should_dispatch(&token));
    }

    #[test]
    fn test_different_tokens_are_independent() {
        let (dedup, _clock) = mock_dedup();

        assert!(dedup.should_dispatch(&DedupToken::new(1, 0, "a")));
        assert!(dedup.should_dispatch(&DedupToken::new(2, 0, "a")));
        assert!(dedup.should_dispatch(&DedupToken::new(1, 10, "a")));
        assert!(!dedup.should_dispatch(&DedupToken::new(1, 0, "a")));
        assert_eq!(dedup.len(), 3);
    }

    #[test]
    fn test_expired_tokens_are_pruned() {
        let (dedup, clock) = mock_dedup();

        for pid in 0..5 {
            dedup.should_dispatch(&DedupToken::new(pid, 0, "p"));
        }
        assert_eq!(dedup.len(), 5);

        clock.advance(Duration::from_secs(3));
        dedup.should_dispatch(&DedupToken::new(99, 0, "p"));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_out_of_order_entries_still_expire() {
        let start = Instant::now();
        let (dedup, clock) = mock_dedup();
        let early = DedupToken::new(1, 0, "early");
        let late = DedupToken::new(2, 0, "late");

        clock.set(start + Duration::from_millis(1));
        assert!(dedup.should_dispatch(&late));
        clock.set(start);
        assert!(dedup.should_dispatch(&early));

        clock.set(start + Duration::from_millis(2501));
        assert!(dedup.should_dispatch(&early));
        assert!(!dedup.should_dispatch(&late));
    }

    #[test]
    fn test_clear() {
        let (dedup, _clock) = mock_dedup();
        let token = DedupToken::new(1, 0, "p");

        dedup.should_dispatch(&token);
        dedup.clear();
        assert!(dedup.is_empty());
        assert!(dedup.should_dispatch(&token));
    }

    #[test]
    fn test_concurrent_same_token_dispatches_once() {
        use std::thread;

        let dedup = Arc::new(EventDeduplicator::new(Arc::new(SystemClock::new())));
        let token = DedupToken::new(4242, 0, "com.example");
        let mut handles = vec![];

        for _ in 0..8 {
            let dedup = Arc::clone(&dedup);
            let token = token.clone();
            handles.push(thread::spawn(move || {
                (0..50).filter(|_| dedup.should_dispatch(&token)).count()
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1);
    }
}
