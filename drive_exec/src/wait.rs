//! # Waiting
//!
//! A blocking wait on a condition, polled at a fixed interval and bounded by
//! a timeout, which can also be stopped from another thread through a
//! [`CancelToken`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc
};
use std::thread;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Stops waits from another thread.
///
/// Cancellation is sticky: once cancelled every wait using the token returns
/// [`WaitOutcome::Cancelled`] straight away until the token is reset. Clones
/// share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaitOutcome {
    /// The condition became true.
    Arrived,

    /// The timeout elapsed first.
    TimedOut,

    /// The wait was cancelled.
    Cancelled
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Clear a previous cancellation.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Block until `cond` returns true, `timeout` elapses, or `cancel` is
/// cancelled, checking every `poll_period`.
///
/// Cancellation is checked first, then the condition, then the timeout, so a
/// condition which is already true with a zero timeout still arrives.
pub fn poll_until<F>(
    mut cond: F,
    poll_period: Duration,
    timeout: Duration,
    cancel: &CancelToken
) -> WaitOutcome
where
    F: FnMut() -> bool
{
    let start = Instant::now();

    loop {
        if cancel.is_cancelled() {
            return WaitOutcome::Cancelled;
        }

        if cond() {
            return WaitOutcome::Arrived;
        }

        let elapsed = start.elapsed();
        match timeout.checked_sub(elapsed) {
            Some(remaining) if remaining > Duration::from_secs(0) =>
                thread::sleep(poll_period.min(remaining)),
            _ => return WaitOutcome::TimedOut
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const POLL: Duration = Duration::from_millis(2);

    #[test]
    fn test_arrives_immediately() {
        let outcome = poll_until(
            || true, POLL, Duration::from_secs(0), &CancelToken::new()
        );
        assert_eq!(outcome, WaitOutcome::Arrived);
    }

    #[test]
    fn test_times_out() {
        let start = Instant::now();
        let outcome = poll_until(
            || false, POLL, Duration::from_millis(30), &CancelToken::new()
        );

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_arrives_after_polls() {
        let mut polls = 0;
        let outcome = poll_until(
            || { polls += 1; polls == 5 },
            POLL,
            Duration::from_secs(5),
            &CancelToken::new()
        );

        assert_eq!(outcome, WaitOutcome::Arrived);
        assert_eq!(polls, 5);
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let token = CancelToken::new();
        let remote = token.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let start = Instant::now();
        let outcome = poll_until(|| false, POLL, Duration::from_secs(10), &token);
        handle.join().unwrap();

        assert_eq!(outcome, WaitOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(10));

        // Sticky until reset
        assert_eq!(
            poll_until(|| true, POLL, Duration::from_secs(1), &token),
            WaitOutcome::Cancelled
        );
        token.reset();
        assert_eq!(
            poll_until(|| true, POLL, Duration::from_secs(1), &token),
            WaitOutcome::Arrived
        );
    }
}
