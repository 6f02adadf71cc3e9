//! Countdown clock with lazy start.
//!
//! The clock reads a monotonic nanosecond source on every query; nothing ticks
//! in the background. Until [`Clock::mark_started`] is called it reports the
//! full duration as remaining.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Monotonic nanoseconds since an arbitrary, fixed origin.
pub trait TimeSource: Debug + Send {
    fn now_nanos(&self) -> u64;
}

/// Production source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Hand-driven source for tests and replays. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    nanos: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let now = self.nanos.load(Ordering::SeqCst);
        self.nanos.store(now.saturating_add(by), Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl TimeSource for ManualTimeSource {
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Clock {
    total_secs: u32,
    started_at: Option<u64>,
    source: Box<dyn TimeSource>,
}

impl Clock {
    pub fn new<S: TimeSource + 'static>(total_secs: u32, source: S) -> Self {
        Self {
            total_secs,
            started_at: None,
            source: Box::new(source),
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Latches the start instant; later calls are ignored.
    pub fn mark_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.source.now_nanos());
        }
    }

    /// Back to unstarted with a new budget.
    pub fn reset(&mut self, total_secs: u32) {
        self.total_secs = total_secs;
        self.started_at = None;
    }

    pub fn remaining_secs(&self) -> u32 {
        let Some(started_at) = self.started_at else {
            return self.total_secs;
        };

        let elapsed_nanos = self.source.now_nanos().saturating_sub(started_at);
        let elapsed_secs = u32::try_from(elapsed_nanos / NANOS_PER_SEC).unwrap_or(u32::MAX);
        self.total_secs.saturating_sub(elapsed_secs)
    }

    /// Whole seconds consumed from the budget; never exceeds the total.
    pub fn elapsed_secs(&self) -> u32 {
        self.total_secs - self.remaining_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstarted_reports_full_duration() {
        let source = ManualTimeSource::new();
        let clock = Clock::new(60, source.clone());

        source.advance_secs(100);
        assert!(!clock.is_started());
        assert_eq!(clock.remaining_secs(), 60);
        assert_eq!(clock.elapsed_secs(), 0);
    }

    #[test]
    fn test_remaining_floors_elapsed_seconds() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::new(15, source.clone());
        clock.mark_started();

        source.advance(Duration::from_millis(999));
        assert_eq!(clock.remaining_secs(), 15);

        source.advance(Duration::from_millis(1));
        assert_eq!(clock.remaining_secs(), 14);

        source.advance(Duration::from_millis(4_500));
        assert_eq!(clock.remaining_secs(), 10);
        assert_eq!(clock.elapsed_secs(), 5);
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::new(15, source.clone());
        clock.mark_started();

        source.advance_secs(16);
        assert_eq!(clock.remaining_secs(), 0);
        assert_eq!(clock.elapsed_secs(), 15);
    }

    #[test]
    fn test_mark_started_is_idempotent() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::new(30, source.clone());
        clock.mark_started();

        source.advance_secs(10);
        clock.mark_started();
        assert_eq!(clock.remaining_secs(), 20);
    }

    #[test]
    fn test_reset_returns_to_unstarted() {
        let source = ManualTimeSource::new();
        let mut clock = Clock::new(30, source.clone());
        clock.mark_started();
        source.advance_secs(10);

        clock.reset(120);
        assert!(!clock.is_started());
        assert_eq!(clock.remaining_secs(), 120);
    }

    #[test]
    fn test_manual_source_clones_share_time_and_saturate() {
        let source = ManualTimeSource::new();
        let shared = source.clone();

        source.advance(Duration::from_millis(250));
        shared.advance_secs(1);
        assert_eq!(source.now_nanos(), 1_250_000_000);
        assert_eq!(shared.now_nanos(), 1_250_000_000);

        source.advance(Duration::MAX);
        assert_eq!(shared.now_nanos(), u64::MAX);
    }

    #[test]
    fn test_monotonic_source_never_goes_backwards() {
        let source = MonotonicSource::new();
        let first = source.now_nanos();
        let second = source.now_nanos();
        assert!(second >= first);
    }
}
