//! Repeating tick scheduling.
//!
//! The tracking refresh runs as a repeating callback owned by the host event
//! loop. [`TickScheduler`] is the port for registering and cancelling it;
//! every registration is identified by a [`TickToken`] so a tick delivered
//! after cancellation can be recognized and dropped.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Shortest accepted period. A zero period would never advance past `now`.
const MIN_PERIOD: Duration = Duration::from_micros(1);

/// Longest accepted period, keeping deadlines well inside `Instant`'s range.
const MAX_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Identifies one repeating tick registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickToken(u64);

impl TickToken {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host-side timer service.
pub trait TickScheduler {
    /// Registers a callback firing every `period`.
    ///
    /// Implementations may clamp periods they cannot represent.
    fn schedule_repeating(&mut self, period: Duration) -> TickToken;

    /// Cancels a registration. Unknown tokens are ignored.
    fn cancel(&mut self, token: TickToken);
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    next_due: Instant,
}

/// Polled [`TickScheduler`].
///
/// The host calls [`poll`](Self::poll) from its frame loop with the current
/// time and forwards the returned tokens. Missed periods are coalesced: a
/// timer fires at most once per poll.
#[derive(Debug)]
pub struct IntervalScheduler {
    timers: HashMap<TickToken, Interval>,
    next_token: u64,
    now: Instant,
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::with_start(Instant::now())
    }

    /// Creates a scheduler whose clock starts at `now`.
    pub fn with_start(now: Instant) -> Self {
        Self {
            timers: HashMap::new(),
            next_token: 0,
            now,
        }
    }

    /// Advances the clock and returns the tokens that are due, in token order.
    pub fn poll(&mut self, now: Instant) -> Vec<TickToken> {
        self.now = self.now.max(now);
        let now = self.now;
        let mut due: Vec<TickToken> = Vec::new();

        for (token, interval) in &mut self.timers {
            if now < interval.next_due {
                continue;
            }
            due.push(*token);

            // Skip every missed period in one step.
            let missed = now.duration_since(interval.next_due).as_nanos()
                / interval.period.as_nanos()
                + 1;
            interval.next_due = u32::try_from(missed)
                .ok()
                .and_then(|n| interval.period.checked_mul(n))
                .and_then(|step| interval.next_due.checked_add(step))
                .unwrap_or(now + interval.period);
        }

        due.sort_unstable();
        due
    }

    /// Returns whether a token is still registered.
    pub fn is_active(&self, token: TickToken) -> bool {
        self.timers.contains_key(&token)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Time of the earliest pending tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|i| i.next_due).min()
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TickToken {
        let token = TickToken(self.next_token);
        self.next_token += 1;
        let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
        self.timers.insert(
            token,
            Interval {
                period,
                next_due: self.now + period,
            },
        );
        token
    }

    fn cancel(&mut self, token: TickToken) {
        self.timers.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(16);

    #[test]
    fn test_fires_after_each_period() {
        let start = Instant::now();
        let mut scheduler = IntervalScheduler::with_start(start);
        let token = scheduler.schedule_repeating(PERIOD);

        assert!(scheduler.poll(start + Duration::from_millis(10)).is_empty());
        assert_eq!(scheduler.poll(start + Duration::from_millis(16)), vec![token]);
        assert!(scheduler.poll(start + Duration::from_millis(20)).is_empty());
        assert_eq!(scheduler.poll(start + Duration::from_millis(33)), vec![token]);
    }

    #[test]
    fn test_missed_periods_coalesce() {
        let start = Instant::now();
        let mut scheduler = IntervalScheduler::with_start(start);
        let token = scheduler.schedule_repeating(PERIOD);

        assert_eq!(scheduler.poll(start + Duration::from_millis(100)), vec![token]);
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(112))
        );
    }

    #[test]
    fn test_long_stall_catches_up_in_one_poll() {
        let start = Instant::now();
        let mut scheduler = IntervalScheduler::with_start(start);
        let token = scheduler.schedule_repeating(Duration::ZERO);

        let hour = Duration::from_secs(3600);
        assert_eq!(scheduler.poll(start + hour), vec![token]);
        assert_eq!(scheduler.next_deadline(), Some(start + hour + MIN_PERIOD));

        // More missed periods than fit in a u32: realigned to the poll time.
        let later = start + hour * 3;
        assert_eq!(scheduler.poll(later), vec![token]);
        assert_eq!(scheduler.next_deadline(), Some(later + MIN_PERIOD));
    }

    #[test]
    fn test_oversized_period_is_clamped() {
        let start = Instant::now();
        let mut scheduler = IntervalScheduler::with_start(start);
        scheduler.schedule_repeating(Duration::MAX);
        assert_eq!(scheduler.next_deadline(), Some(start + MAX_PERIOD));
    }

    #[test]
    fn test_cancelled_token_never_fires() {
        let start = Instant::now();
        let mut scheduler = IntervalScheduler::with_start(start);
        let token = scheduler.schedule_repeating(PERIOD);
        scheduler.cancel(token);

        assert!(!scheduler.is_active(token));
        assert!(scheduler.poll(start + Duration::from_secs(1)).is_empty());
        // Cancelling twice is fine.
        scheduler.cancel(token);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut scheduler = IntervalScheduler::new();
        let a = scheduler.schedule_repeating(PERIOD);
        scheduler.cancel(a);
        let b = scheduler.schedule_repeating(PERIOD);
        assert_ne!(a, b);
        assert_eq!(scheduler.len(), 1);
    }
}
