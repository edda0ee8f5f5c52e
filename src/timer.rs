use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time. Wall-clock adjustments must not affect it.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Advanceable clock for tests. Clones share the same offset, so a test can
/// keep a handle while the timer owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// Accumulates active typing time, excluding paused spans.
///
/// Call ordering is guaranteed by the session state machine:
/// start → any number of mark_pause/mark_resume pairs → stop.
#[derive(Debug)]
pub struct ActiveTimer<C: Clock = MonotonicClock> {
    clock: C,
    started_at: Option<Instant>,
    pause_started_at: Option<Instant>,
    paused_total: Duration,
}

impl ActiveTimer<MonotonicClock> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl<C: Clock> ActiveTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            started_at: None,
            pause_started_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(self.clock.now());
        self.pause_started_at = None;
        self.paused_total = Duration::ZERO;
    }

    pub fn mark_pause(&mut self) {
        self.pause_started_at = Some(self.clock.now());
    }

    pub fn mark_resume(&mut self) {
        if let Some(paused_at) = self.pause_started_at.take() {
            self.paused_total += self.clock.now() - paused_at;
        }
    }

    /// Total active duration so far. Frozen while a pause is open.
    pub fn elapsed_active(&self) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let upto = self.pause_started_at.unwrap_or_else(|| self.clock.now());
        (upto - started_at).saturating_sub(self.paused_total)
    }

    /// Stop and return the active duration. An open pause is closed first,
    /// so an in-progress pause never counts towards the result.
    pub fn stop(&mut self) -> Duration {
        self.mark_resume();
        let Some(started_at) = self.started_at.take() else {
            return Duration::ZERO;
        };
        let elapsed = (self.clock.now() - started_at).saturating_sub(self.paused_total);
        self.paused_total = Duration::ZERO;
        elapsed
    }

    /// Back to the unstarted state without reporting anything.
    pub fn clear(&mut self) {
        self.started_at = None;
        self.pause_started_at = None;
        self.paused_total = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
