use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use super::suspend::Suspend;

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since a fixed, clock-specific origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }
}

#[derive(Debug, Default)]
struct ManualInner {
    now: Cell<Duration>,
    yield_quantum: Cell<Duration>,
    sleeps: Cell<u32>,
    yields: Cell<u32>,
}

/// Virtual clock that only moves when told to.
///
/// It is also a [`Suspend`] strategy: sleeping advances virtual time by the
/// requested duration, yielding advances it by a small quantum (50µs by
/// default). Clones share the same timeline, so one clone can be handed to
/// the engine as its clock and another as its suspender.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Rc<ManualInner>,
}

impl ManualClock {
    pub fn new() -> Self {
        let inner = ManualInner::default();
        inner.yield_quantum.set(Duration::from_micros(50));
        Self {
            inner: Rc::new(inner),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.inner.now.set(self.inner.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.inner.now.set(now);
    }

    pub fn set_yield_quantum(&self, quantum: Duration) {
        self.inner.yield_quantum.set(quantum);
    }

    /// Number of `sleep` calls seen so far.
    pub fn sleeps(&self) -> u32 {
        self.inner.sleeps.get()
    }

    /// Number of `yield_now` calls seen so far.
    pub fn yields(&self) -> u32 {
        self.inner.yields.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.inner.now.get()
    }
}

impl Suspend for ManualClock {
    fn sleep(&mut self, duration: Duration) {
        self.inner.sleeps.set(self.inner.sleeps.get() + 1);
        self.advance(duration);
    }

    fn yield_now(&mut self) {
        self.inner.yields.set(self.inner.yields.get() + 1);
        self.advance(self.inner.yield_quantum.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn system_clock_measures_real_sleeps() {
        let clock = SystemClock::new();
        assert!(clock.now() < Duration::from_secs(1));

        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.now() >= Duration::from_millis(5));
    }

    #[test]
    fn manual_clones_share_a_timeline() {
        let clock = ManualClock::new();
        let mut other = clock.clone();

        clock.advance(Duration::from_millis(5));
        assert_eq!(other.now(), Duration::from_millis(5));

        other.sleep(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(15));
        assert_eq!(clock.sleeps(), 1);
    }

    #[test]
    fn manual_yield_moves_by_quantum() {
        let mut clock = ManualClock::new();
        clock.set_yield_quantum(Duration::from_micros(10));
        clock.yield_now();
        clock.yield_now();
        assert_eq!(clock.now(), Duration::from_micros(20));
        assert_eq!(clock.yields(), 2);
    }
}
