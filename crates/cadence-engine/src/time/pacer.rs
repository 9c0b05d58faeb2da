use std::time::Duration;

use super::clock::Clock;
use super::suspend::Suspend;

/// Below this much remaining frame budget the limiter spins instead of sleeping.
pub const SPIN_THRESHOLD: Duration = Duration::from_millis(2);

/// Share of the remaining budget handed to `Suspend::sleep`.
///
/// OS sleeps tend to overshoot; the tail is covered by spinning.
pub const SLEEP_FRACTION: f64 = 0.9;

/// Result of one pacing step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pace {
    /// Clock reading at the end of the wait.
    pub now: Duration,

    /// Unclamped time since the previous tick.
    pub raw_delta: Duration,
}

/// Frame budget for a target rate, `None` when uncapped.
pub fn frame_budget(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps)))
}

/// Frame-rate limiter.
///
/// Holds the reference time of the previous tick. It is owned by the engine
/// rather than the per-lifetime state, so the reference survives
/// init/shutdown cycles.
#[derive(Debug, Clone)]
pub struct FramePacer {
    last_tick: Duration,
}

impl FramePacer {
    pub fn new(origin: Duration) -> Self {
        Self { last_tick: origin }
    }

    pub fn last_tick(&self) -> Duration {
        self.last_tick
    }

    /// Waits until at least one frame budget has passed since the previous
    /// tick, then advances the reference time.
    ///
    /// Long waits sleep for a fraction of the remaining budget; the last
    /// `SPIN_THRESHOLD` is spent yielding so the deadline is not overshot.
    pub fn pace(&mut self, target_fps: u32, clock: &dyn Clock, suspend: &mut dyn Suspend) -> Pace {
        let mut now = clock.now();
        let mut raw_delta = now.saturating_sub(self.last_tick);

        if let Some(budget) = frame_budget(target_fps) {
            while raw_delta < budget {
                let remaining = budget - raw_delta;
                if remaining > SPIN_THRESHOLD {
                    suspend.sleep(remaining.mul_f64(SLEEP_FRACTION));
                } else {
                    suspend.yield_now();
                }

                now = clock.now();
                raw_delta = now.saturating_sub(self.last_tick);
            }
        }

        self.last_tick = now;

        Pace { now, raw_delta }
    }
}
