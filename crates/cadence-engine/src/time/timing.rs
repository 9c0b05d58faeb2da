use std::time::Duration;

use super::pacer::Pace;

/// Largest delta time a single tick may report.
///
/// A debugger pause or suspend/resume must not turn into one giant
/// simulation step.
pub const MAX_DELTA: Duration = Duration::from_millis(100);

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Deltas of rates that do not divide a second into whole nanoseconds are
/// truncated; 30 ticks of 1/30 s sum to 999_999_990ns. The window closes
/// within this much of a full second.
const FPS_WINDOW_SLACK: Duration = Duration::from_micros(1);

pub fn clamp_delta(raw: Duration) -> Duration {
    raw.min(MAX_DELTA)
}

/// Per-lifetime timing statistics.
///
/// All times are clock readings (see [`Clock::now`]).
///
/// [`Clock::now`]: crate::time::Clock::now
#[derive(Debug, Clone)]
pub struct FrameTiming {
    start_time: Duration,
    last_frame_time: Duration,
    current_frame_time: Duration,
    delta_time: Duration,
    frame_count: u64,
    target_fps: u32,
    frame_time_accumulator: Duration,
    fps_counter: u32,
    current_fps: u32,
}

impl FrameTiming {
    pub fn new(start_time: Duration, target_fps: u32) -> Self {
        Self {
            start_time,
            last_frame_time: start_time,
            current_frame_time: start_time,
            delta_time: Duration::ZERO,
            frame_count: 0,
            target_fps,
            frame_time_accumulator: Duration::ZERO,
            fps_counter: 0,
            current_fps: 0,
        }
    }

    /// Folds one paced tick into the statistics.
    ///
    /// Returns the newly published FPS value when the rolling one-second
    /// window closes on this tick.
    pub fn advance(&mut self, pace: Pace) -> Option<u32> {
        self.delta_time = clamp_delta(pace.raw_delta);
        self.last_frame_time = self.current_frame_time;
        self.current_frame_time = pace.now;

        self.frame_time_accumulator += self.delta_time;
        self.fps_counter += 1;

        let published = if self.frame_time_accumulator + FPS_WINDOW_SLACK >= FPS_WINDOW {
            self.current_fps = self.fps_counter;
            self.frame_time_accumulator = Duration::ZERO;
            self.fps_counter = 0;
            Some(self.current_fps)
        } else {
            None
        };

        self.frame_count = self.frame_count.wrapping_add(1);

        published
    }

    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    pub fn current_frame_time(&self) -> Duration {
        self.current_frame_time
    }

    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
    }

    pub fn current_fps(&self) -> u32 {
        self.current_fps
    }

    /// Time elapsed between construction and `now`.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start_time)
    }
}
