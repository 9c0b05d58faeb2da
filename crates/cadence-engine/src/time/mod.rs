//! Time subsystem.
//!
//! Provides the clock and suspension seams the frame pacer is written against,
//! plus the per-tick timing statistics kept in the process state.
//! Intended usage:
//! - one `FramePacer` per engine, living across init/shutdown cycles
//! - call `FramePacer::pace` once per tick and feed the result to `FrameTiming::advance`

mod clock;
mod pacer;
mod suspend;
mod timing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pacer::{frame_budget, FramePacer, Pace, SLEEP_FRACTION, SPIN_THRESHOLD};
pub use suspend::{default_suspender, HostYield, Suspend, ThreadSleep};
pub use timing::{clamp_delta, FrameTiming, MAX_DELTA};
