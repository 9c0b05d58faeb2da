use std::time::Duration;

/// How the frame limiter gives time back while waiting for the next tick.
///
/// Implementations must not be shared between threads that pace concurrently.
pub trait Suspend {
    /// Gives up the calling thread for roughly `duration`.
    fn sleep(&mut self, duration: Duration);

    /// Gives up the remainder of the current time slice without sleeping.
    fn yield_now(&mut self);
}

/// Native strategy: OS sleep for long waits, scheduler yield for short ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Suspend for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}

/// Strategy for hosts that own the thread (browser main loop).
///
/// Blocking is not allowed there, so both operations degrade to a spin hint
/// and the limiter converges by re-sampling the clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostYield;

impl Suspend for HostYield {
    fn sleep(&mut self, _duration: Duration) {
        std::hint::spin_loop();
    }

    fn yield_now(&mut self) {
        std::hint::spin_loop();
    }
}

/// Returns the suspension strategy for the current build target.
pub fn default_suspender() -> Box<dyn Suspend> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(HostYield)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(ThreadSleep)
    }
}
