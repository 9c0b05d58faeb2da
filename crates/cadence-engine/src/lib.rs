//! Cadence engine crate.
//!
//! Process lifecycle and frame pacing for real-time applications: brings a
//! window, input, audio and a renderer up in order, runs a paced per-frame
//! tick with timing and FPS statistics, and tears everything down again.

pub mod assets;
pub mod audio;
pub mod codec;
pub mod config;
pub mod engine;
pub mod input;
pub mod logging;
pub mod platform;
pub mod render;
pub mod time;

pub use config::{EngineConfig, WindowConfig};
pub use engine::{is_engine_live, Engine, InitError, Subsystems};
pub use render::Color;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard};

    static SERIAL: Mutex<()> = Mutex::new(());

    /// Serializes tests that initialize an engine; only one may be live per
    /// process.
    pub(crate) fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|e| e.into_inner())
    }
}
