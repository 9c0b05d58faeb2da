//! Renderer contract.
//!
//! The drawing pipeline lives outside the engine core. The core brings the
//! renderer up after the window (it needs the window's surface), tells it
//! about size changes, and tears it down first.

use anyhow::Result;

use crate::config::EngineConfig;
use crate::platform::PlatformWindow;

mod color;
mod gpu;
mod surface;

pub use color::Color;
pub use gpu::{GpuInit, GpuRenderer};
pub use surface::SurfaceErrorAction;

pub trait Renderer {
    fn init(&mut self, window: &dyn PlatformWindow, config: &EngineConfig) -> Result<()>;

    fn shutdown(&mut self);

    /// Called on the tick a window size change is detected.
    fn resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Clears the back buffer and presents it.
    fn present(&mut self, clear: Color) -> Result<()>;
}
