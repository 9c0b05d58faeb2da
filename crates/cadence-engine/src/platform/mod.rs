//! Window facade contracts and platform queries.
//!
//! The engine never talks to a windowing system directly. It asks a
//! [`Platform`] for a window handle, then sequences calls on the returned
//! [`PlatformWindow`]. Backends:
//! - [`native`]: desktop windows on `winit`
//! - [`headless`]: in-memory windows for tests and server runs

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::config::WindowConfig;
use crate::input::InputEvent;

pub mod headless;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod native;

/// Native handle a renderer can build a presentation surface on.
pub trait SurfaceHandle: HasWindowHandle + HasDisplayHandle + Send + Sync {}

impl<T> SurfaceHandle for T where T: HasWindowHandle + HasDisplayHandle + Send + Sync {}

/// Static description of a connected monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorInfo {
    pub name: String,

    /// Physical pixels.
    pub width: u32,
    pub height: u32,

    /// Top-left corner on the virtual desktop.
    pub x: i32,
    pub y: i32,

    /// Hz, 0 when unknown.
    pub refresh_rate: u32,
}

/// Window factory.
pub trait Platform {
    /// Allocates a window handle. The window is not usable until
    /// [`PlatformWindow::init`] succeeded.
    fn create_window(&mut self) -> Result<Box<dyn PlatformWindow>>;
}

/// Capability object for one window.
pub trait PlatformWindow {
    fn init(&mut self, config: &WindowConfig) -> Result<()>;

    /// Destroys the native window. Called only after a successful `init`; a
    /// handle whose `init` failed is just dropped.
    fn shutdown(&mut self);

    /// Client area size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Pumps pending platform events and appends the input-relevant ones.
    fn poll_events(&mut self, events: &mut Vec<InputEvent>);

    fn should_close(&self) -> bool;

    fn set_title(&mut self, title: &str);

    fn is_fullscreen(&self) -> bool;
    fn is_hidden(&self) -> bool;
    fn is_minimized(&self) -> bool;
    fn is_maximized(&self) -> bool;
    fn is_focused(&self) -> bool;

    fn toggle_fullscreen(&mut self);
    fn maximize(&mut self);
    fn minimize(&mut self);
    fn restore(&mut self);

    /// `opacity` is already clamped to [0, 1].
    fn set_opacity(&mut self, opacity: f32);

    fn set_icon(&mut self, path: &Path) -> Result<()>;

    fn monitor_count(&self) -> usize;

    /// Index of the monitor the window is on, 0 when unknown.
    fn current_monitor(&self) -> usize;

    fn monitor(&self, index: usize) -> Option<MonitorInfo>;

    /// Native handle for GPU surface creation, `None` for windows without one.
    fn surface_handle(&self) -> Option<Arc<dyn SurfaceHandle>> {
        None
    }
}

/// Number of logical CPU cores, at least 1.
pub fn cpu_core_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Human-readable name of the host platform.
pub fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" => "macOS",
        "linux" => "Linux",
        "android" => "Android",
        "ios" => "iOS",
        "freebsd" | "openbsd" | "netbsd" | "dragonfly" => "BSD",
        _ if cfg!(target_arch = "wasm32") => "Web",
        _ => "Unknown",
    }
}
