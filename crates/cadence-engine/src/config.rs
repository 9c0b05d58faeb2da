use std::path::PathBuf;

/// Window creation parameters handed to [`PlatformWindow::init`].
///
/// [`PlatformWindow::init`]: crate::platform::PlatformWindow::init
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,

    /// Initial client size in logical pixels.
    pub width: u32,
    pub height: u32,

    pub resizable: bool,
    pub fullscreen: bool,
    pub visible: bool,

    /// Request a vsync'd present mode from the renderer.
    pub vsync: bool,

    /// Request a transparent framebuffer (needed for window opacity < 1).
    pub transparent: bool,

    /// Optional icon loaded right after the window comes up.
    pub icon: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cadence".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
            visible: true,
            vsync: true,
            transparent: false,
            icon: None,
        }
    }
}

/// Snapshot of everything [`Engine::init`] reads.
///
/// The engine keeps its own copy for the lifetime of one init/shutdown cycle.
///
/// [`Engine::init`]: crate::engine::Engine::init
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub window: WindowConfig,

    /// Bring up the audio device during init.
    pub audio_enabled: bool,

    /// Initial frame-rate ceiling, 0 = uncapped.
    pub target_fps: u32,

    /// Seed for the engine RNG. Wall-clock derived when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            audio_enabled: true,
            target_fps: 0,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.audio_enabled = enabled;
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the fields the engine relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }

        if self.window.title.trim().is_empty() {
            return Err("window title must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = EngineConfig::default().with_size(0, 600).validate().unwrap_err();
        assert!(err.contains("0x600"));
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(EngineConfig::default().with_title("   ").validate().is_err());
    }

    #[test]
    fn builders_touch_only_their_field() {
        let cfg = EngineConfig::default().with_audio(false).with_target_fps(144).with_seed(7);
        assert!(!cfg.audio_enabled);
        assert_eq!(cfg.target_fps, 144);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.window, WindowConfig::default());
    }
}
