use std::path::Path;

use crate::platform::{self, MonitorInfo, PlatformWindow};

use super::Engine;

impl Engine {
    fn window(&self) -> Option<&dyn PlatformWindow> {
        let state = self.live()?;
        Some(state.window.as_ref())
    }

    fn window_mut(&mut self, op: &str) -> Option<&mut dyn PlatformWindow> {
        let state = self.live_mut(op)?;
        Some(state.window.as_mut())
    }

    fn monitor_info(&self, index: usize) -> Option<MonitorInfo> {
        self.window().and_then(|w| w.monitor(index))
    }

    /// True once the user asked to close the window.
    pub fn window_should_close(&self) -> bool {
        self.window().is_some_and(|w| w.should_close())
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window().map(|w| w.size()).unwrap_or((0, 0))
    }

    pub fn screen_width(&self) -> u32 {
        self.window_size().0
    }

    pub fn screen_height(&self) -> u32 {
        self.window_size().1
    }

    /// True only on the tick the window size changed.
    pub fn is_window_resized(&self) -> bool {
        self.live().is_some_and(|s| s.geometry.was_resized)
    }

    pub fn is_window_fullscreen(&self) -> bool {
        self.window().is_some_and(|w| w.is_fullscreen())
    }

    pub fn is_window_hidden(&self) -> bool {
        self.window().is_some_and(|w| w.is_hidden())
    }

    pub fn is_window_minimized(&self) -> bool {
        self.window().is_some_and(|w| w.is_minimized())
    }

    pub fn is_window_maximized(&self) -> bool {
        self.window().is_some_and(|w| w.is_maximized())
    }

    pub fn is_window_focused(&self) -> bool {
        self.window().is_some_and(|w| w.is_focused())
    }

    pub fn toggle_fullscreen(&mut self) {
        if let Some(w) = self.window_mut("toggle_fullscreen") {
            w.toggle_fullscreen();
        }
    }

    pub fn maximize_window(&mut self) {
        if let Some(w) = self.window_mut("maximize_window") {
            w.maximize();
        }
    }

    pub fn minimize_window(&mut self) {
        if let Some(w) = self.window_mut("minimize_window") {
            w.minimize();
        }
    }

    pub fn restore_window(&mut self) {
        if let Some(w) = self.window_mut("restore_window") {
            w.restore();
        }
    }

    pub fn set_window_title(&mut self, title: &str) {
        if let Some(w) = self.window_mut("set_window_title") {
            w.set_title(title);
        }
    }

    /// `opacity` is clamped to [0, 1].
    pub fn set_window_opacity(&mut self, opacity: f32) {
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        if let Some(w) = self.window_mut("set_window_opacity") {
            w.set_opacity(opacity);
        }
    }

    /// Loads an image file and sets it as the window icon. Load failures are
    /// logged and leave the current icon in place.
    pub fn set_window_icon(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(w) = self.window_mut("set_window_icon") {
            if let Err(e) = w.set_icon(path) {
                log::warn!("failed to set window icon from {}: {e:#}", path.display());
            }
        }
    }

    pub fn monitor_count(&self) -> usize {
        self.window().map(|w| w.monitor_count()).unwrap_or(0)
    }

    pub fn current_monitor(&self) -> usize {
        self.window().map(|w| w.current_monitor()).unwrap_or(0)
    }

    /// Physical size of monitor `index`, `(0, 0)` when unknown.
    pub fn monitor_size(&self, index: usize) -> (u32, u32) {
        self.monitor_info(index)
            .map(|m| (m.width, m.height))
            .unwrap_or((0, 0))
    }

    pub fn monitor_position(&self, index: usize) -> (i32, i32) {
        self.monitor_info(index).map(|m| (m.x, m.y)).unwrap_or((0, 0))
    }

    pub fn monitor_refresh_rate(&self, index: usize) -> u32 {
        self.monitor_info(index).map(|m| m.refresh_rate).unwrap_or(0)
    }

    pub fn monitor_name(&self, index: usize) -> String {
        self.monitor_info(index).map(|m| m.name).unwrap_or_default()
    }

    pub fn cpu_core_count(&self) -> usize {
        platform::cpu_core_count()
    }

    pub fn platform_name(&self) -> &'static str {
        platform::platform_name()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::engine::Subsystems;
    use crate::platform::headless::{HeadlessControl, Journal};
    use crate::platform::MonitorInfo;
    use crate::test_support::serial;

    use super::Engine;

    fn assert_defaults(engine: &Engine) {
        assert!(!engine.window_should_close());
        assert!(!engine.is_window_ready());
        assert_eq!(engine.window_size(), (0, 0));
        assert_eq!(engine.screen_width(), 0);
        assert_eq!(engine.screen_height(), 0);
        assert!(!engine.is_window_resized());
        assert!(!engine.is_window_fullscreen());
        assert!(!engine.is_window_hidden());
        assert!(!engine.is_window_minimized());
        assert!(!engine.is_window_maximized());
        assert!(!engine.is_window_focused());
        assert_eq!(engine.monitor_count(), 0);
        assert_eq!(engine.current_monitor(), 0);
        assert_eq!(engine.monitor_size(0), (0, 0));
        assert_eq!(engine.monitor_position(0), (0, 0));
        assert_eq!(engine.monitor_refresh_rate(0), 0);
        assert_eq!(engine.monitor_name(0), "");
        assert!(engine.cpu_core_count() >= 1);
    }

    #[test]
    fn defaults_before_init_and_after_shutdown() {
        let _guard = serial();
        let (control, journal) = (HeadlessControl::new(), Journal::new());
        let mut engine = Engine::new(Subsystems::headless(&control, &journal));

        assert_defaults(&engine);
        engine.toggle_fullscreen();
        engine.set_window_title("ignored");
        engine.set_window_opacity(0.5);
        assert!(journal.entries().is_empty());

        engine.init(EngineConfig::default()).unwrap();
        engine.shutdown();
        assert_defaults(&engine);
    }

    #[test]
    fn accessors_delegate_to_the_window() {
        let _guard = serial();
        let (control, journal) = (HeadlessControl::new(), Journal::new());
        control.set_monitors(
            vec![
                MonitorInfo::default(),
                MonitorInfo {
                    name: "side".into(),
                    width: 2560,
                    height: 1440,
                    x: 1920,
                    y: -200,
                    refresh_rate: 144,
                },
            ],
            1,
        );
        let mut engine = Engine::new(Subsystems::headless(&control, &journal));
        engine
            .init(EngineConfig::default().with_title("first").with_size(640, 480))
            .unwrap();

        assert_eq!(engine.window_size(), (640, 480));
        assert_eq!(control.title(), "first");
        engine.set_window_title("second");
        assert_eq!(control.title(), "second");

        engine.toggle_fullscreen();
        assert!(engine.is_window_fullscreen());
        engine.maximize_window();
        assert!(engine.is_window_maximized());
        engine.minimize_window();
        assert!(engine.is_window_minimized());
        engine.restore_window();
        assert!(!engine.is_window_minimized() && !engine.is_window_maximized());

        assert_eq!(engine.monitor_count(), 2);
        assert_eq!(engine.current_monitor(), 1);
        assert_eq!(engine.monitor_size(1), (2560, 1440));
        assert_eq!(engine.monitor_position(1), (1920, -200));
        assert_eq!(engine.monitor_refresh_rate(1), 144);
        assert_eq!(engine.monitor_name(1), "side");
        assert_eq!(engine.monitor_size(7), (0, 0));

        control.request_close();
        assert!(engine.window_should_close());
    }

    #[test]
    fn opacity_is_clamped() {
        let _guard = serial();
        let (control, journal) = (HeadlessControl::new(), Journal::new());
        let mut engine = Engine::new(Subsystems::headless(&control, &journal));
        engine.init(EngineConfig::default()).unwrap();

        engine.set_window_opacity(3.0);
        assert_eq!(control.opacity(), 1.0);
        engine.set_window_opacity(-1.0);
        assert_eq!(control.opacity(), 0.0);
        engine.set_window_opacity(0.25);
        assert_eq!(control.opacity(), 0.25);
    }

    #[test]
    fn icon_path_is_forwarded() {
        let _guard = serial();
        let (control, journal) = (HeadlessControl::new(), Journal::new());
        let mut engine = Engine::new(Subsystems::headless(&control, &journal));
        engine.init(EngineConfig::default()).unwrap();

        engine.set_window_icon("assets/icon.png");
        assert_eq!(
            control.icon().as_deref(),
            Some(std::path::Path::new("assets/icon.png"))
        );
    }
}
