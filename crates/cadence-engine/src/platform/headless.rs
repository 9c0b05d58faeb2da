//! In-memory collaborators.
//!
//! Everything here runs without a display, GPU or audio device. A
//! [`HeadlessControl`] scripts what the window reports (geometry, close
//! requests, pending input, injected failures) and a [`Journal`] records the
//! order in which the engine called into each collaborator.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;

use crate::audio::Audio;
use crate::codec::Transcoder;
use crate::config::{EngineConfig, WindowConfig};
use crate::input::{Input, InputEvent, InputSystem, Key, MouseButton};
use crate::render::{Color, Renderer};

use super::{MonitorInfo, Platform, PlatformWindow};

/// Ordered log of collaborator calls, shared between clones.
///
/// A [`disabled`](Journal::disabled) journal drops every entry; long headless
/// runs use it so memory does not grow with the frame count.
#[derive(Debug, Clone)]
pub struct Journal(Option<Rc<RefCell<Vec<String>>>>);

impl Default for Journal {
    fn default() -> Self {
        Self(Some(Rc::default()))
    }
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn is_recording(&self) -> bool {
        self.0.is_some()
    }

    pub fn record(&self, entry: impl Into<String>) {
        if let Some(entries) = &self.0 {
            entries.borrow_mut().push(entry.into());
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.0
            .as_ref()
            .map(|e| e.borrow().clone())
            .unwrap_or_default()
    }

    /// Entries with the given prefix, in call order.
    pub fn filtered(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0
            .as_ref()
            .is_some_and(|e| e.borrow().iter().any(|x| x == entry))
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map(|e| e.borrow().len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.0 {
            entries.borrow_mut().clear();
        }
    }
}

#[derive(Debug)]
struct Scripted {
    open: bool,
    size: (u32, u32),
    close_requested: bool,
    focused: bool,
    fullscreen: bool,
    hidden: bool,
    minimized: bool,
    maximized: bool,
    title: String,
    opacity: f32,
    icon: Option<PathBuf>,
    monitors: Vec<MonitorInfo>,
    current_monitor: usize,
    pending: Vec<InputEvent>,
    fail_create: bool,
    fail_init: bool,
    polls: u64,
}

impl Default for Scripted {
    fn default() -> Self {
        Self {
            open: false,
            size: (0, 0),
            close_requested: false,
            focused: false,
            fullscreen: false,
            hidden: false,
            minimized: false,
            maximized: false,
            title: String::new(),
            opacity: 1.0,
            icon: None,
            monitors: vec![MonitorInfo {
                name: "headless-0".to_string(),
                width: 1920,
                height: 1080,
                x: 0,
                y: 0,
                refresh_rate: 60,
            }],
            current_monitor: 0,
            pending: Vec::new(),
            fail_create: false,
            fail_init: false,
            polls: 0,
        }
    }
}

/// Script and inspect the headless window from outside the engine.
#[derive(Debug, Clone, Default)]
pub struct HeadlessControl(Rc<RefCell<Scripted>>);

impl HeadlessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size reported from the next `size()` call on.
    pub fn set_size(&self, width: u32, height: u32) {
        self.0.borrow_mut().size = (width, height);
    }

    pub fn request_close(&self) {
        self.0.borrow_mut().close_requested = true;
    }

    /// Queues an event for the next `poll_events`.
    pub fn push_event(&self, event: InputEvent) {
        self.0.borrow_mut().pending.push(event);
    }

    pub fn set_focused(&self, focused: bool) {
        self.0.borrow_mut().focused = focused;
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>, current: usize) {
        let mut s = self.0.borrow_mut();
        s.monitors = monitors;
        s.current_monitor = current;
    }

    pub fn fail_create(&self, fail: bool) {
        self.0.borrow_mut().fail_create = fail;
    }

    pub fn fail_init(&self, fail: bool) {
        self.0.borrow_mut().fail_init = fail;
    }

    pub fn is_open(&self) -> bool {
        self.0.borrow().open
    }

    pub fn title(&self) -> String {
        self.0.borrow().title.clone()
    }

    pub fn opacity(&self) -> f32 {
        self.0.borrow().opacity
    }

    pub fn icon(&self) -> Option<PathBuf> {
        self.0.borrow().icon.clone()
    }

    pub fn polls(&self) -> u64 {
        self.0.borrow().polls
    }
}

pub struct HeadlessPlatform {
    control: HeadlessControl,
    journal: Journal,
}

impl HeadlessPlatform {
    pub fn new(control: HeadlessControl, journal: Journal) -> Self {
        Self { control, journal }
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(&mut self) -> Result<Box<dyn PlatformWindow>> {
        self.journal.record("window.create");
        anyhow::ensure!(
            !self.control.0.borrow().fail_create,
            "headless window creation refused"
        );

        Ok(Box::new(HeadlessWindow {
            control: self.control.clone(),
            journal: self.journal.clone(),
        }))
    }
}

pub struct HeadlessWindow {
    control: HeadlessControl,
    journal: Journal,
}

impl HeadlessWindow {
    fn with<R>(&self, f: impl FnOnce(&Scripted) -> R) -> R {
        f(&self.control.0.borrow())
    }

    fn with_open(&self, f: impl FnOnce(&mut Scripted)) {
        let mut s = self.control.0.borrow_mut();
        if s.open {
            f(&mut s);
        }
    }
}

impl PlatformWindow for HeadlessWindow {
    fn init(&mut self, config: &WindowConfig) -> Result<()> {
        self.journal.record("window.init");

        let mut s = self.control.0.borrow_mut();
        anyhow::ensure!(!s.fail_init, "headless window init refused");

        s.open = true;
        s.size = (config.width, config.height);
        s.title = config.title.clone();
        s.fullscreen = config.fullscreen;
        s.hidden = !config.visible;
        s.focused = config.visible;
        s.close_requested = false;
        s.icon = config.icon.clone();
        Ok(())
    }

    fn shutdown(&mut self) {
        self.journal.record("window.shutdown");
        let mut s = self.control.0.borrow_mut();
        s.open = false;
        s.pending.clear();
    }

    fn size(&self) -> (u32, u32) {
        self.with(|s| if s.open { s.size } else { (0, 0) })
    }

    fn poll_events(&mut self, events: &mut Vec<InputEvent>) {
        self.journal.record("window.poll");
        let mut s = self.control.0.borrow_mut();
        s.polls += 1;
        events.append(&mut s.pending);
    }

    fn should_close(&self) -> bool {
        self.with(|s| s.close_requested)
    }

    fn set_title(&mut self, title: &str) {
        self.with_open(|s| s.title = title.to_string());
    }

    fn is_fullscreen(&self) -> bool {
        self.with(|s| s.fullscreen)
    }

    fn is_hidden(&self) -> bool {
        self.with(|s| s.hidden)
    }

    fn is_minimized(&self) -> bool {
        self.with(|s| s.minimized)
    }

    fn is_maximized(&self) -> bool {
        self.with(|s| s.maximized)
    }

    fn is_focused(&self) -> bool {
        self.with(|s| s.focused)
    }

    fn toggle_fullscreen(&mut self) {
        self.with_open(|s| s.fullscreen = !s.fullscreen);
    }

    fn maximize(&mut self) {
        self.with_open(|s| {
            s.maximized = true;
            s.minimized = false;
        });
    }

    fn minimize(&mut self) {
        self.with_open(|s| {
            s.minimized = true;
            s.focused = false;
        });
    }

    fn restore(&mut self) {
        self.with_open(|s| {
            s.minimized = false;
            s.maximized = false;
        });
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.with_open(|s| s.opacity = opacity);
    }

    fn set_icon(&mut self, path: &Path) -> Result<()> {
        self.with_open(|s| s.icon = Some(path.to_path_buf()));
        Ok(())
    }

    fn monitor_count(&self) -> usize {
        self.with(|s| s.monitors.len())
    }

    fn current_monitor(&self) -> usize {
        self.with(|s| s.current_monitor)
    }

    fn monitor(&self, index: usize) -> Option<MonitorInfo> {
        self.with(|s| s.monitors.get(index).cloned())
    }
}

/// Input tracker that also journals its lifecycle calls.
pub struct HeadlessInput {
    journal: Journal,
    inner: InputSystem,
}

impl HeadlessInput {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            inner: InputSystem::default(),
        }
    }
}

impl Input for HeadlessInput {
    fn init(&mut self) {
        self.journal.record("input.init");
        self.inner.init();
    }

    fn update(&mut self, events: &[InputEvent]) {
        self.journal.record("input.update");
        self.inner.update(events);
    }

    fn shutdown(&mut self) {
        self.journal.record("input.shutdown");
        self.inner.shutdown();
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.inner.is_key_down(key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.inner.is_key_pressed(key)
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.inner.is_mouse_button_down(button)
    }

    fn mouse_position(&self) -> Option<(f32, f32)> {
        self.inner.mouse_position()
    }
}

pub struct HeadlessAudio {
    journal: Journal,
    open: bool,
}

impl HeadlessAudio {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            open: false,
        }
    }
}

impl Audio for HeadlessAudio {
    fn init_device(&mut self) {
        self.journal.record("audio.init");
        self.open = true;
    }

    fn shutdown_device(&mut self) {
        self.journal.record("audio.shutdown");
        self.open = false;
    }

    fn is_device_ready(&self) -> bool {
        self.open
    }
}

pub struct HeadlessRenderer {
    journal: Journal,
    fail_init: bool,
    ready: bool,
}

impl HeadlessRenderer {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail_init: false,
            ready: false,
        }
    }

    /// A renderer whose `init` always fails.
    pub fn failing(journal: Journal) -> Self {
        Self {
            fail_init: true,
            ..Self::new(journal)
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn init(&mut self, window: &dyn PlatformWindow, _config: &EngineConfig) -> Result<()> {
        self.journal.record("renderer.init");
        anyhow::ensure!(!self.fail_init, "headless renderer init refused");

        let (w, h) = window.size();
        anyhow::ensure!(w > 0 && h > 0, "window has zero size");

        self.ready = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.journal.record("renderer.shutdown");
        self.ready = false;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.journal.is_recording() {
            self.journal.record(format!("renderer.resize {width}x{height}"));
        }
    }

    fn present(&mut self, _clear: Color) -> Result<()> {
        anyhow::ensure!(self.ready, "renderer not initialized");
        self.journal.record("renderer.present");
        Ok(())
    }
}

pub struct HeadlessTranscoder {
    journal: Journal,
    fail: bool,
}

impl HeadlessTranscoder {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail: false,
        }
    }

    pub fn failing(journal: Journal) -> Self {
        Self {
            journal,
            fail: true,
        }
    }
}

impl Transcoder for HeadlessTranscoder {
    fn warm_up(&mut self) -> Result<()> {
        self.journal.record("transcoder.warm_up");
        anyhow::ensure!(!self.fail, "headless transcoder warm-up refused");
        Ok(())
    }
}
