//! Desktop window backend on `winit`.
//!
//! The engine drives the loop itself (init, update, shutdown), so instead of
//! `EventLoop::run_app` this backend pumps the event loop once per
//! `poll_events` call. One event loop is created per [`WinitPlatform`] and
//! reused by every window it hands out, since most platforms refuse to create
//! a second one.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Icon, Window, WindowAttributes, WindowId};

use crate::config::WindowConfig;
use crate::input::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent,
};

use super::{MonitorInfo, Platform, PlatformWindow, SurfaceHandle};

/// How many pump iterations `init` waits for the native window to appear.
const CREATE_ATTEMPTS: u32 = 200;
const CREATE_PUMP_TIMEOUT: Duration = Duration::from_millis(5);

type SharedLoop = Rc<RefCell<EventLoop<()>>>;

/// Window factory backed by a lazily created `winit` event loop.
#[derive(Default)]
pub struct WinitPlatform {
    event_loop: Option<SharedLoop>,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for WinitPlatform {
    fn create_window(&mut self) -> Result<Box<dyn PlatformWindow>> {
        let event_loop = match &self.event_loop {
            Some(event_loop) => Rc::clone(event_loop),
            None => {
                let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
                let event_loop = Rc::new(RefCell::new(event_loop));
                self.event_loop = Some(Rc::clone(&event_loop));
                event_loop
            }
        };

        Ok(Box::new(WinitWindow::new(event_loop)))
    }
}

/// Event-loop side of a window: receives callbacks during a pump.
#[derive(Default)]
struct Host {
    pending: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,

    close_requested: bool,
    loop_exited: bool,

    // Tracked because winit 0.30 has no modifier or cursor queries.
    modifiers: Modifiers,
    pointer: Option<(f32, f32)>,

    events: Vec<InputEvent>,
}

impl Host {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.pending.take() else {
            return;
        };

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                self.create_error = Some(anyhow::Error::new(e).context("failed to create window"))
            }
        }
    }

    fn translate(&mut self, window: &Window, event: &WindowEvent) {
        match event {
            WindowEvent::ModifiersChanged(m) => {
                let ms: ModifiersState = m.state();
                self.modifiers = map_modifiers(ms);
                self.events.push(InputEvent::ModifiersChanged(self.modifiers));
            }

            WindowEvent::Focused(f) => self.events.push(InputEvent::Focused(*f)),

            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                self.events.push(InputEvent::PointerLeft);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical_f32(window, *position);
                self.pointer = Some((x, y));
                self.events.push(InputEvent::PointerMoved { x, y });
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let state = match state {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                };
                let (x, y) = self.pointer.unwrap_or((0.0, 0.0));

                self.events.push(InputEvent::PointerButton(PointerButtonEvent {
                    button: map_mouse_button(*button),
                    state,
                    x,
                    y,
                }));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                    MouseScrollDelta::PixelDelta(p) => {
                        let (x, y) = to_logical_f32(window, *p);
                        MouseWheelDelta::Pixel { x, y }
                    }
                };
                self.events.push(InputEvent::MouseWheel(delta));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let state = match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                };

                self.events.push(InputEvent::Key {
                    key: map_key(event.physical_key),
                    state,
                    repeat: event.repeat,
                });

                if state == KeyState::Pressed {
                    if let Some(text) = event.text.as_ref().filter(|t| !t.is_empty()) {
                        self.events.push(InputEvent::Text(text.to_string()));
                    }
                }
            }

            WindowEvent::Ime(winit::event::Ime::Commit(text)) if !text.is_empty() => {
                self.events.push(InputEvent::Text(text.clone()));
            }

            _ => {}
        }
    }
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    // `resumed` only fires once per event loop; windows requested by later
    // init cycles are created here.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        if matches!(event, WindowEvent::CloseRequested | WindowEvent::Destroyed) {
            self.close_requested = true;
        }

        self.translate(&window, &event);
    }
}

/// One native window plus the shared event loop that feeds it.
pub struct WinitWindow {
    event_loop: SharedLoop,
    host: Host,
    opacity: f32,
}

impl WinitWindow {
    fn new(event_loop: SharedLoop) -> Self {
        Self {
            event_loop,
            host: Host::default(),
            opacity: 1.0,
        }
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let status = self
            .event_loop
            .borrow_mut()
            .pump_app_events(timeout, &mut self.host);

        if let PumpStatus::Exit(code) = status {
            log::info!("winit event loop exited with code {code}");
            self.host.loop_exited = true;
        }
    }

    fn window(&self) -> Option<&Window> {
        self.host.window.as_deref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl PlatformWindow for WinitWindow {
    fn init(&mut self, config: &WindowConfig) -> Result<()> {
        anyhow::ensure!(self.host.window.is_none(), "window already initialized");

        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(config.width),
                f64::from(config.height),
            ))
            .with_resizable(config.resizable)
            .with_visible(config.visible)
            .with_transparent(config.transparent)
            .with_fullscreen(config.fullscreen.then_some(Fullscreen::Borderless(None)));

        self.host.pending = Some(attrs);
        self.host.create_error = None;
        self.host.close_requested = false;

        for _ in 0..CREATE_ATTEMPTS {
            self.pump(Some(CREATE_PUMP_TIMEOUT));

            if let Some(err) = self.host.create_error.take() {
                self.host.pending = None;
                return Err(err);
            }
            if self.host.window.is_some() {
                break;
            }
            anyhow::ensure!(!self.host.loop_exited, "event loop exited before the window was created");
        }

        if self.host.window.is_none() {
            self.host.pending = None;
            anyhow::bail!("window was not created after {CREATE_ATTEMPTS} event loop iterations");
        }

        if let Some(icon) = &config.icon {
            if let Err(e) = self.set_icon(icon) {
                log::warn!("ignoring window icon: {e:#}");
            }
        }

        log::debug!("native window created ({}x{})", config.width, config.height);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.host.pending = None;
        if self.host.window.take().is_some() {
            // Let the platform process the destroy request.
            self.pump(Some(Duration::ZERO));
        }
        self.host.events.clear();
        self.host.close_requested = false;
        self.host.pointer = None;
    }

    fn size(&self) -> (u32, u32) {
        self.window()
            .map(|w| {
                let size = w.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }

    fn poll_events(&mut self, events: &mut Vec<InputEvent>) {
        self.pump(Some(Duration::ZERO));
        events.append(&mut self.host.events);
    }

    fn should_close(&self) -> bool {
        self.host.close_requested || self.host.loop_exited
    }

    fn set_title(&mut self, title: &str) {
        if let Some(w) = self.window() {
            w.set_title(title);
        }
    }

    fn is_fullscreen(&self) -> bool {
        self.window().is_some_and(|w| w.fullscreen().is_some())
    }

    fn is_hidden(&self) -> bool {
        self.window().is_some_and(|w| w.is_visible() == Some(false))
    }

    fn is_minimized(&self) -> bool {
        self.window().is_some_and(|w| w.is_minimized().unwrap_or(false))
    }

    fn is_maximized(&self) -> bool {
        self.window().is_some_and(|w| w.is_maximized())
    }

    fn is_focused(&self) -> bool {
        self.window().is_some_and(|w| w.has_focus())
    }

    fn toggle_fullscreen(&mut self) {
        if let Some(w) = self.window() {
            if w.fullscreen().is_some() {
                w.set_fullscreen(None);
            } else {
                w.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn maximize(&mut self) {
        if let Some(w) = self.window() {
            w.set_maximized(true);
        }
    }

    fn minimize(&mut self) {
        if let Some(w) = self.window() {
            w.set_minimized(true);
        }
    }

    fn restore(&mut self) {
        if let Some(w) = self.window() {
            w.set_minimized(false);
            w.set_maximized(false);
        }
    }

    // winit has no per-window alpha; the compositor only sees a transparent
    // surface and the renderer is responsible for the actual alpha.
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        if let Some(w) = self.window() {
            w.set_transparent(opacity < 1.0);
        }
    }

    fn set_icon(&mut self, path: &Path) -> Result<()> {
        let image = image::open(path)
            .with_context(|| format!("failed to load icon {}", path.display()))?
            .into_rgba8();
        let (width, height) = image.dimensions();
        let icon = Icon::from_rgba(image.into_raw(), width, height).context("invalid icon data")?;

        if let Some(w) = self.window() {
            w.set_window_icon(Some(icon));
        }
        Ok(())
    }

    fn monitor_count(&self) -> usize {
        self.window()
            .map(|w| w.available_monitors().count())
            .unwrap_or(0)
    }

    fn current_monitor(&self) -> usize {
        let Some(w) = self.window() else {
            return 0;
        };
        let Some(current) = w.current_monitor() else {
            return 0;
        };

        w.available_monitors()
            .position(|m| m == current)
            .unwrap_or(0)
    }

    fn monitor(&self, index: usize) -> Option<MonitorInfo> {
        let monitor = self.window()?.available_monitors().nth(index)?;
        let size = monitor.size();
        let position = monitor.position();

        Some(MonitorInfo {
            name: monitor.name().unwrap_or_default(),
            width: size.width,
            height: size.height,
            x: position.x,
            y: position.y,
            refresh_rate: monitor
                .refresh_rate_millihertz()
                .map(|mhz| (mhz + 500) / 1000)
                .unwrap_or(0),
        })
    }

    fn surface_handle(&self) -> Option<Arc<dyn SurfaceHandle>> {
        self.host
            .window
            .clone()
            .map(|w| w as Arc<dyn SurfaceHandle>)
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}
