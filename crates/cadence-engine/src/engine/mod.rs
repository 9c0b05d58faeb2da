//! The engine context.
//!
//! [`Engine`] owns the collaborators handed to it through [`Subsystems`] and,
//! between a successful [`Engine::init`] and the matching
//! [`Engine::shutdown`], the process state. Expected call pattern, all on one
//! thread:
//!
//! ```no_run
//! use cadence_engine::{Engine, EngineConfig, Subsystems};
//!
//! let mut engine = Engine::new(Subsystems::native());
//! engine.init(EngineConfig::default().with_target_fps(60))?;
//! while !engine.window_should_close() {
//!     engine.update();
//! }
//! engine.shutdown();
//! # Ok::<(), cadence_engine::InitError>(())
//! ```

mod error;
mod lifecycle;
mod state;
mod update;
mod window;

pub use error::InitError;
pub use state::{is_engine_live, WindowGeometry};

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::assets::AssetRegistry;
use crate::audio::{Audio, SilentAudio};
use crate::codec::Transcoder;
use crate::config::EngineConfig;
use crate::input::{Input, InputEvent, InputSystem, Key, MouseButton};
use crate::platform::headless::{
    HeadlessAudio, HeadlessControl, HeadlessInput, HeadlessPlatform, HeadlessRenderer, Journal,
};
use crate::platform::Platform;
use crate::render::Renderer;
use crate::time::{default_suspender, Clock, FramePacer, FrameTiming, Suspend, SystemClock};

use state::ProcessState;

/// Collaborators an engine is built from.
pub struct Subsystems {
    pub platform: Box<dyn Platform>,
    pub input: Box<dyn Input>,
    pub audio: Box<dyn Audio>,
    pub renderer: Box<dyn Renderer>,
    pub transcoder: Option<Box<dyn Transcoder>>,
    pub clock: Box<dyn Clock>,
    pub suspender: Box<dyn Suspend>,
}

impl Subsystems {
    /// Platform and renderer are mandatory; the rest start from defaults:
    /// [`InputSystem`], [`SilentAudio`], no transcoder, wall clock and the
    /// target's default suspension strategy.
    pub fn new(platform: impl Platform + 'static, renderer: impl Renderer + 'static) -> Self {
        Self {
            platform: Box::new(platform),
            input: Box::new(InputSystem::default()),
            audio: Box::new(SilentAudio::default()),
            renderer: Box::new(renderer),
            transcoder: None,
            clock: Box::new(SystemClock::new()),
            suspender: default_suspender(),
        }
    }

    /// `winit` window, `wgpu` renderer, image codec warm-up.
    #[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
    pub fn native() -> Self {
        Self::new(
            crate::platform::native::WinitPlatform::new(),
            crate::render::GpuRenderer::default(),
        )
        .with_transcoder(crate::codec::ImageWarmUp::default())
    }

    /// Fully in-memory collaborators scripted by `control`, journaling into
    /// `journal`.
    pub fn headless(control: &HeadlessControl, journal: &Journal) -> Self {
        Self::new(
            HeadlessPlatform::new(control.clone(), journal.clone()),
            HeadlessRenderer::new(journal.clone()),
        )
        .with_input(HeadlessInput::new(journal.clone()))
        .with_audio(HeadlessAudio::new(journal.clone()))
    }

    pub fn with_input(mut self, input: impl Input + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_audio(mut self, audio: impl Audio + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_transcoder(mut self, transcoder: impl Transcoder + 'static) -> Self {
        self.transcoder = Some(Box::new(transcoder));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_suspender(mut self, suspender: impl Suspend + 'static) -> Self {
        self.suspender = Box::new(suspender);
        self
    }
}

/// Engine context. See the module docs for the call pattern.
///
/// Every query returns a documented default while the engine is not
/// initialized; mutating calls made before init log a warning and do nothing.
pub struct Engine {
    platform: Box<dyn Platform>,
    input: Box<dyn Input>,
    audio: Box<dyn Audio>,
    renderer: Box<dyn Renderer>,
    transcoder: Option<Box<dyn Transcoder>>,
    clock: Box<dyn Clock>,
    suspender: Box<dyn Suspend>,

    pacer: FramePacer,

    /// Reused every tick to carry window events to the input subsystem.
    events: Vec<InputEvent>,

    state: Option<ProcessState>,
}

impl Engine {
    pub fn new(subsystems: Subsystems) -> Self {
        let Subsystems {
            platform,
            input,
            audio,
            renderer,
            transcoder,
            clock,
            suspender,
        } = subsystems;

        let pacer = FramePacer::new(clock.now());

        Self {
            platform,
            input,
            audio,
            renderer,
            transcoder,
            clock,
            suspender,
            pacer,
            events: Vec::new(),
            state: None,
        }
    }

    fn live(&self) -> Option<&ProcessState> {
        self.state.as_ref().filter(|s| s.initialized)
    }

    fn live_mut(&mut self, op: &str) -> Option<&mut ProcessState> {
        let state = self.state.as_mut().filter(|s| s.initialized);
        if state.is_none() {
            log::warn!("{op} called before init; ignored");
        }
        state
    }

    /// True between a successful `init` and `shutdown`.
    pub fn is_window_ready(&self) -> bool {
        self.live().is_some()
    }

    /// Snapshot of the config passed to `init`.
    pub fn config(&self) -> Option<&EngineConfig> {
        self.live().map(|s| &s.config)
    }

    /// True while the engine is live and its audio device is open.
    pub fn is_audio_device_ready(&self) -> bool {
        self.live().is_some() && self.audio.is_device_ready()
    }

    // ── timing ─────────────────────────────────────────────────────────────

    /// Sets the frame-rate ceiling; 0 removes it.
    pub fn set_target_fps(&mut self, fps: u32) {
        if let Some(state) = self.live_mut("set_target_fps") {
            state.timing.set_target_fps(fps);
            log::debug!("target fps set to {fps}");
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.live().map(|s| s.timing.target_fps()).unwrap_or(0)
    }

    /// Clamped duration of the last tick in seconds, 0 before init.
    pub fn frame_time(&self) -> f32 {
        self.live()
            .map(|s| s.timing.delta_time().as_secs_f32())
            .unwrap_or(0.0)
    }

    /// Same as [`frame_time`](Self::frame_time).
    pub fn delta_time(&self) -> f32 {
        self.frame_time()
    }

    /// Seconds since `init`, 0 before init.
    pub fn time(&self) -> f64 {
        self.live()
            .map(|s| s.timing.elapsed(self.clock.now()).as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn frame_count(&self) -> u64 {
        self.live().map(|s| s.timing.frame_count()).unwrap_or(0)
    }

    /// Ticks counted in the last completed one-second window.
    pub fn fps(&self) -> u32 {
        self.live().map(|s| s.timing.current_fps()).unwrap_or(0)
    }

    pub fn timing(&self) -> Option<&FrameTiming> {
        self.live().map(|s| &s.timing)
    }

    // ── assets ─────────────────────────────────────────────────────────────

    pub fn assets(&self) -> Option<&AssetRegistry> {
        self.live().map(|s| &s.assets)
    }

    /// Registry drained during shutdown. `None` before init.
    pub fn assets_mut(&mut self) -> Option<&mut AssetRegistry> {
        self.live_mut("assets_mut").map(|s| &mut s.assets)
    }

    // ── random ─────────────────────────────────────────────────────────────

    pub fn set_random_seed(&mut self, seed: u64) {
        if let Some(state) = self.live_mut("set_random_seed") {
            state.rng = StdRng::seed_from_u64(seed);
        }
    }

    /// Uniform integer in `[min, max]` (bounds may be given in either order).
    /// 0 before init.
    pub fn random_value(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        match self.live_mut("random_value") {
            Some(state) => state.rng.gen_range(lo..=hi),
            None => 0,
        }
    }

    // ── input ──────────────────────────────────────────────────────────────

    pub fn is_key_down(&self, key: Key) -> bool {
        self.live().is_some() && self.input.is_key_down(key)
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.live().is_some() && self.input.is_key_pressed(key)
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.live().is_some() && self.input.is_mouse_button_down(button)
    }

    /// `(0, 0)` before init or while the pointer is outside the window.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.live()
            .and_then(|_| self.input.mouse_position())
            .unwrap_or((0.0, 0.0))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.state.is_some() {
            log::debug!("engine dropped while initialized; shutting down");
            self.shutdown();
        }
    }
}
