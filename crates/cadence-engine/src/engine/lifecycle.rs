#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::platform::PlatformWindow;
use crate::time::FrameTiming;

use super::state::{InstanceLease, ProcessState, WindowGeometry};
use super::{Engine, InitError};

/// Bring-up steps that need an explicit teardown when a later step fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Stage {
    Window,
    Input,
    Audio,
}

impl Engine {
    /// Brings up window, input, audio (when enabled) and renderer, in that
    /// order.
    ///
    /// Rejected without side effects when this engine, or any other engine
    /// in the process, is already initialized. If a step fails, everything
    /// acquired before it is released in reverse order and the engine stays
    /// uninitialized.
    pub fn init(&mut self, config: EngineConfig) -> Result<(), InitError> {
        if self.state.is_some() {
            log::warn!("init called on an initialized engine; ignored");
            return Err(InitError::AlreadyInitialized);
        }

        config.validate().map_err(InitError::InvalidConfig)?;

        let Some(lease) = InstanceLease::acquire() else {
            log::warn!("init refused: another engine instance is live");
            return Err(InitError::AlreadyInitialized);
        };
        let start = self.clock.now();

        let mut window = self
            .platform
            .create_window()
            .map_err(InitError::WindowCreate)?;

        if let Err(e) = window.init(&config.window) {
            log::warn!("window init failed, releasing window handle: {e:#}");
            return Err(InitError::WindowInit(e));
        }
        let mut acquired = vec![Stage::Window];

        let geometry = WindowGeometry::new(window.size());

        self.input.init();
        acquired.push(Stage::Input);

        if config.audio_enabled {
            self.audio.init_device();
            acquired.push(Stage::Audio);
        }

        let seed = config.seed.unwrap_or_else(wall_clock_seed);
        let rng = StdRng::seed_from_u64(seed);
        log::debug!("rng seeded with {seed}");

        if let Some(transcoder) = self.transcoder.as_mut() {
            if let Err(e) = transcoder.warm_up() {
                self.unwind(window.as_mut(), &acquired);
                return Err(InitError::Transcoder(e));
            }
        }

        if let Err(e) = self.renderer.init(window.as_ref(), &config) {
            self.unwind(window.as_mut(), &acquired);
            return Err(InitError::Renderer(e));
        }

        let timing = FrameTiming::new(start, config.target_fps);

        log::info!(
            "engine initialized: \"{}\" {}x{}, audio {}, target fps {}",
            config.window.title,
            geometry.last_width,
            geometry.last_height,
            if config.audio_enabled { "on" } else { "off" },
            config.target_fps
        );

        let mut state = ProcessState::new(lease, window, config, timing, geometry, rng);
        state.initialized = true;
        self.state = Some(state);

        Ok(())
    }

    /// Releases acquired stages in reverse order.
    fn unwind(&mut self, window: &mut dyn PlatformWindow, acquired: &[Stage]) {
        log::warn!("init failed, rolling back {} stage(s)", acquired.len());

        for stage in acquired.iter().rev() {
            match stage {
                Stage::Audio => self.audio.shutdown_device(),
                Stage::Input => self.input.shutdown(),
                Stage::Window => window.shutdown(),
            }
        }
    }

    /// Drains assets, then shuts down renderer, input, audio and window.
    ///
    /// Does nothing when the engine is not initialized.
    pub fn shutdown(&mut self) {
        let Some(mut state) = self.state.take() else {
            log::debug!("shutdown called on an uninitialized engine; ignored");
            return;
        };

        let destroyed = state.assets.drain();

        self.renderer.shutdown();
        self.input.shutdown();
        if state.config.audio_enabled {
            self.audio.shutdown_device();
        }
        state.window.shutdown();

        let frames = state.timing.frame_count();
        drop(state);

        log::info!("engine shut down after {frames} frame(s), {destroyed} asset(s) destroyed");
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
