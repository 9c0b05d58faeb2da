//! Audio device contract.
//!
//! The mixer lives outside the engine; the engine only opens the device during
//! init (when `EngineConfig::audio_enabled`) and closes it during shutdown.

pub trait Audio {
    fn init_device(&mut self);

    fn shutdown_device(&mut self);

    fn is_device_ready(&self) -> bool {
        false
    }
}

/// Device that produces no sound and only tracks open/closed state.
#[derive(Debug, Default)]
pub struct SilentAudio {
    open: bool,
}

impl Audio for SilentAudio {
    fn init_device(&mut self) {
        self.open = true;
        log::info!("audio device opened (silent)");
    }

    fn shutdown_device(&mut self) {
        if self.open {
            self.open = false;
            log::info!("audio device closed");
        }
    }

    fn is_device_ready(&self) -> bool {
        self.open
    }
}
