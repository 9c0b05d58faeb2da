use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;

use crate::assets::AssetRegistry;
use crate::config::EngineConfig;
use crate::platform::PlatformWindow;
use crate::time::FrameTiming;

static ENGINE_LIVE: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide engine slot. Released on drop.
#[derive(Debug)]
pub(crate) struct InstanceLease(());

impl InstanceLease {
    pub(crate) fn acquire() -> Option<Self> {
        ENGINE_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(()))
    }
}

impl Drop for InstanceLease {
    fn drop(&mut self) {
        ENGINE_LIVE.store(false, Ordering::Release);
    }
}

/// True while some engine in the process is initialized.
pub fn is_engine_live() -> bool {
    ENGINE_LIVE.load(Ordering::Acquire)
}

/// Window size as seen on the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowGeometry {
    pub last_width: u32,
    pub last_height: u32,

    /// True only for the tick on which the size changed.
    pub was_resized: bool,
}

impl WindowGeometry {
    pub fn new((width, height): (u32, u32)) -> Self {
        Self {
            last_width: width,
            last_height: height,
            was_resized: false,
        }
    }

    /// Records this tick's size; returns whether it differs from the last one.
    pub fn observe(&mut self, (width, height): (u32, u32)) -> bool {
        self.was_resized = (width, height) != (self.last_width, self.last_height);
        self.last_width = width;
        self.last_height = height;
        self.was_resized
    }
}

/// Everything that exists between a successful init and the matching
/// shutdown. Only the lifecycle code constructs it.
pub(crate) struct ProcessState {
    pub(crate) window: Box<dyn PlatformWindow>,
    pub(crate) config: EngineConfig,
    pub(crate) initialized: bool,
    pub(crate) timing: FrameTiming,
    pub(crate) geometry: WindowGeometry,
    pub(crate) assets: AssetRegistry,
    pub(crate) rng: StdRng,
    _lease: InstanceLease,
}

impl ProcessState {
    pub(super) fn new(
        lease: InstanceLease,
        window: Box<dyn PlatformWindow>,
        config: EngineConfig,
        timing: FrameTiming,
        geometry: WindowGeometry,
        rng: StdRng,
    ) -> Self {
        Self {
            window,
            config,
            initialized: false,
            timing,
            geometry,
            assets: AssetRegistry::new(),
            rng,
            _lease: lease,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_flags_only_the_changed_tick() {
        let mut g = WindowGeometry::new((800, 600));
        assert!(!g.observe((800, 600)));
        assert!(g.observe((1024, 768)));
        assert!(g.was_resized);
        assert!(!g.observe((1024, 768)));
        assert!(!g.was_resized);
    }
}
