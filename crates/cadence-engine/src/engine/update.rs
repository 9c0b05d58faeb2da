use anyhow::Result;

use crate::render::Color;

use super::Engine;

impl Engine {
    /// Runs one tick: waits out the frame budget, updates timing and FPS,
    /// detects a window resize, then pumps window events into input.
    ///
    /// Does nothing before init.
    pub fn update(&mut self) {
        let Some(state) = self.state.as_mut().filter(|s| s.initialized) else {
            return;
        };

        let pace = self.pacer.pace(
            state.timing.target_fps(),
            self.clock.as_ref(),
            self.suspender.as_mut(),
        );

        if let Some(fps) = state.timing.advance(pace) {
            log::debug!("fps: {fps}");
        }

        let (width, height) = state.window.size();
        if state.geometry.observe((width, height)) {
            log::debug!("window resized to {width}x{height}");
            self.renderer.resize(width, height);
        }

        self.events.clear();
        state.window.poll_events(&mut self.events);
        self.input.update(&self.events);

        log::trace!(
            "frame {} dt {:?} ({} event(s))",
            state.timing.frame_count(),
            state.timing.delta_time(),
            self.events.len()
        );
    }

    /// Clears the window to `clear` and presents it.
    pub fn present(&mut self, clear: Color) -> Result<()> {
        if self.live().is_none() {
            log::warn!("present called before init; ignored");
            return Ok(());
        }
        self.renderer.present(clear)
    }
}
