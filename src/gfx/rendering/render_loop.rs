//! Recurring redraw bookkeeping.
//!
//! The event loop asks for a redraw from `about_to_wait` while the loop is
//! running and draws one frame per `RedrawRequested`. Once stopped, the loop
//! stays stopped; every later tick is refused.

#[derive(Debug, Default)]
pub struct RenderLoop {
    running: bool,
    stopped: bool,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts issuing frames. Has no effect after [`RenderLoop::stop`].
    pub fn start(&mut self) {
        if self.stopped {
            log::debug!("render loop already stopped, not restarting");
            return;
        }
        self.running = true;
    }

    /// Stops the loop permanently.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("render loop stopped after {} frames", self.frames);
        }
        self.running = false;
        self.stopped = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether another redraw should be requested.
    pub fn wants_redraw(&self) -> bool {
        self.running
    }

    /// Claims the next frame. Returns `false` if nothing may be drawn.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
