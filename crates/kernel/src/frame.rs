use crate::gallery::Gallery;

/// Cancellable handle for the per-frame loop.
///
/// The loop does not own a clock. The host calls [`FrameLoop::step`] once per
/// display frame and schedules the next frame only while it returns `true`.
/// Tests single-step it synchronously.
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
}

impl FrameLoop {
    /// A stopped loop.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!(frames = self.frames, "frame loop started");
        }
        self.running = true;
    }

    /// Cancel the loop. A frame already in progress is never interrupted;
    /// the next `step` is simply refused.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(frames = self.frames, "frame loop stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames stepped by this handle.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one gallery tick if the loop is running. Returns whether the
    /// host should schedule another frame.
    pub fn step<F>(&mut self, gallery: &mut Gallery, render: F) -> bool
    where
        F: FnOnce(&Gallery),
    {
        if !self.running {
            return false;
        }
        let _span = tracing::trace_span!("frame", n = self.frames).entered();
        gallery.tick(render);
        self.frames += 1;
        self.running
    }
}
