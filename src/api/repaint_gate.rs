/// Coalesces repaint requests into at most one pending frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepaintGate {
    scheduled: bool,
}

impl RepaintGate {
    /// Returns `true` when this call scheduled a repaint; requests made while
    /// one is already pending are dropped.
    pub fn request(&mut self) -> bool {
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        self.scheduled
    }

    /// Called when a frame starts; later requests schedule the next frame.
    pub fn begin_frame(&mut self) {
        self.scheduled = false;
    }
}
