/// Handle to the one pending frame callback of a scene instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub u32);

/// Self-rescheduling frame loop bookkeeping.
///
/// At most one frame is pending at a time. The host's frame primitive fires,
/// the engine `take`s the handle, runs one frame and requests the next.
/// Cancelling clears the pending handle so no further frame runs.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameHandle>,
    next_id: u32,
    frames_run: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next frame. A frame already pending is kept.
    pub fn request(&mut self) -> FrameHandle {
        if let Some(handle) = self.pending {
            return handle;
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    /// Consume the pending frame, if any. Returns None after cancellation.
    pub fn take(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take()?;
        self.frames_run += 1;
        Some(handle)
    }

    /// Cancel the pending frame. Returns the handle that was cancelled.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames consumed over the scheduler's lifetime.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}
