//! Redraw coalescing: at most one pending frame at a time.

/// Host hook that arms a single animation-frame callback.
pub trait FrameRequester {
    fn request_frame(&mut self);
}

impl<F: FnMut()> FrameRequester for F {
    fn request_frame(&mut self) {
        self()
    }
}

/// Coalesces any number of redraw requests into one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    pending: bool,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a redraw as needed.
    ///
    /// Returns true only on the idle to pending transition; the caller arms
    /// a frame callback exactly then.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Like [`request`](Self::request), arming the frame through `requester`.
    pub fn request_with(&mut self, requester: &mut dyn FrameRequester) -> bool {
        let armed = self.request();
        if armed {
            requester.request_frame();
        }
        armed
    }

    /// Called from the frame callback. Clears the flag and returns whether a
    /// redraw was due.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
