use crate::CameraError;
use glint_vision::Frame;

/// Async source of RGBA frames.
///
/// A failed capture is not fatal to the caller: the next call may succeed.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Capture the next frame.
    async fn capture(&mut self) -> Result<Frame, CameraError>;
}
