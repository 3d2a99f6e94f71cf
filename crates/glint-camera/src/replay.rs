use crate::{CameraError, FrameSource};
use glint_vision::{Frame, decode_frame, load_frame};
use std::path::Path;
use std::time::Duration;

/// Plays back a fixed list of frames, optionally looping.
///
/// Stands in for a camera in offline runs and tests. An exhausted,
/// non-looping source fails every further capture with `CameraError::Stream`.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<Frame>,
    next: usize,
    looping: bool,
    delay: Option<Duration>,
}

impl ReplaySource {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            next: 0,
            looping: false,
            delay: None,
        }
    }

    /// Decode each encoded image up front.
    pub fn from_encoded<B: AsRef<[u8]>>(images: &[B]) -> Result<Self, CameraError> {
        let frames = images
            .iter()
            .map(|bytes| decode_frame(bytes.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_frames(frames))
    }

    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, CameraError> {
        let frames = paths
            .iter()
            .map(load_frame)
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("replay source loaded {} frames", frames.len());
        Ok(Self::from_frames(frames))
    }

    /// Start over from the first frame once the list runs out.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Wait this long before every capture, like a real sensor's exposure.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames not yet handed out in the current pass.
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.next)
    }
}

impl FrameSource for ReplaySource {
    async fn capture(&mut self) -> Result<Frame, CameraError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.next >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return Err(CameraError::Stream("replay exhausted".to_string()));
            }
            self.next = 0;
        }

        let frame = self.frames[self.next].clone();
        self.next += 1;
        Ok(frame)
    }
}
