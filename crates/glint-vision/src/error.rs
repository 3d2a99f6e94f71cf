use glint_base::PlaneError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum VisionError {
    /// Frame dimensions disagree with its pixel buffer. A caller bug, never retried.
    MalformedFrame {
        width: usize,
        height: usize,
        len: usize,
    },
    Plane(PlaneError),
    Decode(String),
}

impl fmt::Display for VisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisionError::MalformedFrame { width, height, len } => write!(
                f,
                "malformed frame: {width}x{height} RGBA needs {} bytes, buffer has {len}",
                width.saturating_mul(*height).saturating_mul(crate::frame::CHANNELS)
            ),
            VisionError::Plane(err) => write!(f, "plane error: {err}"),
            VisionError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for VisionError {}

impl From<PlaneError> for VisionError {
    fn from(err: PlaneError) -> Self {
        VisionError::Plane(err)
    }
}

impl From<crates_image::ImageError> for VisionError {
    fn from(err: crates_image::ImageError) -> Self {
        VisionError::Decode(err.to_string())
    }
}
