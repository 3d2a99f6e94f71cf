use glint_vision::VisionError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CameraError {
    /// Opening or configuring the device failed.
    Device(String),
    /// The capture stream failed mid-run.
    Stream(String),
    Decode(VisionError),
    /// The capture thread is gone.
    Channel(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "stream error: {msg}"),
            CameraError::Decode(err) => write!(f, "decode error: {err}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<io::Error> for CameraError {
    fn from(err: io::Error) -> Self {
        CameraError::Device(err.to_string())
    }
}

impl From<VisionError> for CameraError {
    fn from(err: VisionError) -> Self {
        CameraError::Decode(err)
    }
}
