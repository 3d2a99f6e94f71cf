use glint_camera::CameraError;
use glint_com::ComError;
use std::fmt;

/// Failure moving a frame to the worker or a result back.
#[derive(Debug)]
pub enum TransportError {
    /// The outbound slot still holds a request.
    Busy,
    /// The worker side is gone.
    Closed,
    /// No result arrived within the configured round-trip time.
    TimedOut,
    /// The request cannot be put on the wire: too large for one message, or
    /// frame dimensions past `u32::MAX`. Nothing was sent.
    Unsendable(String),
    Com(ComError),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Busy => write!(f, "transport busy"),
            TransportError::Closed => write!(f, "transport closed"),
            TransportError::TimedOut => write!(f, "timed out waiting for result"),
            TransportError::Unsendable(msg) => write!(f, "request not sendable: {msg}"),
            TransportError::Com(err) => write!(f, "com error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<ComError> for TransportError {
    fn from(err: ComError) -> Self {
        match err {
            ComError::ConnectionClosed => TransportError::Closed,
            other => TransportError::Com(other),
        }
    }
}

#[derive(Debug)]
pub enum TrackError {
    Camera(CameraError),
    Transport(TransportError),
    Com(ComError),
    Config(String),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::Camera(err) => write!(f, "camera error: {err}"),
            TrackError::Transport(err) => write!(f, "transport error: {err}"),
            TrackError::Com(err) => write!(f, "com error: {err}"),
            TrackError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for TrackError {}

impl From<CameraError> for TrackError {
    fn from(err: CameraError) -> Self {
        TrackError::Camera(err)
    }
}

impl From<TransportError> for TrackError {
    fn from(err: TransportError) -> Self {
        TrackError::Transport(err)
    }
}

impl From<ComError> for TrackError {
    fn from(err: ComError) -> Self {
        TrackError::Com(err)
    }
}
