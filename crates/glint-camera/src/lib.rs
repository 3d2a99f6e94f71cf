//! Frame sources for the tracker.
//!
//! Every source implements [`FrameSource`], which hands out one RGBA
//! [`Frame`](glint_vision::Frame) per call. The V4L2 backend sits behind the
//! `v4l2` feature; [`ReplaySource`] works everywhere and feeds tests and
//! offline runs.

pub mod config;
pub mod convert;
pub mod error;
pub mod latest;
pub mod replay;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{CameraConfig, MIN_MMAP_BUFFERS, Resolution};
pub use convert::yuyv_to_rgba;
pub use error::CameraError;
pub use latest::{LatestReceiver, LatestSender, latest};
pub use replay::ReplaySource;
pub use traits::FrameSource;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
