//! Edge-based object bounding for RGBA camera frames.
//!
//! The pipeline runs intensity reduction, a Sobel gradient filter and a
//! threshold scan, in that order. Every stage is a pure function, so the same
//! code serves the in-process worker and the remote worker.

pub mod bbox;
pub mod decode;
pub mod error;
pub mod frame;
pub mod gradient;
pub mod intensity;
pub mod pipeline;

pub use bbox::{BoundingBox, Point, Rect, detect, extract_bounding_box};
pub use decode::{decode_frame, load_frame};
pub use error::VisionError;
pub use frame::Frame;
pub use gradient::{GradientBuffer, KERNEL_X, KERNEL_Y, gradient_magnitude};
pub use intensity::{IntensityBuffer, Weighting, to_intensity};
pub use pipeline::{DEFAULT_THRESHOLD, FramePipeline, process_frame};
