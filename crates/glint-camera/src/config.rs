use std::fmt;
use std::path::{Path, PathBuf};

/// Requested capture size. The driver may grant a different one; see
/// `V4l2Camera::resolution`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const VGA: Resolution = Resolution::new(640, 480);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`. Zero sides are refused.
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.trim().split_once(['x', 'X'])?;
        let width = w.parse().ok().filter(|&v| v > 0)?;
        let height = h.parse().ok().filter(|&v| v > 0)?;
        Some(Self::new(width, height))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Kernel streaming needs at least two buffers to keep capturing while one is dequeued.
pub const MIN_MMAP_BUFFERS: u32 = 2;

/// How to open a V4L2 device.
///
/// `mmap_buffers` only sizes the driver's ring. The tracker side never sees
/// more than the newest frame, however many buffers the driver cycles through.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    device: PathBuf,
    resolution: Resolution,
    fps: u32,
    mmap_buffers: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new("/dev/video0")
    }
}

impl CameraConfig {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            resolution: Resolution::VGA,
            fps: 30,
            mmap_buffers: 4,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Clamped to [`MIN_MMAP_BUFFERS`].
    pub fn with_mmap_buffers(mut self, count: u32) -> Self {
        self.mmap_buffers = count.max(MIN_MMAP_BUFFERS);
        self
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn mmap_buffers(&self) -> u32 {
        self.mmap_buffers
    }
}
