use crate::{
    CameraConfig, CameraError, FrameSource, LatestReceiver, LatestSender, latest, yuyv_to_rgba,
};
use glint_vision::{Frame, decode_frame};
use std::thread::{self, JoinHandle};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Frame, CameraError>;

const MJPG: &[u8; 4] = b"MJPG";
const YUYV: &[u8; 4] = b"YUYV";

#[derive(Debug, Clone, Copy, PartialEq)]
enum PixelFormat {
    Mjpeg,
    Yuyv,
}

/// V4L2 camera. Frames are captured on a dedicated thread and handed over
/// through a single slot: a frame the consumer has not taken yet is replaced
/// by the next one, so `capture` always returns the newest frame.
pub struct V4l2Camera {
    config: CameraConfig,
    format: PixelFormat,
    width: usize,
    height: usize,
    device: Option<Device>,
    receiver: Option<LatestReceiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("receiver", &self.receiver.is_some())
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl FrameSource for V4l2Camera {
    async fn capture(&mut self) -> Result<Frame, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("receiver not initialized".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("capture thread stopped".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // a dropped receiver stops the capture thread at its next publish
        drop(self.receiver.take());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    /// Open the device and negotiate MJPEG, falling back to YUYV.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::Device` if the device cannot be opened or
    /// offers neither format.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;
        let size = config.resolution();

        let requested = Format::new(size.width, size.height, FourCC::new(MJPG));
        let mut format = Capture::set_format(&device, &requested)?;
        if format.fourcc != FourCC::new(MJPG) {
            let requested = Format::new(size.width, size.height, FourCC::new(YUYV));
            format = Capture::set_format(&device, &requested)?;
        }

        let pixel_format = if format.fourcc == FourCC::new(MJPG) {
            PixelFormat::Mjpeg
        } else if format.fourcc == FourCC::new(YUYV) {
            PixelFormat::Yuyv
        } else {
            return Err(CameraError::Device(format!(
                "device offers {} but neither MJPG nor YUYV",
                format.fourcc
            )));
        };

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        log::info!(
            "opened {} at {}x{} ({:?})",
            config.device().display(),
            format.width,
            format.height,
            pixel_format
        );

        Ok(Self {
            format: pixel_format,
            width: format.width as usize,
            height: format.height as usize,
            config,
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    /// Spawn the capture thread on first use.
    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("device already consumed".to_string()))?;

        let buffers = self.config.mmap_buffers();
        let (tx, rx) = latest();
        let (format, width, height) = (self.format, self.width, self.height);

        let handle = thread::spawn(move || {
            if let Err(e) = capture_loop(device, tx, buffers, format, width, height) {
                log::error!("capture thread: {e}");
            }
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);
        Ok(())
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Resolution the driver actually granted.
    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

fn capture_loop(
    device: Device,
    tx: LatestSender<FrameResult>,
    buffers: u32,
    format: PixelFormat,
    width: usize,
    height: usize,
) -> Result<(), CameraError> {
    let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffers)
        .map_err(|e| CameraError::Stream(e.to_string()))?;

    loop {
        let (data, _meta) =
            CaptureStream::next(&mut stream).map_err(|e| CameraError::Stream(e.to_string()))?;

        // a bad frame is reported to the consumer, the stream keeps going
        let frame = match format {
            PixelFormat::Mjpeg => decode_frame(data),
            PixelFormat::Yuyv => yuyv_to_rgba(data, width, height),
        }
        .map_err(CameraError::from);

        match tx.publish(frame) {
            Ok(false) => {}
            Ok(true) => log::trace!("consumer behind, older frame replaced"),
            Err(_) => {
                log::debug!("frame receiver dropped, stopping capture");
                break;
            }
        }
    }

    Ok(())
}
