use crate::VisionError;
use glint_codec::{Codec, DecodeError, decode_blob, encode_blob};
use std::fmt;

/// Bytes per pixel: red, green, blue, alpha.
pub const CHANNELS: usize = 4;

/// One captured RGBA image, row-major with a top-left origin.
///
/// Fields are public so transports can move frames without copying; any
/// stage that reads pixels calls [`Frame::validate`] first.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .finish()
    }
}

// Dimensions travel as u32 on the wire and bound u32 box coordinates, so a
// side past u32::MAX has no valid buffer length.
fn rgba_len(width: usize, height: usize) -> Option<usize> {
    u32::try_from(width).ok()?;
    u32::try_from(height).ok()?;
    width.checked_mul(height)?.checked_mul(CHANNELS)
}

impl Frame {
    /// Wrap an RGBA buffer, rejecting a length that does not match the dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, VisionError> {
        let frame = Self {
            width,
            height,
            data,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> [u8; 4],
    ) -> Result<Self, VisionError> {
        let len = rgba_len(width, height).ok_or(VisionError::MalformedFrame {
            width,
            height,
            len: 0,
        })?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self, VisionError> {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Expand packed RGB (3 bytes per pixel) to RGBA with an opaque alpha.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self, VisionError> {
        let pixels = width.checked_mul(height);
        if pixels.and_then(|p| p.checked_mul(3)) != Some(rgb.len()) {
            return Err(VisionError::MalformedFrame {
                width,
                height,
                len: rgb.len(),
            });
        }

        let mut data = Vec::with_capacity(rgb.len() / 3 * CHANNELS);
        for px in rgb.chunks_exact(3) {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Dimensions as carried on the wire, `None` when a side exceeds `u32::MAX`.
    pub fn wire_dimensions(&self) -> Option<(u32, u32)> {
        Some((u32::try_from(self.width).ok()?, u32::try_from(self.height).ok()?))
    }

    pub fn validate(&self) -> Result<(), VisionError> {
        match rgba_len(self.width, self.height) {
            Some(len) if len == self.data.len() => Ok(()),
            _ => Err(VisionError::MalformedFrame {
                width: self.width,
                height: self.height,
                len: self.data.len(),
            }),
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * CHANNELS;
        let px = self.data.get(i..i + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

// Decoding does not validate: a malformed frame must reach the pipeline
// boundary so it is rejected there, not hidden as a wire error.
impl Codec for Frame {
    /// A side past `u32::MAX` is written as `u32::MAX x u32::MAX`, which no
    /// buffer can match, so the receiver rejects the frame instead of
    /// reading truncated dimensions.
    fn encode(&self, buf: &mut Vec<u8>) {
        let (width, height) = self.wire_dimensions().unwrap_or((u32::MAX, u32::MAX));
        width.encode(buf);
        height.encode(buf);
        encode_blob(&self.data, buf);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        let width = u32::decode(buf, pos)? as usize;
        let height = u32::decode(buf, pos)? as usize;
        let data = decode_blob(buf, pos)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }
}
