use glint_codec::{Codec, DecodeError};
use glint_vision::{BoundingBox, Frame};

/// A captured frame on its way to a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    pub seq: u64,
    /// Tracking state when the frame was sent. Workers skip inactive requests.
    pub active: bool,
    pub frame: Frame,
}

/// A worker's answer to one [`FrameRequest`].
///
/// `bbox` is the raw extractor output, which may be degenerate. `None` means
/// the worker rejected the frame and there is nothing to show for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxReport {
    pub seq: u64,
    pub bbox: Option<BoundingBox>,
}

impl FrameRequest {
    /// Encoded size in bytes, or `None` if the frame's dimensions do not fit
    /// the u32 wire fields.
    pub fn wire_len(&self) -> Option<usize> {
        self.frame.wire_dimensions()?;
        // seq, active, width, height, blob length prefix
        (8 + 1 + 4 + 4 + 4usize).checked_add(self.frame.data.len())
    }
}

impl Codec for FrameRequest {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.seq.encode(buf);
        self.active.encode(buf);
        self.frame.encode(buf);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        Ok(Self {
            seq: u64::decode(buf, pos)?,
            active: bool::decode(buf, pos)?,
            frame: Frame::decode(buf, pos)?,
        })
    }
}

impl Codec for BoxReport {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.seq.encode(buf);
        self.bbox.encode(buf);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        Ok(Self {
            seq: u64::decode(buf, pos)?,
            bbox: Option::<BoundingBox>::decode(buf, pos)?,
        })
    }
}
