use crate::{Frame, VisionError, frame::CHANNELS};
use glint_base::Plane;

/// One byte of brightness per pixel.
pub type IntensityBuffer = Plane<u8>;

/// How red, green and blue are combined into one intensity value. Alpha never contributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Weighting {
    /// Unweighted mean of the three channels, rounded to nearest.
    #[default]
    Average,
    /// ITU-R BT.601 luma: 0.299 R + 0.587 G + 0.114 B, rounded to nearest.
    Rec601,
}

impl Weighting {
    #[inline]
    pub fn apply(self, r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (r as u32, g as u32, b as u32);
        match self {
            // a third is never exactly .5 away, so +1 rounds to nearest
            Weighting::Average => ((r + g + b + 1) / 3) as u8,
            Weighting::Rec601 => ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8,
        }
    }
}

/// Reduce an RGBA frame to a single intensity channel of the same size.
///
/// # Errors
///
/// Returns `VisionError::MalformedFrame` if the buffer length does not match
/// `width * height * 4`. Nothing is computed in that case.
pub fn to_intensity(frame: &Frame, weighting: Weighting) -> Result<IntensityBuffer, VisionError> {
    frame.validate()?;

    let data = frame
        .data
        .chunks_exact(CHANNELS)
        .map(|px| weighting.apply(px[0], px[1], px[2]))
        .collect();

    Ok(Plane::new(frame.width, frame.height, data)?)
}
