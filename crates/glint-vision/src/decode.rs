use crate::{Frame, VisionError};
use std::path::Path;

/// Decode an encoded still (JPEG, PNG, BMP) into an RGBA frame.
///
/// The format is detected from the data. Grayscale and RGB sources are
/// expanded to RGBA with an opaque alpha channel.
///
/// # Errors
///
/// Returns `VisionError::Decode` if the data is invalid or the format is unsupported.
pub fn decode_frame(data: &[u8]) -> Result<Frame, VisionError> {
    let img = crates_image::load_from_memory(data)?;
    into_frame(img)
}

/// Read and decode an image file.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Frame, VisionError> {
    let path = path.as_ref();
    let img = crates_image::open(path)
        .map_err(|e| VisionError::Decode(format!("{}: {e}", path.display())))?;
    log::debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
    into_frame(img)
}

fn into_frame(img: crates_image::DynamicImage) -> Result<Frame, VisionError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Frame::new(width as usize, height as usize, rgba.into_raw())
}
