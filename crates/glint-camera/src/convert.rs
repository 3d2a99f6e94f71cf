use glint_vision::{Frame, VisionError};

/// Convert packed YUYV (YUV 4:2:2) to an RGBA frame.
///
/// YUYV packs two pixels into `[Y0, U, Y1, V]`; both share U and V.
/// BT.601 coefficients:
/// - R = Y + 1.402 (V - 128)
/// - G = Y - 0.344 (U - 128) - 0.714 (V - 128)
/// - B = Y + 1.772 (U - 128)
///
/// Trailing bytes beyond `width * height * 2` are ignored, since drivers
/// often pad the buffer.
///
/// # Errors
///
/// Returns `VisionError::MalformedFrame` if `data` is shorter than
/// `width * height * 2` or the width is odd.
pub fn yuyv_to_rgba(data: &[u8], width: usize, height: usize) -> Result<Frame, VisionError> {
    let malformed = VisionError::MalformedFrame {
        width,
        height,
        len: data.len(),
    };
    let expected_len = width
        .checked_mul(height)
        .and_then(|p| p.checked_mul(2))
        .ok_or_else(|| malformed.clone())?;
    if data.len() < expected_len || width % 2 != 0 {
        return Err(malformed);
    }

    let mut rgba = Vec::with_capacity(expected_len * 2);
    for chunk in data[..expected_len].chunks_exact(4) {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;
        for y in [chunk[0] as f32, chunk[2] as f32] {
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    Frame::new(width, height, rgba)
}
