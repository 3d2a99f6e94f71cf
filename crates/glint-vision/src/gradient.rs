use crate::{IntensityBuffer, VisionError};
use glint_base::Plane;

/// Horizontal Sobel kernel, row-major.
pub const KERNEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];

/// Vertical Sobel kernel, row-major.
pub const KERNEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// Per-pixel gradient magnitude.
pub type GradientBuffer = Plane<f32>;

/// Compute the Sobel gradient magnitude of every interior pixel.
///
/// The first and last row and column have no full 3x3 neighborhood and are
/// left at zero, so edges touching the frame border are slightly
/// under-detected. Frames narrower or shorter than 3 pixels yield all zeros.
///
/// # Errors
///
/// Returns `VisionError::Plane` if the buffer length disagrees with its dimensions.
pub fn gradient_magnitude(intensity: &IntensityBuffer) -> Result<GradientBuffer, VisionError> {
    let (width, height) = (intensity.width, intensity.height);
    let expected = glint_base::plane::element_count(width, height)?;
    if intensity.data.len() != expected {
        return Err(glint_base::PlaneError::SizeMismatch {
            expected,
            got: intensity.data.len(),
        }
        .into());
    }

    let mut out = Plane::<f32>::zeros(width, height)?;
    let src = &intensity.data;

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let mut sum_x = 0i32;
            let mut sum_y = 0i32;
            for ky in 0..3 {
                let row = (y + ky - 1) * width;
                for kx in 0..3 {
                    let pixel = src[row + x + kx - 1] as i32;
                    let k = ky * 3 + kx;
                    sum_x += pixel * KERNEL_X[k];
                    sum_y += pixel * KERNEL_Y[k];
                }
            }
            let squared = (sum_x * sum_x + sum_y * sum_y) as f64;
            out.data[y * width + x] = squared.sqrt() as f32;
        }
    }

    Ok(out)
}
