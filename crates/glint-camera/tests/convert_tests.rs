use glint_camera::yuyv_to_rgba;
use glint_vision::VisionError;

#[test]
fn test_neutral_chroma_is_gray() {
    // Y=100 and Y=200 with U=V=128
    let frame = yuyv_to_rgba(&[100, 128, 200, 128], 2, 1).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([100, 100, 100, 255]));
    assert_eq!(frame.pixel(1, 0), Some([200, 200, 200, 255]));
}

#[test]
fn test_saturated_values_clamp() {
    let frame = yuyv_to_rgba(&[255, 255, 255, 255], 2, 1).unwrap();
    let px = frame.pixel(0, 0).unwrap();
    assert_eq!(px[0], 255);
    assert_eq!(px[2], 255);
}

#[test]
fn test_padding_ignored() {
    let mut data = vec![16, 128, 16, 128, 16, 128, 16, 128];
    data.extend_from_slice(&[0; 6]);
    let frame = yuyv_to_rgba(&data, 2, 2).unwrap();
    assert_eq!(frame.data.len(), 2 * 2 * 4);
}

#[test]
fn test_short_buffer_rejected() {
    let err = yuyv_to_rgba(&[0; 6], 2, 2).unwrap_err();
    assert_eq!(
        err,
        VisionError::MalformedFrame {
            width: 2,
            height: 2,
            len: 6
        }
    );
}

#[test]
fn test_odd_width_rejected() {
    assert!(yuyv_to_rgba(&[0; 12], 3, 2).is_err());
}
