use glint_base::Plane;
use glint_codec::Codec;
use glint_vision::{BoundingBox, Point, Rect, detect, extract_bounding_box};

fn gradient_with(width: usize, height: usize, hits: &[(usize, usize, f32)]) -> Plane<f32> {
    let mut plane = Plane::<f32>::zeros(width, height).unwrap();
    for &(x, y, v) in hits {
        plane.data[y * width + x] = v;
    }
    plane
}

// --- Extraction ---

#[test]
fn test_all_zero_is_degenerate() {
    let gradient = gradient_with(8, 6, &[]);
    let bbox = extract_bounding_box(&gradient, 100.0);
    assert!(bbox.is_degenerate());
    assert_eq!(bbox.top_left, Point::new(8, 6));
    assert_eq!(bbox.top_right, Point::new(0, 6));
    assert_eq!(bbox.bottom_right, Point::new(0, 0));
    assert_eq!(bbox.bottom_left, Point::new(8, 0));
    assert_eq!(detect(&gradient, 100.0), None);
}

#[test]
fn test_threshold_is_strict() {
    let gradient = gradient_with(4, 4, &[(1, 1, 100.0)]);
    assert!(extract_bounding_box(&gradient, 100.0).is_degenerate());
    assert!(!extract_bounding_box(&gradient, 99.9).is_degenerate());
}

#[test]
fn test_single_hit() {
    let gradient = gradient_with(10, 10, &[(4, 7, 300.0)]);
    let bbox = detect(&gradient, 100.0).unwrap();
    assert_eq!(bbox, BoundingBox::from_extents(4, 7, 4, 7));
    assert_eq!(
        bbox.to_rect(),
        Some(Rect {
            x: 4,
            y: 7,
            width: 0,
            height: 0
        })
    );
}

#[test]
fn test_corners_are_consistent() {
    let gradient = gradient_with(10, 10, &[(2, 8, 500.0), (7, 3, 500.0), (5, 5, 500.0)]);
    let bbox = detect(&gradient, 100.0).unwrap();
    assert_eq!(bbox.top_left, Point::new(2, 3));
    assert_eq!(bbox.top_right, Point::new(7, 3));
    assert_eq!(bbox.bottom_right, Point::new(7, 8));
    assert_eq!(bbox.bottom_left, Point::new(2, 8));
    assert_eq!(bbox.top_left.y, bbox.top_right.y);
    assert_eq!(bbox.bottom_left.y, bbox.bottom_right.y);
    assert_eq!(bbox.top_left.x, bbox.bottom_left.x);
    assert_eq!(bbox.top_right.x, bbox.bottom_right.x);
}

#[test]
fn test_raising_threshold_shrinks_box() {
    let gradient = gradient_with(
        12,
        12,
        &[(1, 1, 150.0), (10, 10, 150.0), (4, 4, 900.0), (6, 7, 900.0)],
    );
    let low = detect(&gradient, 100.0).unwrap();
    let high = detect(&gradient, 500.0).unwrap();
    assert!(low.contains(&high));
    assert_eq!(high, BoundingBox::from_extents(4, 4, 6, 7));
    assert!(detect(&gradient, 1000.0).is_none());
}

#[test]
fn test_empty_gradient() {
    let gradient = gradient_with(0, 0, &[]);
    assert!(extract_bounding_box(&gradient, 0.0).is_degenerate());
    assert!(detect(&gradient, 0.0).is_none());
}

// --- Geometry ---

#[test]
fn test_center() {
    let bbox = BoundingBox::from_extents(10, 20, 30, 60);
    assert_eq!(bbox.center(), Some(Point::new(20, 40)));
    assert_eq!(BoundingBox::from_extents(5, 5, 0, 0).center(), None);
}

#[test]
fn test_degenerate_has_no_rect() {
    let bbox = BoundingBox::from_extents(3, 0, 1, 4);
    assert!(bbox.is_degenerate());
    assert_eq!(bbox.to_rect(), None);
    assert_eq!(bbox.detection(), None);
}

// --- Codec ---

#[test]
fn test_codec_layout() {
    let bbox = BoundingBox::from_extents(1, 2, 3, 4);
    let bytes = bbox.to_bytes();
    assert_eq!(bytes.len(), 32);
    assert_eq!(&bytes[..8], &[1, 0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(BoundingBox::from_bytes(&bytes).unwrap(), bbox);
}

#[test]
fn test_codec_truncated() {
    let bytes = BoundingBox::from_extents(1, 2, 3, 4).to_bytes();
    assert!(BoundingBox::from_bytes(&bytes[..31]).is_err());
}
