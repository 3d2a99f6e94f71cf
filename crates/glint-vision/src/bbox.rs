use crate::GradientBuffer;
use glint_codec::{Codec, DecodeError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in origin + size form, as drawn by an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Four-corner box enclosing every edge pixel of a frame.
///
/// When nothing crosses the threshold the extractor produces an inverted box
/// (`top_left.x > top_right.x`). Use [`BoundingBox::detection`] to turn that
/// into `None` before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl BoundingBox {
    pub fn from_extents(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            top_left: Point::new(min_x, min_y),
            top_right: Point::new(max_x, min_y),
            bottom_right: Point::new(max_x, max_y),
            bottom_left: Point::new(min_x, max_y),
        }
    }

    pub fn min_x(&self) -> u32 {
        self.top_left.x
    }

    pub fn min_y(&self) -> u32 {
        self.top_left.y
    }

    pub fn max_x(&self) -> u32 {
        self.top_right.x
    }

    pub fn max_y(&self) -> u32 {
        self.bottom_left.y
    }

    /// True for the "no object detected" result.
    pub fn is_degenerate(&self) -> bool {
        self.min_x() > self.max_x() || self.min_y() > self.max_y()
    }

    pub fn detection(self) -> Option<Self> {
        (!self.is_degenerate()).then_some(self)
    }

    /// Origin + size form. Width and height are `max - min`, so a single-pixel box is 0x0.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.is_degenerate() {
            return None;
        }
        Some(Rect {
            x: self.min_x(),
            y: self.min_y(),
            width: self.max_x() - self.min_x(),
            height: self.max_y() - self.min_y(),
        })
    }

    pub fn center(&self) -> Option<Point> {
        let rect = self.to_rect()?;
        Some(Point::new(rect.x + rect.width / 2, rect.y + rect.height / 2))
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}

fn to_coord(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

/// Scan every pixel and enclose those whose magnitude strictly exceeds `threshold`.
///
/// Extents start at `min = (width, height)` and `max = (0, 0)`, so a scan
/// without hits leaves the box inverted. A zero-sized buffer starts at
/// `min = (1, 1)` instead so it stays inverted too.
pub fn extract_bounding_box(gradient: &GradientBuffer, threshold: f32) -> BoundingBox {
    let (width, height) = (gradient.width, gradient.height);
    let mut min_x = width.max(1);
    let mut min_y = height.max(1);
    let mut max_x = 0;
    let mut max_y = 0;

    for (i, &magnitude) in gradient.data.iter().enumerate().take(width * height) {
        if magnitude > threshold {
            let (x, y) = (i % width, i / width);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    BoundingBox::from_extents(
        to_coord(min_x),
        to_coord(min_y),
        to_coord(max_x),
        to_coord(max_y),
    )
}

/// Like [`extract_bounding_box`] but `None` when no pixel crosses the threshold.
pub fn detect(gradient: &GradientBuffer, threshold: f32) -> Option<BoundingBox> {
    extract_bounding_box(gradient, threshold).detection()
}

impl Codec for Point {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.x.encode(buf);
        self.y.encode(buf);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        Ok(Self {
            x: u32::decode(buf, pos)?,
            y: u32::decode(buf, pos)?,
        })
    }
}

impl Codec for BoundingBox {
    fn encode(&self, buf: &mut Vec<u8>) {
        self.top_left.encode(buf);
        self.top_right.encode(buf);
        self.bottom_right.encode(buf);
        self.bottom_left.encode(buf);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        Ok(Self {
            top_left: Point::decode(buf, pos)?,
            top_right: Point::decode(buf, pos)?,
            bottom_right: Point::decode(buf, pos)?,
            bottom_left: Point::decode(buf, pos)?,
        })
    }
}
