use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaneError {
    SizeOverflow,
    SizeMismatch { expected: usize, got: usize },
}

impl fmt::Display for PlaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneError::SizeOverflow => write!(f, "plane dimensions overflow when multiplied"),
            PlaneError::SizeMismatch { expected, got } => {
                write!(f, "size mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for PlaneError {}

/// Single-channel 2-D buffer, row-major with a top-left origin.
#[derive(Clone, PartialEq)]
pub struct Plane<T> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Plane<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plane")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data", &self.data)
            .finish()
    }
}

/// Number of elements in a `width` x `height` plane.
pub fn element_count(width: usize, height: usize) -> Result<usize, PlaneError> {
    width.checked_mul(height).ok_or(PlaneError::SizeOverflow)
}

impl<T> Plane<T> {
    pub fn new(width: usize, height: usize, data: Vec<T>) -> Result<Self, PlaneError> {
        let expected = element_count(width, height)?;
        if expected != data.len() {
            return Err(PlaneError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at (x, y), or `None` outside the plane.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }
}

impl<T: Default + Clone> Plane<T> {
    pub fn zeros(width: usize, height: usize) -> Result<Self, PlaneError> {
        let len = element_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![T::default(); len],
        })
    }
}
