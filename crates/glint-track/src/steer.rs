use glint_vision::Point;

pub const DEFAULT_STEP: i32 = 5;

/// Pan/tilt adjustment for one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Correction {
    pub pan: i32,
    pub tilt: i32,
}

/// Turns successive box centers into fixed-step pan/tilt corrections.
///
/// Only the direction of movement matters: each axis moves by `step`
/// toward the change, or not at all.
#[derive(Debug, Clone)]
pub struct Steering {
    step: i32,
    last: Option<Point>,
}

impl Default for Steering {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl Steering {
    pub fn new(step: i32) -> Self {
        Self { step, last: None }
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// The first observation only records a reference and returns zero.
    pub fn update(&mut self, center: Point) -> Correction {
        let Some(last) = self.last.replace(center) else {
            return Correction::default();
        };
        Correction {
            pan: axis(last.x, center.x) * self.step,
            tilt: axis(last.y, center.y) * self.step,
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn axis(from: u32, to: u32) -> i32 {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}
