use crate::{
    BoundingBox, Frame, VisionError, Weighting, extract_bounding_box, gradient_magnitude,
    to_intensity,
};

/// Minimum gradient magnitude counted as an edge pixel.
pub const DEFAULT_THRESHOLD: f32 = 100.0;

/// Frame to bounding box: intensity, then Sobel magnitude, then threshold scan.
///
/// Holds only parameters, so one value can be shared by any number of
/// workers; identical inputs always give identical boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePipeline {
    threshold: f32,
    weighting: Weighting,
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FramePipeline {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            weighting: Weighting::default(),
        }
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Run the full transform on one frame.
    ///
    /// The result may be degenerate; see [`BoundingBox::detection`].
    ///
    /// # Errors
    ///
    /// Returns `VisionError::MalformedFrame` for a frame whose buffer does not
    /// match its dimensions.
    pub fn process(&self, frame: &Frame) -> Result<BoundingBox, VisionError> {
        let intensity = to_intensity(frame, self.weighting)?;
        let gradient = gradient_magnitude(&intensity)?;
        Ok(extract_bounding_box(&gradient, self.threshold))
    }
}

/// One-shot form of [`FramePipeline::process`] with the default weighting.
pub fn process_frame(frame: &Frame, threshold: f32) -> Result<BoundingBox, VisionError> {
    FramePipeline::new(threshold).process(frame)
}
