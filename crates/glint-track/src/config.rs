use crate::TrackError;
use glint_vision::{DEFAULT_THRESHOLD, FramePipeline, Weighting};
use std::time::Duration;

/// Tuning for the capture loop and its pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    threshold: f32,
    weighting: Weighting,
    frame_interval: Duration,
    result_timeout: Duration,
    retry_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            weighting: Weighting::Average,
            frame_interval: Duration::from_millis(33),
            result_timeout: Duration::from_secs(1),
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl TrackerConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Minimum time between two captures.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// How long to wait for a result before giving up on the frame.
    pub fn with_result_timeout(mut self, timeout: Duration) -> Self {
        self.result_timeout = timeout;
        self
    }

    /// Pause after a failed capture or send.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn result_timeout(&self) -> Duration {
        self.result_timeout
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn pipeline(&self) -> FramePipeline {
        FramePipeline::new(self.threshold).with_weighting(self.weighting)
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(TrackError::Config(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if self.result_timeout.is_zero() {
            return Err(TrackError::Config(
                "result timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
