use std::time::Duration;

use crate::shared::constants::{ANALYSIS_HEIGHT, ANALYSIS_WIDTH, CAMERA_WARMUP, DETECTION_INTERVAL};

/// Timing and resolution of a camera session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Gap between detection ticks.
    pub interval: Duration,
    /// Delay between starting the source and the first tick.
    pub warmup: Duration,
    pub analysis_width: u32,
    pub analysis_height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval: DETECTION_INTERVAL,
            warmup: CAMERA_WARMUP,
            analysis_width: ANALYSIS_WIDTH,
            analysis_height: ANALYSIS_HEIGHT,
        }
    }
}

impl SessionConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_analysis_size(mut self, width: u32, height: u32) -> Self {
        self.analysis_width = width;
        self.analysis_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("detection interval must be non-zero".into());
        }
        if self.analysis_width == 0 || self.analysis_height == 0 {
            return Err(format!(
                "analysis size must be non-zero, got {}x{}",
                self.analysis_width, self.analysis_height
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.interval, Duration::from_millis(300));
        assert_eq!(config.warmup, Duration::from_millis(500));
        assert_eq!((config.analysis_width, config.analysis_height), (320, 240));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_interval(Duration::from_millis(10))
            .with_warmup(Duration::ZERO)
            .with_analysis_size(160, 120);
        assert_eq!(config.interval, Duration::from_millis(10));
        assert_eq!(config.warmup, Duration::ZERO);
        assert_eq!((config.analysis_width, config.analysis_height), (160, 120));
    }

    #[test]
    fn test_zero_interval_invalid() {
        let config = SessionConfig::default().with_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_analysis_size_invalid() {
        let config = SessionConfig::default().with_analysis_size(0, 240);
        assert!(config.validate().is_err());
    }
}
