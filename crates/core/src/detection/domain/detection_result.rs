use std::fmt;

use super::camera_status::{CameraStatus, StatusLevel};
use super::region_stats::FrameMetrics;

/// Why a frame was not accepted for capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotDetectedReason {
    TooDark,
    TooBright,
    OffCenter,
    TooFar,
    Asymmetric,
    Generic,
}

impl NotDetectedReason {
    pub const ALL: [NotDetectedReason; 6] = [
        NotDetectedReason::TooDark,
        NotDetectedReason::TooBright,
        NotDetectedReason::OffCenter,
        NotDetectedReason::TooFar,
        NotDetectedReason::Asymmetric,
        NotDetectedReason::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotDetectedReason::TooDark => "too_dark",
            NotDetectedReason::TooBright => "too_bright",
            NotDetectedReason::OffCenter => "off_center",
            NotDetectedReason::TooFar => "too_far",
            NotDetectedReason::Asymmetric => "asymmetric",
            NotDetectedReason::Generic => "generic",
        }
    }

    pub fn status(&self) -> CameraStatus {
        match self {
            NotDetectedReason::TooDark => {
                CameraStatus::new("Need more light", "💡", StatusLevel::Warning)
            }
            NotDetectedReason::TooBright => {
                CameraStatus::new("Too bright, adjust lighting", "☀️", StatusLevel::Warning)
            }
            NotDetectedReason::OffCenter => {
                CameraStatus::new("Center your face in the oval", "👤", StatusLevel::Info)
            }
            NotDetectedReason::TooFar => {
                CameraStatus::new("Move closer to the camera", "📷", StatusLevel::Info)
            }
            NotDetectedReason::Asymmetric => {
                CameraStatus::new("Face the camera directly", "↔️", StatusLevel::Info)
            }
            NotDetectedReason::Generic => {
                CameraStatus::new("Position your face in the oval", "📷", StatusLevel::Info)
            }
        }
    }
}

impl fmt::Display for NotDetectedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of gating one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetectionResult {
    Detected,
    NotDetected(NotDetectedReason),
}

impl DetectionResult {
    /// Whether the capture button should be enabled.
    pub fn capture_enabled(&self) -> bool {
        matches!(self, DetectionResult::Detected)
    }

    pub fn reason(&self) -> Option<NotDetectedReason> {
        match self {
            DetectionResult::Detected => None,
            DetectionResult::NotDetected(reason) => Some(*reason),
        }
    }

    pub fn status(&self) -> CameraStatus {
        match self {
            DetectionResult::Detected => {
                CameraStatus::new("Ready to capture", "✓", StatusLevel::Success)
            }
            DetectionResult::NotDetected(reason) => reason.status(),
        }
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionResult::Detected => f.write_str("detected"),
            DetectionResult::NotDetected(reason) => write!(f, "not_detected({reason})"),
        }
    }
}

/// A result plus the metrics it was derived from.
///
/// `metrics` is `None` when the frame could not be analysed at all.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateReport {
    pub result: DetectionResult,
    pub metrics: Option<FrameMetrics>,
}

impl GateReport {
    pub fn malformed() -> Self {
        Self {
            result: DetectionResult::NotDetected(NotDetectedReason::Generic),
            metrics: None,
        }
    }
}
