use crate::shared::frame::Frame;

use super::detection_result::{DetectionResult, GateReport};

/// Domain interface for deciding whether a frame is ready for capture.
///
/// Implementations hold no per-frame state, so one gate can be shared
/// between a session worker and synchronous callers.
pub trait FaceGate: Send + Sync {
    /// Gates one frame. Malformed frames are reported, never returned as errors.
    fn inspect(&self, frame: &Frame) -> GateReport;

    fn evaluate(&self, frame: &Frame) -> DetectionResult {
        self.inspect(frame).result
    }
}
