use super::detection_result::{DetectionResult, NotDetectedReason};
use super::gate_thresholds::GateThresholds;
use super::region_stats::FrameMetrics;

/// One entry of the diagnosis table: if `applies`, report `reason`.
pub struct ReasonRule {
    pub reason: NotDetectedReason,
    pub applies: fn(&FrameMetrics, &GateThresholds) -> bool,
}

/// Diagnosis rules in priority order. The first rule that applies wins;
/// `Generic` is the fallback when none does.
pub const REASON_RULES: &[ReasonRule] = &[
    ReasonRule {
        reason: NotDetectedReason::TooDark,
        applies: |m, t| m.avg_brightness < t.min_brightness,
    },
    ReasonRule {
        reason: NotDetectedReason::TooBright,
        applies: |m, t| m.avg_brightness > t.max_brightness,
    },
    ReasonRule {
        reason: NotDetectedReason::OffCenter,
        applies: |m, t| {
            m.top_skin_ratio < t.off_center_skin || m.bottom_skin_ratio < t.off_center_skin
        },
    },
    ReasonRule {
        reason: NotDetectedReason::TooFar,
        applies: |m, t| m.middle_skin_ratio < t.too_far_skin,
    },
    ReasonRule {
        reason: NotDetectedReason::Asymmetric,
        applies: |m, t| m.symmetry_ratio < t.asymmetry,
    },
];

/// Picks the single reason to report for a rejected frame.
pub fn diagnose(metrics: &FrameMetrics, thresholds: &GateThresholds) -> NotDetectedReason {
    REASON_RULES
        .iter()
        .find(|rule| (rule.applies)(metrics, thresholds))
        .map(|rule| rule.reason)
        .unwrap_or(NotDetectedReason::Generic)
}

pub fn decide(metrics: &FrameMetrics, thresholds: &GateThresholds) -> DetectionResult {
    if thresholds.accepts(metrics) {
        DetectionResult::Detected
    } else {
        DetectionResult::NotDetected(diagnose(metrics, thresholds))
    }
}
