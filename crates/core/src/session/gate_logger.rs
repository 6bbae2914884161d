use std::collections::HashMap;
use std::time::Instant;

use crate::detection::domain::detection_result::{DetectionResult, NotDetectedReason};

/// Observer for session-level gating events.
///
/// Keeps the session worker independent of where diagnostics go (log
/// crate, GUI, nowhere).
pub trait GateLogger: Send {
    /// One frame was gated, taking `duration_ms` including downsampling.
    fn evaluated(&mut self, frame_index: usize, result: DetectionResult, duration_ms: f64);

    /// A tick found no frame to gate.
    fn skipped(&mut self);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullGateLogger;

impl GateLogger for NullGateLogger {
    fn evaluated(&mut self, _frame_index: usize, _result: DetectionResult, _duration_ms: f64) {}
    fn skipped(&mut self) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger that tracks evaluation timing and outcome counts, reporting
/// through the `log` crate.
///
/// Progress lines are throttled to every `throttle_frames` evaluations.
pub struct StdoutGateLogger {
    throttle_frames: usize,
    durations: Vec<f64>,
    outcomes: HashMap<DetectionResult, usize>,
    skipped: usize,
    start_time: Instant,
}

impl StdoutGateLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            durations: Vec::new(),
            outcomes: HashMap::new(),
            skipped: 0,
            start_time: Instant::now(),
        }
    }

    pub fn evaluated_count(&self) -> usize {
        self.durations.len()
    }

    pub fn outcome_count(&self, result: DetectionResult) -> usize {
        self.outcomes.get(&result).copied().unwrap_or(0)
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Returns the formatted summary string, or `None` if nothing was gated.
    pub fn summary_string(&self) -> Option<String> {
        if self.durations.is_empty() {
            return None;
        }

        let frames = self.durations.len();
        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let total_ms: f64 = self.durations.iter().sum();
        let avg_ms = total_ms / frames as f64;
        let max_ms = self.durations.iter().copied().fold(0.0, f64::max);

        let mut lines = vec![
            format!(
                "Gate summary ({frames} frames, {} skipped ticks, {elapsed_s:.1}s total):",
                self.skipped
            ),
            format!("  evaluate    : avg {avg_ms:6.1}ms  max {max_ms:6.1}ms"),
        ];

        let outcomes = std::iter::once(DetectionResult::Detected)
            .chain(NotDetectedReason::ALL.map(DetectionResult::NotDetected));
        for outcome in outcomes {
            let count = self.outcome_count(outcome);
            if count == 0 {
                continue;
            }
            let label = match outcome.reason() {
                None => "detected",
                Some(reason) => reason.as_str(),
            };
            let pct = count as f64 / frames as f64 * 100.0;
            lines.push(format!("  {label:12}: {count:5}  ({pct:4.1}%)"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutGateLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl GateLogger for StdoutGateLogger {
    fn evaluated(&mut self, frame_index: usize, result: DetectionResult, duration_ms: f64) {
        self.durations.push(duration_ms);
        *self.outcomes.entry(result).or_default() += 1;

        let count = self.durations.len();
        if count % self.throttle_frames == 0 {
            let ready = self.outcome_count(DetectionResult::Detected);
            log::info!("Gated {count} frames ({ready} ready), last frame {frame_index}: {result}");
        }
    }

    fn skipped(&mut self) {
        self.skipped += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
