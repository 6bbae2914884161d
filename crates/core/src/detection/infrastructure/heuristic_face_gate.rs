use ndarray::Axis;

use crate::detection::domain::detection_result::GateReport;
use crate::detection::domain::face_gate::FaceGate;
use crate::detection::domain::gate_thresholds::GateThresholds;
use crate::detection::domain::oval_region::OvalRegion;
use crate::detection::domain::reason_rules::decide;
use crate::detection::domain::region_stats::FrameScan;
use crate::detection::domain::skin_tone::is_skin_tone;
use crate::shared::frame::Frame;

/// Pixel-statistics face gate.
///
/// Scans the guide oval once, collecting per-band skin ratio and
/// brightness, a horizontal edge count and a left/right symmetry score, and
/// accepts the frame only when all of them look like a centered, evenly lit
/// face. Edge and symmetry tests use the red channel only.
#[derive(Clone, Debug, Default)]
pub struct HeuristicFaceGate {
    thresholds: GateThresholds,
}

impl HeuristicFaceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: GateThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &GateThresholds {
        &self.thresholds
    }

    /// Raw accumulators for `frame`, or `None` if the frame is malformed.
    pub fn scan(&self, frame: &Frame) -> Option<FrameScan> {
        let pixels = frame.as_ndarray().ok()?;
        let width = frame.width() as i64;
        let height = frame.height() as i64;
        let oval = OvalRegion::inscribed(frame.width(), frame.height());
        let (cols, rows) = oval.scan_window();
        let mut scan = FrameScan::default();

        for y in rows.filter(|y| (0..height).contains(y)) {
            let row = pixels.index_axis(Axis(0), y as usize);
            let fy = y as f64;

            for x in cols.clone().filter(|x| (0..width).contains(x)) {
                let fx = x as f64;
                if !oval.contains(fx, fy) {
                    continue;
                }

                let col = x as usize;
                let (r, g, b) = (row[[col, 0]], row[[col, 1]], row[[col, 2]]);
                let skin = is_skin_tone(r, g, b);
                for band in oval.bands_at(fy) {
                    scan.band_mut(band).record(r, g, b, skin);
                }

                if x < width - 1 && y < height - 1 {
                    let next = row[[col + 1, 0]];
                    if (r as i32 - next as i32).abs() > self.thresholds.edge_delta {
                        scan.edge_count += 1;
                    }
                }

                if fx < oval.center_x {
                    let mirror_x = oval.mirror_x(x);
                    if (0..width).contains(&mirror_x) {
                        let mirror = row[[mirror_x as usize, 0]];
                        if (r as i32 - mirror as i32).abs() < self.thresholds.mirror_tolerance {
                            scan.symmetry_score += 1;
                        }
                    }
                }
            }
        }

        Some(scan)
    }
}

impl FaceGate for HeuristicFaceGate {
    fn inspect(&self, frame: &Frame) -> GateReport {
        let Some(scan) = self.scan(frame) else {
            log::debug!(
                "Frame {} is malformed ({}x{}x{}, {} bytes)",
                frame.index(),
                frame.width(),
                frame.height(),
                frame.channels(),
                frame.data().len()
            );
            return GateReport::malformed();
        };

        let metrics = scan.metrics();
        let result = decide(&metrics, &self.thresholds);
        log::debug!(
            "Frame {}: {result} (brightness {:.1}, skin {:.2}/{:.2}/{:.2}, edges {}, symmetry {:.2})",
            frame.index(),
            metrics.avg_brightness,
            metrics.top_skin_ratio,
            metrics.middle_skin_ratio,
            metrics.bottom_skin_ratio,
            metrics.edge_count,
            metrics.symmetry_ratio
        );
        GateReport {
            result,
            metrics: Some(metrics),
        }
    }
}
