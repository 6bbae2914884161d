use super::region_stats::FrameMetrics;

/// Fixed tuning of the face gate.
///
/// `Default` is the production tuning. Other values are only for tests and
/// offline tuning; nothing reads them from runtime configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateThresholds {
    /// Exclusive lower bound on average band brightness.
    pub min_brightness: f64,
    /// Exclusive upper bound on average band brightness.
    pub max_brightness: f64,
    pub min_top_skin: f64,
    pub min_middle_skin: f64,
    pub min_bottom_skin: f64,
    pub min_edge_count: u64,
    pub min_symmetry: f64,
    /// Largest allowed brightness gap between neighbouring bands.
    pub max_band_brightness_gap: f64,

    /// Top or bottom skin ratio below this reads as an off-center face.
    pub off_center_skin: f64,
    /// Middle skin ratio below this reads as a face too far away.
    pub too_far_skin: f64,
    /// Symmetry ratio below this reads as a turned head.
    pub asymmetry: f64,

    /// Red-channel step between horizontal neighbours that counts as an edge.
    pub edge_delta: i32,
    /// Red-channel difference under which mirrored pixels match.
    pub mirror_tolerance: i32,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_brightness: 50.0,
            max_brightness: 210.0,
            min_top_skin: 0.20,
            min_middle_skin: 0.30,
            min_bottom_skin: 0.25,
            min_edge_count: 80,
            min_symmetry: 0.4,
            max_band_brightness_gap: 60.0,
            off_center_skin: 0.15,
            too_far_skin: 0.25,
            asymmetry: 0.3,
            edge_delta: 35,
            mirror_tolerance: 40,
        }
    }
}

impl GateThresholds {
    /// True when every capture condition holds.
    pub fn accepts(&self, m: &FrameMetrics) -> bool {
        m.avg_brightness > self.min_brightness
            && m.avg_brightness < self.max_brightness
            && m.top_skin_ratio > self.min_top_skin
            && m.middle_skin_ratio > self.min_middle_skin
            && m.bottom_skin_ratio > self.min_bottom_skin
            && m.edge_count > self.min_edge_count
            && m.symmetry_ratio > self.min_symmetry
            && (m.top_brightness - m.middle_brightness).abs() < self.max_band_brightness_gap
            && (m.middle_brightness - m.bottom_brightness).abs() < self.max_band_brightness_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn passing_metrics() -> FrameMetrics {
        FrameMetrics {
            top_skin_ratio: 0.8,
            middle_skin_ratio: 0.9,
            bottom_skin_ratio: 0.85,
            top_brightness: 120.0,
            middle_brightness: 130.0,
            bottom_brightness: 125.0,
            avg_brightness: 125.0,
            edge_count: 500,
            symmetry_ratio: 0.9,
            total_pixels: 10_000,
        }
    }

    #[test]
    fn test_passing_metrics_accepted() {
        assert!(GateThresholds::default().accepts(&passing_metrics()));
    }

    #[rstest]
    #[case::brightness_at_lower_bound(|m: &mut FrameMetrics| m.avg_brightness = 50.0)]
    #[case::brightness_at_upper_bound(|m: &mut FrameMetrics| m.avg_brightness = 210.0)]
    #[case::top_skin_at_bound(|m: &mut FrameMetrics| m.top_skin_ratio = 0.20)]
    #[case::middle_skin_at_bound(|m: &mut FrameMetrics| m.middle_skin_ratio = 0.30)]
    #[case::bottom_skin_at_bound(|m: &mut FrameMetrics| m.bottom_skin_ratio = 0.25)]
    #[case::edges_at_bound(|m: &mut FrameMetrics| m.edge_count = 80)]
    #[case::symmetry_at_bound(|m: &mut FrameMetrics| m.symmetry_ratio = 0.4)]
    #[case::top_middle_gap(|m: &mut FrameMetrics| m.top_brightness = 70.0)]
    #[case::middle_bottom_gap(|m: &mut FrameMetrics| m.bottom_brightness = 190.0)]
    fn test_each_condition_is_strict(#[case] tweak: fn(&mut FrameMetrics)) {
        let mut m = passing_metrics();
        tweak(&mut m);
        assert!(!GateThresholds::default().accepts(&m));
    }

    #[test]
    fn test_custom_thresholds_relax_gate() {
        let mut m = passing_metrics();
        m.edge_count = 70;
        let relaxed = GateThresholds {
            min_edge_count: 60,
            ..GateThresholds::default()
        };
        assert!(!GateThresholds::default().accepts(&m));
        assert!(relaxed.accepts(&m));
    }
}
