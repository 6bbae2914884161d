use super::oval_region::Band;

/// Running totals for one band of the oval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionStats {
    pub skin_pixels: u64,
    pub total_pixels: u64,
    /// Sum of `r + g + b` over the band; divided by 3 for brightness.
    pub channel_sum: u64,
}

impl RegionStats {
    pub fn record(&mut self, r: u8, g: u8, b: u8, is_skin: bool) {
        self.total_pixels += 1;
        self.channel_sum += r as u64 + g as u64 + b as u64;
        if is_skin {
            self.skin_pixels += 1;
        }
    }

    /// Fraction of skin pixels, or 0 for an empty band.
    pub fn skin_ratio(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.skin_pixels as f64 / self.total_pixels as f64
    }

    /// Mean of `(r + g + b) / 3`, or 0 for an empty band.
    pub fn mean_brightness(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.channel_sum as f64 / (3.0 * self.total_pixels as f64)
    }
}

/// Accumulators for a single pass over the oval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameScan {
    pub top: RegionStats,
    pub middle: RegionStats,
    pub bottom: RegionStats,
    /// Horizontal red-channel jumps above the edge threshold.
    pub edge_count: u64,
    /// Left-half pixels whose mirrored counterpart has a similar red value.
    pub symmetry_score: u64,
}

impl FrameScan {
    pub fn band_mut(&mut self, band: Band) -> &mut RegionStats {
        match band {
            Band::Top => &mut self.top,
            Band::Middle => &mut self.middle,
            Band::Bottom => &mut self.bottom,
        }
    }

    pub fn metrics(&self) -> FrameMetrics {
        let top_brightness = self.top.mean_brightness();
        let middle_brightness = self.middle.mean_brightness();
        let bottom_brightness = self.bottom.mean_brightness();
        let total_pixels =
            self.top.total_pixels + self.middle.total_pixels + self.bottom.total_pixels;
        let symmetry_ratio = if total_pixels > 0 {
            self.symmetry_score as f64 / (total_pixels as f64 / 2.0)
        } else {
            0.0
        };

        FrameMetrics {
            top_skin_ratio: self.top.skin_ratio(),
            middle_skin_ratio: self.middle.skin_ratio(),
            bottom_skin_ratio: self.bottom.skin_ratio(),
            top_brightness,
            middle_brightness,
            bottom_brightness,
            avg_brightness: (top_brightness + middle_brightness + bottom_brightness) / 3.0,
            edge_count: self.edge_count,
            symmetry_ratio,
            total_pixels,
        }
    }
}

/// Per-frame quantities the gate decides on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameMetrics {
    pub top_skin_ratio: f64,
    pub middle_skin_ratio: f64,
    pub bottom_skin_ratio: f64,
    pub top_brightness: f64,
    pub middle_brightness: f64,
    pub bottom_brightness: f64,
    pub avg_brightness: f64,
    pub edge_count: u64,
    pub symmetry_ratio: f64,
    /// Sum of the three band totals; overlapping rows count once per band.
    pub total_pixels: u64,
}
