/// Oval width as a fraction of frame width.
pub const OVAL_WIDTH_RATIO: f64 = 0.35;
/// Oval height relative to its width (portrait).
pub const OVAL_ASPECT: f64 = 1.33;

/// Horizontal slice of the oval, by anatomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// Forehead.
    Top,
    /// Eyes and nose.
    Middle,
    /// Mouth and chin.
    Bottom,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Top, Band::Middle, Band::Bottom];
}

/// Half-open row range `[start, start + extent)` of one band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandSpan {
    pub start: f64,
    pub extent: f64,
}

impl BandSpan {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.start && y < self.start + self.extent
    }
}

/// Elliptical face guide inscribed in a frame.
///
/// Band offsets and extents are fractions of `radius_y`, measured from the
/// center row. Bands are tested independently, so a row may fall in more
/// than one band or in none.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OvalRegion {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl OvalRegion {
    /// Guide oval centered in a `width` x `height` frame.
    pub fn inscribed(width: u32, height: u32) -> Self {
        let oval_width = width as f64 * OVAL_WIDTH_RATIO;
        let oval_height = oval_width * OVAL_ASPECT;
        Self {
            center_x: width as f64 / 2.0,
            center_y: height as f64 / 2.0,
            radius_x: oval_width / 2.0,
            radius_y: oval_height / 2.0,
        }
    }

    /// Point-in-ellipse test on normalized offsets.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let nx = (x - self.center_x) / self.radius_x;
        let ny = (y - self.center_y) / self.radius_y;
        nx * nx + ny * ny <= 1.0
    }

    pub fn band(&self, band: Band) -> BandSpan {
        let (offset, extent) = match band {
            Band::Top => (-1.0, 0.4),
            Band::Middle => (-0.2, 0.6),
            Band::Bottom => (0.4, 0.6),
        };
        BandSpan {
            start: self.center_y + self.radius_y * offset,
            extent: self.radius_y * extent,
        }
    }

    /// Bands whose row range contains `y`.
    pub fn bands_at(&self, y: f64) -> impl Iterator<Item = Band> + '_ {
        Band::ALL
            .into_iter()
            .filter(move |&band| self.band(band).contains(y))
    }

    /// Integer scan window `(x0..x1, y0..y1)` covering the oval's bounding box.
    ///
    /// Bounds are floored, so the last partial column/row is excluded.
    /// Callers still clip against the frame.
    pub fn scan_window(&self) -> (std::ops::Range<i64>, std::ops::Range<i64>) {
        let x0 = (self.center_x - self.radius_x).floor() as i64;
        let x1 = (self.center_x + self.radius_x).floor() as i64;
        let y0 = (self.center_y - self.radius_y).floor() as i64;
        let y1 = (self.center_y + self.radius_y).floor() as i64;
        (x0..x1, y0..y1)
    }

    /// Column mirrored across the vertical center line.
    pub fn mirror_x(&self, x: i64) -> i64 {
        (self.center_x + (self.center_x - x as f64)).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn analysis_oval() -> OvalRegion {
        OvalRegion::inscribed(320, 240)
    }

    #[test]
    fn test_inscribed_geometry_at_analysis_resolution() {
        let oval = analysis_oval();
        assert_relative_eq!(oval.center_x, 160.0);
        assert_relative_eq!(oval.center_y, 120.0);
        assert_relative_eq!(oval.radius_x, 56.0);
        assert_relative_eq!(oval.radius_y, 74.48, epsilon = 1e-9);
    }

    #[test]
    fn test_contains_center_and_axis_ends() {
        let oval = analysis_oval();
        assert!(oval.contains(160.0, 120.0));
        assert!(oval.contains(160.0 + 56.0, 120.0));
        assert!(!oval.contains(160.0 + 56.5, 120.0));
    }

    #[test]
    fn test_bounding_box_corner_is_outside() {
        let oval = analysis_oval();
        assert!(!oval.contains(160.0 - 55.0, 120.0 - 73.0));
    }

    #[test]
    fn test_degenerate_oval_contains_nothing() {
        let oval = OvalRegion::inscribed(0, 0);
        assert!(!oval.contains(0.0, 0.0));
    }

    #[rstest]
    #[case::top(Band::Top, -1.0, 0.4)]
    #[case::middle(Band::Middle, -0.2, 0.6)]
    #[case::bottom(Band::Bottom, 0.4, 0.6)]
    fn test_band_spans_scale_with_radius(
        #[case] band: Band,
        #[case] offset: f64,
        #[case] extent: f64,
    ) {
        let oval = analysis_oval();
        let span = oval.band(band);
        assert_relative_eq!(span.start, 120.0 + 74.48 * offset, epsilon = 1e-9);
        assert_relative_eq!(span.extent, 74.48 * extent, epsilon = 1e-9);
    }

    #[test]
    fn test_band_span_is_half_open() {
        let span = BandSpan {
            start: 10.0,
            extent: 5.0,
        };
        assert!(span.contains(10.0));
        assert!(span.contains(14.9));
        assert!(!span.contains(15.0));
        assert!(!span.contains(9.9));
    }

    #[test]
    fn test_bands_at_rows() {
        let oval = analysis_oval();
        assert_eq!(oval.bands_at(50.0).collect::<Vec<_>>(), vec![Band::Top]);
        assert_eq!(oval.bands_at(120.0).collect::<Vec<_>>(), vec![Band::Middle]);
        assert_eq!(oval.bands_at(180.0).collect::<Vec<_>>(), vec![Band::Bottom]);
        // Between the top and middle bands.
        assert_eq!(oval.bands_at(90.0).count(), 0);
    }

    #[test]
    fn test_scan_window_floors_bounds() {
        let (xs, ys) = analysis_oval().scan_window();
        assert_eq!(xs, 104..216);
        assert_eq!(ys, 45..194);
    }

    #[test]
    fn test_mirror_x_reflects_across_center() {
        let oval = analysis_oval();
        assert_eq!(oval.mirror_x(104), 216);
        assert_eq!(oval.mirror_x(159), 161);
    }
}
