use std::time::Duration;

/// Resolution frames are scaled to before gating.
pub const ANALYSIS_WIDTH: u32 = 320;
pub const ANALYSIS_HEIGHT: u32 = 240;

/// Gap between detection ticks while the camera view is open.
pub const DETECTION_INTERVAL: Duration = Duration::from_millis(300);

/// Delay after the stream starts before the first detection tick.
pub const CAMERA_WARMUP: Duration = Duration::from_millis(500);

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
