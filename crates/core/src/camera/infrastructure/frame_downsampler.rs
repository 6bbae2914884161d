use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};

use crate::shared::constants::{ANALYSIS_HEIGHT, ANALYSIS_WIDTH};
use crate::shared::frame::{Frame, FrameError};

/// Scales camera frames to the fixed analysis resolution.
///
/// Output is always RGBA. Aspect ratio is not preserved, matching a video
/// element drawn into a fixed-size canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDownsampler {
    width: u32,
    height: u32,
}

impl FrameDownsampler {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn downsample(&self, frame: &Frame) -> Result<Frame, FrameError> {
        frame.validate()?;
        if frame.width() == self.width && frame.height() == self.height && frame.channels() == 4 {
            return Ok(frame.clone());
        }

        let rgba = to_rgba_image(frame).ok_or(FrameError::Resize {
            width: self.width,
            height: self.height,
        })?;
        let resized = if rgba.dimensions() == (self.width, self.height) {
            rgba
        } else {
            imageops::resize(&rgba, self.width, self.height, FilterType::Triangle)
        };
        Frame::try_new(resized.into_raw(), self.width, self.height, 4, frame.index())
    }
}

impl Default for FrameDownsampler {
    fn default() -> Self {
        Self::new(ANALYSIS_WIDTH, ANALYSIS_HEIGHT)
    }
}

fn to_rgba_image(frame: &Frame) -> Option<RgbaImage> {
    let data = frame.data().to_vec();
    match frame.channels() {
        4 => RgbaImage::from_raw(frame.width(), frame.height(), data),
        3 => RgbImage::from_raw(frame.width(), frame.height(), data)
            .map(|rgb| DynamicImage::ImageRgb8(rgb).to_rgba8()),
        _ => None,
    }
}
