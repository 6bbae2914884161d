use ndarray::ArrayView3;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FrameError {
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("unsupported channel count {0} (expected 3 or 4)")]
    UnsupportedChannels(u8),
    #[error("data length {actual} does not match {width}x{height}x{channels} = {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
    #[error("failed to resize frame to {width}x{height}")]
    Resize { width: u32, height: u32 },
}

/// A single camera frame: contiguous RGBA (or RGB) bytes in row-major order.
///
/// The gate only reads the colour channels, so RGB frames from image
/// decoders are accepted as-is alongside canvas-style RGBA buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Validating constructor for buffers handed over by an external camera.
    pub fn try_new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
    ) -> Result<Self, FrameError> {
        let frame = Self {
            data,
            width,
            height,
            channels,
            index,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Wraps an RGBA buffer, the layout a canvas readback produces.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        Self::try_new(data, width, height, 4, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::EmptyDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.channels != 3 && self.channels != 4 {
            return Err(FrameError::UnsupportedChannels(self.channels));
        }
        if self.data.len() != self.expected_len() {
            return Err(self.length_mismatch());
        }
        Ok(())
    }

    /// `(height, width, channels)` view over the pixel data.
    pub fn as_ndarray(&self) -> Result<ArrayView3<'_, u8>, FrameError> {
        self.validate()?;
        ArrayView3::from_shape(self.shape(), &self.data).map_err(|_| self.length_mismatch())
    }

    fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * (self.channels as usize)
    }

    fn length_mismatch(&self) -> FrameError {
        FrameError::LengthMismatch {
            width: self.width,
            height: self.height,
            channels: self.channels,
            expected: self.expected_len(),
            actual: self.data.len(),
        }
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
