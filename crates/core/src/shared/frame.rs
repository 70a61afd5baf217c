use ndarray::ArrayView3;
use thiserror::Error;

/// Color space of a frame's pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// 3 channels, blue-green-red byte order (capture default).
    #[default]
    Bgr,
    /// 1 channel intensity.
    Gray,
    /// 3 channels, H in [0, 180), S and V in [0, 255].
    Hsv,
}

impl ColorSpace {
    pub fn channels(self) -> u8 {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Bgr | ColorSpace::Hsv => 3,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

impl FrameError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        FrameError::InvalidFrame(reason.into())
    }
}

/// A single captured or derived frame: interleaved bytes in row-major order.
///
/// Transforms produce new frames; only annotation drawing mutates pixel data
/// in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    color_space: ColorSpace,
    index: usize,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        index: usize,
    ) -> Result<Self, FrameError> {
        let expected = (width as usize) * (height as usize) * color_space.channels() as usize;
        if data.len() != expected {
            return Err(FrameError::invalid(format!(
                "data length {} does not match {width}x{height}x{}",
                data.len(),
                color_space.channels()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            color_space,
            index,
        })
    }

    /// A frame of the given size with every channel set to `value`.
    pub fn filled(width: u32, height: u32, color_space: ColorSpace, value: u8) -> Self {
        let len = (width as usize) * (height as usize) * color_space.channels() as usize;
        Self {
            data: vec![value; len],
            width,
            height,
            color_space,
            index: 0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.color_space.channels()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at column `x`, row `y` as a channel slice.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels() as usize;
        let start = (y as usize * self.width as usize + x as usize) * c;
        &self.data[start..start + c]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let c = self.channels() as usize;
        let start = (y as usize * self.width as usize + x as usize) * c;
        &mut self.data[start..start + c]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels() as usize,
        )
    }
}
