//! Sensor geometry and raw frame types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::plane::Plane;

/// Lines delivered by the CCD readout.
pub const LINES: usize = 243;
/// Photosites per CCD line.
pub const COLUMNS: usize = 512;
/// Lines of the resampled output image.
pub const RES_LINES: usize = 375;
/// Size of the camera header preceding a full readout.
pub const CAMERA_HEADER_SIZE: usize = 512;

pub const TOP_MARGIN: usize = 1;
pub const BOTTOM_MARGIN: usize = 1;
pub const LEFT_MARGIN: usize = 2;
pub const RIGHT_MARGIN: usize = 10;

pub const NET_COLUMNS: usize = COLUMNS - LEFT_MARGIN - RIGHT_MARGIN;
pub const NET_LINES: usize = LINES - TOP_MARGIN - BOTTOM_MARGIN;
pub const NET_PIXELS: usize = NET_COLUMNS * NET_LINES;

/// Lowest intensity a loaded photosite may carry.
pub const SENSOR_FLOOR: u8 = 2;

/// Buffer length of a plain full-resolution readout.
pub const FULL_FRAME_SIZE: usize = 124_928;
/// Full readout followed by a 128 byte trailer block.
pub const FULL_FRAME_TRAILER_SIZE: usize = 125_056;
/// Full readout with the 5120 byte embedded thumbnail.
pub const FULL_FRAME_THUMBNAIL_SIZE: usize = 130_048;

/// Capture layouts the camera is known to produce, selected by buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// Low resolution capture: two bytes per group of four columns
    QuarterSampled,
    Full,
    FullWithTrailer,
    FullWithThumbnail,
}

impl FrameLayout {
    pub fn detect(len: usize) -> Result<Self> {
        match len {
            n if n < FULL_FRAME_SIZE => Ok(Self::QuarterSampled),
            FULL_FRAME_SIZE => Ok(Self::Full),
            FULL_FRAME_TRAILER_SIZE => Ok(Self::FullWithTrailer),
            FULL_FRAME_THUMBNAIL_SIZE => Ok(Self::FullWithThumbnail),
            n => Err(ConversionError::UnsupportedFrameSize(n)),
        }
    }

    /// Offset of the first sensor byte.
    pub fn data_offset(&self) -> usize {
        match self {
            Self::QuarterSampled => CAMERA_HEADER_SIZE / 2,
            Self::Full => CAMERA_HEADER_SIZE,
            Self::FullWithTrailer => CAMERA_HEADER_SIZE + 128,
            Self::FullWithThumbnail => CAMERA_HEADER_SIZE + 5120,
        }
    }

    /// Bytes consumed per sensor line.
    pub fn bytes_per_line(&self) -> usize {
        match self {
            Self::QuarterSampled => COLUMNS / 2,
            _ => COLUMNS,
        }
    }
}

/// One CCD readout, `LINES` x `COLUMNS` intensities, all at or above
/// [`SENSOR_FLOOR`].
#[derive(Debug, Clone)]
pub struct SensorFrame {
    pub layout: FrameLayout,
    pub ccd: Plane<u8>,
}

impl SensorFrame {
    #[inline]
    pub fn get(&self, line: usize, column: usize) -> u8 {
        self.ccd.get(line, column)
    }
}
