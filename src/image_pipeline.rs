//! Image processing pipeline module
//!
//! This module turns raw CCD captures into TGA images, with separate modules
//! for frame loading, color reconstruction, tone mapping, TGA writing and
//! conversion orchestration.

pub mod raw;
pub mod debayer;
pub mod color;
pub mod tga;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionConfig,
    ConversionConfigBuilder,
    ConversionError,
    PipelineTimings,
    Result,
    SharpenConfig,
    SharpenKernel,
};

pub use raw::{
    Dc20FrameReader,
    FrameLayout,
    RawFrameReader,
    SensorFrame,
};

pub use color::RgbImageData;

pub use tga::{
    StandardTgaWriter,
    TgaWriter,
};

pub use conversions::RawToTgaPipeline;
