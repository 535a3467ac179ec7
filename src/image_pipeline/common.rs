//! Common utilities module
//!
//! This module contains the error type, the generic pixel plane, the
//! conversion configuration and timing helpers shared across the pipeline.

pub mod error;
pub mod config;
pub mod plane;
pub mod timing;

pub use error::{ConversionError, Result};
pub use config::{ConversionConfig, ConversionConfigBuilder, SharpenConfig, SharpenKernel};
pub use plane::Plane;
pub use timing::{PipelineTimings, StepTiming, Timer};
