//! Raw CCD frame loading module
//!
//! This module parses the camera's raw readout buffers into sensor frames.

mod reader;
mod dc20_reader;
pub mod types;

pub use reader::RawFrameReader;
pub use dc20_reader::Dc20FrameReader;
pub use types::{FrameLayout, SensorFrame};
