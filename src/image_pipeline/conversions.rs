//! Pipeline conversions module
//!
//! Orchestrates the stages that turn one raw CCD capture into a TGA image.

mod raw_to_tga;

pub use raw_to_tga::RawToTgaPipeline;
