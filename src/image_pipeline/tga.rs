//! TGA writing module
//!
//! This module serializes tone mapped rasters into uncompressed true-color TGA files.

mod writer;
mod standard_tga_writer;

pub use writer::TgaWriter;
pub use standard_tga_writer::{
    encode_tga, StandardTgaWriter, OUTPUT_FIRST_COLUMN, OUTPUT_LAST_COLUMN, OUTPUT_WIDTH,
    TGA_HEADER_SIZE,
};
