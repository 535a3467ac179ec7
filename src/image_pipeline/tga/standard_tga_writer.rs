use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::color::types::RgbImageData;
use crate::image_pipeline::raw::types::{COLUMNS, LEFT_MARGIN, NET_COLUMNS, RIGHT_MARGIN};
use crate::image_pipeline::tga::writer::TgaWriter;

pub const TGA_HEADER_SIZE: usize = 18;

/// Columns dropped on each side of the reconstructed region.
const COLUMN_TRIM: usize = 2;

pub const OUTPUT_FIRST_COLUMN: usize = LEFT_MARGIN + COLUMN_TRIM;
/// Exclusive end of the written column range.
pub const OUTPUT_LAST_COLUMN: usize = COLUMNS - RIGHT_MARGIN - COLUMN_TRIM;
pub const OUTPUT_WIDTH: usize = NET_COLUMNS - 2 * COLUMN_TRIM;

/// Image type 2: uncompressed true-color
const IMAGE_TYPE_TRUE_COLOR: u8 = 2;
const PIXEL_DEPTH: u8 = 0x18;
/// Origin at the top-left corner
const DESCRIPTOR_TOP_LEFT: u8 = 0x20;

fn header(width: u16, height: u16) -> [u8; TGA_HEADER_SIZE] {
    let mut header = [0u8; TGA_HEADER_SIZE];
    header[2] = IMAGE_TYPE_TRUE_COLOR;
    header[12..14].copy_from_slice(&width.to_le_bytes());
    header[14..16].copy_from_slice(&height.to_le_bytes());
    header[16] = PIXEL_DEPTH;
    header[17] = DESCRIPTOR_TOP_LEFT;
    header
}

/// Encodes the trimmed column range of `image` as a TGA byte buffer.
pub fn encode_tga(image: &RgbImageData) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(TGA_HEADER_SIZE + OUTPUT_WIDTH * image.height * 3);
    buffer.extend_from_slice(&header(OUTPUT_WIDTH as u16, image.height as u16));

    for line in 0..image.height {
        for column in OUTPUT_FIRST_COLUMN..OUTPUT_LAST_COLUMN {
            let [r, g, b] = image.get(line, column);
            buffer.extend_from_slice(&[b, g, r]);
        }
    }
    buffer
}

pub struct StandardTgaWriter;

impl TgaWriter for StandardTgaWriter {
    fn write_tga(&self, image: &RgbImageData, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding TGA image: {}x{}", OUTPUT_WIDTH, image.height);

        let buffer = encode_tga(image);
        output.write_all(&buffer)?;

        debug!("TGA encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
