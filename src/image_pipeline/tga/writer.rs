use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::color::types::RgbImageData;

pub trait TgaWriter {
    fn write_tga(&self, image: &RgbImageData, output: &mut dyn Write) -> Result<()>;
}
