//! 8-bit RGB raster produced by tone mapping

/// RGB image data after tone mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImageData {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<u8>,
}

impl RgbImageData {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 3],
        }
    }

    #[inline]
    pub fn get(&self, line: usize, column: usize) -> [u8; 3] {
        let at = (line * self.width + column) * 3;
        [self.data[at], self.data[at + 1], self.data[at + 2]]
    }

    #[inline]
    pub fn set(&mut self, line: usize, column: usize, rgb: [u8; 3]) {
        let at = (line * self.width + column) * 3;
        self.data[at..at + 3].copy_from_slice(&rgb);
    }
}
