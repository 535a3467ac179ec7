//! Optional unsharp mask over the resampled raster

use tracing::debug;

use crate::image_pipeline::color::types::RgbImageData;
use crate::image_pipeline::common::config::{SharpenConfig, SharpenKernel};
use crate::image_pipeline::raw::types::{COLUMNS, LEFT_MARGIN, RIGHT_MARGIN};

/// Neighbour offsets carrying weight -1 for each kernel.
fn neighbours(kernel: SharpenKernel) -> &'static [(isize, isize)] {
    const CROSS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
    #[rustfmt::skip]
    const BOX: [(isize, isize); 8] = [
        (-1, -1), (-1, 0), (-1, 1),
        (0, -1), (0, 1),
        (1, -1), (1, 0), (1, 1),
    ];
    match kernel {
        SharpenKernel::Cross => &CROSS,
        SharpenKernel::Box => &BOX,
    }
}

/// Convolves the interior of `image` with the configured kernel.
///
/// Reads only from `image`; the border lines and columns outside the
/// reconstructed region are copied unchanged.
pub fn sharpen(image: &RgbImageData, config: &SharpenConfig) -> RgbImageData {
    let factor = config.factor();
    let offsets = neighbours(config.kernel);
    let center = factor + offsets.len() as i64;
    let mut out = image.clone();

    let right = (COLUMNS - RIGHT_MARGIN - 1).min(image.width.saturating_sub(1));
    for line in 1..image.height.saturating_sub(1) {
        for column in LEFT_MARGIN + 1..right {
            let mut acc = image.get(line, column).map(|c| c as i64 * center);
            for &(dy, dx) in offsets {
                let y = line.wrapping_add_signed(dy);
                let x = column.wrapping_add_signed(dx);
                for (a, c) in acc.iter_mut().zip(image.get(y, x)) {
                    *a -= c as i64;
                }
            }
            if factor > 1 {
                acc = acc.map(|a| a / factor);
            }
            out.set(line, column, acc.map(|a| a.clamp(0, 255) as u8));
        }
    }

    debug!(kernel = ?config.kernel, factor, "Sharpened image");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: usize, height: usize, fill: impl Fn(usize, usize) -> u8) -> RgbImageData {
        let mut image = RgbImageData::new(width, height);
        for line in 0..height {
            for column in 0..width {
                let v = fill(line, column);
                image.set(line, column, [v, v, v]);
            }
        }
        image
    }

    #[test]
    fn test_flat_area_unchanged_by_box_kernel() {
        // center factor + 8 minus eight neighbours leaves factor * v, divided back by factor
        let image = filled(COLUMNS, 20, |_, _| 90);
        let out = sharpen(&image, &SharpenConfig::default());
        assert_eq!(out.get(10, 100), [90, 90, 90]);
    }

    #[test]
    fn test_edges_gain_contrast() {
        let image = filled(COLUMNS, 20, |_, column| if column < 100 { 60 } else { 180 });
        let out = sharpen(&image, &SharpenConfig::default());

        let [dark, _, _] = out.get(10, 99);
        let [bright, _, _] = out.get(10, 100);
        assert!(dark < 60);
        assert!(bright > 180);
    }

    #[test]
    fn test_cross_kernel_and_border_copy() {
        let image = filled(COLUMNS, 20, |line, column| ((line * 31 + column * 17) % 256) as u8);
        let config = SharpenConfig { kernel: SharpenKernel::Cross, level: 40 };
        let out = sharpen(&image, &config);

        // factor 1: no division, center weight 5
        let c = image.get(5, 50)[0] as i64 * 5
            - image.get(4, 50)[0] as i64
            - image.get(6, 50)[0] as i64
            - image.get(5, 49)[0] as i64
            - image.get(5, 51)[0] as i64;
        assert_eq!(out.get(5, 50)[0] as i64, c.clamp(0, 255));

        assert_eq!(out.get(0, 50), image.get(0, 50));
        assert_eq!(out.get(19, 50), image.get(19, 50));
        assert_eq!(out.get(5, LEFT_MARGIN), image.get(5, LEFT_MARGIN));
    }
}
