//! Gamma stretch between the clip thresholds and vertical resampling to the
//! output line count.

use tracing::debug;

use crate::image_pipeline::color::histogram::ClipThresholds;
use crate::image_pipeline::color::types::RgbImageData;
use crate::image_pipeline::debayer::types::ColorPlanes;
use crate::image_pipeline::raw::types::{
    SensorFrame, BOTTOM_MARGIN, COLUMNS, LEFT_MARGIN, LINES, NET_LINES, RES_LINES, RIGHT_MARGIN,
    TOP_MARGIN,
};

pub const GAMMA: f64 = 0.5;

/// Photosite value at which the CCD saturates.
const MAX_CCD_VALUE: u8 = 255;

/// Lookup from `value - low` to the 8-bit output, covering `low..high`.
///
/// A flat luminance distribution leaves `high <= low` and an empty table,
/// which maps every value to black.
#[derive(Debug, Clone)]
pub struct GammaTable {
    low: i64,
    high: i64,
    table: Vec<u8>,
}

impl GammaTable {
    pub fn new(thresholds: &ClipThresholds) -> Self {
        let (low, high) = (thresholds.low, thresholds.high);
        let range = (high - low).max(0) as usize;
        let factor = 256.0_f64.powf(1.0 / GAMMA) / range as f64;

        let table = (0..range)
            .map(|i| {
                let g = ((i as f64 * factor).powf(GAMMA) + 0.5) as i64;
                g.min(255) as u8
            })
            .collect();

        Self { low, high, table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn lookup(&self, value: i64) -> u8 {
        if value <= self.low || self.table.is_empty() {
            return 0;
        }
        if value >= self.high {
            return 255;
        }
        self.table[(value - self.low) as usize]
    }
}

/// True when a saturated photosite has a saturated 4-neighbour.
fn is_blown(frame: &SensorFrame, line: usize, column: usize) -> bool {
    frame.get(line, column) >= MAX_CCD_VALUE
        && (frame.get(line, column - 1) >= MAX_CCD_VALUE
            || frame.get(line, column + 1) >= MAX_CCD_VALUE
            || frame.get(line - 1, column) >= MAX_CCD_VALUE
            || frame.get(line + 1, column) >= MAX_CCD_VALUE)
}

/// Maps every reconstructed pixel through the gamma table. Output line `0`
/// holds sensor line `TOP_MARGIN`.
fn apply_gamma(frame: &SensorFrame, planes: &ColorPlanes, gamma: &GammaTable) -> RgbImageData {
    let mut mapped = RgbImageData::new(COLUMNS, NET_LINES);

    for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
        for column in LEFT_MARGIN..COLUMNS - RIGHT_MARGIN {
            let rgb = if is_blown(frame, line, column) {
                [frame.get(line, column); 3]
            } else {
                planes.get(line, column).map(|c| gamma.lookup(c))
            };
            mapped.set(line - TOP_MARGIN, column, rgb);
        }
    }
    mapped
}

/// Area-weighted vertical resampling of `src` to `target_lines` lines.
///
/// Each output line spans `src.height / target_lines` source lines. When that
/// span crosses a source line boundary the two lines are blended with weights
/// in 256ths of their overlap, otherwise the source line is copied.
pub fn resample_lines(src: &RgbImageData, target_lines: usize) -> RgbImageData {
    let mut out = RgbImageData::new(src.width, target_lines);
    let fy = src.height as f32 / target_lines as f32;

    for line in 0..target_lines {
        let begin = fy * line as f32;
        let end = fy * (line + 1) as f32;
        let first = begin as usize;
        let mut last = end as usize;
        if last as f32 == end {
            last -= 1;
        }
        // f32 rounding can overshoot the last source line for other target sizes
        let last = last.min(src.height - 1);

        if first == last {
            let start = first * src.width * 3;
            out.data[line * src.width * 3..(line + 1) * src.width * 3]
                .copy_from_slice(&src.data[start..start + src.width * 3]);
            continue;
        }

        let split = last as f32 / fy;
        let first_weight = ((split - line as f32) * 256.0) as u32;
        let rest_weight = (((line + 1) as f32 - split) * 256.0) as u32;

        for column in 0..src.width {
            let mut acc = [128u32; 3];
            for source in first..=last {
                let weight = if source == first { first_weight } else { rest_weight };
                for (a, c) in acc.iter_mut().zip(src.get(source, column)) {
                    *a += c as u32 * weight;
                }
            }
            out.set(line, column, acc.map(|a| (a / 256).min(255) as u8));
        }
    }
    out
}

/// Gamma maps the adjusted planes between `thresholds` and resamples the
/// result to [`RES_LINES`] lines.
///
/// Saturated photosites with a saturated neighbour keep the raw sensor value
/// on all three channels so blown highlights stay neutral.
pub fn tone_map(
    frame: &SensorFrame,
    planes: &ColorPlanes,
    thresholds: &ClipThresholds,
) -> RgbImageData {
    let gamma = GammaTable::new(thresholds);
    if gamma.is_empty() {
        debug!(low = thresholds.low, high = thresholds.high, "Flat luminance, mapping frame to black");
    } else {
        debug!(entries = gamma.len(), "Built gamma table");
    }

    let mapped = apply_gamma(frame, planes, &gamma);
    resample_lines(&mapped, RES_LINES)
}
