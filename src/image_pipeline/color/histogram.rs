//! Luminance histogram and clip threshold detection

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::types::ColorPlanes;
use crate::image_pipeline::raw::types::{
    BOTTOM_MARGIN, COLUMNS, LEFT_MARGIN, LINES, RIGHT_MARGIN, TOP_MARGIN,
};

/// Resolution of the luminance histogram. Bucket `HISTOGRAM_STEPS` holds the
/// maximum luminance itself.
pub const HISTOGRAM_STEPS: usize = 4096;

/// Integer luminance proxy, `0.3 R + 0.6 G + 0.1 B` with each term truncated.
#[inline]
pub fn luminance([r, g, b]: [i64; 3]) -> i64 {
    (3 * r) / 10 + (6 * g) / 10 + b / 10
}

/// Low and high clip points in the fixed-point color domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipThresholds {
    pub low: i64,
    pub high: i64,
    pub max_luminance: i64,
}

/// Luminance distribution over the valid region of one frame
#[derive(Debug, Clone)]
pub struct LuminanceHistogram {
    buckets: Vec<u64>,
    max_luminance: i64,
    total: u64,
}

impl LuminanceHistogram {
    /// Buckets the luminance of every valid pixel, scaled by the frame maximum.
    ///
    /// # Errors
    ///
    /// `DegenerateHistogram` when every valid pixel has zero luminance.
    pub fn build(planes: &ColorPlanes) -> Result<Self> {
        let luminances: Vec<i64> = (TOP_MARGIN..LINES - BOTTOM_MARGIN)
            .flat_map(|line| {
                (LEFT_MARGIN..COLUMNS - RIGHT_MARGIN)
                    .map(move |column| luminance(planes.get(line, column)))
            })
            .collect();

        let max_luminance = luminances.iter().copied().max().unwrap_or(0);
        if max_luminance <= 0 {
            return Err(ConversionError::DegenerateHistogram);
        }

        let mut buckets = vec![0u64; HISTOGRAM_STEPS + 1];
        for &value in &luminances {
            buckets[(value * HISTOGRAM_STEPS as i64 / max_luminance) as usize] += 1;
        }

        Ok(Self {
            buckets,
            max_luminance,
            total: luminances.len() as u64,
        })
    }

    pub fn max_luminance(&self) -> i64 {
        self.max_luminance
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn bucket(&self, index: usize) -> u64 {
        self.buckets[index]
    }

    /// Number of pixels clipped at each end for `norm_percentage` percent,
    /// with the percentage clamped to `0..=100`.
    pub fn tail_count(&self, norm_percentage: f64) -> u64 {
        let percent_hundredths = (norm_percentage.clamp(0.0, 100.0) * 100.0) as u64;
        self.total * percent_hundredths / 10_000
    }

    /// First bucket index past the low tail.
    fn low_index(&self, tail: u64) -> i64 {
        let mut sum = 0;
        let mut index = 0;
        while index <= HISTOGRAM_STEPS && sum < tail {
            sum += self.buckets[index];
            index += 1;
        }
        index as i64
    }

    /// First bucket index below the high tail.
    fn high_index(&self, tail: u64) -> i64 {
        let mut sum = 0;
        let mut index = HISTOGRAM_STEPS as i64;
        while index >= 0 && sum < tail {
            sum += self.buckets[index as usize];
            index -= 1;
        }
        index
    }

    fn to_luminance(&self, index: i64) -> i64 {
        let steps = HISTOGRAM_STEPS as i64;
        (index * self.max_luminance + steps / 2) / steps
    }

    pub fn thresholds(&self, norm_percentage: f64) -> ClipThresholds {
        let tail = self.tail_count(norm_percentage);
        ClipThresholds {
            low: self.to_luminance(self.low_index(tail)),
            high: self.to_luminance(self.high_index(tail)),
            max_luminance: self.max_luminance,
        }
    }
}

/// Derives the tone mapping clip points for `planes`.
pub fn determine_limits(planes: &ColorPlanes, norm_percentage: f64) -> Result<ClipThresholds> {
    let histogram = LuminanceHistogram::build(planes)?;
    let thresholds = histogram.thresholds(norm_percentage);
    debug!(
        low = thresholds.low,
        high = thresholds.high,
        max = thresholds.max_luminance,
        "Determined clip thresholds"
    );
    Ok(thresholds)
}
