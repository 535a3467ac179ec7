//! Horizontal interpolation of the neighbouring color along each line.
//!
//! Every photosite gets an estimate of the complementary filter sitting next
//! to it, seeded by a plain average and then refined by a ratio recurrence
//! that follows edges instead of blurring across them.

use tracing::debug;

use crate::image_pipeline::debayer::types::{InterpolationGrid, SCALE};
use crate::image_pipeline::raw::types::{
    SensorFrame, BOTTOM_MARGIN, COLUMNS, LEFT_MARGIN, LINES, RIGHT_MARGIN, TOP_MARGIN,
};

/// Refinement passes over each line.
pub const HORIZ_IPOL_PASSES: usize = 3;

/// Builds the horizontal estimate grid for `frame`.
///
/// Columns outside `LEFT_MARGIN..=COLUMNS - RIGHT_MARGIN - 1` stay zero.
pub fn interpolate_horizontally(frame: &SensorFrame) -> InterpolationGrid {
    let mut grid = InterpolationGrid::new(COLUMNS, LINES);

    for line in 0..LINES {
        seed_line(frame.ccd.row(line), grid.row_mut(line));
    }

    for line in TOP_MARGIN - 1..LINES - BOTTOM_MARGIN + 1 {
        let ccd = frame.ccd.row(line);
        let ipol = grid.row_mut(line);
        for _ in 0..HORIZ_IPOL_PASSES {
            for init_column in LEFT_MARGIN + 1..=LEFT_MARGIN + 2 {
                refine_parity(ccd, ipol, init_column);
            }
        }
    }

    debug!("Horizontal interpolation done, {} passes", HORIZ_IPOL_PASSES);
    grid
}

fn seed_line(ccd: &[u8], ipol: &mut [i64]) {
    let right = COLUMNS - RIGHT_MARGIN - 1;
    ipol[LEFT_MARGIN] = ccd[LEFT_MARGIN + 1] as i64 * SCALE;
    ipol[right] = ccd[right - 1] as i64 * SCALE;
    for column in LEFT_MARGIN + 1..right {
        ipol[column] = (ccd[column - 1] as i64 + ccd[column + 1] as i64) * (SCALE / 2);
    }
}

/// Recomputes every other column starting at `init_column`, in place.
fn refine_parity(ccd: &[u8], ipol: &mut [i64], init_column: usize) {
    const HALF_SCALE_SQ: f64 = (SCALE * SCALE / 2) as f64;

    for column in (init_column..COLUMNS - RIGHT_MARGIN - 1).step_by(2) {
        let left = ccd[column - 1] as f64 / ipol[column - 1] as f64;
        let right = ccd[column + 1] as f64 / ipol[column + 1] as f64;
        ipol[column] = ((left + right) * ccd[column] as f64 * HALF_SCALE_SQ + 0.5) as i64;
    }
}
