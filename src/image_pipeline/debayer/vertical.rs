//! Vertical estimate and CFA decode into red, green and blue.
//!
//! The sensor carries a complementary mosaic whose filters pass `R+2G+B`,
//! `G+2B`... style mixtures. With the photosite itself, the horizontal
//! neighbour estimate and a vertical neighbour estimate at hand, each of the
//! four mosaic phases solves a small linear system for the three primaries.

use tracing::debug;

use crate::image_pipeline::debayer::types::{ColorPlanes, InterpolationGrid, SCALE};
use crate::image_pipeline::raw::types::{
    SensorFrame, BOTTOM_MARGIN, COLUMNS, LEFT_MARGIN, LINES, RIGHT_MARGIN, TOP_MARGIN,
};

/// Mosaic phase of a photosite, from line and column parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CfaPhase {
    OddLineOddColumn,
    OddLineEvenColumn,
    EvenLineOddColumn,
    EvenLineEvenColumn,
}

impl CfaPhase {
    fn at(line: usize, column: usize) -> Self {
        match (line & 1 != 0, column & 1 != 0) {
            (true, true) => Self::OddLineOddColumn,
            (true, false) => Self::OddLineEvenColumn,
            (false, true) => Self::EvenLineOddColumn,
            (false, false) => Self::EvenLineEvenColumn,
        }
    }

    /// Solves for `[r, g, b]` from the photosite, horizontal and vertical estimates.
    fn decode(self, this: i64, horiz: i64, vert: i64) -> [i64; 3] {
        match self {
            Self::OddLineOddColumn => {
                let (r2gb, g2b, rg2) = (this, horiz, vert);
                let r = (2 * (r2gb - g2b) + rg2) / 5;
                let g = (rg2 - r) / 2;
                let b = g2b - 2 * g;
                [r, g, b]
            }
            Self::OddLineEvenColumn => {
                let (g2b, r2gb, rgb2) = (this, horiz, vert);
                let r = (3 * r2gb - g2b - rgb2) / 5;
                let g = 2 * r - r2gb + g2b;
                let b = g2b - 2 * g;
                [r, g, b]
            }
            Self::EvenLineOddColumn => {
                let (rg2, rgb2, r2gb) = (this, horiz, vert);
                let b = (3 * rgb2 - r2gb - rg2) / 5;
                let g = (rgb2 - r2gb + rg2 - b) / 2;
                let r = rg2 - 2 * g;
                [r, g, b]
            }
            Self::EvenLineEvenColumn => {
                let (rgb2, rg2, g2b) = (this, horiz, vert);
                let b = (g2b - 2 * (rg2 - rgb2)) / 5;
                let g = (g2b - b) / 2;
                let r = rg2 - 2 * g;
                [r, g, b]
            }
        }
    }
}

/// Reconstructs the color planes over lines `TOP_MARGIN..LINES - BOTTOM_MARGIN`
/// and columns `LEFT_MARGIN..COLUMNS - RIGHT_MARGIN`. Everything outside that
/// region is left at zero.
pub fn reconstruct_colors(frame: &SensorFrame, horiz: &InterpolationGrid) -> ColorPlanes {
    let mut planes = ColorPlanes::new(COLUMNS, LINES);

    for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
        for column in LEFT_MARGIN..COLUMNS - RIGHT_MARGIN {
            let this_ccd = frame.get(line, column) as i64 * SCALE;
            let this_horiz = horiz.get(line, column);
            let vert = vertical_estimate(frame, horiz, line, column);

            let rgb = CfaPhase::at(line, column)
                .decode(this_ccd, this_horiz, vert)
                .map(|c| c.max(0));
            planes.set(line, column, rgb);
        }
    }

    debug!("Color reconstruction done");
    planes
}

/// Estimate of the vertically neighbouring filter at `(line, column)`.
///
/// Neighbour lines contribute their photosite share of total intensity,
/// applied to this photosite's intensity. The first and last reconstructed
/// lines only look one way.
fn vertical_estimate(
    frame: &SensorFrame,
    horiz: &InterpolationGrid,
    line: usize,
    column: usize,
) -> i64 {
    let this_ccd = frame.get(line, column) as i64 * SCALE;
    let up_ccd = frame.get(line - 1, column) as i64 * SCALE;
    let down_ccd = frame.get(line + 1, column) as i64 * SCALE;

    let this_intensity = (this_ccd + horiz.get(line, column)) as f64;
    let up_share = up_ccd as f64 / (horiz.get(line - 1, column) + up_ccd) as f64;
    let down_share = down_ccd as f64 / (horiz.get(line + 1, column) + down_ccd) as f64;

    let estimate = if line == TOP_MARGIN {
        down_share * this_intensity
    } else if line == LINES - BOTTOM_MARGIN - 1 {
        up_share * this_intensity
    } else {
        (up_share + down_share) * this_intensity / 2.0
    };
    (estimate + 0.5) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::plane::Plane;
    use crate::image_pipeline::debayer::horizontal::interpolate_horizontally;
    use crate::image_pipeline::raw::types::{FrameLayout, FULL_FRAME_THUMBNAIL_SIZE};
    use crate::image_pipeline::raw::{Dc20FrameReader, RawFrameReader};

    fn frame_from(fill: impl Fn(usize, usize) -> u8) -> SensorFrame {
        let mut ccd = Plane::<u8>::new(COLUMNS, LINES);
        for line in 0..LINES {
            for column in 0..COLUMNS {
                ccd.set(line, column, fill(line, column));
            }
        }
        SensorFrame { layout: FrameLayout::Full, ccd }
    }

    fn lumi(planes: &ColorPlanes, line: usize, column: usize) -> i64 {
        let [r, g, b] = planes.get(line, column);
        3 * r / 10 + 6 * g / 10 + b / 10
    }

    #[test]
    fn test_phase_dispatch() {
        assert_eq!(CfaPhase::at(1, 1), CfaPhase::OddLineOddColumn);
        assert_eq!(CfaPhase::at(1, 2), CfaPhase::OddLineEvenColumn);
        assert_eq!(CfaPhase::at(2, 3), CfaPhase::EvenLineOddColumn);
        assert_eq!(CfaPhase::at(2, 2), CfaPhase::EvenLineEvenColumn);
    }

    #[test]
    fn test_decode_formulas() {
        assert_eq!(CfaPhase::OddLineOddColumn.decode(128, 128, 128), [25, 51, 26]);
        assert_eq!(CfaPhase::OddLineEvenColumn.decode(100, 300, 200), [120, 40, 20]);
        assert_eq!(CfaPhase::EvenLineOddColumn.decode(200, 250, 100), [-60, 130, 90]);
        assert_eq!(CfaPhase::EvenLineEvenColumn.decode(300, 200, 400), [-80, 140, 120]);
        // integer division truncates toward zero
        assert_eq!(CfaPhase::OddLineOddColumn.decode(100, 300, 52), [-69, 60, 180]);
    }

    #[test]
    fn test_channels_clamped_non_negative() {
        let frame = frame_from(|line, column| if (line * 7 + column * 3) % 5 == 0 { 250 } else { 2 });
        let horiz = interpolate_horizontally(&frame);
        let planes = reconstruct_colors(&frame, &horiz);

        for plane in [&planes.red, &planes.green, &planes.blue] {
            assert!(plane.data.iter().all(|&v| v >= 0));
        }
    }

    #[test]
    fn test_region_outside_margins_untouched() {
        let frame = frame_from(|_, _| 120);
        let horiz = interpolate_horizontally(&frame);
        let planes = reconstruct_colors(&frame, &horiz);

        assert_eq!(planes.get(0, 100), [0, 0, 0]);
        assert_eq!(planes.get(LINES - 1, 100), [0, 0, 0]);
        assert_eq!(planes.get(100, LEFT_MARGIN - 1), [0, 0, 0]);
        assert_eq!(planes.get(100, COLUMNS - RIGHT_MARGIN), [0, 0, 0]);
        assert_ne!(planes.get(100, 100), [0, 0, 0]);
    }

    #[test]
    fn test_horizontal_ramp_keeps_luminance_order() {
        let frame = frame_from(|_, column| (20 + column * 200 / 511) as u8);
        let horiz = interpolate_horizontally(&frame);
        let planes = reconstruct_colors(&frame, &horiz);

        for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
            for column in (LEFT_MARGIN + 2..COLUMNS - RIGHT_MARGIN - 4).step_by(2) {
                let here = lumi(&planes, line, column) + lumi(&planes, line, column + 1);
                let next = lumi(&planes, line, column + 2) + lumi(&planes, line, column + 3);
                assert!(here <= next, "line {line} column {column}: {here} > {next}");
            }
        }
    }

    /// Thumbnail-layout capture whose sensor bytes follow `fill`.
    fn thumbnail_capture(fill: impl Fn(usize, usize) -> u8) -> Vec<u8> {
        let offset = FrameLayout::FullWithThumbnail.data_offset();
        let mut data = vec![0u8; FULL_FRAME_THUMBNAIL_SIZE];
        for line in 0..LINES {
            for column in 0..COLUMNS {
                data[offset + line * COLUMNS + column] = fill(line, column);
            }
        }
        data
    }

    fn reconstruct_capture(data: &[u8]) -> ColorPlanes {
        let frame = Dc20FrameReader.read_frame(data).unwrap();
        assert_eq!(frame.layout, FrameLayout::FullWithThumbnail);
        let horiz = interpolate_horizontally(&frame);
        reconstruct_colors(&frame, &horiz)
    }

    #[test]
    fn test_loaded_horizontal_ramp_keeps_luminance_order() {
        let planes = reconstruct_capture(&thumbnail_capture(|_, column| (20 + column * 200 / 511) as u8));

        for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
            for column in (LEFT_MARGIN + 2..COLUMNS - RIGHT_MARGIN - 4).step_by(2) {
                let here = lumi(&planes, line, column) + lumi(&planes, line, column + 1);
                let next = lumi(&planes, line, column + 2) + lumi(&planes, line, column + 3);
                assert!(here <= next, "line {line} column {column}: {here} > {next}");
            }
        }
    }

    #[test]
    fn test_loaded_vertical_ramp_keeps_luminance_order() {
        let planes = reconstruct_capture(&thumbnail_capture(|line, _| (20 + line * 200 / 242) as u8));

        // 2x2 blocks cover all four mosaic phases
        let block = |line: usize, column: usize| {
            lumi(&planes, line, column)
                + lumi(&planes, line, column + 1)
                + lumi(&planes, line + 1, column)
                + lumi(&planes, line + 1, column + 1)
        };
        for column in (LEFT_MARGIN..COLUMNS - RIGHT_MARGIN - 1).step_by(2) {
            for line in (TOP_MARGIN..LINES - BOTTOM_MARGIN - 3).step_by(2) {
                let here = block(line, column);
                let next = block(line + 2, column);
                assert!(here <= next, "line {line} column {column}: {here} > {next}");
            }
        }
    }
}
