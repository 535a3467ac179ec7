//! Loader for the DC20 / ES-1000 raw CCD readout.
//!
//! The camera hands over one of several buffer layouts; the buffer length
//! alone tells them apart. Full readouts carry one byte per photosite after a
//! header, low resolution captures carry two bytes per four columns which are
//! spread back over the whole line and smoothed.

use std::io::{Cursor, ErrorKind, Read};

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::plane::Plane;
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::{
    FrameLayout, SensorFrame, COLUMNS, LINES, RIGHT_MARGIN, SENSOR_FLOOR,
};

/// Reader for buffers produced by the camera's raw image download.
pub struct Dc20FrameReader;

impl RawFrameReader for Dc20FrameReader {
    /// Parses a validated raw buffer into a [`SensorFrame`].
    ///
    /// # Errors
    ///
    /// * `UnsupportedFrameSize` - the length matches no known layout
    /// * `ShortRead` - a sensor line runs past the end of the buffer
    fn read_frame(&self, data: &[u8]) -> Result<SensorFrame> {
        let layout = FrameLayout::detect(data.len())?;
        debug!("Loading {:?} frame, {} bytes", layout, data.len());

        let mut cursor = Cursor::new(data);
        cursor.set_position(layout.data_offset() as u64);

        let mut ccd = Plane::<u8>::new(COLUMNS, LINES);
        let mut packed = vec![0u8; layout.bytes_per_line()];

        for line in 0..LINES {
            read_line(&mut cursor, &mut packed, line)?;
            let row = ccd.row_mut(line);
            match layout {
                FrameLayout::QuarterSampled => expand_quarter_line(&packed, row),
                _ => row.copy_from_slice(&packed),
            }
            for value in row.iter_mut() {
                if *value < SENSOR_FLOOR {
                    *value = SENSOR_FLOOR;
                }
            }
        }

        Ok(SensorFrame { layout, ccd })
    }
}

fn read_line(cursor: &mut Cursor<&[u8]>, buf: &mut [u8], line: usize) -> Result<()> {
    let expected = buf.len();
    let available = (cursor.get_ref().len() as u64).saturating_sub(cursor.position()) as usize;
    cursor.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => ConversionError::ShortRead {
            line,
            expected,
            available,
        },
        _ => ConversionError::IoError(e),
    })
}

/// Spreads one quarter-sampled line over all columns.
///
/// Each byte pair is repeated across its four column group, the line ends are
/// patched from interior groups, then the first pair of every group is
/// replaced by the average of the neighbouring replicated pairs.
fn expand_quarter_line(packed: &[u8], row: &mut [u8]) {
    for (group, pair) in packed.chunks_exact(2).enumerate() {
        let column = group * 4;
        row[column] = pair[0];
        row[column + 1] = pair[1];
        row[column + 2] = pair[0];
        row[column + 3] = pair[1];
    }

    row[2] = row[6];
    row[3] = row[7];
    row[0] = row[2];
    row[1] = row[3];
    row[COLUMNS - RIGHT_MARGIN + 1] = row[COLUMNS - RIGHT_MARGIN - 3];
    row[COLUMNS - RIGHT_MARGIN + 2] = row[COLUMNS - RIGHT_MARGIN - 2];

    for column in (4..COLUMNS - 3).step_by(4) {
        row[column] = ((row[column - 2] as u16 + row[column + 2] as u16) / 2) as u8;
        row[column + 1] = ((row[column - 1] as u16 + row[column + 3] as u16) / 2) as u8;
    }
}
