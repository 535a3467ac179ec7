//! Types for CFA reconstruction

use crate::image_pipeline::common::plane::Plane;

/// Fixed-point multiplier of interpolation and color values.
pub const SCALE: i64 = 64;

/// Horizontal color estimate per photosite, in units of `1 / SCALE`.
pub type InterpolationGrid = Plane<i64>;

/// Reconstructed red, green and blue planes, same size as the sensor frame
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPlanes {
    pub red: Plane<i64>,
    pub green: Plane<i64>,
    pub blue: Plane<i64>,
}

impl ColorPlanes {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            red: Plane::new(width, height),
            green: Plane::new(width, height),
            blue: Plane::new(width, height),
        }
    }

    #[inline]
    pub fn get(&self, line: usize, column: usize) -> [i64; 3] {
        [
            self.red.get(line, column),
            self.green.get(line, column),
            self.blue.get(line, column),
        ]
    }

    #[inline]
    pub fn set(&mut self, line: usize, column: usize, [r, g, b]: [i64; 3]) {
        self.red.set(line, column, r);
        self.green.set(line, column, g);
        self.blue.set(line, column, b);
    }
}
