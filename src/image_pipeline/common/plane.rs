//! Row-major single-channel grid used by every pipeline stage

/// A `height` x `width` grid of samples stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<T>,
}

impl<T: Copy + Default> Plane<T> {
    /// Allocates a plane filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Copy> Plane<T> {
    #[inline]
    pub fn get(&self, line: usize, column: usize) -> T {
        self.data[line * self.width + column]
    }

    #[inline]
    pub fn set(&mut self, line: usize, column: usize, value: T) {
        self.data[line * self.width + column] = value;
    }

    #[inline]
    pub fn row(&self, line: usize) -> &[T] {
        let start = line * self.width;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, line: usize) -> &mut [T] {
        let start = line * self.width;
        &mut self.data[start..start + self.width]
    }
}
