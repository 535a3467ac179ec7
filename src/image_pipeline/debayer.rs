//! CFA reconstruction of the complementary color mosaic into RGB planes

pub mod horizontal;
pub mod vertical;
pub mod types;

pub use horizontal::interpolate_horizontally;
pub use vertical::reconstruct_colors;
pub use types::{ColorPlanes, InterpolationGrid, SCALE};
