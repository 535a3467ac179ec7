//! Color adjustment, dynamic range analysis and tone mapping stages

pub mod saturation;
pub mod histogram;
pub mod tone_map;
pub mod sharpen;
pub mod types;

pub use saturation::adjust_color_and_saturation;
pub use histogram::{determine_limits, luminance, ClipThresholds, LuminanceHistogram, HISTOGRAM_STEPS};
pub use tone_map::{resample_lines, tone_map, GammaTable, GAMMA};
pub use sharpen::sharpen;
pub use types::RgbImageData;
