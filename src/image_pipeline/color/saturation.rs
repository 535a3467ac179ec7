//! Channel gains and brightness-preserving saturation stretch

use tracing::debug;

use crate::image_pipeline::common::config::ConversionConfig;
use crate::image_pipeline::debayer::types::ColorPlanes;
use crate::image_pipeline::raw::types::{
    BOTTOM_MARGIN, COLUMNS, LEFT_MARGIN, LINES, RIGHT_MARGIN, TOP_MARGIN,
};

/// Weights of the intensity kept constant while stretching saturation.
const RED_INTENSITY: f64 = 0.476;
const GREEN_INTENSITY: f64 = 0.299;
const BLUE_INTENSITY: f64 = 0.175;

fn intensity([r, g, b]: [f64; 3]) -> f64 {
    r * RED_INTENSITY + g * GREEN_INTENSITY + b * BLUE_INTENSITY
}

/// Indices of the smallest, middle and largest of `[r, g, b]`.
///
/// Ties fall through the same strict comparisons as the camera's reference
/// decoder so equal channels land in identical slots.
fn order_channels([r, g, b]: [f64; 3]) -> (usize, usize, usize) {
    const R: usize = 0;
    const G: usize = 1;
    const B: usize = 2;

    if r > g {
        if r > b {
            if g > b { (B, G, R) } else { (G, B, R) }
        } else {
            (G, R, B)
        }
    } else if g > b {
        if r > b { (B, R, G) } else { (R, B, G) }
    } else {
        (R, G, B)
    }
}

/// Pushes the middle channel away from the smallest by `sqrt(saturation)`
/// and the largest by `saturation`, then restores the original intensity.
fn stretch_saturation(mut rgb: [f64; 3], saturation: f64) -> [f64; 3] {
    let before = intensity(rgb);
    let (min, mid, max) = order_channels(rgb);

    rgb[mid] = rgb[min] + saturation.sqrt() * (rgb[mid] - rgb[min]);
    rgb[max] = rgb[min] + saturation * (rgb[max] - rgb[min]);

    let after = intensity(rgb);
    if after == 0.0 {
        return rgb;
    }
    let ratio = before / after;
    rgb.map(|c| c * ratio)
}

/// Applies the configured channel gains and saturation stretch over the
/// reconstructed region, returning new planes.
pub fn adjust_color_and_saturation(planes: &ColorPlanes, config: &ConversionConfig) -> ColorPlanes {
    let gains = [config.red_factor, config.green_factor, config.blue_factor];
    let mut adjusted = ColorPlanes::new(COLUMNS, LINES);

    for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
        for column in LEFT_MARGIN..COLUMNS - RIGHT_MARGIN {
            let [r, g, b] = planes.get(line, column);
            let mut rgb = [r as f64 * gains[0], g as f64 * gains[1], b as f64 * gains[2]];

            if config.saturation != 1.0 {
                rgb = stretch_saturation(rgb, config.saturation);
            }

            adjusted.set(line, column, rgb.map(|c| (c + 0.5) as i64));
        }
    }

    debug!(
        saturation = config.saturation,
        "Applied gains r={} g={} b={}", gains[0], gains[1], gains[2]
    );
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_planes() -> ColorPlanes {
        let mut planes = ColorPlanes::new(COLUMNS, LINES);
        for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
            for column in LEFT_MARGIN..COLUMNS - RIGHT_MARGIN {
                let base = (line * 13 + column * 7) as i64 % 4000;
                planes.set(line, column, [base, 4000 - base, (base * 3) % 4000]);
            }
        }
        planes
    }

    #[test]
    fn test_order_channels() {
        assert_eq!(order_channels([3.0, 2.0, 1.0]), (2, 1, 0));
        assert_eq!(order_channels([3.0, 1.0, 2.0]), (1, 2, 0));
        assert_eq!(order_channels([2.0, 1.0, 3.0]), (1, 0, 2));
        assert_eq!(order_channels([2.0, 3.0, 1.0]), (2, 0, 1));
        assert_eq!(order_channels([1.0, 3.0, 2.0]), (0, 2, 1));
        assert_eq!(order_channels([1.0, 2.0, 3.0]), (0, 1, 2));
        assert_eq!(order_channels([1.0, 1.0, 1.0]), (0, 1, 2));
    }

    #[test]
    fn test_stretch_preserves_intensity() {
        let rgb = [120.0, 80.0, 40.0];
        let stretched = stretch_saturation(rgb, 1.2);
        assert_relative_eq!(intensity(stretched), intensity(rgb), epsilon = 1e-9);
        // spread between channels grows
        assert!(stretched[0] - stretched[2] > rgb[0] - rgb[2]);
    }

    #[test]
    fn test_stretch_of_black_pixel_stays_black() {
        assert_eq!(stretch_saturation([0.0, 0.0, 0.0], 1.2), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unit_saturation_is_plain_gain() {
        let planes = sample_planes();
        let config = ConversionConfig::builder().saturation(1.0).build();
        let adjusted = adjust_color_and_saturation(&planes, &config);

        for line in TOP_MARGIN..LINES - BOTTOM_MARGIN {
            for column in (LEFT_MARGIN..COLUMNS - RIGHT_MARGIN).step_by(17) {
                let [r, g, b] = planes.get(line, column);
                let expected = [
                    (r as f64 * 0.64 + 0.5) as i64,
                    (g as f64 * 0.58 + 0.5) as i64,
                    (b as f64 * 1.00 + 0.5) as i64,
                ];
                assert_eq!(adjusted.get(line, column), expected);
            }
        }
    }

    #[test]
    fn test_default_saturation_changes_colors() {
        let planes = sample_planes();
        let plain = adjust_color_and_saturation(
            &planes,
            &ConversionConfig::builder().saturation(1.0).build(),
        );
        let saturated = adjust_color_and_saturation(&planes, &ConversionConfig::default());
        assert_ne!(plain, saturated);
    }
}
