//! Conversion configuration types

/// Convolution kernel used by the optional sharpening stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharpenKernel {
    /// Center weight `factor + 4`, the four orthogonal neighbours weigh -1
    Cross,
    /// Center weight `factor + 8`, all eight neighbours weigh -1
    Box,
}

/// Settings for the unsharp-mask pass over the resampled image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpenConfig {
    pub kernel: SharpenKernel,
    /// Strength level; the effective percentage is `level * 3`, clamped to 1..=50
    pub level: u32,
}

impl Default for SharpenConfig {
    fn default() -> Self {
        Self {
            kernel: SharpenKernel::Box,
            level: 2,
        }
    }
}

impl SharpenConfig {
    /// Effective sharpening percentage.
    pub fn percent(&self) -> i64 {
        (self.level as i64 * 3).clamp(1, 50)
    }

    /// Divisor applied to every convolved value (`100 / percent - 1`).
    pub fn factor(&self) -> i64 {
        100 / self.percent() - 1
    }
}

/// Configuration for raw CCD to TGA conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Saturation stretch; 1.0 leaves the colors untouched
    pub saturation: f64,
    /// Gain applied to the reconstructed red channel
    pub red_factor: f64,
    /// Gain applied to the reconstructed green channel
    pub green_factor: f64,
    /// Gain applied to the reconstructed blue channel
    pub blue_factor: f64,
    /// Percentage of valid pixels clipped at each end of the luminance histogram
    pub norm_percentage: f64,
    /// Unsharp mask over the final raster, disabled when `None`
    pub sharpen: Option<SharpenConfig>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            saturation: 1.2,
            red_factor: 0.64,
            green_factor: 0.58,
            blue_factor: 1.00,
            norm_percentage: 0.5,
            sharpen: None,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    saturation: Option<f64>,
    red_factor: Option<f64>,
    green_factor: Option<f64>,
    blue_factor: Option<f64>,
    norm_percentage: Option<f64>,
    sharpen: Option<Option<SharpenConfig>>,
}

impl ConversionConfigBuilder {
    pub fn saturation(mut self, saturation: f64) -> Self {
        self.saturation = Some(saturation);
        self
    }

    pub fn channel_factors(mut self, red: f64, green: f64, blue: f64) -> Self {
        self.red_factor = Some(red);
        self.green_factor = Some(green);
        self.blue_factor = Some(blue);
        self
    }

    pub fn norm_percentage(mut self, percentage: f64) -> Self {
        self.norm_percentage = Some(percentage);
        self
    }

    pub fn sharpen(mut self, sharpen: Option<SharpenConfig>) -> Self {
        self.sharpen = Some(sharpen);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            saturation: self.saturation.unwrap_or(default.saturation),
            red_factor: self.red_factor.unwrap_or(default.red_factor),
            green_factor: self.green_factor.unwrap_or(default.green_factor),
            blue_factor: self.blue_factor.unwrap_or(default.blue_factor),
            norm_percentage: self.norm_percentage.unwrap_or(default.norm_percentage),
            sharpen: self.sharpen.unwrap_or(default.sharpen),
        }
    }
}
