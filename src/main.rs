use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use dc20_tga_rs::image_pipeline::{
    ConversionConfig, RawToTgaPipeline, SharpenConfig, SharpenKernel,
};
use dc20_tga_rs::logger;

#[derive(Parser)]
#[command(name = "dc20_tga_rs")]
#[command(version, about = "Convert raw DC20 CCD captures to TGA images", long_about = None)]
struct Cli {
    /// Raw capture files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the converted images (defaults to each input's directory)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Saturation stretch (1.0 = unchanged)
    #[arg(long, value_name = "FLOAT", default_value_t = 1.2)]
    saturation: f64,

    /// Percentage of pixels clipped at each end of the luminance range
    #[arg(long, value_name = "PERCENT", default_value_t = 0.5)]
    norm_percentage: f64,

    /// Sharpen the final image
    #[arg(long)]
    sharpen: bool,

    /// Sharpening strength
    #[arg(long, value_name = "LEVEL", default_value_t = 2, requires = "sharpen")]
    sharpen_level: u32,

    /// Sharpening neighbourhood
    #[arg(long, value_enum, default_value_t = KernelArg::Box, requires = "sharpen")]
    sharpen_kernel: KernelArg,

    /// Enable debug logging with per-stage timings
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KernelArg {
    Cross,
    Box,
}

impl From<KernelArg> for SharpenKernel {
    fn from(kernel: KernelArg) -> Self {
        match kernel {
            KernelArg::Cross => SharpenKernel::Cross,
            KernelArg::Box => SharpenKernel::Box,
        }
    }
}

impl Cli {
    fn config(&self) -> anyhow::Result<ConversionConfig> {
        if !(self.saturation.is_finite() && self.saturation > 0.0) {
            bail!("saturation must be a positive number, got {}", self.saturation);
        }
        if !(0.0..50.0).contains(&self.norm_percentage) {
            bail!("norm percentage must be in [0, 50), got {}", self.norm_percentage);
        }

        let sharpen = self.sharpen.then(|| SharpenConfig {
            kernel: self.sharpen_kernel.into(),
            level: self.sharpen_level,
        });

        Ok(ConversionConfig::builder()
            .saturation(self.saturation)
            .norm_percentage(self.norm_percentage)
            .sharpen(sharpen)
            .build())
    }

    fn output_path(&self, input: &Path) -> anyhow::Result<PathBuf> {
        let stem = input
            .file_stem()
            .with_context(|| format!("{} has no file name", input.display()))?;
        let dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let mut name = stem.to_os_string();
        name.push(".tga");
        Ok(dir.join(name))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.debug {
        logger::init_with_default("debug");
    } else {
        logger::init();
    }

    let config = cli.config()?;
    let pipeline = RawToTgaPipeline::new(config);
    info!(
        saturation = pipeline.config().saturation,
        norm_percentage = pipeline.config().norm_percentage,
        sharpen = ?pipeline.config().sharpen,
        "Raw to TGA pipeline initialized"
    );

    if let Some(dir) = &cli.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let jobs = cli
        .inputs
        .iter()
        .map(|input| Ok((input.clone(), cli.output_path(input)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut failures = 0;
    for ((input, output), result) in jobs.iter().zip(pipeline.convert_files(&jobs)) {
        match result {
            Ok(()) => info!(output = %output.display(), "Converted {}", input.display()),
            Err(e) => {
                error!("Conversion of {} failed: {}", input.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} conversions failed", failures, jobs.len());
    }
    Ok(())
}
