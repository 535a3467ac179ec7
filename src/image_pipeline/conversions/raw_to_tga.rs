use rayon::prelude::*;
use tracing::{info, instrument};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    color::{
        adjust_color_and_saturation, determine_limits, sharpen, tone_map, RgbImageData,
    },
    common::{
        error::{ConversionError, Result},
        ConversionConfig, PipelineTimings,
    },
    debayer::{interpolate_horizontally, reconstruct_colors},
    raw::{Dc20FrameReader, RawFrameReader, SensorFrame},
    tga::{StandardTgaWriter, TgaWriter},
};

pub struct RawToTgaPipeline<R: RawFrameReader, W: TgaWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl RawToTgaPipeline<Dc20FrameReader, StandardTgaWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: Dc20FrameReader,
            writer: StandardTgaWriter,
            config,
        }
    }
}

/// Runs one stage inside its own span, recording how long it took.
fn stage<T>(timings: &mut PipelineTimings, name: &'static str, run: impl FnOnce() -> T) -> T {
    let _span = tracing::info_span!("stage", name).entered();
    timings.record(name, run)
}

impl<R: RawFrameReader, W: TgaWriter> RawToTgaPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Runs every stage after loading, from horizontal interpolation to the
    /// optional sharpening pass.
    pub fn process_frame(&self, frame: &SensorFrame) -> Result<RgbImageData> {
        self.process_frame_timed(frame, &mut PipelineTimings::new())
    }

    fn process_frame_timed(
        &self,
        frame: &SensorFrame,
        timings: &mut PipelineTimings,
    ) -> Result<RgbImageData> {
        let horiz = stage(timings, "interpolate_horizontally", || {
            interpolate_horizontally(frame)
        });
        let planes = stage(timings, "reconstruct_colors", || reconstruct_colors(frame, &horiz));
        drop(horiz);

        let planes = stage(timings, "adjust_color", || {
            adjust_color_and_saturation(&planes, &self.config)
        });
        let thresholds = stage(timings, "determine_limits", || {
            determine_limits(&planes, self.config.norm_percentage)
        })?;
        let image = stage(timings, "tone_map", || tone_map(frame, &planes, &thresholds));
        drop(planes);

        let image = match &self.config.sharpen {
            Some(sharpen_config) => stage(timings, "sharpen", || sharpen(&image, sharpen_config)),
            None => image,
        };
        Ok(image)
    }

    fn run(&self, input_data: &[u8], output: &mut dyn Write, timings: &mut PipelineTimings) -> Result<RgbImageData> {
        let frame = stage(timings, "load_frame", || self.reader.read_frame(input_data))?;
        let image = self.process_frame_timed(&frame, timings)?;
        stage(timings, "encode_tga", || self.writer.write_tga(&image, output))?;
        Ok(image)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        info!("Starting raw CCD to TGA conversion");

        let mut timings = PipelineTimings::new();
        let image = self.run(input_data, output, &mut timings)?;

        info!(
            width = image.width,
            height = image.height,
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Conversion complete"
        );
        Ok(())
    }

    /// Converts one frame into an in-memory TGA file.
    pub fn convert_to_vec(&self, input_data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.convert(input_data, &mut output)?;
        Ok(output)
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert_with_timings(
        &self,
        input_data: &[u8],
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        self.run(input_data, output, &mut timings)?;
        timings.log_summary();
        Ok(timings)
    }

    /// Converts a raw capture on disk. The output file is only created once
    /// the whole frame converted successfully.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let encoded = self.convert_to_vec(&input_data)?;

        {
            let _span = tracing::info_span!("write_output_file").entered();
            std::fs::write(output_path, encoded).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok(())
    }

    /// Converts independent frames in parallel, one frame per task. Results
    /// keep the order of `frames`.
    pub fn convert_batch<D>(&self, frames: &[D]) -> Vec<Result<Vec<u8>>>
    where
        D: AsRef<[u8]> + Sync,
        R: Sync,
        W: Sync,
    {
        info!(frames = frames.len(), "Starting batch conversion");
        frames
            .par_iter()
            .map(|frame| self.convert_to_vec(frame.as_ref()))
            .collect()
    }

    /// File based variant of [`Self::convert_batch`].
    pub fn convert_files<P, Q>(&self, jobs: &[(P, Q)]) -> Vec<Result<()>>
    where
        P: AsRef<Path> + Sync,
        Q: AsRef<Path> + Sync,
        R: Sync,
        W: Sync,
    {
        jobs.par_iter()
            .map(|(input, output)| self.convert_file(input, output))
            .collect()
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}
