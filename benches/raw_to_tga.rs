use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dc20_tga_rs::image_pipeline::{
    ConversionConfig, RawToTgaPipeline, SharpenConfig, SharpenKernel,
};
use std::io::Cursor;

fn generate_mock_capture(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

fn benchmark_conversion_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion_by_layout");

    let layouts = vec![
        (62_464, "quarter_sampled"),
        (124_928, "full"),
        (130_048, "full_with_thumbnail"),
    ];

    for (len, label) in layouts {
        let mock_data = generate_mock_capture(len);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &mock_data,
            |b, data| {
                let pipeline = RawToTgaPipeline::new(ConversionConfig::default());

                b.iter(|| {
                    let mut output = Cursor::new(Vec::new());
                    let _ = pipeline.convert(black_box(data), &mut output);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_sharpen_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("sharpen_kernels");
    let mock_data = generate_mock_capture(124_928);

    let kernels = vec![
        (None, "none"),
        (Some(SharpenKernel::Cross), "cross"),
        (Some(SharpenKernel::Box), "box"),
    ];

    for (kernel, label) in kernels {
        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &mock_data,
            |b, data| {
                let config = ConversionConfig::builder()
                    .sharpen(kernel.map(|kernel| SharpenConfig { kernel, level: 2 }))
                    .build();
                let pipeline = RawToTgaPipeline::new(config);

                b.iter(|| {
                    let mut output = Cursor::new(Vec::new());
                    let _ = pipeline.convert(black_box(data), &mut output);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let frames: Vec<Vec<u8>> = (0..8).map(|_| generate_mock_capture(124_928)).collect();

    group.bench_function("sequential_8", |b| {
        let pipeline = RawToTgaPipeline::new(ConversionConfig::default());
        b.iter(|| {
            for frame in &frames {
                let _ = pipeline.convert_to_vec(black_box(frame));
            }
        });
    });

    group.bench_function("parallel_8", |b| {
        let pipeline = RawToTgaPipeline::new(ConversionConfig::default());
        b.iter(|| {
            let _ = pipeline.convert_batch(black_box(&frames));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_conversion_layouts,
    benchmark_sharpen_kernels,
    benchmark_batch
);
criterion_main!(benches);
