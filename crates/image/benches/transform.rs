//! Benchmarks for the pixel stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gdrcam_image::{
    correct_orientation, crop_to_aspect, crop_window, detect_format, rotate_pixels, AspectPolicy,
    OrientationCode, RotationAngle,
};
use image::DynamicImage;

fn bench_format_detection(c: &mut Criterion) {
    let jpeg_data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    c.bench_function("detect_jpeg", |b| b.iter(|| detect_format(black_box(&jpeg_data))));
}

fn bench_crop_window(c: &mut Criterion) {
    let policy = AspectPolicy::default();
    c.bench_function("crop_window_4000x3000", |b| {
        b.iter(|| crop_window(black_box(4000), black_box(3000), &policy))
    });
}

fn bench_pixel_stages(c: &mut Criterion) {
    let frame = DynamicImage::new_rgb8(1280, 960);
    let policy = AspectPolicy::default();

    let mut group = c.benchmark_group("pixel_stages");
    group.sample_size(20);
    group.bench_function("correct_orientation_6", |b| {
        b.iter(|| correct_orientation(black_box(frame.clone()), OrientationCode::new(6)))
    });
    group.bench_function("crop_to_aspect", |b| {
        b.iter(|| crop_to_aspect(black_box(frame.clone()), &policy))
    });
    if let Ok(quarter) = RotationAngle::new(90) {
        group.bench_function("rotate_90", |b| b.iter(|| rotate_pixels(black_box(&frame), quarter)));
    }
    group.finish();
}

criterion_group!(benches, bench_format_detection, bench_crop_window, bench_pixel_stages);
criterion_main!(benches);
