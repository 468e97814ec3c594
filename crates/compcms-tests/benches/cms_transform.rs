//! sRGB → Display P3 on float pixels: compcms against lcms2 and moxcms

use compcms_core::{
    ColorManager, ColorManagerConfig, ColorProfileParams, IccColorManager, NamedPrimaries, Output, TransferFunction,
};
use compcms_tests::reference::{display_p3_icc, srgb_icc};
use compcms_tests::{TestPattern, generate_pattern};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lcms2::{Intent, PixelFormat, Profile, Transform};
use moxcms::{Layout, TransformOptions};

fn bench_srgb_to_p3(c: &mut Criterion) {
    let mut group = c.benchmark_group("srgb_to_p3");

    let cm = IccColorManager::new(ColorManagerConfig::default()).unwrap();
    let p3 = cm
        .get_color_profile_from_params(
            &ColorProfileParams::with_named_primaries(NamedPrimaries::CicpDisplayP3, TransferFunction::Srgb),
            "p3",
        )
        .unwrap();
    let output = Output {
        color_profile: Some(p3),
        ..Output::new("bench")
    };
    let outcome = cm.create_output_color_outcome(&output).unwrap();
    let ours = outcome.from_srgb_to_output.as_ref().unwrap();

    let src = Profile::new_icc(&srgb_icc().unwrap()).unwrap();
    let dst = Profile::new_icc(&display_p3_icc().unwrap()).unwrap();
    let lcms: Transform<[f32; 3], [f32; 3]> = Transform::new(
        &src,
        PixelFormat::RGB_FLT,
        &dst,
        PixelFormat::RGB_FLT,
        Intent::RelativeColorimetric,
    )
    .unwrap();

    let mox = moxcms::ColorProfile::new_srgb()
        .create_transform_f32(
            Layout::Rgb,
            &moxcms::ColorProfile::new_display_p3(),
            Layout::Rgb,
            TransformOptions::default(),
        )
        .unwrap();

    for size in [4096, 262144] {
        let pixels = generate_pattern(TestPattern::Random(1), size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("compcms", size), &size, |b, _| {
            let mut data = pixels.clone();
            b.iter(|| ours.apply(black_box(&mut data)))
        });

        group.bench_with_input(BenchmarkId::new("lcms2", size), &size, |b, _| {
            let mut out = vec![[0.0f32; 3]; size];
            b.iter(|| lcms.transform_pixels(black_box(&pixels), &mut out))
        });

        group.bench_with_input(BenchmarkId::new("moxcms", size), &size, |b, _| {
            let flat: Vec<f32> = pixels.iter().flatten().copied().collect();
            let mut out = vec![0.0f32; flat.len()];
            b.iter(|| mox.transform(black_box(&flat), &mut out).unwrap())
        });
    }

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    let icc = display_p3_icc().unwrap();

    group.bench_function("compcms_outcome", |b| {
        b.iter(|| {
            let cm = IccColorManager::new(ColorManagerConfig::default()).unwrap();
            let output = Output {
                color_profile: Some(cm.get_color_profile_from_icc(black_box(&icc), "p3").unwrap()),
                ..Output::new("bench")
            };
            let outcome = cm.create_output_color_outcome(&output).unwrap();
            drop(outcome);
        })
    });

    group.bench_function("lcms2_transform", |b| {
        b.iter(|| {
            let src = Profile::new_srgb();
            let dst = Profile::new_icc(black_box(&icc)).unwrap();
            Transform::<[f32; 3], [f32; 3]>::new(
                &src,
                PixelFormat::RGB_FLT,
                &dst,
                PixelFormat::RGB_FLT,
                Intent::RelativeColorimetric,
            )
            .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_srgb_to_p3, bench_construction);

criterion_main!(benches);
