#[path = "../util/util.rs"]
mod util;

use util::synthetic_images;

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use tinct::{fit_dimensions, PackedBuffer, Sampler};

fn bench(
    c: &mut Criterion,
    group: &str,
    mut f: impl FnMut(&mut Bencher<WallTime>, &(Sampler, (u32, u32), &PackedBuffer)),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(2));

    for (sampler, name) in [(Sampler::Nearest, "nearest"), (Sampler::Bilinear, "bilinear")] {
        for (path, image) in synthetic_images() {
            for max_size in [256, 1024] {
                let size = fit_dimensions(image.width(), image.height(), max_size).unwrap();
                let id = BenchmarkId::new(format!("{name}/{max_size}"), path);
                group.bench_with_input(id, &(sampler, size, image), &mut f);
            }
        }
    }
}

fn resample_single(c: &mut Criterion) {
    bench(c, "resample_single", |b, &(sampler, (width, height), image)| {
        b.iter(|| image.resample(width, height, sampler))
    })
}

fn resample_par(c: &mut Criterion) {
    bench(c, "resample_par", |b, &(sampler, (width, height), image)| {
        b.iter(|| image.resample_par(width, height, sampler))
    })
}

criterion_group!(benches, resample_single, resample_par);
criterion_main!(benches);
