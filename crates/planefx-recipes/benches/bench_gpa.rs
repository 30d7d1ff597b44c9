use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use planefx_image::Image;
use planefx_recipes::gpa::{estimate_iteration, gpa, GpaConfig, GpaMode};

fn bench_gpa(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gpa");
    let mut rng = StdRng::seed_from_u64(0);

    for (width, height) in [(256, 224), (512, 448)].iter() {
        let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
        let image = Image::<u8, 1>::new([*width, *height].into(), data).unwrap();
        let output = image.like(0);

        for (mode, sigma_r) in [
            (GpaMode::Gaussian, 0.15f32),
            (GpaMode::Box, 0.15),
            (GpaMode::Gaussian, 0.05),
        ] {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let config = GpaConfig {
                mode,
                sigma_r,
                ..Default::default()
            };
            let parameter_string = format!(
                "{}x{}x{:?}x{}",
                width,
                height,
                mode,
                config.iterations()
            );

            group.bench_with_input(
                BenchmarkId::new("gpa", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(gpa(src, &mut dst, &config)))
                },
            );
        }
    }

    group.bench_function("estimate_iteration", |b| {
        b.iter(|| black_box(estimate_iteration(black_box(12.75), 127.5, 1e-3)))
    });

    group.finish();
}

criterion_group!(benches, bench_gpa);
criterion_main!(benches);
