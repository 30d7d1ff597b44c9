use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use planefx_image::Image;
use planefx_imgproc::filter::{box_blur_fast, box_filter, convolve3x3, gaussian_blur, kernels};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blur");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for sigma in [1.0f32, 3.0, 10.0].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{}x{}x{}", width, height, sigma);

            let image_size = [*width, *height].into();
            let image = Image::<f32, 1>::from_size_val(image_size, 0.5).unwrap();
            let output = image.like(0.0);
            let kernel_size = kernels::gaussian_kernel_size(*sigma);

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(gaussian_blur(
                            src,
                            &mut dst,
                            (kernel_size, kernel_size),
                            (*sigma, *sigma),
                        ))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("box_blur_fast", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(box_blur_fast(src, &mut dst, (*sigma, *sigma))))
                },
            );

            let radius = sigma.round() as usize;
            group.bench_with_input(
                BenchmarkId::new("box_filter", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(box_filter(src, &mut dst, (radius, radius))))
                },
            );
        }

        let image = Image::<f32, 1>::from_size_val([*width, *height].into(), 0.5).unwrap();
        let mut output = image.like(0.0);
        let matrix = [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0];
        group.bench_function(
            BenchmarkId::new("convolve3x3", format!("{}x{}", width, height)),
            |b| b.iter(|| black_box(convolve3x3(&image, &mut output, &matrix, 16.0))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
