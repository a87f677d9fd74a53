use criterion::{black_box, criterion_group, criterion_main, Criterion};
use imgrender::{Matrix, PixelSize, RenderMode};

// Run with:
//    cargo bench --bench render_bench

fn gradient_matrix(rows: usize, columns: usize) -> Matrix {
    let bitmap = (0..rows * columns)
        .map(|i| ((i as u32 * 7) << 16) | ((i as u32 * 13) << 8) | (i as u32 * 29))
        .map(|v| v & 0x00FF_FFFF)
        .collect();
    Matrix::new(rows, columns, bitmap).expect("valid matrix")
}

fn bench_block(c: &mut Criterion) {
    let matrix = gradient_matrix(64, 64);
    let px = PixelSize::DEFAULT;
    c.bench_function("block_64x64_p4", |b| {
        b.iter(|| imgrender::render(black_box(&matrix), RenderMode::Block, px).unwrap())
    });
}

fn bench_realistic(c: &mut Criterion) {
    let matrix = gradient_matrix(64, 64);
    for size in [4i64, 15, 29] {
        let px = PixelSize::new(size).unwrap();
        c.bench_function(&format!("realistic_64x64_p{}", size), |b| {
            b.iter(|| imgrender::render(black_box(&matrix), RenderMode::Realistic, px).unwrap())
        });
    }
}

fn bench_render_png(c: &mut Criterion) {
    let matrix = gradient_matrix(32, 32);
    c.bench_function("render_png_realistic_32x32_p9", |b| {
        b.iter(|| {
            imgrender::render_png(
                black_box(&matrix),
                RenderMode::Realistic,
                PixelSize::new(9).unwrap(),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_block, bench_realistic, bench_render_png);
criterion_main!(benches);
