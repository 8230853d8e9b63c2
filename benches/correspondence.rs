use criterion::{black_box, criterion_group, criterion_main, Criterion};
use moire_inspect::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn grid(rows: usize, cols: usize, pitch: f64) -> Vec<Point> {
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| Point::new(10.0 + c as f64 * pitch, 10.0 + r as f64 * pitch)))
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let template = grid(40, 40, 24.0);
    let captured: Vec<Point> = template
        .iter()
        .map(|p| p.translated(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)))
        .collect();

    c.bench_function("analyze 40x40 grid", |b| {
        b.iter(|| analyze(black_box(&template), black_box(&captured)))
    });
}

fn bench_generate(c: &mut Criterion) {
    let window = WindowSettings::new(WORKING_RESOLUTION, WORKING_RESOLUTION);
    let settings = RasterSettings::new(37.0, 20, 4, 0);
    c.bench_function("generate 1000x1000 raster", |b| {
        b.iter(|| generate(black_box(&window), black_box(&settings)))
    });
}

criterion_group!(benches, bench_analyze, bench_generate);
criterion_main!(benches);
