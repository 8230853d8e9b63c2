use moire_inspect::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Template grid of `rows` x `cols` points, `pitch` apart, starting at `origin`
fn grid(rows: usize, cols: usize, pitch: f64, origin: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            out.push(Point::new(origin + c as f64 * pitch, origin + r as f64 * pitch));
        }
    }
    out
}

fn jitter(points: &[Point], rng: &mut StdRng, amount: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| p.translated(rng.gen_range(-amount..amount), rng.gen_range(-amount..amount)))
        .collect()
}

#[test]
fn test_four_point_scenario_is_deformed() {
    let template = points(&[(10.0, 10.0), (30.0, 10.0), (10.0, 30.0), (30.0, 30.0)]);
    let captured = points(&[(11.0, 11.0), (31.0, 9.0), (9.0, 31.0), (33.0, 33.0)]);

    let result = analyze(&template, &captured).unwrap();
    let p = result.percentiles();
    let sqrt2 = 2f64.sqrt();

    assert!((p.p50 - sqrt2).abs() < 1e-9);
    assert!((p.p90 - 2.4 * sqrt2).abs() < 1e-9);
    assert!((p.p99 - 2.94 * sqrt2).abs() < 1e-9);
    assert!(p.tail_ratio() > MAX_TAIL_RATIO);
    assert!(classify(&p));
    assert_eq!(verdict_message(classify(&p)), "Deformation detected");
}

#[test]
fn test_uniform_shift_is_not_deformed() {
    let template = grid(6, 8, 40.0, 20.0);
    let captured: Vec<Point> = template.iter().map(|p| p.translated(1.0, 1.0)).collect();

    let result = analyze(&template, &captured).unwrap();
    assert_eq!(result.records().len(), template.len());
    assert!(!result.is_deformed());
}

#[test]
fn test_large_median_offset_is_deformed() {
    let template = grid(4, 4, 40.0, 20.0);
    let captured: Vec<Point> = template.iter().map(|p| p.translated(5.0, 0.0)).collect();

    let result = analyze(&template, &captured).unwrap();
    assert!((result.percentiles().p50 - 5.0).abs() < 1e-9);
    assert!(result.is_deformed());
}

#[test]
fn test_analysis_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let template = grid(10, 12, 30.0, 15.0);
    let captured = jitter(&template, &mut rng, 6.0);

    let first = analyze(&template, &captured).unwrap();
    let second = analyze(&template, &captured).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_percentiles_are_monotonic() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let len = rng.gen_range(1..60);
        let distances: Vec<f64> = (0..len).map(|_| rng.gen_range(0.0..25.0)).collect();
        let p = Percentiles::from_distances(&distances).unwrap();
        assert!(p.p50 <= p.p90 && p.p90 <= p.p99, "{p:?}");

        let max = distances.iter().cloned().fold(f64::MIN, f64::max);
        let min = distances.iter().cloned().fold(f64::MAX, f64::min);
        assert!(p.p99 <= max && p.p50 >= min);
    }
}

#[test]
fn test_row_bands_partition_template_rows() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let rows = rng.gen_range(2..15);
        let cols = rng.gen_range(1..10);
        let pitch = rng.gen_range(8..60) as f64;
        let template = grid(rows, cols, pitch, rng.gen_range(0..50) as f64);

        let bands = row_bands(&template).unwrap();
        assert_eq!(bands.len(), rows);

        for pair in bands.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
        for p in &template {
            assert_eq!(bands.iter().filter(|b| b.contains(p.y)).count(), 1);
        }
    }
}

#[test]
fn test_every_match_stays_in_its_row() {
    let mut rng = StdRng::seed_from_u64(11);
    let template = grid(8, 8, 24.0, 12.0);
    let captured = jitter(&template, &mut rng, 4.0);

    let result = analyze(&template, &captured).unwrap();
    let bands = result.bands();
    for record in result.records() {
        let row_of = |y: f64| bands.iter().find(|b| b.contains(y)).map(|b| b.index);
        assert_eq!(row_of(record.captured.y), row_of(record.template.y));
        let nearest = result
            .rows()
            .template_row(row_of(record.template.y).unwrap())
            .iter()
            .map(|t| t.distance(&record.captured))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(record.distance, nearest);
    }
}

#[test]
fn test_single_template_row_is_rejected() {
    let template = points(&[(0.0, 5.0), (10.0, 5.0)]);
    assert_eq!(
        analyze(&template, &template),
        Err(InspectionError::InsufficientRows { found: 1 })
    );
}

#[test]
fn test_classifier_boundaries() {
    assert!(classify(&Percentiles::new(4.0001, 4.5, 8.0)));
    assert!(!classify(&Percentiles::new(3.9999, 4.5, 7.9998)));
    assert!(!classify(&Percentiles::new(1.0, 1.5, 2.1)));
    assert!(classify(&Percentiles::new(1.0, 1.5, 2.1001)));
}
