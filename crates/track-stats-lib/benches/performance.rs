//! Performance benchmarks for track-stats-lib
//!
//! Run with: cargo bench --package track-stats-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use track_stats_lib::{Config, Coordinate, RawPoint, RawSegment, Track, accumulate, locate};

/// Generate a realistic segment with the specified number of points.
fn generate_segment(num_points: usize, base_lat: f64, base_lon: f64) -> RawSegment {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
            let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
            let ele = 500.0 + (t * 20.0).sin() * 150.0;
            RawPoint::new(lat, lon, Some(ele))
        })
        .collect()
}

fn to_coordinates(segment: &RawSegment) -> Vec<Coordinate> {
    segment
        .iter()
        .map(|raw| Coordinate::try_from(*raw).unwrap())
        .collect()
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");

    for size in [1_000, 50_000] {
        let coordinates = to_coordinates(&generate_segment(size, 51.5, -0.1));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &coordinates, |b, c| {
            b.iter(|| accumulate(c));
        });
    }

    group.finish();
}

fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let info = accumulate(&to_coordinates(&generate_segment(50_000, 51.5, -0.1)));
    let target = info.total_distance * 0.37;
    let query = info.points[31_337].coordinate;

    group.bench_function("locate_50k", |b| {
        b.iter(|| locate(&info.points, target));
    });

    group.bench_function("nearest_50k", |b| {
        b.iter(|| track_stats_lib::find_nearest(&info.points, &query, 0));
    });

    group.finish();
}

fn bench_track_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_load");
    group.sample_size(20);

    let segments: Vec<RawSegment> = (0..50)
        .map(|i| generate_segment(1_000, 51.5 + (i % 10) as f64 * 0.1, -0.1))
        .collect();
    let total_points = 50 * 1_000;

    group.throughput(Throughput::Elements(total_points as u64));
    for parallel in [false, true] {
        let config = Config {
            parallel,
            ..Config::default()
        };
        let name = if parallel { "parallel_50x1k" } else { "sequential_50x1k" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let track = Track::from_parts(None, Some(segments.clone()), config);
                track.load_all_segment_info().map(|infos| infos.len())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_accumulate, bench_lookups, bench_track_load);

criterion_main!(benches);
