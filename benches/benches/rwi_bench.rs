//! Бенчмарки разбора .p2m и синтеза канала.
//!
//! Запуск: cargo bench -p rwi-benchmark

use std::{f64::consts::PI, hint::black_box, io::Cursor};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rwi_benchmark::{synthetic_paths, SYNTHETIC_PATHS_NAME};
use rwi_channel::{dft_codebook, ChannelConfig, ChannelSynthesizer};
use rwi_core::{parse_reader, PathsParser};

// ============================================================================
// Разбор
// ============================================================================

fn bench_parse_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_paths");
    let parser = PathsParser::default();

    for receivers in [10u32, 100, 1000] {
        let text = synthetic_paths(receivers, 20);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(receivers), &text, |b, text| {
            b.iter(|| {
                parse_reader(
                    &parser,
                    SYNTHETIC_PATHS_NAME,
                    Cursor::new(black_box(text.as_bytes())),
                )
            })
        });
    }

    group.finish();
}

// ============================================================================
// Синтез
// ============================================================================

fn bench_codebook(c: &mut Criterion) {
    let mut group = c.benchmark_group("dft_codebook");

    for antennas in [2usize, 4, 8] {
        let n = antennas * antennas;
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| dft_codebook(black_box(n)))
        });
    }

    group.finish();
}

fn bench_effective_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("effective_channel");
    let mut rng = StdRng::seed_from_u64(42);
    let rays = 25;

    let departure = Array2::from_shape_fn((rays, 2), |_| rng.gen_range(-PI..PI));
    let arrival = Array2::from_shape_fn((rays, 2), |_| rng.gen_range(-PI..PI));
    let gains = Array1::from_shape_fn(rays, |_| rng.gen_range(-120.0..-60.0));

    for antennas in [2usize, 4, 8] {
        let Ok(synth) = ChannelSynthesizer::new(ChannelConfig::new(antennas, 60.0e9)) else {
            continue;
        };

        group.throughput(Throughput::Elements(rays as u64));
        group.bench_with_input(BenchmarkId::new("raw", antennas), &synth, |b, synth| {
            b.iter(|| synth.raw_channel(departure.view(), arrival.view(), gains.view()))
        });
        group.bench_with_input(BenchmarkId::new("projected", antennas), &synth, |b, synth| {
            b.iter(|| synth.effective_channel(departure.view(), arrival.view(), gains.view()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_paths,
    bench_codebook,
    bench_effective_channel
);
criterion_main!(benches);
