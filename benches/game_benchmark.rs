//! Benchmarks for map generation and complete headless games.
//!
//! The full game loop is the hot path of a tournament.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridwar::ai::decide;
use gridwar::config::GameConfig;
use gridwar::game::{Difficulty, WorldState, generate_map};
use gridwar::tournament::run_game;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn headless(width: u16, height: u16) -> GameConfig {
    GameConfig {
        width,
        height,
        human_seat: false,
        scripted_delay_ms: 0,
        ..GameConfig::default()
    }
}

fn bench_mapgen(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapgen");
    for size in [32u16, 100, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(black_box(42));
                black_box(generate_map(size, size, &mut rng))
            });
        });
    }
    group.finish();
}

fn bench_decide(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let state = WorldState::generate(100, 100, false, Difficulty::Insane, &mut rng)
        .expect("valid dimensions");

    c.bench_function("decide_one_agent", |b| {
        b.iter(|| black_box(decide(black_box(&state), 2)));
    });
}

fn bench_single_game(c: &mut Criterion) {
    let config = headless(32, 32);

    c.bench_function("single_game_32x32", |b| {
        b.iter(|| black_box(run_game(black_box(42), &config, black_box(1000))));
    });
}

fn bench_game_batch(c: &mut Criterion) {
    // Sequential, so rayon overhead is not measured
    let config = headless(100, 100);

    c.bench_function("10_games_100x100", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let _ = black_box(run_game(black_box(seed), &config, 1000));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_mapgen,
    bench_decide,
    bench_single_game,
    bench_game_batch
);
criterion_main!(benches);
