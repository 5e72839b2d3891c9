//! Criterion benchmarks for one forward/backward step of the brain.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;

use deepq::agent::Brain;
use deepq::config::{BrainOptions, TrainerOptions};

fn make_brain(temporal_window: usize, seed: u64) -> Brain {
    Brain::new(
        8,
        4,
        BrainOptions {
            temporal_window,
            experience_size: 5000,
            start_learn_threshold: 100,
            hidden_layer_sizes: vec![32, 32],
            trainer: TrainerOptions {
                batch_size: 32,
                ..Default::default()
            },
            seed: Some(seed),
            ..Default::default()
        },
    )
    .expect("benchmark brain options are valid")
}

/// Benchmark a full step once learning is running.
fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("brain_step");

    for temporal_window in [1, 4].iter() {
        group.bench_with_input(
            BenchmarkId::new("temporal_window", temporal_window),
            temporal_window,
            |b, &temporal_window| {
                let mut brain = make_brain(temporal_window, 42);
                let observation = Array1::from_elem(8, 0.5);
                for _ in 0..200 {
                    let action = brain.forward(observation.view()).expect("forward");
                    brain.backward(action as f32).expect("backward");
                }

                b.iter(|| {
                    let action = brain.forward(black_box(observation.view())).expect("forward");
                    brain.backward(black_box(action as f32 * 0.1)).expect("backward");
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
