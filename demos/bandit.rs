/***
# Contextual Bandit Demo

* A brain observes a two-value signal and learns which of three arms pays
  off for it. The best arm depends on the sign of the first value.
* Prints the brain status every thousand steps, then measures the greedy
  policy with learning switched off.
***/

use deepq::agent::Brain;
use deepq::config::{BrainOptions, TrainerOptions};
use ndarray::array;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

fn best_arm(signal: f32) -> usize {
    if signal > 0.0 { 0 } else { 2 }
}

fn main() -> deepq::Result<()> {
    tracing_subscriber::fmt::init();

    let options = BrainOptions {
        temporal_window: 1,
        experience_size: 10000,
        start_learn_threshold: 500,
        learning_steps_burnin: 1000,
        learning_steps_total: 8000,
        epsilon_test_time: 0.0,
        hidden_layer_sizes: vec![16],
        trainer: TrainerOptions {
            learning_rate: 0.01,
            batch_size: 32,
            ..Default::default()
        },
        seed: Some(2024),
        ..Default::default()
    };
    let mut brain = Brain::new(2, 3, options)?;
    let mut env = StdRng::seed_from_u64(7);

    println!("=== Contextual Bandit ===\n");
    for step in 1..=10000 {
        let signal: f32 = env.gen_range(-1.0..1.0);
        let action = brain.forward(array![signal, 1.0].view())?;
        let reward = if action == best_arm(signal) { 1.0 } else { 0.0 };
        brain.backward(reward)?;

        if step % 1000 == 0 {
            println!("step {}\n{}", step, brain.status());
        }
    }

    brain.set_learning(false);
    let trials = 1000;
    let mut correct = 0;
    for _ in 0..trials {
        let signal: f32 = env.gen_range(-1.0..1.0);
        let action = brain.forward(array![signal, 1.0].view())?;
        let reward = if action == best_arm(signal) { 1.0 } else { 0.0 };
        if reward > 0.0 {
            correct += 1;
        }
        brain.backward(reward)?;
    }
    println!("greedy policy picked the best arm {}/{} times", correct, trials);
    Ok(())
}
