use ndarray::{array, Array1};

use crate::agent::{Brain, BrainStatus};
use crate::builders::network::LayerSpec;
use crate::config::BrainOptions;
use crate::error::BrainError;
use crate::tests::stubs::{FixedValues, ScriptedRandom};

fn stub_brain(
    num_states: usize,
    options: BrainOptions,
    outputs: Array1<f32>,
    rng: ScriptedRandom,
) -> Brain<FixedValues, ScriptedRandom> {
    let num_actions = outputs.len();
    let inputs = options.net_inputs(num_states, num_actions);
    Brain::with_value_function(num_states, num_actions, options, FixedValues::new(inputs, outputs), rng).unwrap()
}

#[test]
fn test_full_exploration_follows_random_source() {
    let rng = ScriptedRandom::new(&[0.5, 0.5, 0.5], &[2, 0, 1, 2]);
    let mut brain = stub_brain(2, BrainOptions::default(), array![0.1, 0.9, 0.3], rng);

    let mut actions = Vec::new();
    for _ in 0..4 {
        actions.push(brain.forward(array![0.0, 1.0].view()).unwrap());
        brain.backward(0.0).unwrap();
    }

    assert_eq!(actions, vec![2, 0, 1, 2]);
    assert_eq!(brain.epsilon(), 1.0);
    assert_eq!(brain.value_net().forward_calls, 0);
}

#[test]
fn test_no_exploration_picks_argmax() {
    let options = BrainOptions {
        epsilon_test_time: 0.0,
        ..Default::default()
    };
    let mut brain = stub_brain(2, options, array![0.1, 0.9, 0.3], ScriptedRandom::default());
    brain.set_learning(false);

    // warmup step
    brain.forward(array![0.0, 0.0].view()).unwrap();
    brain.backward(0.0).unwrap();

    for _ in 0..5 {
        assert_eq!(brain.forward(array![0.3, 0.7].view()).unwrap(), 1);
        brain.backward(0.0).unwrap();
    }
    assert_eq!(brain.epsilon(), 0.0);
    assert_eq!(brain.value_net().forward_calls, 5);
}

#[test]
fn test_transition_is_recorded_from_the_previous_step() {
    let rng = ScriptedRandom::new(&[], &[1, 2, 0]);
    let mut brain = stub_brain(2, BrainOptions::default(), array![0.0, 0.0, 0.0], rng);

    let steps = [(array![1.0, 1.0], 0.1), (array![2.0, 2.0], 0.2), (array![3.0, 3.0], 0.3)];
    for (i, (observation, reward)) in steps.iter().enumerate() {
        brain.forward(observation.view()).unwrap();
        brain.backward(*reward).unwrap();
        if i < 2 {
            assert_eq!(brain.experience_len(), 0);
        }
    }

    assert_eq!(brain.experience_len(), 1);
    let experience = brain.experience().get(0).unwrap();
    // hot one-of-k entries carry the value num_states
    assert_eq!(experience.state0, array![2.0, 2.0, 1.0, 1.0, 0.0, 2.0, 0.0]);
    assert_eq!(experience.action0, 2);
    assert_eq!(experience.reward0, 0.2);
    assert_eq!(experience.state1, array![3.0, 3.0, 2.0, 2.0, 0.0, 0.0, 2.0]);
}

#[test]
fn test_learning_trains_on_td_targets() {
    let options = BrainOptions {
        experience_size: 100,
        start_learn_threshold: 2,
        gamma: 0.5,
        ..Default::default()
    };
    let mut brain = stub_brain(1, options, array![0.25, 1.0], ScriptedRandom::default());

    for step in 1..=20 {
        brain.forward(array![step as f32].view()).unwrap();
        brain.backward(1.0).unwrap();
        if step < 5 {
            assert!(brain.value_net().train_calls.is_empty());
        }
    }

    let calls = &brain.value_net().train_calls;
    // learning runs on steps 5..=20 with a batch of 4
    assert_eq!(calls.len(), 16 * 4);
    for (input, action, target) in calls {
        assert_eq!(input.len(), 4);
        assert!(*action < 2);
        assert!((target - 1.5).abs() < 1e-6);
    }
    assert_eq!(brain.average_loss(), Some(0.5));
    assert_eq!(brain.average_reward(), Some(1.0));
}

#[test]
fn test_warmup_stores_empty_net_inputs() {
    let options = BrainOptions {
        temporal_window: 2,
        hidden_layer_sizes: vec![4],
        seed: Some(1),
        ..Default::default()
    };
    let mut brain = Brain::new(1, 2, options).unwrap();

    brain.forward(array![0.1].view()).unwrap();
    brain.backward(0.0).unwrap();
    assert_eq!(brain.net_window().newest().len(), 0);

    brain.forward(array![0.2].view()).unwrap();
    brain.backward(0.0).unwrap();
    assert_eq!(brain.net_window()[0].len(), 0);
    assert_eq!(brain.net_window()[1].len(), 0);

    brain.forward(array![0.3].view()).unwrap();
    brain.backward(0.0).unwrap();
    assert_eq!(brain.net_window().newest().len(), 7);
    assert_eq!(brain.experience_len(), 0);

    brain.forward(array![0.4].view()).unwrap();
    brain.backward(0.0).unwrap();
    assert_eq!(brain.experience_len(), 1);
    assert_eq!(brain.experience().get(0).unwrap().state0.len(), 7);
}

#[test]
fn test_windows_keep_their_length() {
    let options = BrainOptions {
        temporal_window: 3,
        ..Default::default()
    };
    let mut brain = stub_brain(2, options, array![1.0, 0.0], ScriptedRandom::default());
    for i in 0..10 {
        brain.forward(array![i as f32, 0.0].view()).unwrap();
        brain.backward(i as f32).unwrap();
        assert_eq!(brain.state_window().len(), 3);
        assert_eq!(brain.action_window().len(), 3);
        assert_eq!(brain.reward_window().len(), 3);
        assert_eq!(brain.net_window().len(), 3);
    }
    assert_eq!(*brain.reward_window().newest(), 9.0);
    assert_eq!(brain.state_window().newest(), &array![9.0, 0.0]);
    assert_eq!(brain.last_input(), array![9.0, 0.0].view());
}

#[test]
fn test_backward_before_forward_is_a_sequencing_error() {
    let mut brain = stub_brain(2, BrainOptions::default(), array![0.0, 0.0], ScriptedRandom::default());
    assert!(matches!(brain.backward(1.0), Err(BrainError::Sequencing(_))));
    assert_eq!(brain.age(), 0);
}

#[test]
fn test_observation_length_is_checked() {
    let mut brain = stub_brain(2, BrainOptions::default(), array![0.0, 0.0], ScriptedRandom::default());
    let result = brain.forward(array![1.0, 2.0, 3.0].view());
    assert!(matches!(result, Err(BrainError::DimensionMismatch { .. })));
    assert_eq!(brain.forward_passes(), 0);
}

#[test]
fn test_learning_off_only_records_reward() {
    let options = BrainOptions {
        epsilon_test_time: 0.25,
        ..Default::default()
    };
    let mut brain = stub_brain(1, options, array![0.0, 1.0], ScriptedRandom::default());
    brain.set_learning(false);
    assert!(!brain.is_learning());

    for i in 0..6 {
        brain.forward(array![0.0].view()).unwrap();
        brain.backward(i as f32).unwrap();
    }

    assert_eq!(brain.age(), 0);
    assert_eq!(brain.experience_len(), 0);
    assert_eq!(brain.latest_reward(), 5.0);
    assert_eq!(brain.epsilon(), 0.25);
    assert_eq!(brain.forward_passes(), 6);
}

#[test]
fn test_construction_checks_value_function_shape() {
    let options = BrainOptions::default();
    let wrong_inputs = FixedValues::new(3, array![0.0, 0.0]);
    let result = Brain::with_value_function(2, 2, options.clone(), wrong_inputs, ScriptedRandom::default());
    assert!(matches!(result, Err(BrainError::DimensionMismatch { .. })));

    let wrong_outputs = FixedValues::new(options.net_inputs(2, 2), array![0.0, 0.0, 0.0]);
    let result = Brain::with_value_function(2, 2, options.clone(), wrong_outputs, ScriptedRandom::default());
    assert!(matches!(result, Err(BrainError::DimensionMismatch { .. })));

    let no_memory = BrainOptions {
        experience_size: 0,
        ..options.clone()
    };
    let values = FixedValues::new(options.net_inputs(2, 2), array![0.0, 0.0]);
    match Brain::with_value_function(2, 2, no_memory, values, ScriptedRandom::default()) {
        Err(BrainError::InvalidParameter { name, .. }) => assert_eq!(name, "experience_size"),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("brain built without replay memory"),
    }

    let mut no_batch = FixedValues::new(options.net_inputs(2, 2), array![0.0, 0.0]);
    no_batch.batch = 0;
    let result = Brain::with_value_function(2, 2, options, no_batch, ScriptedRandom::default());
    assert!(matches!(result, Err(BrainError::InvalidParameter { .. })));
}

#[test]
fn test_construction_checks_options() {
    assert!(matches!(
        Brain::new(0, 2, BrainOptions::default()),
        Err(BrainError::InvalidParameter { .. })
    ));

    let options = BrainOptions {
        random_action_distribution: vec![0.2, 0.2],
        ..Default::default()
    };
    assert!(Brain::new(1, 2, options).err().map_or(false, |e| e.is_configuration()));

    let options = BrainOptions {
        layer_specs: Some(vec![LayerSpec::input(3), LayerSpec::regression(2)]),
        ..Default::default()
    };
    assert!(matches!(
        Brain::new(1, 2, options),
        Err(BrainError::DimensionMismatch { .. })
    ));

    let options = BrainOptions {
        layer_specs: Some(vec![LayerSpec::input(3), LayerSpec::regression(2)]),
        ..Default::default()
    };
    assert!(Brain::new(1, 1, options).is_err());
}

#[test]
fn test_custom_layer_specs() {
    let options = BrainOptions {
        temporal_window: 0,
        layer_specs: Some(vec![
            LayerSpec::input(3),
            LayerSpec::fully_connected(5, crate::activations::Activation::Tanh),
            LayerSpec::regression(4),
        ]),
        seed: Some(9),
        ..Default::default()
    };
    let mut brain = Brain::new(3, 4, options).unwrap();
    assert_eq!(brain.value_net().network.layers.len(), 2);

    // temporal_window 0 acts from the first step
    let action = brain.forward(array![0.1, 0.2, 0.3].view()).unwrap();
    assert!(action < 4);
    assert_eq!(brain.net_window().newest().len(), 3);
}

#[test]
fn test_random_action_uses_distribution() {
    let options = BrainOptions {
        random_action_distribution: vec![0.0, 0.0, 1.0],
        seed: Some(4),
        ..Default::default()
    };
    let mut brain = Brain::new(2, 3, options).unwrap();
    for _ in 0..20 {
        assert_eq!(brain.random_action(), 2);
    }
}

#[test]
fn test_policy_reports_value() {
    let mut brain = stub_brain(1, BrainOptions::default(), array![0.4, -1.0, 0.7], ScriptedRandom::default());
    let policy = brain.policy(Array1::zeros(5).view()).unwrap();
    assert_eq!(policy.action, 2);
    assert_eq!(policy.value, 0.7);
}

#[test]
fn test_status_text_and_json() {
    let mut brain = stub_brain(1, BrainOptions::default(), array![0.0, 1.0], ScriptedRandom::default());
    brain.forward(array![0.5].view()).unwrap();
    brain.backward(2.0).unwrap();

    let status = brain.status();
    assert_eq!(status.age, 1);
    assert_eq!(status.average_loss, None);

    let text = status.to_string();
    assert!(text.contains("experience replay size: 0"));
    assert!(text.contains("exploration epsilon: 1"));
    assert!(text.contains("age: 1"));
    assert!(text.contains("average Q-learning loss: n/a"));
    assert!(text.contains("smooth-ish reward: n/a"));

    let parsed: BrainStatus = serde_json::from_str(&status.to_json().unwrap()).unwrap();
    assert_eq!(parsed, status);
}
