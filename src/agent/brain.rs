use std::fmt;

use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};
use tracing::{debug, info, trace};

use crate::builders::network::{default_layer_specs, validate_layer_specs, NetworkBuilder};
use crate::builders::ReplayBufferBuilder;
use crate::config::BrainOptions;
use crate::error::{BrainError, Result};
use crate::metrics::RunningWindow;
use crate::random::{RandomSource, SeededRandom};
use crate::replay_buffer::{Experience, ReplayBuffer};

use super::encoder::TemporalEncoder;
use super::exploration::{ExplorationPolicy, Policy};
use super::traits::{QNetwork, ValueFunction};
use super::window::SlidingWindow;

/// Capacity of the reward and loss diagnostic windows
const DIAGNOSTIC_WINDOW: usize = 1000;
/// Values needed before a diagnostic average is reported
const DIAGNOSTIC_MIN: usize = 10;

/// Temporal-difference Q-learning agent.
///
/// The brain is driven by alternating calls: [`Brain::forward`] with the
/// current observation returns an action, and [`Brain::backward`] with the
/// reward that action earned records the transition and, once enough
/// experience has accumulated, trains the value function on a batch of
/// replayed transitions.
///
/// # Example
///
/// ```rust
/// use deepq::agent::Brain;
/// use deepq::config::BrainOptions;
/// use ndarray::array;
///
/// let options = BrainOptions {
///     hidden_layer_sizes: vec![8],
///     seed: Some(7),
///     ..BrainOptions::with_experience_size(1000)
/// };
/// let mut brain = Brain::new(2, 3, options).unwrap();
///
/// for _ in 0..10 {
///     let action = brain.forward(array![0.5, -0.5].view()).unwrap();
///     let reward = if action == 0 { 1.0 } else { 0.0 };
///     brain.backward(reward).unwrap();
/// }
/// assert_eq!(brain.age(), 10);
/// ```
pub struct Brain<V = QNetwork, R = SeededRandom> {
    num_states: usize,
    num_actions: usize,
    options: BrainOptions,
    encoder: TemporalEncoder,
    exploration: ExplorationPolicy,
    value_net: V,
    rng: R,
    experience: ReplayBuffer,

    state_window: SlidingWindow<Array1<f32>>,
    action_window: SlidingWindow<usize>,
    reward_window: SlidingWindow<f32>,
    /// Encoded inputs; empty while warming up
    net_window: SlidingWindow<Array1<f32>>,

    age: usize,
    forward_passes: usize,
    epsilon: f32,
    learning: bool,
    latest_reward: f32,
    last_input: Array1<f32>,
    started_learning: bool,

    average_reward_window: RunningWindow,
    average_loss_window: RunningWindow,
}

impl Brain {
    /// Build a brain with the default dense value network.
    ///
    /// The network follows `options.layer_specs`, or when absent an input
    /// layer, one ReLU layer per entry of `hidden_layer_sizes` and a
    /// regression output. Weights are drawn from the brain's own random
    /// source, so a seeded brain is fully reproducible.
    pub fn new(num_states: usize, num_actions: usize, options: BrainOptions) -> Result<Self> {
        options.validate(num_states, num_actions)?;

        let net_inputs = options.net_inputs(num_states, num_actions);
        let specs = match &options.layer_specs {
            Some(specs) => specs.clone(),
            None => default_layer_specs(net_inputs, &options.hidden_layer_sizes, num_actions),
        };
        validate_layer_specs(&specs, net_inputs, num_actions)?;

        let mut rng = SeededRandom::from_seed_option(options.seed);
        let network = NetworkBuilder::from_specs(&specs).build_using(rng.rng_mut())?;
        let value_net = QNetwork::new(network, options.trainer.clone())?;

        Brain::with_value_function(num_states, num_actions, options, value_net, rng)
    }
}

impl<V: ValueFunction, R: RandomSource> Brain<V, R> {
    /// Build a brain around any value function and random source.
    pub fn with_value_function(
        num_states: usize,
        num_actions: usize,
        options: BrainOptions,
        value_net: V,
        rng: R,
    ) -> Result<Self> {
        options.validate(num_states, num_actions)?;

        let encoder = TemporalEncoder::new(num_states, num_actions, options.temporal_window);
        if value_net.input_size() != encoder.input_size() {
            return Err(BrainError::dimension_mismatch(
                format!("value network input of {}", encoder.input_size()),
                format!("{}", value_net.input_size()),
            ));
        }
        if value_net.output_size() != num_actions {
            return Err(BrainError::dimension_mismatch(
                format!("value network output of {}", num_actions),
                format!("{}", value_net.output_size()),
            ));
        }
        if value_net.batch_size() == 0 {
            return Err(BrainError::invalid_parameter("batch_size", "must be greater than 0"));
        }
        let experience = ReplayBufferBuilder::from_options(&options).build()?;

        let window_size = options.window_size();
        info!(
            num_states,
            num_actions,
            net_inputs = encoder.input_size(),
            window_size,
            experience_size = options.experience_size,
            "brain created"
        );

        Ok(Brain {
            num_states,
            num_actions,
            exploration: ExplorationPolicy::new(&options, num_actions),
            experience,
            encoder,
            value_net,
            rng,
            state_window: SlidingWindow::new(window_size, Array1::zeros(num_states)),
            action_window: SlidingWindow::new(window_size, 0),
            reward_window: SlidingWindow::new(window_size, 0.0),
            net_window: SlidingWindow::new(window_size, Array1::zeros(0)),
            age: 0,
            forward_passes: 0,
            epsilon: 1.0,
            learning: true,
            latest_reward: 0.0,
            last_input: Array1::zeros(0),
            started_learning: false,
            average_reward_window: RunningWindow::new(DIAGNOSTIC_WINDOW, DIAGNOSTIC_MIN),
            average_loss_window: RunningWindow::new(DIAGNOSTIC_WINDOW, DIAGNOSTIC_MIN),
            options,
        })
    }

    /// Choose an action for `observation`.
    ///
    /// Until `temporal_window` observations have been seen there is not
    /// enough history to encode an input, so the action is random. After
    /// that the action is random with probability epsilon and greedy with
    /// respect to the value function otherwise.
    pub fn forward(&mut self, observation: ArrayView1<f32>) -> Result<usize> {
        if observation.len() != self.num_states {
            return Err(BrainError::dimension_mismatch(
                format!("observation of length {}", self.num_states),
                format!("{}", observation.len()),
            ));
        }

        self.forward_passes += 1;
        self.last_input = observation.to_owned();

        let (action, net_input) = if self.forward_passes > self.options.temporal_window {
            let net_input = self.encoder.encode(observation, &self.state_window, &self.action_window);
            self.epsilon = self.exploration.epsilon(self.age, self.learning);
            let action = if self.exploration.explore(self.epsilon, &mut self.rng) {
                self.exploration.random_action(&mut self.rng)
            } else {
                self.policy(net_input.view())?.action
            };
            (action, net_input)
        } else {
            (self.exploration.random_action(&mut self.rng), Array1::zeros(0))
        };

        self.net_window.push(net_input);
        self.state_window.push(observation.to_owned());
        self.action_window.push(action);

        Ok(action)
    }

    /// Reward the most recent action, record the transition and learn.
    pub fn backward(&mut self, reward: f32) -> Result<()> {
        if self.forward_passes == 0 {
            return Err(BrainError::Sequencing(
                "backward() called before any forward()".to_string(),
            ));
        }

        self.average_reward_window.add(reward);
        self.latest_reward = reward;
        self.reward_window.push(reward);

        if !self.learning {
            return Ok(());
        }

        self.age += 1;

        if self.forward_passes > self.options.temporal_window + 1 {
            let n = self.options.window_size();
            let experience = Experience::new(
                self.net_window[n - 2].clone(),
                self.action_window[n - 2],
                self.reward_window[n - 2],
                self.net_window[n - 1].clone(),
            );
            self.experience.add(experience, &mut self.rng);
        }

        if self.experience.len() > self.options.start_learn_threshold {
            if !self.started_learning {
                self.started_learning = true;
                info!(age = self.age, experiences = self.experience.len(), "learning started");
            }
            self.learn()?;
        }

        Ok(())
    }

    /// One TD step over `batch_size` replayed experiences
    fn learn(&mut self) -> Result<()> {
        let batch_size = self.value_net.batch_size();
        let gamma = self.options.gamma;

        let mut total_loss = 0.0;
        for _ in 0..batch_size {
            let e = self.experience.sample_one(&mut self.rng)?;
            let target = e.reward0 + gamma * self.value_net.max_value(e.state1.view());
            total_loss += self.value_net.train_step(e.state0.view(), e.action0, target)?;
        }

        let average_loss = total_loss / batch_size as f32;
        self.average_loss_window.add(average_loss);
        trace!(age = self.age, loss = average_loss, "trained on replayed batch");
        Ok(())
    }

    /// Greedy action and its value for an encoded input
    pub fn policy(&mut self, net_input: ArrayView1<f32>) -> Result<Policy> {
        let values = self.value_net.forward(net_input);
        Policy::greedy(values.view())
            .ok_or_else(|| BrainError::TrainingError("value network produced no outputs".to_string()))
    }

    /// Draw a random action from the exploration distribution
    pub fn random_action(&mut self) -> usize {
        self.exploration.random_action(&mut self.rng)
    }

    /// Turn learning on or off. With learning off, rewards are still
    /// recorded but nothing is stored or trained and epsilon is fixed at
    /// `epsilon_test_time`.
    pub fn set_learning(&mut self, learning: bool) {
        if self.learning != learning {
            debug!(learning, age = self.age, "learning toggled");
        }
        self.learning = learning;
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn age(&self) -> usize {
        self.age
    }

    pub fn forward_passes(&self) -> usize {
        self.forward_passes
    }

    /// Epsilon used by the latest acting step
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn latest_reward(&self) -> f32 {
        self.latest_reward
    }

    pub fn last_input(&self) -> ArrayView1<f32> {
        self.last_input.view()
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn options(&self) -> &BrainOptions {
        &self.options
    }

    pub fn experience(&self) -> &ReplayBuffer {
        &self.experience
    }

    pub fn experience_len(&self) -> usize {
        self.experience.len()
    }

    pub fn value_net(&self) -> &V {
        &self.value_net
    }

    pub fn value_net_mut(&mut self) -> &mut V {
        &mut self.value_net
    }

    pub fn net_window(&self) -> &SlidingWindow<Array1<f32>> {
        &self.net_window
    }

    pub fn state_window(&self) -> &SlidingWindow<Array1<f32>> {
        &self.state_window
    }

    pub fn action_window(&self) -> &SlidingWindow<usize> {
        &self.action_window
    }

    pub fn reward_window(&self) -> &SlidingWindow<f32> {
        &self.reward_window
    }

    pub fn average_loss(&self) -> Option<f32> {
        self.average_loss_window.average()
    }

    pub fn average_reward(&self) -> Option<f32> {
        self.average_reward_window.average()
    }

    /// Snapshot of the learning progress
    pub fn status(&self) -> BrainStatus {
        BrainStatus {
            experience_size: self.experience.len(),
            epsilon: self.epsilon,
            age: self.age,
            average_loss: self.average_loss(),
            average_reward: self.average_reward(),
        }
    }
}

/// Learning progress of a [`Brain`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrainStatus {
    pub experience_size: usize,
    pub epsilon: f32,
    pub age: usize,
    /// Average Q-learning loss, once enough batches were trained
    pub average_loss: Option<f32>,
    /// Smoothed reward, once enough rewards were seen
    pub average_reward: Option<f32>,
}

impl BrainStatus {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn write_average(f: &mut fmt::Formatter<'_>, label: &str, value: Option<f32>) -> fmt::Result {
    match value {
        Some(value) => writeln!(f, "{}: {}", label, value),
        None => writeln!(f, "{}: n/a", label),
    }
}

impl fmt::Display for BrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "experience replay size: {}", self.experience_size)?;
        writeln!(f, "exploration epsilon: {}", self.epsilon)?;
        writeln!(f, "age: {}", self.age)?;
        write_average(f, "average Q-learning loss", self.average_loss)?;
        write_average(f, "smooth-ish reward", self.average_reward)
    }
}
