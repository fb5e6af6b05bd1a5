use anyhow::Result;
use derive_builder::Builder;
use log::{debug, info};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use thiserror::Error;

use crate::errors::DataError;
use crate::structs::Model;
use crate::train::{LabeledRow, TrainingSet};
use crate::util::{dot_features, logistic, VecMath};

/// An Error that is thrown when a trainer configuration cannot make progress.
#[derive(Error, Debug, PartialEq)]
#[error("invalid trainer configuration: {reason}")]
pub struct InvalidTrainerConfigError {
    reason: &'static str,
}

/// Parameters of mini-batch gradient ascent.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(default)]
pub struct TrainerConfig {
    /// The factor applied to the gradient at each update
    pub step_size: f64,
    /// The number of rows drawn for each mini-batch
    pub batch_size: usize,
    /// Training stops after this many iterations
    pub max_iterations: usize,
    /// Training stops early once two consecutive gradients have an L2 norm below this
    pub gradient_tolerance: f64,
    /// Seeds mini-batch sampling
    pub seed: u64,
    /// Progress is logged every this many iterations
    pub log_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            step_size: 0.001,
            batch_size: 5,
            max_iterations: 10_000,
            gradient_tolerance: 1e-6,
            seed: 42,
            log_interval: 1_000,
        }
    }
}

impl TrainerConfig {
    fn validate(&self) -> std::result::Result<(), InvalidTrainerConfigError> {
        let reason = if self.max_iterations == 0 {
            "max iterations must be at least 1"
        } else if self.batch_size == 0 {
            "batch size must be at least 1"
        } else if !self.step_size.is_finite() || self.step_size <= 0.0 {
            "step size must be positive and finite"
        } else if self.gradient_tolerance.is_nan() || self.gradient_tolerance < 0.0 {
            "gradient tolerance must not be negative"
        } else {
            return Ok(());
        };

        Err(InvalidTrainerConfigError { reason })
    }
}

/// The gradient of the log-likelihood of logistic regression over a batch of rows.
///
/// With p = P(contact | x) = logistic(s), each row adds (y - p) to the bias component
/// and x\[k\] * (y - p) to component k + 1. Contributions are summed, not averaged.
pub fn log_likelihood_gradient(weights: &[f64], batch: &[&LabeledRow]) -> Vec<f64> {
    let mut gradient = vec![0.0; weights.len()];

    for row in batch {
        let s = weights[0] + dot_features(&weights[1..], &row.features);
        let residual = row.label.value() - logistic(s);

        gradient[0] += residual;
        gradient[1..]
            .iter_mut()
            .zip(row.features.iter())
            .for_each(|(g, &x)| *g += x as f64 * residual);
    }

    gradient
}

/// The state of gradient ascent between iterations.
#[derive(Debug, Clone)]
pub struct TrainerState {
    pub weights: Vec<f64>,
    /// The gradient of the most recent iteration
    pub gradient: Option<Vec<f64>>,
    /// The gradient of the iteration before the most recent one
    pub previous_gradient: Option<Vec<f64>>,
    pub iteration: usize,
}

impl TrainerState {
    pub fn new(initial: Model) -> Self {
        Self {
            weights: initial.weights().to_vec(),
            gradient: None,
            previous_gradient: None,
            iteration: 0,
        }
    }

    /// Run one iteration: draw a mini-batch, compute its gradient, and step uphill.
    ///
    /// Returns the L2 norm of the gradient.
    pub fn step<R: Rng>(&mut self, training_set: &TrainingSet, config: &TrainerConfig, rng: &mut R) -> f64 {
        let rows = training_set.rows();
        let batch: Vec<&LabeledRow> = sample(rng, rows.len(), config.batch_size.min(rows.len()))
            .into_iter()
            .map(|idx| &rows[idx])
            .collect();

        let gradient = log_likelihood_gradient(&self.weights, &batch);
        self.weights.add_scaled(&gradient, config.step_size);

        let norm = gradient.l2_norm();
        self.previous_gradient = self.gradient.replace(gradient);
        self.iteration += 1;
        norm
    }

    /// Whether both of the last two gradients are below the tolerance.
    pub fn has_converged(&self, config: &TrainerConfig) -> bool {
        match (&self.previous_gradient, &self.gradient) {
            (Some(previous), Some(current)) => {
                previous.l2_norm() < config.gradient_tolerance
                    && current.l2_norm() < config.gradient_tolerance
            }
            _ => false,
        }
    }

    pub fn is_finished(&self, config: &TrainerConfig) -> bool {
        self.iteration >= config.max_iterations || self.has_converged(config)
    }
}

/// The result of a training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: Model,
    pub iterations: usize,
    /// True if training stopped on the gradient tolerance rather than the iteration budget
    pub converged: bool,
    /// The L2 norm of the last mini-batch gradient
    pub gradient_norm: f64,
}

/// Fit a model to a training set by mini-batch gradient ascent on the log-likelihood.
///
/// The result depends only on the initial model, the training set, and the configuration.
pub fn train(initial: Model, training_set: &TrainingSet, config: &TrainerConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    if training_set.is_empty() {
        return Err(DataError::EmptyTrainingSet.into());
    }

    info!(
        "training on {} rows: step size {}, batch size {}, at most {} iterations",
        training_set.len(),
        config.step_size,
        config.batch_size,
        config.max_iterations
    );

    let mut rng = Pcg64::seed_from_u64(config.seed);
    let mut state = TrainerState::new(initial);
    let mut gradient_norm;

    loop {
        gradient_norm = state.step(training_set, config, &mut rng);

        if config.log_interval > 0 && state.iteration % config.log_interval == 0 {
            debug!(
                "iteration {}: gradient norm {:.6e}",
                state.iteration, gradient_norm
            );
        }

        if state.is_finished(config) {
            break;
        }
    }

    let converged = state.has_converged(config);
    info!(
        "training stopped after {} iterations ({}), gradient norm {:.6e}",
        state.iteration,
        if converged { "converged" } else { "iteration budget reached" },
        gradient_norm
    );

    Ok(TrainingOutcome {
        model: Model::from_weights(state.weights)?,
        iterations: state.iteration,
        converged,
        gradient_norm,
    })
}
