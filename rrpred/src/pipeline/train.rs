use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use librrpred::train::{
    build_training_set, train as fit, NegativeSampling, SamplingConfig, TrainerConfig,
    TrainerConfigBuilder, TrainingOutcome,
};
use librrpred::Model;
use log::{info, warn};
use thiserror::Error;

use crate::cli::CommonArgs;
use crate::extension_traits::PathBufExt;
use crate::io::{load_labeled, pair_with_contacts, DatasetEntry, PSSM_EXTENSION};

#[derive(Error, Debug)]
#[error("model file already exists (use --allow-overwrite to replace it): {path}")]
pub struct ModelExistsError {
    path: String,
}

/// Arguments that control gradient ascent
#[derive(Args, Debug, Clone)]
pub struct TrainerArgs {
    /// The factor applied to the gradient at each update
    #[arg(long = "step-size", default_value_t = 0.001, value_name = "F")]
    pub step_size: f64,

    /// The number of training rows in each mini-batch
    #[arg(long = "batch-size", default_value_t = 5usize, value_name = "N")]
    pub batch_size: usize,

    /// Stop training after this many iterations
    #[arg(long = "max-iterations", default_value_t = 10_000usize, value_name = "N")]
    pub max_iterations: usize,

    /// Stop training once two consecutive gradients have an L2 norm below this
    #[arg(long = "tolerance", default_value_t = 1e-6, value_name = "F")]
    pub gradient_tolerance: f64,
}

impl Default for TrainerArgs {
    fn default() -> Self {
        let config = TrainerConfig::default();
        Self {
            step_size: config.step_size,
            batch_size: config.batch_size,
            max_iterations: config.max_iterations,
            gradient_tolerance: config.gradient_tolerance,
        }
    }
}

/// Arguments that control how training rows are drawn
#[derive(Args, Debug, Clone)]
pub struct SamplingArgs {
    /// Sample this many non-contacts per contact instead of one per eligible pair
    #[arg(long = "negative-ratio", value_name = "F")]
    pub negatives_per_positive: Option<f64>,

    /// The seed for every random choice made during training
    #[arg(long = "seed", default_value_t = 42u64, value_name = "N")]
    pub seed: u64,
}

impl Default for SamplingArgs {
    fn default() -> Self {
        Self {
            negatives_per_positive: None,
            seed: SamplingConfig::default().seed,
        }
    }
}

impl SamplingArgs {
    pub fn config(&self) -> SamplingConfig {
        SamplingConfig {
            negatives: match self.negatives_per_positive {
                Some(ratio) => NegativeSampling::PerPositive(ratio),
                None => NegativeSampling::MatchEligible,
            },
            seed: self.seed,
        }
    }
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// The directory of training profiles
    #[arg(value_name = "PSSM_DIR")]
    pub pssm_dir: PathBuf,

    /// The directory of true contact files, one per profile
    #[arg(value_name = "RR_DIR")]
    pub rr_dir: PathBuf,

    /// Where to write the trained model
    #[arg(short = 'm', long = "model", default_value = "model.json")]
    pub model_path: PathBuf,

    /// Arguments that control gradient ascent
    #[command(flatten)]
    pub trainer_args: TrainerArgs,

    /// Arguments that control how training rows are drawn
    #[command(flatten)]
    pub sampling_args: SamplingArgs,

    /// Arguments that are common across all rrpred subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

/// Build a trainer configuration, seeding mini-batch sampling with the sampling seed.
pub fn trainer_config(trainer_args: &TrainerArgs, seed: u64) -> anyhow::Result<TrainerConfig> {
    TrainerConfigBuilder::default()
        .step_size(trainer_args.step_size)
        .batch_size(trainer_args.batch_size)
        .max_iterations(trainer_args.max_iterations)
        .gradient_tolerance(trainer_args.gradient_tolerance)
        .seed(seed)
        .build()
        .context("failed to build trainer configuration")
}

/// Train a model on the labeled sequences and write it to `model_path`.
pub fn train_entries(
    entries: &[DatasetEntry],
    model_path: &Path,
    trainer_args: &TrainerArgs,
    sampling_args: &SamplingArgs,
    allow_overwrite: bool,
) -> anyhow::Result<TrainingOutcome> {
    if model_path.exists() && !allow_overwrite {
        return Err(ModelExistsError {
            path: model_path.to_string_lossy().to_string(),
        }
        .into());
    }

    let config = trainer_config(trainer_args, sampling_args.seed)?;
    let labeled = load_labeled(entries)?;

    let training_set = build_training_set(
        labeled.iter().map(|(profile, contacts)| (profile, contacts)),
        &sampling_args.config(),
    )
    .context("failed to build training set")?;

    let outcome = fit(Model::ones(), &training_set, &config)?;
    if !outcome.converged {
        warn!(
            "training did not converge within {} iterations",
            outcome.iterations
        );
    }

    // the model file is only touched once training has succeeded
    let writer = model_path.to_path_buf().open(allow_overwrite)?;
    outcome
        .model
        .to_writer(writer)
        .context(format!("failed to write model: {}", model_path.to_string_lossy()))?;

    info!("model written to {}", model_path.to_string_lossy());
    Ok(outcome)
}

pub fn train(args: &TrainArgs) -> anyhow::Result<()> {
    let entries = pair_with_contacts(&args.pssm_dir, PSSM_EXTENSION, &args.rr_dir)?;

    train_entries(
        &entries,
        &args.model_path,
        &args.trainer_args,
        &args.sampling_args,
        args.common_args.allow_overwrite,
    )?;

    Ok(())
}
