use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

use crate::cli::CommonArgs;
use crate::io::{pair_with_contacts, split_entries, PSSM_EXTENSION};
use crate::pipeline::{print_report, test_entries, train_entries, SamplingArgs, TrainerArgs};

#[derive(Error, Debug)]
#[error("the training fraction must leave at least one sequence in each part: {fraction} of {count} sequences")]
pub struct InvalidSplitError {
    fraction: f64,
    count: usize,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// The directory of profiles
    #[arg(value_name = "PSSM_DIR")]
    pub pssm_dir: PathBuf,

    /// The directory of true contact files, one per profile
    #[arg(value_name = "RR_DIR")]
    pub rr_dir: PathBuf,

    /// The share of sequences used for training; the rest are used for testing
    #[arg(long = "train-fraction", default_value_t = 0.75, value_name = "F")]
    pub train_fraction: f64,

    /// Where to write the trained model
    #[arg(short = 'm', long = "model", default_value = "model.json")]
    pub model_path: PathBuf,

    /// Where to write one prediction file per test profile
    #[arg(short = 'o', long = "output", default_value = "testing-rr-output/")]
    pub output_dir: PathBuf,

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

pub fn run(args: &RunArgs) -> anyhow::Result<()> {
    let entries = pair_with_contacts(&args.pssm_dir, PSSM_EXTENSION, &args.rr_dir)?;
    let count = entries.len();

    let (train_part, test_part) = split_entries(entries, args.train_fraction, args.sampling_args.seed);
    if train_part.is_empty() || test_part.is_empty() {
        return Err(InvalidSplitError {
            fraction: args.train_fraction,
            count,
        }
        .into());
    }

    let outcome = train_entries(
        &train_part,
        &args.model_path,
        &args.trainer_args,
        &args.sampling_args,
        args.common_args.allow_overwrite,
    )?;

    let report = test_entries(&test_part, &outcome.model, &args.output_dir)?;
    print_report("Test results", &report);
    Ok(())
}
