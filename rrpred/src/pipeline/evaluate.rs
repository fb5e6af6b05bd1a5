use std::path::PathBuf;

use clap::Args;
use librrpred::output::PredictionFile;
use librrpred::{evaluate as evaluate_predictions, AccuracyReport, ContactSet};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::cli::CommonArgs;
use crate::io::{pair_with_contacts, RR_EXTENSION};
use crate::pipeline::print_report;

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// The directory of prediction files
    #[arg(value_name = "PRED_DIR")]
    pub predictions_dir: PathBuf,

    /// The directory of true contact files, one per prediction file
    #[arg(value_name = "RR_DIR")]
    pub rr_dir: PathBuf,

    /// Arguments that are common across all rrpred subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

pub fn evaluate_dirs(args: &EvaluateArgs) -> anyhow::Result<AccuracyReport> {
    let entries = pair_with_contacts(&args.predictions_dir, RR_EXTENSION, &args.rr_dir)?;

    let pairs: Vec<(PredictionFile, ContactSet)> = entries
        .par_iter()
        .map(|entry| {
            Ok((
                PredictionFile::from_rr_file(&entry.input_path)?,
                ContactSet::from_rr_file(&entry.rr_path)?,
            ))
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(evaluate_predictions(
        pairs
            .iter()
            .map(|(prediction, truth)| (prediction.rows.as_slice(), truth)),
    ))
}

pub fn evaluate(args: &EvaluateArgs) -> anyhow::Result<()> {
    let report = evaluate_dirs(args)?;
    print_report("Evaluation results", &report);
    Ok(())
}
