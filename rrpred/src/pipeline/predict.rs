use std::path::{Path, PathBuf};

use clap::Args;
use librrpred::output::PredictionFile;
use librrpred::{classify as classify_profile, evaluate, AccuracyReport, Model, Profile};
use log::info;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::cli::CommonArgs;
use crate::io::{input_files, load_labeled, load_profiles, pair_with_contacts, DatasetEntry};
use crate::io::{PSSM_EXTENSION, RR_EXTENSION};
use crate::pipeline::print_report;
use crate::util::prepare_output_dir;

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// The directory of profiles to classify
    #[arg(value_name = "PSSM_DIR")]
    pub pssm_dir: PathBuf,

    /// The trained model
    #[arg(short = 'm', long = "model", default_value = "model.json")]
    pub model_path: PathBuf,

    /// Where to write one prediction file per profile
    #[arg(short = 'o', long = "output", default_value = "classified-rr-output/")]
    pub output_dir: PathBuf,

    /// Arguments that are common across all rrpred subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Debug, Args)]
pub struct TestArgs {
    /// The directory of profiles to classify
    #[arg(value_name = "PSSM_DIR")]
    pub pssm_dir: PathBuf,

    /// The directory of true contact files, one per profile
    #[arg(value_name = "RR_DIR")]
    pub rr_dir: PathBuf,

    /// The trained model
    #[arg(short = 'm', long = "model", default_value = "model.json")]
    pub model_path: PathBuf,

    /// Where to write one prediction file per profile
    #[arg(short = 'o', long = "output", default_value = "testing-rr-output/")]
    pub output_dir: PathBuf,

    /// Arguments that are common across all rrpred subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

/// Classify each profile and write its predictions to `<output_dir>/<name>.rr`.
pub fn predict_profiles(
    model: &Model,
    profiles: &[Profile],
    output_dir: &Path,
) -> anyhow::Result<Vec<PredictionFile>> {
    prepare_output_dir(output_dir, RR_EXTENSION)?;

    let predictions: Vec<PredictionFile> = profiles
        .par_iter()
        .map(|profile| {
            let prediction = PredictionFile::new(profile.sequence(), classify_profile(model, profile));
            prediction.to_file(output_dir.join(format!("{}.{RR_EXTENSION}", profile.name)))?;
            Ok(prediction)
        })
        .collect::<anyhow::Result<_>>()?;

    info!(
        "wrote {} prediction files to {}",
        predictions.len(),
        output_dir.to_string_lossy()
    );
    Ok(predictions)
}

pub fn classify(args: &ClassifyArgs) -> anyhow::Result<()> {
    let model = Model::load(&args.model_path)?;
    let profiles = load_profiles(&input_files(&args.pssm_dir, PSSM_EXTENSION)?)?;

    predict_profiles(&model, &profiles, &args.output_dir)?;
    Ok(())
}

/// Classify the labeled sequences, write the predictions, and score them.
pub fn test_entries(
    entries: &[DatasetEntry],
    model: &Model,
    output_dir: &Path,
) -> anyhow::Result<AccuracyReport> {
    let (profiles, contacts): (Vec<_>, Vec<_>) = load_labeled(entries)?.into_iter().unzip();
    let predictions = predict_profiles(model, &profiles, output_dir)?;

    Ok(evaluate(
        predictions
            .iter()
            .zip(contacts.iter())
            .map(|(prediction, truth)| (prediction.rows.as_slice(), truth)),
    ))
}

pub fn test(args: &TestArgs) -> anyhow::Result<()> {
    let model = Model::load(&args.model_path)?;
    let entries = pair_with_contacts(&args.pssm_dir, PSSM_EXTENSION, &args.rr_dir)?;

    let report = test_entries(&entries, &model, &args.output_dir)?;
    print_report("Test results", &report);
    Ok(())
}
