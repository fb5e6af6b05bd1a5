use crate::pipeline::{ClassifyArgs, EvaluateArgs, RunArgs, TestArgs, TrainArgs};
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The number of threads to use
    #[arg(
        short = 't',
        long = "threads",
        default_value_t = 8usize,
        value_name = "n"
    )]
    pub num_threads: usize,

    /// Allow rrpred to overwrite an existing model file
    #[arg(short = 'q', long = "allow-overwrite", default_value_t = false)]
    pub allow_overwrite: bool,

    /// Print more progress information (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            num_threads: 8,
            allow_overwrite: false,
            verbose: 0,
        }
    }
}

#[derive(Subcommand)]
pub enum SubCommands {
    #[command(about = "Train a contact model from PSSM profiles and their true contacts")]
    Train(TrainArgs),
    #[command(about = "Predict the contacts of every PSSM profile in a directory")]
    Classify(ClassifyArgs),
    #[command(about = "Predict contacts and score them against the true contacts")]
    Test(TestArgs),
    #[command(about = "Score existing prediction files against the true contacts")]
    Evaluate(EvaluateArgs),
    #[command(about = "Split a labeled dataset, then train on one part and test on the other")]
    Run(RunArgs),
}

#[derive(Parser)]
#[command(name = "rrpred")]
#[command(
    about = "Predict residue-residue contacts from position-specific scoring matrices with logistic regression"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
}

impl SubCommands {
    pub fn common_args(&self) -> &CommonArgs {
        match self {
            SubCommands::Train(args) => &args.common_args,
            SubCommands::Classify(args) => &args.common_args,
            SubCommands::Test(args) => &args.common_args,
            SubCommands::Evaluate(args) => &args.common_args,
            SubCommands::Run(args) => &args.common_args,
        }
    }
}
