#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

mod cli;
mod extension_traits;
mod io;
mod pipeline;
mod util;

use cli::{Cli, SubCommands};
use pipeline::{classify, evaluate, run, test, train};
use util::{init_logging, set_threads};

use clap::Parser;

fn main() -> anyhow::Result<()> {
    color_backtrace::install();

    let cli = Cli::parse();

    let common_args = cli.command.common_args();
    init_logging(common_args.verbose);
    set_threads(common_args.num_threads)?;

    match &cli.command {
        SubCommands::Train(args) => {
            train(args)?;
        }
        SubCommands::Classify(args) => {
            classify(args)?;
        }
        SubCommands::Test(args) => {
            test(args)?;
        }
        SubCommands::Evaluate(args) => {
            evaluate(args)?;
        }
        SubCommands::Run(args) => {
            run(args)?;
        }
    }
    Ok(())
}
