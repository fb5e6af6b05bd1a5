mod train;
pub use train::*;

mod predict;
pub use predict::*;

mod evaluate;
pub use evaluate::*;

mod run;
pub use run::*;

#[cfg(test)]
mod fixtures;

use colored::Colorize;
use librrpred::AccuracyReport;

pub fn print_report(title: &str, report: &AccuracyReport) {
    println!("{}", title.bold().green());
    println!("{report}");
}
