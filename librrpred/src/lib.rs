pub mod alphabet;
pub mod classify;
pub mod errors;
pub mod evaluate;
pub mod features;
pub mod output;
pub mod structs;
pub mod train;
pub mod util;

mod tokens;

#[cfg(test)]
mod test_fixtures;

pub use classify::{classify, contact_probability};
pub use errors::{DataError, ParseError};
pub use evaluate::{evaluate, evaluate_sequence, AccuracyReport, Horizon};
pub use features::{pair_features, window, WindowTable};
pub use structs::{ContactSet, Model, PredictionRow, Profile};
pub use train::{build_training_set, train, TrainerConfig, TrainingSet};
