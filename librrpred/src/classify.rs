use log::debug;

use crate::features::{eligible_pair_count, eligible_pairs, PairFeatures, WindowTable, WINDOW_FEATURES};
use crate::structs::prediction::rank;
use crate::structs::{Model, PredictionRow, Profile};
use crate::util::{dot_features, logistic};

/// The probability that a single pair is in contact.
pub fn contact_probability(model: &Model, features: &PairFeatures) -> f64 {
    model.probability(features)
}

/// Score every eligible pair of a profile and return the rows in rank order.
///
/// Rows are sorted by probability, highest first, with ties broken by (i, j) ascending.
pub fn classify(model: &Model, profile: &Profile) -> Vec<PredictionRow> {
    let table = WindowTable::new(profile);
    let weights = model.weights();

    // the pair score splits into a term for the window of i and a term for the window of j
    let (left_weights, right_weights) = weights[1..].split_at(WINDOW_FEATURES);

    let left_scores: Vec<f64> = table
        .windows()
        .iter()
        .map(|w| dot_features(left_weights, w))
        .collect();

    let right_scores: Vec<f64> = table
        .windows()
        .iter()
        .map(|w| dot_features(right_weights, w))
        .collect();

    let mut rows: Vec<PredictionRow> = Vec::with_capacity(eligible_pair_count(profile.length));

    rows.extend(eligible_pairs(profile.length).map(|(i, j)| {
        let s = model.bias() + left_scores[i] + right_scores[j];
        PredictionRow::new(i, j, logistic(s))
    }));

    rank(&mut rows);

    debug!("{}: scored {} pairs", profile.name, rows.len());
    rows
}
