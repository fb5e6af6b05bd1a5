use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// The lower distance bound written on every prediction line.
pub const PREDICTION_LOWER_BOUND: f64 = 0.0;

/// The upper distance bound, in angstroms, written on every prediction line.
pub const PREDICTION_UPPER_BOUND: f64 = 8.0;

/// A predicted contact between residues i and j (0-based, i < j).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRow {
    pub i: usize,
    pub j: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub probability: f64,
}

impl PredictionRow {
    pub fn new(i: usize, j: usize, probability: f64) -> Self {
        Self {
            i,
            j,
            lower_bound: PREDICTION_LOWER_BOUND,
            upper_bound: PREDICTION_UPPER_BOUND,
            probability,
        }
    }

    /// Whether the model itself calls this pair a contact.
    pub fn is_predicted_contact(&self) -> bool {
        self.probability > 0.5
    }

    /// Orders rows by probability, highest first, breaking ties by (i, j) ascending.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .probability
            .total_cmp(&self.probability)
            .then(self.i.cmp(&other.i))
            .then(self.j.cmp(&other.j))
    }
}

/// Sort prediction rows into rank order.
pub fn rank(rows: &mut [PredictionRow]) {
    rows.sort_by(PredictionRow::rank_cmp);
}

impl Display for PredictionRow {
    /// Writes the RR line for this row, with 1-based indices.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.i + 1,
            self.j + 1,
            self.lower_bound,
            self.upper_bound,
            self.probability
        )
    }
}
