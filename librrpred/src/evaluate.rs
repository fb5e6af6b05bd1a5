use std::fmt::{Display, Formatter};

use log::debug;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::structs::prediction::rank;
use crate::structs::{ContactSet, PredictionRow};

/// A top-K cutoff expressed as a fraction of the sequence length L.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
pub enum Horizon {
    Tenth,
    Fifth,
    Half,
}

impl Horizon {
    pub fn divisor(self) -> usize {
        match self {
            Horizon::Tenth => 10,
            Horizon::Fifth => 5,
            Horizon::Half => 2,
        }
    }

    /// K = ⌊L / divisor⌋
    pub fn cutoff(self, length: usize) -> usize {
        length / self.divisor()
    }

    pub fn label(self) -> &'static str {
        match self {
            Horizon::Tenth => "L/10",
            Horizon::Fifth => "L/5",
            Horizon::Half => "L/2",
        }
    }
}

/// Counts gathered over the top K ranks of one sequence's predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizonTally {
    /// K
    pub cutoff: usize,
    /// The number of ranks that were available, at most K
    pub ranked: usize,
    /// Ranks whose pair is a true contact
    pub true_contacts: usize,
    /// True contacts that the model also called a contact (probability > 0.5)
    pub agreed: usize,
}

impl HorizonTally {
    /// The fraction of true contacts in the top K that the model called a contact.
    ///
    /// Undefined when no true contact was ranked within the top K.
    pub fn accuracy(&self) -> Option<f64> {
        match self.true_contacts {
            0 => None,
            n => Some(self.agreed as f64 / n as f64),
        }
    }

    /// The fraction of the top K ranks that are true contacts. Undefined when K is 0.
    pub fn precision(&self) -> Option<f64> {
        match self.cutoff {
            0 => None,
            k => Some(self.true_contacts as f64 / k as f64),
        }
    }
}

/// The per-horizon tallies of one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEvaluation {
    /// L, the length of the true sequence
    pub length: usize,
    pub tallies: [HorizonTally; Horizon::COUNT],
}

impl SequenceEvaluation {
    pub fn tally(&self, horizon: Horizon) -> &HorizonTally {
        &self.tallies[horizon as usize]
    }
}

/// Compare one sequence's predictions to its true contacts.
///
/// The predictions are re-ranked here, so they may be given in any order.
pub fn evaluate_sequence(predictions: &[PredictionRow], truth: &ContactSet) -> SequenceEvaluation {
    let length = truth.sequence.len();

    let mut ranked = predictions.to_vec();
    rank(&mut ranked);

    let mut tallies = [HorizonTally::default(); Horizon::COUNT];
    Horizon::iter().for_each(|h| tallies[h as usize].cutoff = h.cutoff(length));

    let walk = Horizon::Half.cutoff(length).min(ranked.len());

    for (position, row) in ranked.iter().take(walk).enumerate() {
        let is_contact = truth.contains(row.i, row.j);

        // top K means ranks 0..K; an inclusive `position <= K` bound would count K + 1 ranks
        for tally in tallies.iter_mut().filter(|t| position < t.cutoff) {
            tally.ranked += 1;
            if is_contact {
                tally.true_contacts += 1;
                if row.is_predicted_contact() {
                    tally.agreed += 1;
                }
            }
        }
    }

    SequenceEvaluation { length, tallies }
}

/// The mean metrics of one horizon over a collection of sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizonSummary {
    /// The mean accuracy over sequences where it is defined
    pub accuracy: Option<f64>,
    /// The number of sequences with a defined accuracy
    pub accuracy_sequences: usize,
    /// The mean top-K precision over sequences where K > 0
    pub precision: Option<f64>,
    /// The number of sequences with K > 0
    pub precision_sequences: usize,
}

fn mean(values: impl Iterator<Item = f64>) -> (Option<f64>, usize) {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    match count {
        0 => (None, 0),
        n => (Some(sum / n as f64), n),
    }
}

/// The top-K metrics of a collection of sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    pub sequences: usize,
    pub summaries: [HorizonSummary; Horizon::COUNT],
}

impl AccuracyReport {
    pub fn from_evaluations(evaluations: &[SequenceEvaluation]) -> Self {
        let mut summaries = [HorizonSummary::default(); Horizon::COUNT];

        for horizon in Horizon::iter() {
            let tallies = || evaluations.iter().map(move |e| e.tally(horizon));

            let (accuracy, accuracy_sequences) = mean(tallies().filter_map(|t| t.accuracy()));
            let (precision, precision_sequences) = mean(tallies().filter_map(|t| t.precision()));

            summaries[horizon as usize] = HorizonSummary {
                accuracy,
                accuracy_sequences,
                precision,
                precision_sequences,
            };
        }

        Self {
            sequences: evaluations.len(),
            summaries,
        }
    }

    pub fn summary(&self, horizon: Horizon) -> &HorizonSummary {
        &self.summaries[horizon as usize]
    }
}

/// Evaluate a collection of (predictions, true contacts) pairs, one per sequence.
pub fn evaluate<'a, I>(sequences: I) -> AccuracyReport
where
    I: IntoIterator<Item = (&'a [PredictionRow], &'a ContactSet)>,
{
    let evaluations: Vec<SequenceEvaluation> = sequences
        .into_iter()
        .map(|(predictions, truth)| evaluate_sequence(predictions, truth))
        .collect();

    debug!("evaluated {} sequences", evaluations.len());
    AccuracyReport::from_evaluations(&evaluations)
}

fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "undefined".to_string(),
    }
}

impl Display for AccuracyReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accuracy")?;
        writeln!(f, "--------")?;
        for horizon in Horizon::iter() {
            let summary = self.summary(horizon);
            writeln!(
                f,
                "{:<5} {:>9}  ({} of {} sequences)",
                format!("{}:", horizon.label()),
                format_metric(summary.accuracy),
                summary.accuracy_sequences,
                self.sequences
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Precision")?;
        writeln!(f, "---------")?;
        for horizon in Horizon::iter() {
            let summary = self.summary(horizon);
            writeln!(
                f,
                "{:<5} {:>9}  ({} of {} sequences)",
                format!("{}:", horizon.label()),
                format_metric(summary.precision),
                summary.precision_sequences,
                self.sequences
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert2::check;

    /// A truth set over a sequence of the given length with the listed contacts.
    fn truth(length: usize, contacts: &[(usize, usize)]) -> ContactSet {
        ContactSet {
            sequence: "A".repeat(length),
            contacts: contacts.iter().map(|&pair| (pair, 5.0)).collect(),
        }
    }

    #[test]
    fn test_cutoffs() {
        check!(Horizon::Tenth.cutoff(59) == 5);
        check!(Horizon::Fifth.cutoff(59) == 11);
        check!(Horizon::Half.cutoff(59) == 29);
        check!(Horizon::Tenth.cutoff(9) == 0);
    }

    #[test]
    fn test_tallies_per_horizon() {
        // L = 20: K = 2, 4, 10
        let truth = truth(20, &[(0, 10), (1, 11), (2, 12), (3, 19)]);

        let predictions = vec![
            PredictionRow::new(0, 10, 0.9),
            PredictionRow::new(5, 15, 0.8),
            PredictionRow::new(1, 11, 0.4),
            PredictionRow::new(2, 12, 0.7),
            PredictionRow::new(4, 12, 0.6),
            PredictionRow::new(3, 19, 0.3),
            PredictionRow::new(0, 19, 0.2),
        ];

        let evaluation = evaluate_sequence(&predictions, &truth);

        check!(
            *evaluation.tally(Horizon::Tenth)
                == HorizonTally {
                    cutoff: 2,
                    ranked: 2,
                    true_contacts: 1,
                    agreed: 1
                }
        );
        check!(
            *evaluation.tally(Horizon::Fifth)
                == HorizonTally {
                    cutoff: 4,
                    ranked: 4,
                    true_contacts: 2,
                    agreed: 2
                }
        );
        check!(
            *evaluation.tally(Horizon::Half)
                == HorizonTally {
                    cutoff: 10,
                    ranked: 7,
                    true_contacts: 4,
                    agreed: 2
                }
        );

        check!(evaluation.tally(Horizon::Fifth).accuracy() == Some(1.0));
        check!(evaluation.tally(Horizon::Half).accuracy() == Some(0.5));
        check!(evaluation.tally(Horizon::Half).precision() == Some(0.4));
    }

    #[test]
    fn test_rank_k_is_outside_top_k() {
        // L = 20: L/10 = 2, so only ranks 0 and 1 count; the contact sits at rank 2
        let predictions = vec![
            PredictionRow::new(0, 10, 0.9),
            PredictionRow::new(1, 11, 0.8),
            PredictionRow::new(2, 12, 0.7),
        ];
        let evaluation = evaluate_sequence(&predictions, &truth(20, &[(2, 12)]));

        let tenth = evaluation.tally(Horizon::Tenth);
        check!(tenth.ranked == 2);
        check!(tenth.true_contacts == 0);
        check!(evaluation.tally(Horizon::Fifth).true_contacts == 1);
    }

    #[test]
    fn test_predictions_are_reranked() {
        let truth = truth(20, &[(0, 10)]);
        let shuffled = vec![
            PredictionRow::new(5, 15, 0.1),
            PredictionRow::new(6, 16, 0.2),
            PredictionRow::new(0, 10, 0.9),
        ];

        let evaluation = evaluate_sequence(&shuffled, &truth);
        check!(evaluation.tally(Horizon::Tenth).true_contacts == 1);
        check!(evaluation.tally(Horizon::Tenth).accuracy() == Some(1.0));
    }

    #[test]
    fn test_no_true_contacts_is_undefined() {
        let truth = truth(20, &[(0, 10)]);
        let predictions = vec![
            PredictionRow::new(5, 15, 0.9),
            PredictionRow::new(6, 16, 0.8),
            PredictionRow::new(0, 10, 0.7),
        ];

        let evaluation = evaluate_sequence(&predictions, &truth);
        check!(evaluation.tally(Horizon::Tenth).accuracy() == None);
        check!(evaluation.tally(Horizon::Tenth).precision() == Some(0.0));
        check!(evaluation.tally(Horizon::Fifth).accuracy() == Some(1.0));
    }

    #[test]
    fn test_undefined_sequences_are_skipped_in_the_mean() {
        let first_truth = truth(20, &[(0, 10)]);
        let first = vec![PredictionRow::new(0, 10, 0.9), PredictionRow::new(1, 11, 0.8)];

        let second_truth = truth(20, &[(0, 10)]);
        let second = vec![PredictionRow::new(1, 11, 0.9), PredictionRow::new(2, 12, 0.8)];

        let third_truth = truth(20, &[(0, 10)]);
        let third = vec![PredictionRow::new(0, 10, 0.4), PredictionRow::new(2, 12, 0.3)];

        let report = evaluate([
            (first.as_slice(), &first_truth),
            (second.as_slice(), &second_truth),
            (third.as_slice(), &third_truth),
        ]);

        check!(report.sequences == 3);

        let tenth = report.summary(Horizon::Tenth);
        check!(tenth.accuracy == Some(0.5));
        check!(tenth.accuracy_sequences == 2);
        check!(tenth.precision == Some(1.0 / 3.0));
        check!(tenth.precision_sequences == 3);
    }

    #[test]
    fn test_short_sequences_have_no_horizons() {
        let truth = truth(1, &[]);
        let report = evaluate([(&[][..], &truth)]);

        for horizon in Horizon::iter() {
            check!(report.summary(horizon).accuracy == None);
            check!(report.summary(horizon).precision == None);
        }
        check!(report.to_string().contains("L/10: undefined"));
    }

    #[test]
    fn test_report_lines() {
        let truth = truth(20, &[(0, 10)]);
        let predictions = vec![PredictionRow::new(0, 10, 0.9)];
        let report = evaluate([(predictions.as_slice(), &truth)]);

        let text = report.to_string();
        check!(text.starts_with("Accuracy\n--------\n"));
        check!(text.contains("L/10:    1.0000  (1 of 1 sequences)"));
        check!(text.contains("L/2:     1.0000  (1 of 1 sequences)"));
    }
}
