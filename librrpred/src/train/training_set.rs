use log::{debug, info};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::errors::DataError;
use crate::features::{eligible_pair_count, eligible_pairs, PairFeatures, WindowTable};
use crate::structs::{ContactSet, Profile};

/// The class of a training row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    NonContact,
    Contact,
}

impl Label {
    pub fn value(self) -> f64 {
        match self {
            Label::NonContact => 0.0,
            Label::Contact => 1.0,
        }
    }
}

/// One row of the training matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub features: PairFeatures,
    pub label: Label,
}

/// How many non-contact pairs are sampled from each sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NegativeSampling {
    /// As many non-contacts as there are eligible pairs in the sequence.
    ///
    /// Since non-contacts never outnumber eligible pairs, this keeps every
    /// non-contact, so sequences with sparse contacts are dominated by negatives.
    MatchEligible,
    /// This many non-contacts for each contact, rounded up.
    PerPositive(f64),
}

impl NegativeSampling {
    fn count(&self, eligible: usize, positives: usize, available: usize) -> usize {
        let wanted = match self {
            NegativeSampling::MatchEligible => eligible,
            // negative or NaN ratios saturate to zero
            NegativeSampling::PerPositive(ratio) => (ratio * positives as f64).ceil() as usize,
        };
        wanted.min(available)
    }
}

#[derive(Debug, Clone)]
pub struct SamplingConfig {
    pub negatives: NegativeSampling,
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            negatives: NegativeSampling::MatchEligible,
            seed: 42,
        }
    }
}

/// What was drawn from one sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceSummary {
    pub eligible: usize,
    pub positives: usize,
    pub negatives: usize,
}

/// The labeled rows drawn from every training sequence.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    rows: Vec<LabeledRow>,
    summaries: Vec<SequenceSummary>,
}

impl TrainingSet {
    pub fn from_rows(rows: Vec<LabeledRow>) -> Self {
        Self {
            rows,
            summaries: vec![],
        }
    }

    pub fn rows(&self) -> &[LabeledRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.label == Label::Contact)
            .count()
    }

    /// What was drawn from each sequence, in the order the sequences were added.
    pub fn summaries(&self) -> &[SequenceSummary] {
        &self.summaries
    }

    pub fn negatives(&self) -> usize {
        self.rows.len() - self.positives()
    }

    /// Append the rows drawn from one sequence.
    pub fn push_sequence(&mut self, rows: Vec<LabeledRow>, summary: SequenceSummary) {
        self.rows.extend(rows);
        self.summaries.push(summary);
    }
}

/// Draw the labeled rows for one sequence: every contact, then a random sample of non-contacts.
pub fn labeled_rows<R: Rng>(
    profile: &Profile,
    contacts: &ContactSet,
    negatives: &NegativeSampling,
    rng: &mut R,
) -> Result<(Vec<LabeledRow>, SequenceSummary), DataError> {
    contacts.check_against(profile)?;

    let (positive_pairs, negative_pairs): (Vec<_>, Vec<_>) =
        eligible_pairs(profile.length).partition(|&(i, j)| contacts.contains(i, j));

    let eligible = eligible_pair_count(profile.length);
    let num_negatives = negatives.count(eligible, positive_pairs.len(), negative_pairs.len());

    let mut picked = sample(rng, negative_pairs.len(), num_negatives).into_vec();
    picked.sort_unstable();

    let table = WindowTable::new(profile);
    let mut rows = Vec::with_capacity(positive_pairs.len() + picked.len());

    for &(i, j) in &positive_pairs {
        rows.push(LabeledRow {
            features: table.pair(i, j)?,
            label: Label::Contact,
        });
    }

    for idx in picked {
        let (i, j) = negative_pairs[idx];
        rows.push(LabeledRow {
            features: table.pair(i, j)?,
            label: Label::NonContact,
        });
    }

    let summary = SequenceSummary {
        eligible,
        positives: positive_pairs.len(),
        negatives: num_negatives,
    };

    debug!(
        "{}: {} eligible pairs, {} contacts, {} sampled non-contacts",
        profile.name, summary.eligible, summary.positives, summary.negatives
    );

    Ok((rows, summary))
}

/// Assemble the training matrix from (profile, contact set) pairs, in the order given.
pub fn build_training_set<'a, I>(examples: I, config: &SamplingConfig) -> Result<TrainingSet, DataError>
where
    I: IntoIterator<Item = (&'a Profile, &'a ContactSet)>,
{
    let mut rng = Pcg64::seed_from_u64(config.seed);
    let mut training_set = TrainingSet::default();

    for (profile, contacts) in examples {
        let (rows, summary) = labeled_rows(profile, contacts, &config.negatives, &mut rng)?;
        training_set.push_sequence(rows, summary);
    }

    let eligible: usize = training_set.summaries().iter().map(|s| s.eligible).sum();
    info!(
        "built {} training rows ({} contacts, {} sampled non-contacts) from {} sequences with {} eligible pairs",
        training_set.len(),
        training_set.positives(),
        training_set.negatives(),
        training_set.summaries().len(),
        eligible
    );

    Ok(training_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pair_features;
    use crate::test_fixtures::{pssm_text, rr_text};

    use assert2::check;

    const RESIDUES: &str = "MKVLATGHWYMKVLAT";

    fn example(contacts: &[(usize, usize, f64)]) -> anyhow::Result<(Profile, ContactSet)> {
        Ok((
            Profile::from_pssm_str("test", &pssm_text(RESIDUES))?,
            ContactSet::from_rr_str(&rr_text(RESIDUES, contacts))?,
        ))
    }

    #[test]
    fn test_match_eligible_keeps_every_non_contact() -> anyhow::Result<()> {
        let (profile, contacts) = example(&[(0, 5, 6.0), (2, 12, 7.0), (3, 4, 3.8)])?;
        let mut rng = Pcg64::seed_from_u64(0);

        let (rows, summary) =
            labeled_rows(&profile, &contacts, &NegativeSampling::MatchEligible, &mut rng)?;

        // (3, 4) is too close to be eligible
        check!(summary.eligible == 66);
        check!(summary.positives == 2);
        check!(summary.negatives == 64);
        check!(rows.len() == 66);

        let expected = pair_features(&profile, 0, 5)?;
        check!(rows[0].label == Label::Contact);
        check!(rows[0].features == expected);
        check!(rows[2..].iter().all(|row| row.label == Label::NonContact));
        Ok(())
    }

    #[test]
    fn test_per_positive_ratio() -> anyhow::Result<()> {
        let (profile, contacts) = example(&[(0, 5, 6.0), (2, 12, 7.0)])?;
        let mut rng = Pcg64::seed_from_u64(0);

        let (rows, summary) = labeled_rows(
            &profile,
            &contacts,
            &NegativeSampling::PerPositive(1.5),
            &mut rng,
        )?;

        check!(summary.negatives == 3);
        check!(rows.len() == 5);
        check!(rows.iter().filter(|r| r.label == Label::Contact).count() == 2);
        Ok(())
    }

    #[test]
    fn test_sampled_negatives_are_not_contacts() -> anyhow::Result<()> {
        let (profile, contacts) = example(&[(0, 5, 6.0), (1, 9, 6.0), (4, 15, 5.5)])?;
        let table = WindowTable::new(&profile);
        let mut rng = Pcg64::seed_from_u64(7);

        let (rows, _) = labeled_rows(
            &profile,
            &contacts,
            &NegativeSampling::PerPositive(4.0),
            &mut rng,
        )?;

        let contact_features: Vec<PairFeatures> = contacts
            .contacts
            .keys()
            .map(|&(i, j)| table.pair(i, j))
            .collect::<Result<_, _>>()?;

        for row in rows.iter().filter(|r| r.label == Label::NonContact) {
            check!(!contact_features.contains(&row.features));
        }
        Ok(())
    }

    #[test]
    fn test_sampling_is_seeded() -> anyhow::Result<()> {
        let (profile, contacts) = example(&[(0, 5, 6.0), (2, 12, 7.0)])?;
        let config = SamplingConfig {
            negatives: NegativeSampling::PerPositive(2.0),
            seed: 11,
        };

        let a = build_training_set([(&profile, &contacts)], &config)?;
        let b = build_training_set([(&profile, &contacts)], &config)?;
        check!(a.rows() == b.rows());
        check!(a.len() == 6);
        check!(a.positives() == 2);
        Ok(())
    }

    #[test]
    fn test_summaries_follow_sequence_order() -> anyhow::Result<()> {
        let first = example(&[(0, 5, 6.0), (2, 12, 7.0)])?;
        let second = example(&[(1, 9, 6.0)])?;
        let config = SamplingConfig {
            negatives: NegativeSampling::PerPositive(2.0),
            seed: 3,
        };

        let training_set = build_training_set([(&first.0, &first.1), (&second.0, &second.1)], &config)?;

        let summaries = training_set.summaries();
        check!(summaries.len() == 2);
        check!(summaries[0] == SequenceSummary { eligible: 66, positives: 2, negatives: 4 });
        check!(summaries[1] == SequenceSummary { eligible: 66, positives: 1, negatives: 2 });

        check!(training_set.positives() == 3);
        check!(training_set.negatives() == 6);
        check!(training_set.len() == 9);
        Ok(())
    }

    #[test]
    fn test_out_of_bounds_contact_is_a_data_error() -> anyhow::Result<()> {
        let (profile, contacts) = example(&[(0, 16, 6.0)])?;

        let result = build_training_set([(&profile, &contacts)], &SamplingConfig::default());
        check!(
            result.unwrap_err()
                == DataError::ContactOutOfBounds {
                    i: 0,
                    j: 16,
                    length: 16
                }
        );
        Ok(())
    }

    #[test]
    fn test_short_sequences_contribute_nothing() -> anyhow::Result<()> {
        let profile = Profile::from_pssm_str("short", &pssm_text("MKVLA"))?;
        let contacts = ContactSet::from_rr_str(&rr_text("MKVLA", &[]))?;

        let training_set = build_training_set([(&profile, &contacts)], &SamplingConfig::default())?;
        check!(training_set.is_empty());
        Ok(())
    }
}
