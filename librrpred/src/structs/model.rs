use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::DataError;
use crate::features::{PairFeatures, PAIR_FEATURES};
use crate::util::{dot_features, logistic};

/// A logistic regression model over pair features.
///
/// Index 0 holds the bias; indices 1..=200 weight the entries of a pair feature vector in order.
/// Serialized as a bare JSON array of numbers. Deserializing checks the length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", try_from = "Vec<f64>")]
pub struct Model {
    weights: Vec<f64>,
}

impl TryFrom<Vec<f64>> for Model {
    type Error = DataError;

    fn try_from(weights: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        Self::from_weights(weights)
    }
}

impl From<Model> for Vec<f64> {
    fn from(model: Model) -> Self {
        model.weights
    }
}

impl Model {
    /// The number of weights in a model: a bias plus one per pair feature.
    pub const LENGTH: usize = PAIR_FEATURES + 1;

    /// The starting point for training.
    pub fn ones() -> Self {
        Self {
            weights: vec![1.0; Self::LENGTH],
        }
    }

    pub fn zeros() -> Self {
        Self {
            weights: vec![0.0; Self::LENGTH],
        }
    }

    pub fn from_weights(weights: Vec<f64>) -> std::result::Result<Self, DataError> {
        if weights.len() != Self::LENGTH {
            return Err(DataError::ModelLength {
                found: weights.len(),
                expected: Self::LENGTH,
            });
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub fn bias(&self) -> f64 {
        self.weights[0]
    }

    /// The linear score s = w\[0\] + Σ w\[k + 1\] * x\[k\].
    pub fn score(&self, features: &PairFeatures) -> f64 {
        self.weights[0] + dot_features(&self.weights[1..], features)
    }

    /// The probability that a pair with these features is a contact.
    pub fn probability(&self, features: &PairFeatures) -> f64 {
        logistic(self.score(features))
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let weights: Vec<f64> =
            serde_json::from_reader(reader).context("failed to deserialize model weights")?;
        Ok(Self::from_weights(weights)?)
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, self).context("failed to serialize model weights")?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open model file: {}", path.to_string_lossy()))?;

        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to load model file: {}", path.to_string_lossy()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create model file: {}", path.to_string_lossy()))?;

        self.to_writer(BufWriter::new(file))
    }
}
