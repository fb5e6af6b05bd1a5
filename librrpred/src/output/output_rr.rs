use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::ParseError;
use crate::structs::contacts::parse_rr;
use crate::structs::prediction::rank;
use crate::structs::PredictionRow;

/// The predicted contacts of one sequence, as stored in an RR file.
///
/// The file holds the residue sequence on the first line, a blank line, then one
/// `i j 0 8 probability` line per pair (1-based indices) in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionFile {
    pub sequence: String,
    pub rows: Vec<PredictionRow>,
}

impl PredictionFile {
    /// Wrap a set of rows, putting them in rank order.
    pub fn new(sequence: String, mut rows: Vec<PredictionRow>) -> Self {
        rank(&mut rows);
        Self { sequence, rows }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.sequence)?;
        writeln!(writer)?;
        for row in &self.rows {
            writeln!(writer, "{row}")?;
        }
        writer.flush()
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create rr file: {}", path.to_string_lossy()))?;

        self.write(&mut BufWriter::new(file))
            .with_context(|| format!("failed to write rr file: {}", path.to_string_lossy()))
    }

    /// Parse a prediction file. A row that does not hold a probability is an error.
    pub fn from_rr_str(text: &str) -> std::result::Result<Self, ParseError> {
        let (sequence, records) = parse_rr(text)?;

        let rows = records
            .into_iter()
            .map(|record| {
                if !(0.0..=1.0).contains(&record.value) {
                    return Err(ParseError::InvalidProbability {
                        line: record.line,
                        value: record.value,
                    });
                }
                Ok(PredictionRow {
                    i: record.i,
                    j: record.j,
                    lower_bound: record.lower_bound,
                    upper_bound: record.upper_bound,
                    probability: record.value,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { sequence, rows })
    }

    pub fn from_rr_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rr file: {}", path.to_string_lossy()))?;

        Self::from_rr_str(&text)
            .with_context(|| format!("failed to parse prediction file: {}", path.to_string_lossy()))
    }
}
