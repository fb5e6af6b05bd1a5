use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;

use crate::errors::{DataError, ParseError};
use crate::structs::Profile;
use crate::tokens::{get_token_as_f64, get_token_as_index, is_blank, tokenize};

/// The minimum number of tokens on a contact line: i, j, lower bound, upper bound, distance.
const RR_MIN_CONTACT_TOKENS: usize = 5;

/// One contact line of an RR file, with 0-based indices.
#[derive(Debug, Clone, PartialEq)]
pub struct RrRecord {
    /// The line the record was parsed from (1-based)
    pub line: usize,
    pub i: usize,
    pub j: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// The fifth column: a distance in a contact file, a probability in a prediction file
    pub value: f64,
}

/// Parse the two sections of an RR file: the residue sequence and the contact lines.
///
/// The sequence section is every leading non-blank line, upper-cased and joined without
/// whitespace. It ends at the first blank line, or at the first line that starts with an
/// integer. Contact lines follow until the next blank line or the end of the text.
pub fn parse_rr(text: &str) -> std::result::Result<(String, Vec<RrRecord>), ParseError> {
    let mut sequence = String::new();
    let mut records: Vec<RrRecord> = vec![];

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .peekable();

    while let Some((_, line)) = lines.peek() {
        if is_blank(line) || starts_with_integer(line) {
            break;
        }
        line.split_whitespace()
            .for_each(|fragment| sequence.push_str(&fragment.to_uppercase()));
        lines.next();
    }

    for (line_number, line) in lines {
        if is_blank(line) {
            if records.is_empty() {
                continue;
            }
            break;
        }

        let tokens = tokenize(line, line_number, RR_MIN_CONTACT_TOKENS)?;
        let a = get_token_as_index(&tokens, 0, line_number)?;
        let b = get_token_as_index(&tokens, 1, line_number)?;

        records.push(RrRecord {
            line: line_number,
            i: a.min(b),
            j: a.max(b),
            lower_bound: get_token_as_f64(&tokens, 2, line_number)?,
            upper_bound: get_token_as_f64(&tokens, 3, line_number)?,
            value: get_token_as_f64(&tokens, 4, line_number)?,
        });
    }

    Ok((sequence, records))
}

fn starts_with_integer(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.parse::<i64>().is_ok())
}

/// The known residue-residue contacts of a sequence.
#[derive(Debug, Clone, Default)]
pub struct ContactSet {
    /// The residue sequence, upper case
    pub sequence: String,
    /// Distances keyed by 0-based (min index, max index), in file order
    pub contacts: IndexMap<(usize, usize), f64>,
}

impl ContactSet {
    pub fn from_rr_str(text: &str) -> std::result::Result<Self, ParseError> {
        let (sequence, records) = parse_rr(text)?;

        let contacts = records
            .into_iter()
            .map(|record| ((record.i, record.j), record.value))
            .collect();

        Ok(Self { sequence, contacts })
    }

    pub fn from_rr_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rr file: {}", path.to_string_lossy()))?;

        let contact_set = Self::from_rr_str(&text)
            .with_context(|| format!("failed to parse rr file: {}", path.to_string_lossy()))?;

        debug!(
            "parsed {} contacts from {}",
            contact_set.len(),
            path.to_string_lossy()
        );

        Ok(contact_set)
    }

    /// Whether the unordered pair (i, j) is a known contact.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.contacts.contains_key(&(i.min(j), i.max(j)))
    }

    pub fn distance(&self, i: usize, j: usize) -> Option<f64> {
        self.contacts.get(&(i.min(j), i.max(j))).copied()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Check that this contact set can describe the given profile.
    ///
    /// A non-empty sequence must have the profile's length,
    /// and every contact must index a position of the profile.
    pub fn check_against(&self, profile: &Profile) -> std::result::Result<(), DataError> {
        if !self.sequence.is_empty() && self.sequence.len() != profile.length {
            return Err(DataError::LengthMismatch {
                sequence_length: self.sequence.len(),
                profile_length: profile.length,
            });
        }

        match self.contacts.keys().find(|(_, j)| *j >= profile.length) {
            Some(&(i, j)) => Err(DataError::ContactOutOfBounds {
                i,
                j,
                length: profile.length,
            }),
            None => Ok(()),
        }
    }
}
