use std::fmt::{Debug, Display, Formatter};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::alphabet::{is_amino_symbol, ALPHABET_SIZE, FEATURE_ALPHABET};
use crate::errors::ParseError;
use crate::tokens::{get_token_as_i32, is_blank, tokenize};

/// The number of tokens that precede the scores on a PSSM data line:
/// the position index and the residue symbol.
const PSSM_LEADING_TOKENS: usize = 2;

/// The minimum number of tokens on a PSSM data line.
const PSSM_MIN_DATA_TOKENS: usize = PSSM_LEADING_TOKENS + ALPHABET_SIZE;

/// A position-specific scoring matrix.
///
/// Each position holds one integer score for each of the 20 canonical amino acids.
pub struct Profile {
    /// The name of the profile, usually the file stem
    pub name: String,
    /// The number of positions in the profile
    pub length: usize,
    /// The amino acid symbols in the order they appeared in the column header
    pub symbols: Vec<u8>,
    /// The residue symbol found at each position
    pub residues: Vec<u8>,
    /// The scores at each position, laid out in column header order
    pub scores: Vec<[i32; ALPHABET_SIZE]>,
    /// For each column of a feature row, the column header index holding its score
    feature_columns: [usize; ALPHABET_SIZE],
}

impl Profile {
    /// Parse a profile from the text of a PSSM file.
    ///
    /// The text may begin with blank lines and a single title line. The next line is the
    /// column header, whose first 20 tokens must name each canonical amino acid exactly once.
    /// Each following line describes one position until a blank line or the end of the text.
    pub fn from_pssm_str(name: &str, text: &str) -> std::result::Result<Self, ParseError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .skip_while(|(_, line)| is_blank(line));

        let (mut header_line_number, mut header_line) = lines.next().ok_or(ParseError::MissingHeader)?;

        if !looks_like_header(header_line) {
            // the first line was a title
            (header_line_number, header_line) = lines.next().ok_or(ParseError::MissingHeader)?;
        }

        let header_tokens: Vec<&str> = header_line.split_whitespace().take(ALPHABET_SIZE).collect();
        if header_tokens.len() < ALPHABET_SIZE {
            return Err(ParseError::ShortHeader {
                line: header_line_number,
                found: header_tokens.len(),
                expected: ALPHABET_SIZE,
            });
        }

        let symbols: Vec<u8> = header_tokens
            .iter()
            .map(|token| token.as_bytes()[0])
            .collect();

        let mut feature_columns = [0usize; ALPHABET_SIZE];
        for (column, symbol) in FEATURE_ALPHABET.iter().enumerate() {
            feature_columns[column] = match symbols.iter().position(|s| s == symbol) {
                Some(idx) => idx,
                None => {
                    return Err(ParseError::MissingSymbol {
                        line: header_line_number,
                        symbol: *symbol as char,
                    })
                }
            }
        }

        let mut residues: Vec<u8> = vec![];
        let mut scores: Vec<[i32; ALPHABET_SIZE]> = vec![];

        for (line_number, line) in lines {
            if is_blank(line) {
                break;
            }

            let tokens = tokenize(line, line_number, PSSM_MIN_DATA_TOKENS)?;

            let mut row = [0i32; ALPHABET_SIZE];
            for (idx, score) in row.iter_mut().enumerate() {
                *score = get_token_as_i32(&tokens, idx + PSSM_LEADING_TOKENS, line_number)?;
            }

            residues.push(tokens[1].as_bytes()[0].to_ascii_uppercase());
            scores.push(row);
        }

        debug!("parsed profile {name} with {} positions", scores.len());

        Ok(Self {
            name: name.to_string(),
            length: scores.len(),
            symbols,
            residues,
            scores,
            feature_columns,
        })
    }

    /// Read and parse a PSSM file. The profile is named after the file stem.
    pub fn from_pssm_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read pssm file: {}", path.to_string_lossy()))?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        Self::from_pssm_str(&name, &text)
            .with_context(|| format!("failed to parse pssm file: {}", path.to_string_lossy()))
    }

    /// The score of an amino acid at a position, if the position and symbol exist.
    pub fn score(&self, position: usize, symbol: u8) -> Option<i32> {
        let column = self.symbols.iter().position(|&s| s == symbol)?;
        self.scores.get(position).map(|row| row[column])
    }

    /// The 20 scores of a position laid out in the fixed feature order.
    ///
    /// Panics if the position is out of bounds.
    pub fn feature_row(&self, position: usize) -> [f32; ALPHABET_SIZE] {
        let row = &self.scores[position];
        let mut features = [0.0f32; ALPHABET_SIZE];
        features
            .iter_mut()
            .zip(self.feature_columns)
            .for_each(|(f, column)| *f = row[column] as f32);
        features
    }

    /// The residue sequence described by the profile's residue column.
    pub fn sequence(&self) -> String {
        String::from_utf8_lossy(&self.residues).to_string()
    }
}

/// A column header line starts with 20 single letter amino acid tokens.
fn looks_like_header(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().take(ALPHABET_SIZE).collect();
    tokens.len() == ALPHABET_SIZE && tokens.iter().all(|t| is_amino_symbol(t))
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>5} {:>1} ", "", "")?;
        for symbol in &self.symbols {
            write!(f, "{:>3}", *symbol as char)?;
        }
        writeln!(f)?;

        for (idx, (residue, row)) in self.residues.iter().zip(&self.scores).enumerate() {
            write!(f, "{:>5} {:>1} ", idx + 1, *residue as char)?;
            for score in row {
                write!(f, "{:>3}", score)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Profile({}, length: {})", self.name, self.length)
    }
}
