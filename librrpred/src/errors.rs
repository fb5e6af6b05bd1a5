use thiserror::Error;

/// An Error that is thrown when a profile, contact,
/// or prediction file does not have the expected layout.
///
/// Line numbers are 1-based and refer to the line in the parsed text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("missing column header line")]
    MissingHeader,
    #[error("line {line}: column header has {found} symbols, expected {expected}")]
    ShortHeader {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("line {line}: column header is missing amino acid: {symbol}")]
    MissingSymbol { line: usize, symbol: char },
    #[error("line {line}: found {found} tokens, expected at least {expected}")]
    MissingColumns {
        line: usize,
        found: usize,
        expected: usize,
    },
    #[error("line {line}: failed to parse token \"{token}\" as {kind}")]
    InvalidToken {
        line: usize,
        token: String,
        kind: &'static str,
    },
    #[error("line {line}: residue indices start at 1")]
    ZeroIndex { line: usize },
    #[error("line {line}: contact probability {value} is outside [0, 1]")]
    InvalidProbability { line: usize, value: f64 },
}

/// An Error that is thrown when parsed inputs
/// are individually valid but do not fit together.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("contact ({i}, {j}) is outside a profile of length {length}")]
    ContactOutOfBounds { i: usize, j: usize, length: usize },
    #[error("contact sequence has length {sequence_length}, but the profile has length {profile_length}")]
    LengthMismatch {
        sequence_length: usize,
        profile_length: usize,
    },
    #[error("position {position} is outside a profile of length {length}")]
    PositionOutOfBounds { position: usize, length: usize },
    #[error("pair ({i}, {j}) is not an eligible pair in a profile of length {length}")]
    IneligiblePair { i: usize, j: usize, length: usize },
    #[error("the training set is empty")]
    EmptyTrainingSet,
    #[error("model has {found} weights, expected {expected}")]
    ModelLength { found: usize, expected: usize },
}
