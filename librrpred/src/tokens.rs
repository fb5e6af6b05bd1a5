use std::str::FromStr;

use crate::errors::ParseError;

/// Split a line on whitespace, checking that at least `expected` tokens are present.
pub(crate) fn tokenize(line: &str, line_number: usize, expected: usize) -> Result<Vec<&str>, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() < expected {
        return Err(ParseError::MissingColumns {
            line: line_number,
            found: tokens.len(),
            expected,
        });
    }

    Ok(tokens)
}

fn get_token_as<T: FromStr>(
    tokens: &[&str],
    idx: usize,
    line_number: usize,
    kind: &'static str,
) -> Result<T, ParseError> {
    let token = tokens.get(idx).ok_or(ParseError::MissingColumns {
        line: line_number,
        found: tokens.len(),
        expected: idx + 1,
    })?;

    token.parse::<T>().map_err(|_| ParseError::InvalidToken {
        line: line_number,
        token: token.to_string(),
        kind,
    })
}

pub(crate) fn get_token_as_i32(tokens: &[&str], idx: usize, line_number: usize) -> Result<i32, ParseError> {
    get_token_as(tokens, idx, line_number, "integer")
}

pub(crate) fn get_token_as_f64(tokens: &[&str], idx: usize, line_number: usize) -> Result<f64, ParseError> {
    get_token_as(tokens, idx, line_number, "real number")
}

/// Parse a 1-based residue index and convert it to a 0-based index.
pub(crate) fn get_token_as_index(
    tokens: &[&str],
    idx: usize,
    line_number: usize,
) -> Result<usize, ParseError> {
    let one_based: usize = get_token_as(tokens, idx, line_number, "residue index")?;

    one_based
        .checked_sub(1)
        .ok_or(ParseError::ZeroIndex { line: line_number })
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
