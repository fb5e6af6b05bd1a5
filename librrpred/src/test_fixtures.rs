use std::fmt::Write;

/// The column order PSI-BLAST uses in its ASCII PSSM output.
pub const PSIBLAST_HEADER_ORDER: &str = "ARNDCQEGHILKMFPSTWYV";

/// A deterministic score for a position and a column of the PSI-BLAST header.
pub fn fixture_score(position: usize, column: usize) -> i32 {
    ((position * 7 + column * 3) % 11) as i32 - 5
}

/// Build the text of a PSI-BLAST style PSSM for a residue sequence.
pub fn pssm_text(residues: &str) -> String {
    let mut text = String::from("\nLast position-specific scoring matrix computed, weighted observed percentages rounded down, information per position, and relative weight of gapless real matches to pseudocounts\n");

    text.push_str("         ");
    for _ in 0..2 {
        for symbol in PSIBLAST_HEADER_ORDER.chars() {
            write!(text, "  {symbol}").unwrap();
        }
    }
    text.push('\n');

    for (position, residue) in residues.chars().enumerate() {
        write!(text, "{:>5} {} ", position + 1, residue).unwrap();
        for column in 0..PSIBLAST_HEADER_ORDER.len() {
            write!(text, " {:>2}", fixture_score(position, column)).unwrap();
        }
        for column in 0..PSIBLAST_HEADER_ORDER.len() {
            write!(text, " {:>3}", (position + column) % 50).unwrap();
        }
        text.push_str("  0.53 0.11\n");
    }

    text
}

/// Build the text of a contact file from 0-based contacts.
pub fn rr_text(sequence: &str, contacts: &[(usize, usize, f64)]) -> String {
    let mut text = String::new();

    // split the sequence over several lines
    for chunk in sequence.as_bytes().chunks(4) {
        text.push_str(std::str::from_utf8(chunk).unwrap());
        text.push('\n');
    }
    text.push('\n');

    for (i, j, distance) in contacts {
        writeln!(text, "{} {} 0 8 {}", i + 1, j + 1, distance).unwrap();
    }

    text
}
