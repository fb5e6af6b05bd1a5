use phf::phf_map;

/// The number of canonical amino acids scored by a profile.
pub const ALPHABET_SIZE: usize = 20;

/// The fixed order in which profile scores are laid out in a feature vector.
///
/// This is independent of the column order found in a PSSM header.
pub const FEATURE_ALPHABET: [u8; ALPHABET_SIZE] = [
    b'A', b'C', b'E', b'D', b'G', b'I', b'H', b'K', b'F', b'M', b'L', b'N', b'Q', b'P', b'S',
    b'R', b'T', b'W', b'V', b'Y',
];

/// maps from \<UTF8 amino acid\> -> \<column in a feature row\>
pub const UTF8_TO_FEATURE_COLUMN: phf::Map<u8, usize> = phf_map! {
    65u8 => 0,    // A
    67u8 => 1,    // C
    69u8 => 2,    // E
    68u8 => 3,    // D
    71u8 => 4,    // G
    73u8 => 5,    // I
    72u8 => 6,    // H
    75u8 => 7,    // K
    70u8 => 8,    // F
    77u8 => 9,    // M
    76u8 => 10,   // L
    78u8 => 11,   // N
    81u8 => 12,   // Q
    80u8 => 13,   // P
    83u8 => 14,   // S
    82u8 => 15,   // R
    84u8 => 16,   // T
    87u8 => 17,   // W
    86u8 => 18,   // V
    89u8 => 19,   // Y
};

/// Returns true if the token is a single canonical amino acid letter.
pub fn is_amino_symbol(token: &str) -> bool {
    token.len() == 1 && UTF8_TO_FEATURE_COLUMN.contains_key(&token.as_bytes()[0])
}
