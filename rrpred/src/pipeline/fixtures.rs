use std::fmt::Write;
use std::path::{Path, PathBuf};

const HEADER_ORDER: &str = "ARNDCQEGHILKMFPSTWYV";
const SEQUENCE_LENGTH: usize = 20;

fn residues(seed: usize) -> String {
    (0..SEQUENCE_LENGTH)
        .map(|position| HEADER_ORDER.as_bytes()[(position * 3 + seed * 5) % 20] as char)
        .collect()
}

fn pssm_text(residues: &str, seed: usize) -> String {
    let mut text = String::from("\nLast position-specific scoring matrix computed\n         ");
    for symbol in HEADER_ORDER.chars() {
        write!(text, "  {symbol}").unwrap();
    }
    text.push('\n');

    for (position, residue) in residues.chars().enumerate() {
        write!(text, "{:>5} {}", position + 1, residue).unwrap();
        for column in 0..HEADER_ORDER.len() {
            let score = ((position * 5 + column * 7 + seed) % 13) as i32 - 6;
            write!(text, " {score:>3}").unwrap();
        }
        text.push('\n');
    }
    text
}

fn rr_text(residues: &str, seed: usize) -> String {
    let mut text = format!("{residues}\n\n");
    for i in 0..SEQUENCE_LENGTH - 6 {
        if (i + seed) % 3 == 0 {
            writeln!(text, "{} {} 0 8 {:.2}", i + 1, i + 7, 5.0 + i as f64 / 10.0).unwrap();
        }
    }
    text
}

/// Write `count` labeled sequences named seq0, seq1, ... into `pssm/` and `rr/` under `root`.
pub fn write_dataset(root: &Path, count: usize) -> anyhow::Result<(PathBuf, PathBuf)> {
    let pssm_dir = root.join("pssm");
    let rr_dir = root.join("rr");
    std::fs::create_dir_all(&pssm_dir)?;
    std::fs::create_dir_all(&rr_dir)?;

    for seed in 0..count {
        let residues = residues(seed);
        std::fs::write(pssm_dir.join(format!("seq{seed}.pssm")), pssm_text(&residues, seed))?;
        std::fs::write(rr_dir.join(format!("seq{seed}.rr")), rr_text(&residues, seed))?;
    }

    Ok((pssm_dir, rr_dir))
}
