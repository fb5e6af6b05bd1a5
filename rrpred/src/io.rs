use std::path::{Path, PathBuf};

use anyhow::Context;
use librrpred::{ContactSet, Profile};
use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;

use crate::extension_traits::stem_of;
use crate::util::files_with_extension;

pub const PSSM_EXTENSION: &str = "pssm";
pub const RR_EXTENSION: &str = "rr";

#[derive(Error, Debug)]
#[error("no contact file for {name}: expected {path}")]
pub struct MissingContactFileError {
    name: String,
    path: String,
}

#[derive(Error, Debug)]
#[error("no .{extension} files found in: {dir}")]
pub struct NoInputFilesError {
    extension: &'static str,
    dir: String,
}

/// A sequence with both a profile (or prediction) file and a true contact file.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetEntry {
    pub name: String,
    pub input_path: PathBuf,
    pub rr_path: PathBuf,
}

/// List the files with the given extension in `dir`, failing if there are none.
pub fn input_files(dir: &Path, extension: &'static str) -> anyhow::Result<Vec<PathBuf>> {
    let paths = files_with_extension(dir, extension)?;

    if paths.is_empty() {
        return Err(NoInputFilesError {
            extension,
            dir: dir.to_string_lossy().to_string(),
        }
        .into());
    }

    Ok(paths)
}

/// Match every `.{extension}` file in `input_dir` with the `.rr` file of the same stem in `rr_dir`.
///
/// Every input must have a contact file.
pub fn pair_with_contacts(
    input_dir: &Path,
    extension: &'static str,
    rr_dir: &Path,
) -> anyhow::Result<Vec<DatasetEntry>> {
    input_files(input_dir, extension)?
        .into_iter()
        .map(|input_path| {
            let name = stem_of(&input_path)?;
            let rr_path = rr_dir.join(format!("{name}.{RR_EXTENSION}"));

            if !rr_path.is_file() {
                return Err(MissingContactFileError {
                    name,
                    path: rr_path.to_string_lossy().to_string(),
                }
                .into());
            }

            Ok(DatasetEntry {
                name,
                input_path,
                rr_path,
            })
        })
        .collect()
}

/// Shuffle the entries with a seeded generator and cut them into two parts.
///
/// The first part holds `train_fraction` of the entries, rounded down to a whole entry.
pub fn split_entries(
    mut entries: Vec<DatasetEntry>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<DatasetEntry>, Vec<DatasetEntry>) {
    let mut rng = Pcg64::seed_from_u64(seed);
    entries.shuffle(&mut rng);

    let cut = ((entries.len() as f64 * train_fraction).floor() as usize).min(entries.len());
    let held_out = entries.split_off(cut);

    info!(
        "split {} sequences: {} for training, {} for testing",
        entries.len() + held_out.len(),
        entries.len(),
        held_out.len()
    );

    (entries, held_out)
}

pub fn load_profiles(paths: &[PathBuf]) -> anyhow::Result<Vec<Profile>> {
    let profiles: Vec<Profile> = paths
        .par_iter()
        .map(Profile::from_pssm_file)
        .collect::<anyhow::Result<_>>()?;

    info!("loaded {} profiles", profiles.len());
    Ok(profiles)
}

/// Load each entry's profile and contacts, checking that they describe the same sequence.
pub fn load_labeled(entries: &[DatasetEntry]) -> anyhow::Result<Vec<(Profile, ContactSet)>> {
    let labeled: Vec<(Profile, ContactSet)> = entries
        .par_iter()
        .map(|entry| {
            let profile = Profile::from_pssm_file(&entry.input_path)?;
            let contacts = ContactSet::from_rr_file(&entry.rr_path)?;

            contacts.check_against(&profile).context(format!(
                "contact file does not match its profile: {}",
                entry.rr_path.to_string_lossy()
            ))?;

            Ok((profile, contacts))
        })
        .collect::<anyhow::Result<_>>()?;

    info!("loaded {} labeled sequences", labeled.len());
    Ok(labeled)
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert2::check;

    fn entries(count: usize) -> Vec<DatasetEntry> {
        (0..count)
            .map(|idx| DatasetEntry {
                name: format!("seq{idx}"),
                input_path: PathBuf::from(format!("seq{idx}.pssm")),
                rr_path: PathBuf::from(format!("seq{idx}.rr")),
            })
            .collect()
    }

    #[test]
    fn test_pairing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let pssm_dir = dir.path().join("pssm");
        let rr_dir = dir.path().join("rr");
        std::fs::create_dir_all(&pssm_dir)?;
        std::fs::create_dir_all(&rr_dir)?;

        std::fs::write(pssm_dir.join("b.pssm"), "")?;
        std::fs::write(pssm_dir.join("a.pssm"), "")?;
        std::fs::write(rr_dir.join("a.rr"), "")?;
        std::fs::write(rr_dir.join("b.rr"), "")?;
        std::fs::write(rr_dir.join("extra.rr"), "")?;

        let paired = pair_with_contacts(&pssm_dir, PSSM_EXTENSION, &rr_dir)?;
        let names: Vec<&str> = paired.iter().map(|e| e.name.as_str()).collect();
        check!(names == vec!["a", "b"]);
        check!(paired[1].rr_path == rr_dir.join("b.rr"));
        Ok(())
    }

    #[test]
    fn test_missing_contact_file_stops_pairing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("a.pssm"), "")?;

        let err = pair_with_contacts(dir.path(), PSSM_EXTENSION, dir.path()).unwrap_err();
        check!(err.downcast_ref::<MissingContactFileError>().is_some());
        Ok(())
    }

    #[test]
    fn test_empty_input_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let err = input_files(dir.path(), PSSM_EXTENSION).unwrap_err();
        check!(err.downcast_ref::<NoInputFilesError>().is_some());
        Ok(())
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = split_entries(entries(8), 0.75, 42);
        check!(train.len() == 6);
        check!(test.len() == 2);

        let (train, test) = split_entries(entries(3), 1.0, 42);
        check!(train.len() == 3);
        check!(test.is_empty());
    }

    #[test]
    fn test_split_rounds_down() {
        let (train, test) = split_entries(entries(2), 0.75, 42);
        check!(train.len() == 1);
        check!(test.len() == 1);

        let (train, test) = split_entries(entries(3), 0.75, 42);
        check!(train.len() == 2);
        check!(test.len() == 1);
    }

    #[test]
    fn test_split_is_seeded() {
        let names = |(a, b): (Vec<DatasetEntry>, Vec<DatasetEntry>)| -> Vec<String> {
            a.into_iter().chain(b).map(|e| e.name).collect()
        };

        let first = names(split_entries(entries(20), 0.75, 7));
        check!(first == names(split_entries(entries(20), 0.75, 7)));

        let mut sorted = first.clone();
        sorted.sort();
        let mut expected: Vec<String> = entries(20).into_iter().map(|e| e.name).collect();
        expected.sort();
        check!(sorted == expected);
    }
}
