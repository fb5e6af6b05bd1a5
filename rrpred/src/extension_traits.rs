use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub trait PathBufExt {
    fn open(&self, allow_overwrite: bool) -> Result<BufWriter<File>>;
    fn file_stem_string(&self) -> Result<String>;
}

impl PathBufExt for PathBuf {
    fn open(&self, allow_overwrite: bool) -> Result<BufWriter<File>> {
        let mut file_options = File::options();

        if allow_overwrite {
            file_options.write(true).truncate(true).create(true);
        } else {
            file_options.write(true).create_new(true);
        };

        let file = file_options
            .open(self)
            .context(format!("failed to create file: {}", self.to_string_lossy()))?;

        Ok(BufWriter::new(file))
    }

    fn file_stem_string(&self) -> Result<String> {
        stem_of(self)
    }
}

pub fn stem_of(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .context(format!("path has no file name: {}", path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert2::check;

    #[test]
    fn test_open_respects_overwrite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("model.json");

        path.open(false)?;
        check!(path.open(false).is_err());
        check!(path.open(true).is_ok());
        Ok(())
    }

    #[test]
    fn test_file_stem_string() -> Result<()> {
        check!(PathBuf::from("data/1abc.pssm").file_stem_string()? == "1abc");
        check!(PathBuf::from("/").file_stem_string().is_err());
        Ok(())
    }
}
