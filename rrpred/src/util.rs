use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, LevelFilter};

pub fn set_threads(num_threads: usize) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("failed to build rayon global threadpool")
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Send log records to stderr. RUST_LOG takes precedence over the verbosity flag.
pub fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// The files directly inside `dir` with the given extension, sorted by path.
pub fn files_with_extension(dir: &Path, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(dir)
        .context(format!("failed to read directory: {}", dir.to_string_lossy()))?;

    let mut paths = vec![];
    for entry in read_dir {
        let path = entry
            .context(format!("failed to read directory: {}", dir.to_string_lossy()))?
            .path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Make sure `dir` exists and holds no files with the given extension.
pub fn prepare_output_dir(dir: &Path, extension: &str) -> anyhow::Result<()> {
    if dir.exists() {
        for path in files_with_extension(dir, extension)? {
            debug!("removing stale output: {}", path.to_string_lossy());
            std::fs::remove_file(&path)
                .context(format!("failed to remove file: {}", path.to_string_lossy()))?;
        }
    } else {
        std::fs::create_dir_all(dir)
            .context(format!("failed to create directory: {}", dir.to_string_lossy()))?;
    }
    Ok(())
}
