//! Resolving input files and decoding them into events

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{parse_events, EventRecord};

pub mod stream;

pub use stream::{load_from_stream_config, StreamSummary};

/// Events loaded from one or more files
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub files: Vec<PathBuf>,
    pub events: Vec<EventRecord>,
    pub stream: Option<StreamSummary>,
}

/// Load every file named by `paths` and matched by `globs`.
///
/// Each argument may be a comma-separated list. Explicit paths must exist and
/// must be regular files; glob matches that are directories are skipped.
pub async fn load(paths: &[String], globs: &[String]) -> Result<Dataset> {
    let mut dataset = Dataset::default();
    dataset.extend_from(paths, globs).await?;
    Ok(dataset)
}

impl Dataset {
    /// Read the files named by `paths` and `globs` that are not already part
    /// of this dataset, returning how many new files were read
    pub async fn extend_from(&mut self, paths: &[String], globs: &[String]) -> Result<usize> {
        let files = resolve_files(paths, globs)?;
        if files.is_empty() {
            return Err(Error::NoInputFiles);
        }

        let mut added = 0;
        for file in files {
            if self.files.contains(&file) {
                debug!("Skipping {}, already loaded", file.display());
                continue;
            }
            self.events.extend(read_events(&file).await?);
            self.files.push(file);
            added += 1;
        }
        self.files.sort();
        Ok(added)
    }
}

/// Read and decode one file
pub async fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    let data = tokio::fs::read(path).await.map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_events(&data).map_err(|e| Error::parse_at(path, e))?;
    debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Absolute, de-duplicated and sorted list of input files
pub fn resolve_files(paths: &[String], globs: &[String]) -> Result<Vec<PathBuf>> {
    let mut set = BTreeSet::new();

    for item in paths.iter().flat_map(|p| split_csv(p)) {
        let path = Path::new(item);
        let meta = std::fs::metadata(path).map_err(|source| Error::Stat {
            path: path.to_path_buf(),
            source,
        })?;
        if meta.is_dir() {
            return Err(Error::IsDirectory(path.to_path_buf()));
        }
        set.insert(absolute(path)?);
    }

    for pattern in globs.iter().flat_map(|g| split_csv(g)) {
        let matches = glob::glob(pattern).map_err(|source| Error::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable glob match: {}", e);
                    continue;
                }
            };
            if path.is_file() {
                set.insert(absolute(&path)?);
            }
        }
    }

    Ok(set.into_iter().collect())
}

/// Split a comma-separated argument into trimmed, non-empty items
pub fn split_csv(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
