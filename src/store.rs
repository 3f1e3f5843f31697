use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::Dataset;
use crate::util::write_json_pretty;

const BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The source could not be opened, read, or parsed into a dataset.
    #[error("cannot read data file {}: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    /// A backup copy or the corrected dataset could not be written.
    #[error("cannot write {}: {reason}", path.display())]
    Persist { path: PathBuf, reason: String },
}

/// A dataset together with the exact bytes it was parsed from.
#[derive(Debug)]
pub struct LoadedDataset {
    pub raw: Vec<u8>,
    pub dataset: Dataset,
}

pub fn load_dataset(path: &Path) -> Result<LoadedDataset, StoreError> {
    let raw = fs::read(path).map_err(|err| StoreError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let dataset = parse_dataset(path, &raw)?;

    debug!(
        path = %path.display(),
        bytes = raw.len(),
        cinemas = dataset.cinemas().len(),
        "loaded dataset"
    );

    Ok(LoadedDataset { raw, dataset })
}

pub fn parse_dataset(path: &Path, raw: &[u8]) -> Result<Dataset, StoreError> {
    serde_json::from_slice(raw).map_err(|err| StoreError::SourceUnreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Writes `raw` byte-for-byte next to `path` and returns the backup location.
pub fn write_backup(path: &Path, raw: &[u8]) -> Result<PathBuf, StoreError> {
    let target = backup_path(path);
    fs::write(&target, raw).map_err(|err| StoreError::Persist {
        path: target.clone(),
        reason: err.to_string(),
    })?;
    Ok(target)
}

pub fn save_dataset(path: &Path, dataset: &Dataset) -> Result<(), StoreError> {
    write_json_pretty(path, dataset).map_err(|err| StoreError::Persist {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    })
}
