use std::fs::File;
use std::path::Path;

use normalizer::{CommitRecord, IssueRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{DatasetError, Result};

/// A record type that is persisted as one CSV row.
pub trait Tabular: Serialize + DeserializeOwned {
    const NAME: &'static str;

    fn columns() -> &'static [&'static str];
}

impl Tabular for CommitRecord {
    const NAME: &'static str = "commits";

    fn columns() -> &'static [&'static str] {
        &CommitRecord::COLUMNS
    }
}

impl Tabular for IssueRecord {
    const NAME: &'static str = "issues";

    fn columns() -> &'static [&'static str] {
        &IssueRecord::COLUMNS
    }
}

/// Writes the header and one row per record. The header is present even
/// when `rows` is empty so the file can be read back as an empty dataset.
pub fn write_dataset<T: Tabular>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| DatasetError::io(path, err))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(T::columns())
        .map_err(|err| DatasetError::csv(path, err))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| DatasetError::csv(path, err))?;
    }
    writer.flush().map_err(|err| DatasetError::io(path, err))?;

    info!(dataset = T::NAME, rows = rows.len(), path = %path.display(), "dataset written");
    Ok(())
}

pub fn read_dataset<T: Tabular>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| DatasetError::csv(path, err))?;

    let rows = reader
        .deserialize::<T>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| DatasetError::csv(path, err))?;

    debug!(dataset = T::NAME, rows = rows.len(), path = %path.display(), "dataset read");
    Ok(rows)
}

pub fn write_commits(path: impl AsRef<Path>, rows: &[CommitRecord]) -> Result<()> {
    write_dataset(path, rows)
}

pub fn write_issues(path: impl AsRef<Path>, rows: &[IssueRecord]) -> Result<()> {
    write_dataset(path, rows)
}

pub fn read_commits(path: impl AsRef<Path>) -> Result<Vec<CommitRecord>> {
    read_dataset(path)
}

pub fn read_issues(path: impl AsRef<Path>) -> Result<Vec<IssueRecord>> {
    read_dataset(path)
}
