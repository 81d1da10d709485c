//! Dataset acquisition.
//!
//! The analysis only depends on [`UsageSource`]; where the rows come from
//! (a file on disk, an in-memory buffer, a test fixture) is up to the caller.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::record::{RawUsageRow, UsageRecord};
use crate::error::{Error, Result};

/// Supplies cleaned usage records.
pub trait UsageSource {
    /// Loads every complete record, dropping rows with missing values.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or parsed.
    fn load(&self) -> Result<Vec<UsageRecord>>;
}

/// Reads records from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageSource for CsvFileSource {
    fn load(&self) -> Result<Vec<UsageRecord>> {
        let file = File::open(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        info!("loading usage records from {}", self.path.display());
        read_records(file)
    }
}

/// Reads records from an in-memory CSV buffer.
#[derive(Debug, Clone)]
pub struct CsvBufferSource {
    data: Vec<u8>,
}

impl CsvBufferSource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl UsageSource for CsvBufferSource {
    fn load(&self) -> Result<Vec<UsageRecord>> {
        read_records(self.data.as_slice())
    }
}

/// Already-parsed records, e.g. from a fixture.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub records: Vec<UsageRecord>,
}

impl UsageSource for InMemorySource {
    fn load(&self) -> Result<Vec<UsageRecord>> {
        Ok(self.records.clone())
    }
}

/// Parses CSV rows from any reader and drops incomplete rows.
///
/// # Errors
///
/// Returns an error on malformed CSV or an unrecognised timestamp.
pub fn read_records(reader: impl Read) -> Result<Vec<UsageRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (line, row) in rdr.deserialize::<RawUsageRow>().enumerate() {
        match row?.into_record()? {
            Some(record) => records.push(record),
            None => {
                debug!("dropping incomplete row {}", line + 2);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("dropped {dropped} rows with missing values");
    }
    info!("loaded {} usage records", records.len());
    Ok(records)
}

/// Keeps records whose `user_id` is in `users`, preserving order.
///
/// An empty `users` list keeps everything.
pub fn filter_users(records: Vec<UsageRecord>, users: &[String]) -> Vec<UsageRecord> {
    if users.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| users.iter().any(|u| *u == r.user_id))
        .collect()
}
