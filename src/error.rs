//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors produced while loading data, fitting models, or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read \"{path}\": {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),

    #[error("unrecognised timestamp \"{0}\"")]
    Timestamp(String),

    #[error("dataset is empty{0}")]
    EmptyDataset(String),

    #[error("{model}: {message}")]
    Model {
        model: &'static str,
        message: String,
    },

    #[error("invalid date range: {start} is after {end}")]
    DateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, Error>;
