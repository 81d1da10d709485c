//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AnalysisConfig, ConfigError};

/// Smart-home energy usage analysis: consumption regression, HIGH/LOW
/// classification, and peak/off-peak usage windows.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Usage dataset (CSV with a header row)
    pub data: PathBuf,

    /// Load analysis settings from a TOML file
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (standard, all_users)
    #[arg(long)]
    pub preset: Option<String>,

    /// Comma-separated users to analyze, overriding the configured list
    #[arg(long, value_delimiter = ',')]
    pub users: Option<Vec<String>>,

    /// Override the classifier shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export peak and off-peak windows to CSV
    #[arg(long)]
    pub windows_out: Option<PathBuf>,

    /// Export the full report as JSON
    #[arg(long)]
    pub report_out: Option<PathBuf>,
}

impl Args {
    /// Resolves the configuration: `--config`, then `--preset`, then the
    /// standard preset, with `--users` and `--seed` applied on top.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be loaded or the preset is unknown.
    pub fn resolve_config(&self) -> Result<AnalysisConfig, ConfigError> {
        let mut cfg = if let Some(path) = &self.config {
            AnalysisConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            AnalysisConfig::from_preset(name)?
        } else {
            AnalysisConfig::standard()
        };

        if let Some(users) = &self.users {
            cfg.dataset.selected_users = users
                .iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect();
        }
        if let Some(seed) = self.seed {
            cfg.classification.seed = seed;
        }
        Ok(cfg)
    }
}
