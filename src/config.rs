//! TOML-based analysis configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::features::NUMERIC_FEATURES;

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the standard analysis. Load from
/// TOML with [`AnalysisConfig::from_toml_file`] or use
/// [`AnalysisConfig::standard`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Which rows of the dataset take part in the analysis.
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Linear regression on `energy_consumed_kwh`.
    #[serde(default)]
    pub regression: RegressionConfig,
    /// HIGH/LOW decision tree classifier.
    #[serde(default)]
    pub classification: ClassificationConfig,
    /// Peak and off-peak window extraction.
    #[serde(default)]
    pub windows: WindowsConfig,
}

/// Dataset filtering.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Users to keep; an empty list keeps every user.
    pub selected_users: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            selected_users: vec!["User1".into(), "User2".into(), "User3".into()],
        }
    }
}

/// Linear regression parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionConfig {
    /// Leading share of the time-ordered rows used for training (0.0–1.0, exclusive).
    pub train_fraction: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
        }
    }
}

/// Decision tree classifier parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationConfig {
    /// Share of shuffled rows held out for evaluation (0.0–1.0, exclusive).
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Maximum tree depth (must be > 0).
    pub max_depth: usize,
    /// Numeric feature columns fed to the tree.
    pub features: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            max_depth: 3,
            features: [
                "device_power_rating",
                "tariff_rate",
                "duration_hours",
                "temperature",
                "hour",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Usage window parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsConfig {
    /// Share of an appliance's hours treated as off-peak (lowest totals first).
    pub off_peak_fraction: f64,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            off_peak_fraction: 0.25,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"regression.train_fraction"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl AnalysisConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["standard", "all_users"];

    /// Returns the standard analysis: three selected users, 80/20 splits.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Returns the standard analysis without a user filter.
    pub fn all_users() -> Self {
        Self {
            dataset: DatasetConfig {
                selected_users: Vec::new(),
            },
            ..Self::default()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" => Ok(Self::standard()),
            "all_users" => Ok(Self::all_users()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let r = &self.regression;
        if !(r.train_fraction > 0.0 && r.train_fraction < 1.0) {
            errors.push(ConfigError {
                field: "regression.train_fraction".into(),
                message: "must be in (0.0, 1.0)".into(),
            });
        }

        let c = &self.classification;
        if !(c.test_fraction > 0.0 && c.test_fraction < 1.0) {
            errors.push(ConfigError {
                field: "classification.test_fraction".into(),
                message: "must be in (0.0, 1.0)".into(),
            });
        }
        if c.max_depth == 0 {
            errors.push(ConfigError {
                field: "classification.max_depth".into(),
                message: "must be > 0".into(),
            });
        }
        if c.features.is_empty() {
            errors.push(ConfigError {
                field: "classification.features".into(),
                message: "must name at least one feature".into(),
            });
        }
        for name in &c.features {
            if !NUMERIC_FEATURES.contains(&name.as_str()) {
                errors.push(ConfigError {
                    field: "classification.features".into(),
                    message: format!(
                        "unknown feature \"{name}\", available: {}",
                        NUMERIC_FEATURES.join(", ")
                    ),
                });
            }
        }

        let w = &self.windows;
        if !(w.off_peak_fraction > 0.0 && w.off_peak_fraction <= 1.0) {
            errors.push(ConfigError {
                field: "windows.off_peak_fraction".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_preset_valid() {
        let cfg = AnalysisConfig::standard();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "standard should be valid: {errors:?}");
    }

    #[test]
    fn standard_matches_default_constants() {
        let cfg = AnalysisConfig::standard();
        assert_eq!(cfg.dataset.selected_users, vec!["User1", "User2", "User3"]);
        assert_eq!(cfg.regression.train_fraction, 0.8);
        assert_eq!(cfg.classification.test_fraction, 0.2);
        assert_eq!(cfg.classification.seed, 42);
        assert_eq!(cfg.classification.max_depth, 3);
        assert_eq!(cfg.classification.features.len(), 5);
        assert_eq!(cfg.windows.off_peak_fraction, 0.25);
    }

    #[test]
    fn from_preset_unknown() {
        let err = AnalysisConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in AnalysisConfig::PRESETS {
            let cfg = AnalysisConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn all_users_has_no_filter() {
        assert!(AnalysisConfig::all_users().dataset.selected_users.is_empty());
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[dataset]
selected_users = ["User4"]

[regression]
train_fraction = 0.7

[classification]
test_fraction = 0.3
seed = 7
max_depth = 5
features = ["temperature", "hour"]

[windows]
off_peak_fraction = 0.5
"#;
        let cfg = AnalysisConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.classification.max_depth), Some(5));
        assert_eq!(cfg.as_ref().map(|c| c.regression.train_fraction), Some(0.7));
        assert_eq!(
            cfg.as_ref().map(|c| c.dataset.selected_users.clone()),
            Some(vec!["User4".to_string()])
        );
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[classification]
seed = 99
"#;
        let cfg = AnalysisConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.classification.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.classification.max_depth), Some(3));
        assert_eq!(cfg.as_ref().map(|c| c.windows.off_peak_fraction), Some(0.25));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[regression]
train_fraction = 0.8
bogus_field = true
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_bad_fractions() {
        let mut cfg = AnalysisConfig::standard();
        cfg.regression.train_fraction = 1.0;
        cfg.classification.test_fraction = 0.0;
        cfg.windows.off_peak_fraction = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "regression.train_fraction"));
        assert!(errors.iter().any(|e| e.field == "classification.test_fraction"));
        assert!(errors.iter().any(|e| e.field == "windows.off_peak_fraction"));
    }

    #[test]
    fn validation_catches_unknown_feature() {
        let mut cfg = AnalysisConfig::standard();
        cfg.classification.features.push("humidity".to_string());
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "classification.features" && e.message.contains("humidity"))
        );
    }

    #[test]
    fn validation_catches_zero_depth() {
        let mut cfg = AnalysisConfig::standard();
        cfg.classification.max_depth = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "classification.max_depth"));
    }
}
