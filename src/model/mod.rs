//! Consumption regression, usage classification, and their metrics.

pub mod classification;
pub mod metrics;
/// Linear regression on `energy_consumed_kwh`.
pub mod regression;

pub use classification::{ClassifierReport, UsageCategory, fit_usage_classifier};
pub use metrics::ClassificationReport;
pub use regression::{RegressionReport, fit_consumption};
