//! Analysis report bundling every pipeline output.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{ApplianceUsage, DailyUsage};
use crate::model::{ClassifierReport, RegressionReport};
use crate::windows::{OffPeakWindows, PeakWindows};

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Records after cleaning, before the user filter.
    pub records_loaded: usize,
    /// Records that passed the user filter and fed the analysis.
    pub records_analyzed: usize,
    /// First and last reading dates of the analyzed records.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
    pub regression: RegressionReport,
    pub classification: ClassifierReport,
    pub peak_windows: PeakWindows,
    pub off_peak_windows: OffPeakWindows,
    pub appliance_usage: Vec<ApplianceUsage>,
    pub daily_usage: Vec<DailyUsage>,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dataset ---")?;
        writeln!(f, "Records loaded:    {}", self.records_loaded)?;
        writeln!(f, "Records analyzed:  {}", self.records_analyzed)?;
        if let Some((first, last)) = self.date_span {
            writeln!(f, "Date span:         {first} to {last}")?;
        }

        let r = &self.regression;
        writeln!(f, "\n--- Regression (energy_consumed_kwh) ---")?;
        writeln!(f, "Train/test rows:   {}/{}", r.train_size, r.test_size)?;
        writeln!(f, "MSE:               {:.4}", r.mse)?;
        writeln!(f, "R2:                {:.4}", r.r2)?;
        if !r.dropped_features.is_empty() {
            writeln!(f, "Dropped columns:   {}", r.dropped_features.join(", "))?;
        }

        let c = &self.classification;
        writeln!(f, "\n--- Classification (HIGH/LOW) ---")?;
        writeln!(f, "Median threshold:  {:.3} kWh", c.threshold_kwh)?;
        writeln!(f, "Train/test rows:   {}/{}", c.train_size, c.test_size)?;
        writeln!(f, "{}", c.metrics)?;
        writeln!(f, "Feature importance:")?;
        for (name, importance) in &c.feature_importance {
            writeln!(f, "  {name:<22} {importance:.3}")?;
        }

        writeln!(f, "\n--- Peak hours ---")?;
        for (user, appliances) in &self.peak_windows {
            writeln!(f, "{user}:")?;
            for (appliance, window) in appliances {
                writeln!(f, "  {appliance:<20} {}", window.interval)?;
            }
        }

        writeln!(f, "\n--- Off-peak hours ---")?;
        for (appliance, window) in &self.off_peak_windows {
            writeln!(f, "  {appliance:<20} {}", window.interval)?;
        }

        writeln!(f, "\n--- Usage by appliance ---")?;
        for u in &self.appliance_usage {
            writeln!(f, "  {:<20} {:.2} kWh", u.appliance, u.usage)?;
        }
        write!(f, "Days with readings: {}", self.daily_usage.len())
    }
}
