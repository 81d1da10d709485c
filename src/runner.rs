//! End-to-end analysis: load, filter, fit, summarize.

use log::info;

use crate::aggregate::{appliance_usage, daily_usage, date_span};
use crate::config::AnalysisConfig;
use crate::dataset::{UsageSource, filter_users};
use crate::error::{Error, Result};
use crate::model::{fit_consumption, fit_usage_classifier};
use crate::report::AnalysisReport;
use crate::windows::{off_peak_windows, peak_windows};

/// Runs the full analysis over the records supplied by `source`.
///
/// # Arguments
///
/// * `source` - Where the usage records come from
/// * `cfg` - Validated analysis configuration
///
/// # Errors
///
/// Returns an error if loading fails, no records survive the user filter,
/// or either model cannot be fitted.
pub fn run_analysis(source: &dyn UsageSource, cfg: &AnalysisConfig) -> Result<AnalysisReport> {
    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(Error::Config(errors));
    }

    let loaded = source.load()?;
    let records_loaded = loaded.len();
    let records = filter_users(loaded, &cfg.dataset.selected_users);
    if records.is_empty() {
        return Err(Error::EmptyDataset(format!(
            " after filtering to users [{}]",
            cfg.dataset.selected_users.join(", ")
        )));
    }
    info!("analyzing {} of {records_loaded} records", records.len());

    let regression = fit_consumption(&records, &cfg.regression)?;
    let classification = fit_usage_classifier(&records, &cfg.classification)?;
    let peak_windows = peak_windows(&records);
    let off_peak_windows = off_peak_windows(&records, &cfg.windows);

    let span = date_span(&records);
    let (appliance_usage, daily_usage) = match span {
        Some((first, last)) => (
            appliance_usage(&records, first, last)?,
            daily_usage(&records, first, last)?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(AnalysisReport {
        records_loaded,
        records_analyzed: records.len(),
        date_span: span,
        regression,
        classification,
        peak_windows,
        off_peak_windows,
        appliance_usage,
        daily_usage,
    })
}
