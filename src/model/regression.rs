//! Linear regression on continuous energy consumption.

use linfa::Dataset;
use linfa::traits::{Fit, Predict};
use linfa_linear::LinearRegression;
use log::{debug, info};
use ndarray::Array1;
use serde::Serialize;

use super::metrics::{mean_squared_error, r2_score};
use crate::config::RegressionConfig;
use crate::dataset::UsageRecord;
use crate::error::{Error, Result};
use crate::features::{independent_columns, regression_design};

/// Held-out scores and fitted coefficients for the consumption regression.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionReport {
    pub train_size: usize,
    pub test_size: usize,
    pub mse: f64,
    pub r2: f64,
    pub intercept: f64,
    /// `(feature, coefficient)` for every column kept in the fit.
    pub coefficients: Vec<(String, f64)>,
    /// Columns dropped because they were constant or collinear on the training rows.
    pub dropped_features: Vec<String>,
    /// `(actual, predicted)` for each test row, in time order.
    pub predictions: Vec<(f64, f64)>,
}

/// Fits `energy_consumed_kwh` against the regression design with a
/// time-ordered split.
///
/// Records are sorted by timestamp (stable); the first
/// `floor(n * train_fraction)` rows train the model and the rest are scored.
///
/// # Errors
///
/// Returns [`Error::EmptyDataset`] if either side of the split is empty and
/// [`Error::Model`] if the least-squares solve fails.
pub fn fit_consumption(records: &[UsageRecord], cfg: &RegressionConfig) -> Result<RegressionReport> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.timestamp);

    let n = sorted.len();
    let split = (n as f64 * cfg.train_fraction).floor() as usize;
    if split == 0 || split >= n {
        return Err(Error::EmptyDataset(format!(
            ": {n} records cannot be split {split}/{} for regression",
            n.saturating_sub(split)
        )));
    }

    let design = regression_design(&sorted);
    let targets: Array1<f64> = sorted.iter().map(|r| r.energy_consumed_kwh).collect();

    let train_x = design.rows.slice(ndarray::s![..split, ..]).to_owned();
    let kept = independent_columns(&train_x);
    let dropped_features: Vec<String> = (0..design.ncols())
        .filter(|c| !kept.contains(c))
        .map(|c| design.names[c].clone())
        .collect();
    if !dropped_features.is_empty() {
        debug!("dropping dependent regression columns: {dropped_features:?}");
    }

    let design = design.select(&kept);
    if design.ncols() == 0 {
        return Ok(mean_only(&targets, split, dropped_features));
    }

    let train = Dataset::new(
        design.rows.slice(ndarray::s![..split, ..]).to_owned(),
        targets.slice(ndarray::s![..split]).to_owned(),
    );
    let test_x = design.rows.slice(ndarray::s![split.., ..]).to_owned();
    let test_y = targets.slice(ndarray::s![split..]).to_vec();

    info!(
        "fitting linear regression on {} rows x {} features",
        split,
        design.ncols()
    );
    let model = LinearRegression::new()
        .fit(&train)
        .map_err(|e| Error::Model {
            model: "linear regression",
            message: e.to_string(),
        })?;

    let predicted = model.predict(&test_x).to_vec();
    let mse = mean_squared_error(&test_y, &predicted);
    let r2 = r2_score(&test_y, &predicted);
    info!("regression: mse = {mse:.4}, r2 = {r2:.4}");

    Ok(RegressionReport {
        train_size: split,
        test_size: n - split,
        mse,
        r2,
        intercept: model.intercept(),
        coefficients: design
            .names
            .iter()
            .cloned()
            .zip(model.params().iter().copied())
            .collect(),
        dropped_features,
        predictions: test_y.into_iter().zip(predicted).collect(),
    })
}

/// Intercept-only model for a design with no informative columns.
fn mean_only(targets: &Array1<f64>, split: usize, dropped_features: Vec<String>) -> RegressionReport {
    let train_mean = targets.slice(ndarray::s![..split]).mean().unwrap_or(0.0);
    let test_y = targets.slice(ndarray::s![split..]).to_vec();
    let predicted = vec![train_mean; test_y.len()];
    RegressionReport {
        train_size: split,
        test_size: test_y.len(),
        mse: mean_squared_error(&test_y, &predicted),
        r2: r2_score(&test_y, &predicted),
        intercept: train_mean,
        coefficients: Vec::new(),
        dropped_features,
        predictions: test_y.into_iter().zip(predicted).collect(),
    }
}
