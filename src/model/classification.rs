//! HIGH/LOW usage classification with a shallow decision tree.

use std::fmt;

use linfa::Dataset;
use linfa::traits::{Fit, Predict};
use linfa_trees::DecisionTree;
use log::info;
use ndarray::{Array1, Axis};
use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use super::metrics::ClassificationReport;
use crate::config::ClassificationConfig;
use crate::dataset::UsageRecord;
use crate::error::{Error, Result};
use crate::features::classification_design;

/// Usage category relative to the median consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UsageCategory {
    High,
    Low,
}

impl UsageCategory {
    /// Class labels in class-id order.
    pub const LABELS: [&'static str; 2] = ["HIGH", "LOW"];

    /// Labels a reading: `High` when at or above `threshold`.
    pub fn from_energy(energy_kwh: f64, threshold: f64) -> Self {
        if energy_kwh >= threshold {
            Self::High
        } else {
            Self::Low
        }
    }

    pub fn class_id(self) -> usize {
        match self {
            Self::High => 0,
            Self::Low => 1,
        }
    }

    pub fn from_class_id(id: usize) -> Self {
        if id == 0 { Self::High } else { Self::Low }
    }
}

impl fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::LABELS[self.class_id()])
    }
}

/// Results of the usage classifier on its held-out rows.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierReport {
    /// Median energy used as the HIGH/LOW threshold (kWh).
    pub threshold_kwh: f64,
    pub train_size: usize,
    pub test_size: usize,
    pub metrics: ClassificationReport,
    /// `(feature, importance)` sorted by importance, highest first.
    pub feature_importance: Vec<(String, f64)>,
}

/// Median of a sample; the mean of the two middle values for even counts.
///
/// Returns `None` for an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Splits row indices into `(train, test)` after a seeded shuffle.
///
/// The test side gets `ceil(n * test_fraction)` rows.
pub fn shuffle_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let n_test = ((n as f64 * test_fraction).ceil() as usize).min(n);
    let train = indices.split_off(n_test);
    (train, indices)
}

/// Labels every record HIGH/LOW against the median and fits a decision tree
/// on the configured features.
///
/// # Errors
///
/// Returns [`Error::EmptyDataset`] if the shuffle split leaves either side
/// empty and [`Error::Model`] if the tree cannot be fitted.
pub fn fit_usage_classifier(
    records: &[UsageRecord],
    cfg: &ClassificationConfig,
) -> Result<ClassifierReport> {
    let energies: Vec<f64> = records.iter().map(|r| r.energy_consumed_kwh).collect();
    let threshold_kwh =
        median(&energies).ok_or_else(|| Error::EmptyDataset(" for classification".into()))?;

    let (train_idx, test_idx) = shuffle_split(records.len(), cfg.test_fraction, cfg.seed);
    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(Error::EmptyDataset(format!(
            ": {} records cannot be split {}/{} for classification",
            records.len(),
            train_idx.len(),
            test_idx.len()
        )));
    }

    let design = classification_design(records, &cfg.features);
    let labels: Array1<usize> = energies
        .iter()
        .map(|&e| UsageCategory::from_energy(e, threshold_kwh).class_id())
        .collect();

    let train = Dataset::new(
        design.rows.select(Axis(0), &train_idx),
        labels.select(Axis(0), &train_idx),
    );
    let test_x = design.rows.select(Axis(0), &test_idx);
    let test_y = labels.select(Axis(0), &test_idx).to_vec();

    info!(
        "fitting decision tree (max_depth = {}) on {} rows, threshold = {threshold_kwh:.3} kWh",
        cfg.max_depth,
        train_idx.len()
    );
    let tree = DecisionTree::<f64, usize>::params()
        .max_depth(Some(cfg.max_depth))
        .fit(&train)
        .map_err(|e| Error::Model {
            model: "decision tree",
            message: e.to_string(),
        })?;

    let predicted = tree.predict(&test_x).to_vec();
    let metrics =
        ClassificationReport::from_predictions(&UsageCategory::LABELS, &test_y, &predicted);
    info!("classification: accuracy = {:.3}", metrics.accuracy);

    let mut feature_importance: Vec<(String, f64)> = design
        .names
        .iter()
        .cloned()
        .zip(
            tree.feature_importance()
                .into_iter()
                .map(|v| if v.is_finite() { v } else { 0.0 }),
        )
        .collect();
    feature_importance.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(ClassifierReport {
        threshold_kwh,
        train_size: train_idx.len(),
        test_size: test_idx.len(),
        metrics,
        feature_importance,
    })
}
