//! Feature engineering: calendar features, one-hot encoding, design matrices.

use std::collections::BTreeSet;

use ndarray::{Array2, Axis};

use crate::dataset::UsageRecord;

/// Numeric columns available to the models, including derived calendar features.
pub const NUMERIC_FEATURES: &[&str] = &[
    "device_power_rating",
    "tariff_rate",
    "duration_hours",
    "temperature",
    "hour",
    "day",
    "month",
    "weekday",
];

/// Categorical columns one-hot encoded for the regression design.
pub const CATEGORICAL_FEATURES: &[&str] = &["appliance_name", "room", "user_id"];

/// Relative tolerance below which a centered column counts as linearly dependent.
const RANK_TOLERANCE: f64 = 1e-9;

/// Named feature columns over a set of records, one row per record.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub rows: Array2<f64>,
}

impl FeatureMatrix {
    pub fn ncols(&self) -> usize {
        self.names.len()
    }

    pub fn nrows(&self) -> usize {
        self.rows.nrows()
    }

    /// Keeps only the given columns, in the given order.
    pub fn select(&self, columns: &[usize]) -> Self {
        Self {
            names: columns.iter().map(|&c| self.names[c].clone()).collect(),
            rows: self.rows.select(Axis(1), columns),
        }
    }
}

/// Looks up a numeric feature by column name.
///
/// Returns `None` for names outside [`NUMERIC_FEATURES`].
pub fn numeric_value(record: &UsageRecord, name: &str) -> Option<f64> {
    let value = match name {
        "device_power_rating" => record.device_power_rating,
        "tariff_rate" => record.tariff_rate,
        "duration_hours" => record.duration_hours,
        "temperature" => record.temperature,
        "hour" => f64::from(record.hour()),
        "day" => f64::from(record.day()),
        "month" => f64::from(record.month()),
        "weekday" => f64::from(record.weekday()),
        _ => return None,
    };
    Some(value)
}

fn categorical_value<'a>(record: &'a UsageRecord, name: &str) -> Option<&'a str> {
    match name {
        "appliance_name" => Some(record.appliance_name.as_str()),
        "room" => Some(record.room.as_str()),
        "user_id" => Some(record.user_id.as_str()),
        _ => None,
    }
}

/// One-hot encodes a categorical column, dropping the first category.
///
/// Categories are sorted lexicographically; the smallest is the reference
/// level and gets no column. Columns are named `<column>_<value>`.
pub fn one_hot(records: &[UsageRecord], column: &str) -> FeatureMatrix {
    let categories: Vec<&str> = records
        .iter()
        .filter_map(|r| categorical_value(r, column))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .skip(1)
        .collect();

    let mut rows = Array2::zeros((records.len(), categories.len()));
    for (i, record) in records.iter().enumerate() {
        let value = categorical_value(record, column);
        if let Some(j) = categories.iter().position(|c| Some(*c) == value) {
            rows[[i, j]] = 1.0;
        }
    }

    FeatureMatrix {
        names: categories
            .iter()
            .map(|c| format!("{column}_{c}"))
            .collect(),
        rows,
    }
}

/// Builds a matrix from the named numeric columns.
///
/// Unknown names yield a column of zeros; callers validate names up front.
pub fn numeric_matrix(records: &[UsageRecord], columns: &[&str]) -> FeatureMatrix {
    let rows = Array2::from_shape_fn((records.len(), columns.len()), |(i, j)| {
        numeric_value(&records[i], columns[j]).unwrap_or(0.0)
    });
    FeatureMatrix {
        names: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

/// Concatenates feature blocks column-wise.
pub fn hstack(blocks: &[FeatureMatrix], nrows: usize) -> FeatureMatrix {
    let ncols = blocks.iter().map(FeatureMatrix::ncols).sum();
    let mut rows = Array2::zeros((nrows, ncols));
    let mut names = Vec::with_capacity(ncols);
    let mut offset = 0;
    for block in blocks {
        let width = block.ncols();
        rows.slice_mut(ndarray::s![.., offset..offset + width])
            .assign(&block.rows);
        names.extend(block.names.iter().cloned());
        offset += width;
    }
    FeatureMatrix { names, rows }
}

/// Design matrix for the consumption regression: every numeric feature
/// followed by one-hot encodings of appliance, room, and user.
pub fn regression_design(records: &[UsageRecord]) -> FeatureMatrix {
    let mut blocks = vec![numeric_matrix(records, NUMERIC_FEATURES)];
    blocks.extend(CATEGORICAL_FEATURES.iter().map(|c| one_hot(records, c)));
    hstack(&blocks, records.len())
}

/// Design matrix for the usage classifier over the configured feature names.
pub fn classification_design(records: &[UsageRecord], features: &[String]) -> FeatureMatrix {
    let columns: Vec<&str> = features.iter().map(String::as_str).collect();
    numeric_matrix(records, &columns)
}

/// Returns the indices of a maximal set of linearly independent columns
/// after mean-centering.
///
/// Columns are considered left to right with modified Gram-Schmidt; a
/// column is kept when its residual norm exceeds a relative tolerance of
/// its centered norm. Columns whose centered norm is negligible next to
/// their raw norm count as constant and never survive, since the intercept
/// already spans them.
pub fn independent_columns(x: &Array2<f64>) -> Vec<usize> {
    let Some(means) = x.mean_axis(Axis(0)) else {
        return Vec::new();
    };
    let centered = x - &means;

    let mut basis: Vec<ndarray::Array1<f64>> = Vec::new();
    let mut kept = Vec::new();
    let columns = centered.axis_iter(Axis(1)).zip(x.axis_iter(Axis(1)));
    for (j, (column, raw)) in columns.enumerate() {
        // rounding in the mean leaves a constant column with a tiny nonzero
        // spread, so compare against the column's own scale
        let norm = column.dot(&column).sqrt();
        let scale = raw.dot(&raw).sqrt();
        if norm <= RANK_TOLERANCE.sqrt() * scale {
            continue;
        }
        let mut residual = column.to_owned();
        for q in &basis {
            let proj = q.dot(&residual);
            residual.scaled_add(-proj, q);
        }
        let rnorm = residual.dot(&residual).sqrt();
        if rnorm > RANK_TOLERANCE.sqrt() * norm {
            basis.push(residual / rnorm);
            kept.push(j);
        }
    }
    kept
}
