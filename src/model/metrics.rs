//! Evaluation metrics for the regression and classification models.

use std::fmt;

use serde::Serialize;

/// Mean squared error between targets and predictions.
///
/// Returns `0.0` for empty input.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sq_sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    sq_sum / n as f64
}

/// Coefficient of determination.
///
/// When the targets have zero variance the score is `1.0` for a perfect
/// fit and `0.0` otherwise. Worse-than-mean fits go negative.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let mean = actual[..n].iter().sum::<f64>() / n as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual[..n].iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Precision, recall, F1, and support for one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Confusion matrix plus per-class and overall scores.
///
/// `confusion[i][j]` counts samples of actual class `labels[i]` predicted
/// as `labels[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub labels: Vec<String>,
    pub confusion: Vec<Vec<usize>>,
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub weighted_f1: f64,
}

impl ClassificationReport {
    /// Scores predicted class indices against actual ones.
    ///
    /// # Arguments
    ///
    /// * `labels` - Class names, indexed by class id
    /// * `actual` - True class ids
    /// * `predicted` - Predicted class ids, same length as `actual`
    ///
    /// Ids outside `labels` are ignored. Undefined ratios (no predictions or
    /// no support for a class) are reported as `0.0`.
    pub fn from_predictions(labels: &[&str], actual: &[usize], predicted: &[usize]) -> Self {
        let k = labels.len();
        let mut confusion = vec![vec![0usize; k]; k];
        for (&a, &p) in actual.iter().zip(predicted) {
            if a < k && p < k {
                confusion[a][p] += 1;
            }
        }

        let total: usize = confusion.iter().flatten().sum();
        let correct: usize = (0..k).map(|i| confusion[i][i]).sum();

        let classes: Vec<ClassMetrics> = (0..k)
            .map(|i| {
                let tp = confusion[i][i] as f64;
                let predicted_i: usize = (0..k).map(|r| confusion[r][i]).sum();
                let support: usize = confusion[i].iter().sum();
                let precision = ratio(tp, predicted_i as f64);
                let recall = ratio(tp, support as f64);
                let f1 = ratio(2.0 * precision * recall, precision + recall);
                ClassMetrics {
                    label: labels[i].to_string(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let macro_f1 = ratio(classes.iter().map(|c| c.f1).sum(), k as f64);
        let weighted_f1 = ratio(
            classes.iter().map(|c| c.f1 * c.support as f64).sum(),
            total as f64,
        );

        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            confusion,
            classes,
            accuracy: ratio(correct as f64, total as f64),
            macro_f1,
            weighted_f1,
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confusion matrix (rows = actual, cols = predicted):")?;
        write!(f, "{:>8}", "")?;
        for label in &self.labels {
            write!(f, " {label:>6}")?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(&self.confusion) {
            write!(f, "{label:>8}")?;
            for count in row {
                write!(f, " {count:>6}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>8} {:>9} {:>7} {:>8} {:>8}",
            "", "precision", "recall", "f1", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>8} {:>9.2} {:>7.2} {:>8.2} {:>8}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Macro F1:    {:.3}", self.macro_f1)?;
        writeln!(f, "Weighted F1: {:.3}", self.weighted_f1)?;
        write!(f, "Accuracy:    {:.3}", self.accuracy)
    }
}
