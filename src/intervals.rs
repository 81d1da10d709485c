//! Hour-of-day interval summarization.
//!
//! Collapses a set of hour buckets into maximal contiguous runs and renders
//! them in 12-hour clock notation, e.g. `[1, 2, 3, 7, 8, 20]` becomes
//! `"1 AM-3 AM, 7 AM-8 AM, 8 PM"`.

use std::fmt;

/// Sentinel returned by [`summarize`] for an empty hour set.
pub const NO_DATA: &str = "No data";

/// A maximal run of consecutive hours, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourInterval {
    /// First hour of the run.
    pub start: i32,
    /// Last hour of the run (`>= start`).
    pub end: i32,
}

impl HourInterval {
    /// Creates a single-hour interval.
    pub fn single(hour: i32) -> Self {
        Self {
            start: hour,
            end: hour,
        }
    }

    /// Iterates over every hour in the interval.
    pub fn hours(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl fmt::Display for HourInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", clock_label(self.start))
        } else {
            write!(f, "{}-{}", clock_label(self.start), clock_label(self.end))
        }
    }
}

/// Renders an hour in 12-hour clock notation.
///
/// No range check is applied: values outside `0..=23` go through the same
/// arithmetic, so `25` renders as `"13 PM"` and `-1` as `"-1 AM"`.
///
/// # Examples
///
/// ```
/// use energy_insights::intervals::clock_label;
///
/// assert_eq!(clock_label(0), "12 AM");
/// assert_eq!(clock_label(9), "9 AM");
/// assert_eq!(clock_label(12), "12 PM");
/// assert_eq!(clock_label(18), "6 PM");
/// ```
pub fn clock_label(hour: i32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h < 12 => format!("{h} AM"),
        h => format!("{} PM", h - 12),
    }
}

/// Collapses hours into maximal contiguous runs, ordered by start.
///
/// Input order and duplicates do not matter.
pub fn collapse(hours: &[i32]) -> Vec<HourInterval> {
    let mut sorted = hours.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut runs = Vec::new();
    let mut current = HourInterval::single(first);
    for h in iter {
        if h == current.end + 1 {
            current.end = h;
        } else {
            runs.push(current);
            current = HourInterval::single(h);
        }
    }
    runs.push(current);
    runs
}

/// Summarizes a set of hours as comma-separated clock ranges.
///
/// Returns [`NO_DATA`] when `hours` is empty.
///
/// # Examples
///
/// ```
/// use energy_insights::intervals::summarize;
///
/// assert_eq!(summarize(&[]), "No data");
/// assert_eq!(summarize(&[13, 14, 15]), "1 PM-3 PM");
/// assert_eq!(summarize(&[20, 1, 2, 3, 7, 8]), "1 AM-3 AM, 7 AM-8 AM, 8 PM");
/// ```
pub fn summarize(hours: &[i32]) -> String {
    let runs = collapse(hours);
    if runs.is_empty() {
        return NO_DATA.to_string();
    }
    runs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(summarize(&[]), "No data");
        assert!(collapse(&[]).is_empty());
    }

    #[test]
    fn single_hours() {
        assert_eq!(summarize(&[5]), "5 AM");
        assert_eq!(summarize(&[0]), "12 AM");
        assert_eq!(summarize(&[12]), "12 PM");
        assert_eq!(summarize(&[23]), "11 PM");
    }

    #[test]
    fn afternoon_run() {
        assert_eq!(summarize(&[13, 14, 15]), "1 PM-3 PM");
    }

    #[test]
    fn mixed_runs() {
        assert_eq!(
            summarize(&[1, 2, 3, 7, 8, 20]),
            "1 AM-3 AM, 7 AM-8 AM, 8 PM"
        );
    }

    #[test]
    fn run_crossing_noon() {
        assert_eq!(summarize(&[11, 12, 13]), "11 AM-1 PM");
    }

    #[test]
    fn order_independent() {
        assert_eq!(summarize(&[3, 1, 2]), summarize(&[1, 2, 3]));
        assert_eq!(summarize(&[20, 8, 1, 7, 3, 2]), summarize(&[1, 2, 3, 7, 8, 20]));
    }

    #[test]
    fn duplicates_do_not_split_runs() {
        assert_eq!(summarize(&[2, 2, 3, 3, 4]), "2 AM-4 AM");
        assert_eq!(collapse(&[5, 5, 5]), vec![HourInterval::single(5)]);
    }

    #[test]
    fn out_of_range_hours_are_rendered_not_rejected() {
        assert_eq!(clock_label(25), "13 PM");
        assert_eq!(clock_label(-1), "-1 AM");
        assert_eq!(summarize(&[24, 25]), "12 PM-13 PM");
    }

    #[test]
    fn clock_labels_are_distinct_over_a_day() {
        let labels: BTreeSet<String> = (0..24).map(clock_label).collect();
        assert_eq!(labels.len(), 24);
    }

    #[test]
    fn interval_hours() {
        let iv = HourInterval { start: 7, end: 9 };
        assert_eq!(iv.hours().collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(HourInterval::single(4).hours().count(), 1);
    }

    #[test]
    fn random_sets_round_trip_through_runs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.random_range(0..30);
            let hours: Vec<i32> = (0..n).map(|_| rng.random_range(0..24)).collect();
            let expected: BTreeSet<i32> = hours.iter().copied().collect();

            let runs = collapse(&hours);
            let covered: Vec<i32> = runs.iter().flat_map(HourInterval::hours).collect();
            let covered_set: BTreeSet<i32> = covered.iter().copied().collect();

            // every hour appears once and the union is exact
            assert_eq!(covered.len(), covered_set.len());
            assert_eq!(covered_set, expected);

            // runs are maximal and ordered
            for pair in runs.windows(2) {
                assert!(pair[1].start > pair[0].end + 1);
            }

            let groups = if expected.is_empty() {
                0
            } else {
                summarize(&hours).split(", ").count()
            };
            assert_eq!(groups, runs.len());
        }
    }
}
