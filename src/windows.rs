//! Peak and off-peak usage windows per appliance.
//!
//! Energy is summed per hour of day, then the selected hours are rendered
//! with [`summarize`](crate::intervals::summarize).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::WindowsConfig;
use crate::dataset::UsageRecord;
use crate::intervals::summarize;

/// Selected hours for one appliance and their rendered interval string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageWindow {
    /// Selected hours, in selection order.
    pub hours: Vec<i32>,
    /// Human-readable summary, e.g. `"6 PM-8 PM"`.
    pub interval: String,
}

impl UsageWindow {
    pub fn new(hours: Vec<i32>) -> Self {
        let interval = summarize(&hours);
        Self { hours, interval }
    }
}

/// Peak windows keyed by user, then lowercased appliance name.
pub type PeakWindows = BTreeMap<String, BTreeMap<String, UsageWindow>>;

/// Off-peak windows keyed by lowercased appliance name.
pub type OffPeakWindows = BTreeMap<String, UsageWindow>;

/// Sums energy per hour of day.
///
/// Only hours that occur in `records` get an entry.
pub fn hourly_totals<'a>(records: impl IntoIterator<Item = &'a UsageRecord>) -> BTreeMap<i32, f64> {
    let mut totals = BTreeMap::new();
    for r in records {
        *totals.entry(r.hour()).or_insert(0.0) += r.energy_consumed_kwh;
    }
    totals
}

/// Hours whose total equals the maximum total, ascending.
pub fn peak_hours(totals: &BTreeMap<i32, f64>) -> Vec<i32> {
    let Some(max) = totals.values().copied().reduce(f64::max) else {
        return Vec::new();
    };
    totals
        .iter()
        .filter(|&(_, &v)| v == max)
        .map(|(&h, _)| h)
        .collect()
}

/// The lowest-total hours: `max(1, floor(len * fraction))` of them,
/// ordered by ascending total with ties broken by hour.
pub fn off_peak_hours(totals: &BTreeMap<i32, f64>, fraction: f64) -> Vec<i32> {
    if totals.is_empty() {
        return Vec::new();
    }
    let mut ranked: Vec<(i32, f64)> = totals.iter().map(|(&h, &v)| (h, v)).collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    let take = ((ranked.len() as f64 * fraction).floor() as usize).max(1);
    ranked.into_iter().take(take).map(|(h, _)| h).collect()
}

/// Peak windows for every user and appliance in `records`.
///
/// Appliance keys are lowercased; appliances that differ only in case are
/// merged into one window.
pub fn peak_windows(records: &[UsageRecord]) -> PeakWindows {
    let mut grouped: BTreeMap<&str, BTreeMap<String, Vec<&UsageRecord>>> = BTreeMap::new();
    for r in records {
        grouped
            .entry(r.user_id.as_str())
            .or_default()
            .entry(r.appliance_name.to_lowercase())
            .or_default()
            .push(r);
    }

    grouped
        .into_iter()
        .map(|(user, appliances)| {
            let windows: BTreeMap<String, UsageWindow> = appliances
                .into_iter()
                .map(|(appliance, rows)| {
                    let totals = hourly_totals(rows);
                    (appliance, UsageWindow::new(peak_hours(&totals)))
                })
                .collect();
            (user.to_string(), windows)
        })
        .collect()
}

/// Off-peak windows for every appliance in `records`, across all users.
pub fn off_peak_windows(records: &[UsageRecord], cfg: &WindowsConfig) -> OffPeakWindows {
    let mut grouped: BTreeMap<String, Vec<&UsageRecord>> = BTreeMap::new();
    for r in records {
        grouped
            .entry(r.appliance_name.to_lowercase())
            .or_default()
            .push(r);
    }

    grouped
        .into_iter()
        .map(|(appliance, rows)| {
            let totals = hourly_totals(rows);
            let hours = off_peak_hours(&totals, cfg.off_peak_fraction);
            (appliance, UsageWindow::new(hours))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn reading(user: &str, appliance: &str, hour: u32, kwh: f64) -> UsageRecord {
        UsageRecord {
            user_id: user.into(),
            timestamp: NaiveDate::from_ymd_opt(2023, 4, 10)
                .and_then(|d| d.and_hms_opt(hour, 30, 0))
                .expect("valid timestamp"),
            appliance_name: appliance.into(),
            room: "Kitchen".into(),
            energy_consumed_kwh: kwh,
            device_power_rating: 1000.0,
            tariff_rate: 0.2,
            duration_hours: 1.0,
            temperature: 18.0,
        }
    }

    #[test]
    fn hourly_totals_sum_per_hour() {
        let records = vec![
            reading("User1", "Oven", 18, 1.0),
            reading("User1", "Oven", 18, 0.5),
            reading("User1", "Oven", 7, 0.2),
        ];
        let totals = hourly_totals(&records);
        assert_eq!(totals.len(), 2);
        assert!((totals[&18] - 1.5).abs() < 1e-12);
        assert!((totals[&7] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn peak_keeps_every_tied_maximum() {
        let totals = BTreeMap::from([(6, 2.0), (7, 2.0), (8, 2.0), (12, 1.0), (20, 2.0)]);
        assert_eq!(peak_hours(&totals), vec![6, 7, 8, 20]);
        assert!(peak_hours(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn off_peak_takes_lowest_quarter() {
        let totals: BTreeMap<i32, f64> = (0..24).map(|h| (h, f64::from(24 - h))).collect();
        // 24 hours -> 6 lowest, which are hours 18..=23
        let hours = off_peak_hours(&totals, 0.25);
        assert_eq!(hours, vec![23, 22, 21, 20, 19, 18]);
        assert_eq!(summarize(&hours), "6 PM-11 PM");
    }

    #[test]
    fn off_peak_takes_at_least_one_hour() {
        let totals = BTreeMap::from([(9, 3.0), (10, 1.0)]);
        assert_eq!(off_peak_hours(&totals, 0.25), vec![10]);
    }

    #[test]
    fn off_peak_ties_break_by_hour() {
        let totals = BTreeMap::from([(4, 1.0), (2, 1.0), (3, 1.0), (1, 5.0)]);
        assert_eq!(off_peak_hours(&totals, 0.5), vec![2, 3]);
    }

    #[test]
    fn peak_windows_group_by_user_and_lowercased_appliance() {
        let records = vec![
            reading("User1", "Oven", 18, 2.0),
            reading("User1", "OVEN", 19, 2.0),
            reading("User1", "Oven", 7, 0.5),
            reading("User2", "Fridge", 3, 0.1),
        ];
        let windows = peak_windows(&records);
        assert_eq!(windows.len(), 2);

        let oven = &windows["User1"]["oven"];
        assert_eq!(oven.hours, vec![18, 19]);
        assert_eq!(oven.interval, "6 PM-7 PM");

        let fridge = &windows["User2"]["fridge"];
        assert_eq!(fridge.interval, "3 AM");
    }

    #[test]
    fn off_peak_windows_pool_users() {
        let records = vec![
            reading("User1", "Washer", 1, 0.1),
            reading("User2", "Washer", 1, 0.1),
            reading("User1", "Washer", 2, 0.15),
            reading("User2", "Washer", 9, 1.0),
        ];
        let windows = off_peak_windows(&records, &WindowsConfig::default());
        // three hours -> max(1, floor(0.75)) = 1; hour 2 (0.15) beats hour 1 (0.2)
        assert_eq!(windows["washer"].hours, vec![2]);
        assert_eq!(windows["washer"].interval, "2 AM");
    }
}
