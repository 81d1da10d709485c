//! Usage totals over a date range: per day and per appliance.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::UsageRecord;
use crate::error::{Error, Result};

/// Total energy for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    /// kWh, rounded to 2 decimals.
    pub usage: f64,
}

/// Total energy for one appliance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceUsage {
    pub appliance: String,
    /// kWh, rounded to 2 decimals.
    pub usage: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::DateRange { start, end });
    }
    Ok(())
}

fn in_range(record: &UsageRecord, start: NaiveDate, end: NaiveDate) -> bool {
    let day = record.timestamp.date();
    start <= day && day <= end
}

/// Per-day totals for readings between `start` and `end`, inclusive,
/// in date order. Days without readings are omitted.
///
/// # Errors
///
/// Returns [`Error::DateRange`] if `start` is after `end`.
pub fn daily_usage(records: &[UsageRecord], start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyUsage>> {
    check_range(start, end)?;
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in records.iter().filter(|r| in_range(r, start, end)) {
        *totals.entry(r.timestamp.date()).or_insert(0.0) += r.energy_consumed_kwh;
    }
    Ok(totals
        .into_iter()
        .map(|(date, usage)| DailyUsage {
            date,
            usage: round2(usage),
        })
        .collect())
}

/// Per-appliance totals for readings between `start` and `end`, inclusive,
/// largest first. Ties are ordered by appliance name.
///
/// # Errors
///
/// Returns [`Error::DateRange`] if `start` is after `end`.
pub fn appliance_usage(
    records: &[UsageRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ApplianceUsage>> {
    check_range(start, end)?;
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records.iter().filter(|r| in_range(r, start, end)) {
        *totals.entry(r.appliance_name.as_str()).or_insert(0.0) += r.energy_consumed_kwh;
    }
    let mut usage: Vec<ApplianceUsage> = totals
        .into_iter()
        .map(|(appliance, usage)| ApplianceUsage {
            appliance: appliance.to_string(),
            usage: round2(usage),
        })
        .collect();
    usage.sort_by(|a, b| b.usage.total_cmp(&a.usage));
    Ok(usage)
}

/// First and last reading dates, or `None` for an empty slice.
pub fn date_span(records: &[UsageRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = records.iter().map(|r| r.timestamp.date()).min()?;
    let last = records.iter().map(|r| r.timestamp.date()).max()?;
    Some((first, last))
}
