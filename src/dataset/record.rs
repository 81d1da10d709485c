//! Usage record types and row cleaning.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timestamp layouts accepted in the `timestamp` column, tried in order
/// after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M",
    "%m/%d/%Y %H:%M",
];

/// One appliance usage reading from a smart-home dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    pub appliance_name: String,
    pub room: String,
    /// Energy consumed over the reading (kWh).
    pub energy_consumed_kwh: f64,
    /// Nameplate power rating (W).
    pub device_power_rating: f64,
    /// Tariff per kWh at the time of the reading.
    pub tariff_rate: f64,
    /// Duration the appliance ran (hours).
    pub duration_hours: f64,
    /// Ambient temperature (°C).
    pub temperature: f64,
}

impl UsageRecord {
    /// Hour of day, 0–23.
    pub fn hour(&self) -> i32 {
        self.timestamp.hour() as i32
    }

    /// Day of month, 1–31.
    pub fn day(&self) -> u32 {
        self.timestamp.day()
    }

    /// Month, 1–12.
    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// Day of week with Monday = 0.
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_monday()
    }
}

/// A CSV row as read from disk, before missing values are dropped.
///
/// Unparseable numeric cells deserialize to `None` instead of failing the
/// whole file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUsageRow {
    pub user_id: Option<String>,
    pub timestamp: Option<String>,
    pub appliance_name: Option<String>,
    pub room: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub energy_consumed_kwh: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub device_power_rating: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub tariff_rate: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub duration_hours: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub temperature: Option<f64>,
}

impl RawUsageRow {
    /// Converts the row into a complete record.
    ///
    /// Returns `Ok(None)` if any field is missing, blank, or non-finite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timestamp`] if the timestamp is present but matches
    /// none of the accepted layouts.
    pub fn into_record(self) -> Result<Option<UsageRecord>> {
        let (
            Some(user_id),
            Some(timestamp),
            Some(appliance_name),
            Some(room),
            Some(energy_consumed_kwh),
            Some(device_power_rating),
            Some(tariff_rate),
            Some(duration_hours),
            Some(temperature),
        ) = (
            non_blank(self.user_id),
            non_blank(self.timestamp),
            non_blank(self.appliance_name),
            non_blank(self.room),
            finite(self.energy_consumed_kwh),
            finite(self.device_power_rating),
            finite(self.tariff_rate),
            finite(self.duration_hours),
            finite(self.temperature),
        )
        else {
            return Ok(None);
        };

        Ok(Some(UsageRecord {
            user_id,
            timestamp: parse_timestamp(&timestamp)?,
            appliance_name,
            room,
            energy_consumed_kwh,
            device_power_rating,
            tariff_rate,
            duration_hours,
            temperature,
        }))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Parses a timestamp cell.
///
/// Offsets in RFC 3339 input are dropped; the local wall-clock time is kept.
///
/// # Errors
///
/// Returns [`Error::Timestamp`] if no accepted layout matches.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| Error::Timestamp(raw.to_string()))
}
