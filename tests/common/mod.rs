//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{Rng, SeedableRng, rngs::StdRng};

use energy_insights::dataset::UsageRecord;

/// `(appliance, room, power rating in W)` used by the fixture dataset.
pub const APPLIANCES: &[(&str, &str, f64)] = &[
    ("Heater", "Bedroom", 1500.0),
    ("Fridge", "Kitchen", 200.0),
    ("Oven", "Kitchen", 2400.0),
    ("TV", "Living Room", 120.0),
    ("Washer", "Laundry", 500.0),
];

pub const USERS: &[&str] = &["User1", "User2", "User3", "User4"];

/// Hours that random readings never fall on; the planted oven peak uses them.
pub const PLANTED_PEAK_HOURS: [u32; 2] = [18, 19];

/// kWh planted for `User1`'s oven at each of [`PLANTED_PEAK_HOURS`].
pub const PLANTED_PEAK_KWH: f64 = 20.0;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date")
}

/// Deterministic synthetic dataset spanning two months.
///
/// Every user owns every appliance. Random readings avoid hours 18 and 19;
/// `User1`'s oven gets two large planted readings at exactly those hours so
/// its peak window is known in advance.
pub fn fixture_records(seed: u64) -> Vec<UsageRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();

    for day in 0..60 {
        for user in USERS {
            for &(appliance, room, rating) in APPLIANCES {
                if rng.random::<f64>() < 0.4 {
                    continue;
                }
                let mut hour = rng.random_range(0..22);
                if hour >= PLANTED_PEAK_HOURS[0] {
                    hour += 2;
                }
                let duration_hours = rng.random_range(0.1..1.0);
                let temperature = 5.0 + 15.0 * (day as f64 / 60.0) + rng.random_range(-2.0..2.0);
                let energy = (rating / 1000.0) * duration_hours * rng.random_range(0.1..0.4);
                records.push(UsageRecord {
                    user_id: (*user).to_string(),
                    timestamp: start()
                        + Duration::days(day)
                        + Duration::hours(i64::from(hour))
                        + Duration::minutes(rng.random_range(0..60)),
                    appliance_name: appliance.to_string(),
                    room: room.to_string(),
                    energy_consumed_kwh: energy,
                    device_power_rating: rating + rng.random_range(-10.0..10.0),
                    tariff_rate: if (7..22).contains(&hour) { 0.25 } else { 0.12 },
                    duration_hours,
                    temperature,
                });
            }
        }
    }

    for (i, hour) in PLANTED_PEAK_HOURS.iter().enumerate() {
        records.push(UsageRecord {
            user_id: "User1".to_string(),
            timestamp: start() + Duration::days(30 + i as i64) + Duration::hours(i64::from(*hour)),
            appliance_name: "Oven".to_string(),
            room: "Kitchen".to_string(),
            energy_consumed_kwh: PLANTED_PEAK_KWH,
            device_power_rating: 2400.0,
            tariff_rate: 0.25,
            duration_hours: 8.0,
            temperature: 12.0,
        });
    }

    records
}

/// Renders records as CSV with the dataset's column layout plus an unused
/// `status` column, and one incomplete row.
pub fn fixture_csv(records: &[UsageRecord]) -> String {
    let mut out = String::from(
        "user_id,timestamp,appliance_name,room,energy_consumed_kwh,device_power_rating,\
         tariff_rate,duration_hours,temperature,status\n",
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},on\n",
            r.user_id,
            r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            r.appliance_name,
            r.room,
            r.energy_consumed_kwh,
            r.device_power_rating,
            r.tariff_rate,
            r.duration_hours,
            r.temperature,
        ));
    }
    out.push_str("User1,2023-01-02 10:00:00,Heater,Bedroom,,1500,0.25,1.0,8.0,on\n");
    out
}

/// Writes the fixture CSV to a fresh file under the system temp dir.
pub fn write_fixture_csv(name: &str, seed: u64) -> PathBuf {
    let dir = std::env::temp_dir().join("energy-insights-tests");
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join(format!("{name}-{}.csv", std::process::id()));
    fs::write(&path, fixture_csv(&fixture_records(seed))).expect("fixture should be writable");
    path
}
