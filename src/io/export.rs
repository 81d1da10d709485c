//! CSV and JSON export for analysis results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::report::AnalysisReport;

/// Column header for the usage window CSV export.
const WINDOWS_HEADER: &str = "scope,user_id,appliance,hours,interval";

/// Exports peak and off-peak windows to a CSV file at the given path.
///
/// Peak rows come first, ordered by user then appliance; off-peak rows
/// follow with an empty `user_id`. Produces deterministic output for
/// identical inputs.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_windows_csv(report: &AnalysisReport, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_windows_csv(report, buf)
}

/// Writes peak and off-peak windows as CSV to any writer.
///
/// Hours are `;`-separated in selection order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_windows_csv(report: &AnalysisReport, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(WINDOWS_HEADER.split(','))?;

    for (user, appliances) in &report.peak_windows {
        for (appliance, window) in appliances {
            wtr.write_record([
                "peak",
                user.as_str(),
                appliance.as_str(),
                join_hours(&window.hours).as_str(),
                window.interval.as_str(),
            ])?;
        }
    }
    for (appliance, window) in &report.off_peak_windows {
        wtr.write_record([
            "off_peak",
            "",
            appliance.as_str(),
            join_hours(&window.hours).as_str(),
            window.interval.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn join_hours(hours: &[i32]) -> String {
    hours
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Exports the full report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if file creation, serialization, or writing fails.
pub fn export_report_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut buf = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut buf, report)?;
    buf.flush()?;
    Ok(())
}
