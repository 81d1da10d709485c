//! energy-insights entry point: CLI wiring and report output.

use std::process;

use clap::Parser;
use log::{error, info};

use energy_insights::cli::Args;
use energy_insights::dataset::CsvFileSource;
use energy_insights::io::export::{export_report_json, export_windows_csv};
use energy_insights::runner::run_analysis;

fn main() {
    let args = Args::parse();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cfg = match args.resolve_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let source = CsvFileSource::new(&args.data);
    let report = match run_analysis(&source, &cfg) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    println!("{report}");

    if let Some(path) = &args.windows_out {
        if let Err(e) = export_windows_csv(&report, path) {
            error!("failed to write windows CSV: {e}");
            process::exit(1);
        }
        info!("usage windows written to {}", path.display());
    }

    if let Some(path) = &args.report_out {
        if let Err(e) = export_report_json(&report, path) {
            error!("failed to write report JSON: {e}");
            process::exit(1);
        }
        info!("report written to {}", path.display());
    }
}
