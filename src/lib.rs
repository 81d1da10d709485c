//! Smart-home energy usage analysis.

pub mod aggregate;
pub mod cli;
/// TOML analysis configuration and presets.
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
/// Hour-of-day interval summarization.
pub mod intervals;
pub mod io;
pub mod model;
pub mod report;
pub mod runner;
pub mod windows;

pub use error::{Error, Result};
