//! Report export.

pub mod export;
