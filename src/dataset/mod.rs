//! Smart-home usage dataset loading and cleaning.

pub mod record;
pub mod source;

pub use record::{RawUsageRow, UsageRecord};
pub use source::{
    CsvBufferSource, CsvFileSource, InMemorySource, UsageSource, filter_users, read_records,
};
