//! Configuration file loading and result reporting.

mod config_file;
mod report;

pub use config_file::{load_config, ConfigFileError, LoadedConfig};
pub use report::{field_stats, format_report, write_report, FieldStats};
