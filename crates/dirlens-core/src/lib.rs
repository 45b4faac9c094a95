//! Core types for dirlens.
//!
//! This crate provides the data model shared by the scanning and analysis
//! crates: extension grouping keys, per-scope accumulators, directory
//! rollups, the scan result bundle, and the error taxonomy.

mod config;
mod digest;
mod error;
mod ext;
mod result;
mod stats;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use digest::ContentHash;
pub use error::{ScanError, ScanWarning, WarningKind};
pub use ext::{ExtKey, NO_EXT};
pub use result::{FileRecord, ScanResult, SizeIndex};
pub use stats::{DirStats, ExtStats};
