//! Duplicate detection for dirlens.
//!
//! Works in two passes over a completed scan:
//!
//! 1. Size buckets with at least two files are promoted to candidates —
//!    unique-sized files are never hashed.
//! 2. Every candidate is hashed with BLAKE3 in streaming chunks, and paths
//!    sharing both size and digest form a [`DuplicateGroup`].
//!
//! ```rust,no_run
//! use dirlens_analyze::DuplicateFinder;
//! use dirlens_scan::{ScanConfig, scan};
//!
//! let result = scan(&ScanConfig::new("/path/to/scan")).unwrap();
//! let report = DuplicateFinder::new().find_duplicates(&result);
//!
//! println!("{} duplicate groups", report.group_count);
//! ```

pub mod hash;

mod duplicates;

pub use duplicates::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateFinder, DuplicateGroup, DuplicateReport,
};
pub use hash::hash_file;

// Re-export core types
pub use dirlens_core::{ContentHash, ScanError, ScanResult};
