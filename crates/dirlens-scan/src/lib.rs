//! Directory scanning engine for dirlens.
//!
//! One walk over the tree produces a complete [`ScanResult`]: global
//! extension statistics, a size-bucketed index of candidate files, and
//! per-directory rollups aggregated into every ancestor.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirlens_scan::{ScanConfig, scan};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let result = scan(&config).unwrap();
//!
//! println!("{} files, {} bytes", result.total_files, result.total_size);
//! ```

mod accumulate;
mod scanner;

pub use accumulate::ScanAccumulator;
pub use scanner::scan;

// Re-export core types for convenience
pub use dirlens_core::{
    DirStats, ExtKey, ExtStats, FileRecord, ScanConfig, ScanError, ScanResult, ScanWarning,
    SizeIndex, WarningKind,
};
