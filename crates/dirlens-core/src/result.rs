//! Scan result bundle handed from the scan stage to reporting and analysis.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::ext::ExtKey;
use crate::stats::{DirStats, ExtStats};

/// One regular file discovered during the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

/// Byte size to discovery-ordered paths of exactly that size.
///
/// Insertion order is preserved so one run's output is reproducible.
pub type SizeIndex = IndexMap<u64, Vec<PathBuf>>;

/// Everything one scan produced.
///
/// Populated monotonically during the walk and read-only afterwards; nothing
/// here survives across invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Canonicalized root that was scanned.
    pub root_path: PathBuf,

    /// Every accessible file, in discovery order.
    pub files: Vec<FileRecord>,

    /// Global per-extension statistics.
    pub ext_stats: HashMap<ExtKey, ExtStats>,

    /// Size buckets for duplicate candidate selection.
    pub size_index: SizeIndex,

    /// Rollup per directory, keyed by path relative to the root.
    /// The root itself is keyed by `"."`.
    pub dir_stats: HashMap<PathBuf, DirStats>,

    /// Total number of files.
    pub total_files: u64,

    /// Total number of directories (the root included).
    pub total_dirs: u64,

    /// Total size of all files in bytes.
    pub total_size: u64,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the walk.
    pub scan_duration: Duration,

    /// Entries skipped during the walk.
    pub warnings: Vec<ScanWarning>,
}

impl ScanResult {
    /// Rollup for the scan root, if present.
    pub fn root_stats(&self) -> Option<&DirStats> {
        self.dir_stats.get(Path::new("."))
    }

    /// The `n` largest files, ties broken by path for stable output.
    pub fn largest_files(&self, n: usize) -> Vec<&FileRecord> {
        let mut files: Vec<&FileRecord> = self.files.iter().collect();
        files.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        files.truncate(n);
        files
    }

    /// Whether any entries were skipped during the walk.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
