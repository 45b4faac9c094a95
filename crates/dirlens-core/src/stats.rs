//! Per-scope accumulator types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ext::ExtKey;

/// Count and total size for one extension within one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtStats {
    /// Number of files.
    pub count: u64,
    /// Total size in bytes.
    pub size: u64,
}

impl ExtStats {
    /// Fold one file into the accumulator.
    pub fn record(&mut self, size: u64) {
        self.count += 1;
        self.size += size;
    }
}

/// Cumulative statistics for one directory.
///
/// Totals cover the directory's own files plus every nested subdirectory:
/// each discovered file is folded into its own directory and every ancestor
/// exactly once, so no re-walk is needed to answer "how big is this subtree".
/// The per-extension map is allocated independently per directory, never
/// shared with a parent or child.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirStats {
    /// Number of files in this subtree.
    pub count: u64,
    /// Total size of this subtree in bytes.
    pub size: u64,
    /// Extension breakdown for this subtree.
    pub by_ext: HashMap<ExtKey, ExtStats>,
}

impl DirStats {
    /// Fold one file into this directory's rollup.
    pub fn record(&mut self, key: &ExtKey, size: u64) {
        self.count += 1;
        self.size += size;
        self.by_ext.entry(key.clone()).or_default().record(size);
    }

    /// Whether this directory's subtree holds no files.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
