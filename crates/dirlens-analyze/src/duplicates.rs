//! Duplicate file detection over the size index.
//!
//! Size alone is necessary but not sufficient for duplication: buckets with
//! a single occupant are discarded without hashing, and within a surviving
//! bucket only paths sharing a content digest are grouped.

use std::collections::HashMap;
use std::path::PathBuf;

use derive_builder::Builder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dirlens_core::{ContentHash, ScanResult};

use crate::hash::hash_file;

/// Configuration for duplicate detection.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Minimum file size to consider. Zero keeps empty files eligible;
    /// they are trivially identical and form one group.
    #[builder(default = "0")]
    #[serde(default)]
    pub min_size: u64,

    /// Maximum number of groups to return (0 = unlimited).
    #[builder(default = "0")]
    #[serde(default)]
    pub max_groups: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            max_groups: 0,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// A group of files with identical size and identical content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content hash shared by all files in this group.
    pub hash: ContentHash,

    /// Size of each file in bytes.
    pub size: u64,

    /// Paths to all duplicate files, sorted.
    pub paths: Vec<PathBuf>,

    /// Wasted space: size * (count - 1).
    pub wasted_bytes: u64,
}

impl DuplicateGroup {
    /// Number of files in this group.
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// How many files could be deleted while keeping one copy.
    pub fn deletable_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Results from one duplicate-resolution pass.
///
/// A derived, read-only snapshot; groups are computed once, never
/// incrementally maintained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Confirmed groups, sorted by wasted space descending.
    pub groups: Vec<DuplicateGroup>,

    /// Number of candidate files selected for hashing. A candidate whose
    /// read fails still counts here but drops from its bucket.
    pub candidates_hashed: u64,

    /// Number of files that have at least one duplicate.
    pub files_with_duplicates: u64,

    /// Total wasted space across all groups.
    pub total_wasted_space: u64,

    /// Number of groups.
    pub group_count: usize,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Duplicate file finder.
pub struct DuplicateFinder {
    config: DuplicateConfig,
}

impl DuplicateFinder {
    /// Create a finder with the default config.
    pub fn new() -> Self {
        Self {
            config: DuplicateConfig::default(),
        }
    }

    /// Create a finder with a custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Resolve the scan's size buckets into confirmed duplicate groups.
    ///
    /// Runs strictly after the walk: the complete bucket population decides
    /// which sizes are worth hashing. Buckets are hashed in parallel; the
    /// final ordering (wasted bytes descending, then path) makes the output
    /// deterministic for an unchanged tree.
    pub fn find_duplicates(&self, scan: &ScanResult) -> DuplicateReport {
        let candidates: Vec<(u64, &Vec<PathBuf>)> = scan
            .size_index
            .iter()
            .filter(|(size, paths)| paths.len() >= 2 && **size >= self.config.min_size)
            .map(|(size, paths)| (*size, paths))
            .collect();

        let candidates_hashed: u64 = candidates.iter().map(|(_, p)| p.len() as u64).sum();
        debug!(
            buckets = candidates.len(),
            files = candidates_hashed,
            "hashing duplicate candidates"
        );

        let mut groups: Vec<DuplicateGroup> = candidates
            .into_par_iter()
            .flat_map(|(size, paths)| resolve_bucket(size, paths))
            .collect();

        for group in &mut groups {
            group.paths.sort();
        }
        groups.sort_by(|a, b| {
            b.wasted_bytes
                .cmp(&a.wasted_bytes)
                .then_with(|| a.paths.cmp(&b.paths))
        });
        if self.config.max_groups > 0 && groups.len() > self.config.max_groups {
            groups.truncate(self.config.max_groups);
        }

        let files_with_duplicates: u64 = groups.iter().map(|g| g.paths.len() as u64).sum();
        let total_wasted_space: u64 = groups.iter().map(|g| g.wasted_bytes).sum();
        let group_count = groups.len();

        DuplicateReport {
            groups,
            candidates_hashed,
            files_with_duplicates,
            total_wasted_space,
            group_count,
        }
    }
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash every path in one size bucket and keep digest groups of two or more.
///
/// A path that fails to hash drops out of the bucket without affecting the
/// rest, mirroring the walker's skip policy for transient races.
fn resolve_bucket(size: u64, paths: &[PathBuf]) -> Vec<DuplicateGroup> {
    let mut by_hash: HashMap<ContentHash, Vec<PathBuf>> = HashMap::new();

    for path in paths {
        match hash_file(path) {
            Ok(hash) => by_hash.entry(hash).or_default().push(path.clone()),
            Err(err) => {
                warn!(error = %err, "dropping unhashable duplicate candidate");
            }
        }
    }

    by_hash
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(hash, paths)| DuplicateGroup {
            hash,
            size,
            wasted_bytes: size * (paths.len() as u64 - 1),
            paths,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirlens_scan::{ScanConfig, scan};
    use std::fs;
    use tempfile::TempDir;

    fn scan_tree(temp: &TempDir) -> dirlens_core::ScanResult {
        scan(&ScanConfig::new(temp.path())).unwrap()
    }

    #[test]
    fn test_same_size_different_content_is_not_grouped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "aaaa").unwrap();
        fs::write(temp.path().join("b"), "bbbb").unwrap();

        let report = DuplicateFinder::new().find_duplicates(&scan_tree(&temp));

        assert_eq!(report.candidates_hashed, 2);
        assert!(!report.has_duplicates());
    }

    #[test]
    fn test_unique_sizes_are_never_hashed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "x").unwrap();
        fs::write(temp.path().join("b"), "xy").unwrap();
        fs::write(temp.path().join("c"), "xyz").unwrap();

        let report = DuplicateFinder::new().find_duplicates(&scan_tree(&temp));

        assert_eq!(report.candidates_hashed, 0);
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_confirmed_duplicates_form_one_group() {
        let temp = TempDir::new().unwrap();
        let content = "0".repeat(200);
        fs::write(temp.path().join("one.bin"), &content).unwrap();
        fs::write(temp.path().join("two.bin"), &content).unwrap();
        fs::write(temp.path().join("odd.bin"), "1".repeat(200)).unwrap();

        let report = DuplicateFinder::new().find_duplicates(&scan_tree(&temp));

        assert_eq!(report.group_count, 1);
        let group = &report.groups[0];
        assert_eq!(group.count(), 2);
        assert_eq!(group.size, 200);
        assert_eq!(group.wasted_bytes, 200);
        assert!(!group.paths.iter().any(|p| p.ends_with("odd.bin")));
    }

    #[test]
    fn test_empty_files_group_together() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("e1"), "").unwrap();
        fs::write(temp.path().join("e2"), "").unwrap();
        fs::write(temp.path().join("e3"), "").unwrap();

        let report = DuplicateFinder::new().find_duplicates(&scan_tree(&temp));

        assert_eq!(report.group_count, 1);
        assert_eq!(report.groups[0].count(), 3);
        assert_eq!(report.groups[0].size, 0);
        assert_eq!(report.groups[0].wasted_bytes, 0);
    }

    #[test]
    fn test_min_size_excludes_small_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("e1"), "").unwrap();
        fs::write(temp.path().join("e2"), "").unwrap();

        let config = DuplicateConfig::builder().min_size(1u64).build().unwrap();
        let report = DuplicateFinder::with_config(config).find_duplicates(&scan_tree(&temp));

        assert_eq!(report.candidates_hashed, 0);
        assert!(!report.has_duplicates());
    }

    #[test]
    fn test_max_groups_truncates_after_sorting() {
        let temp = TempDir::new().unwrap();
        // Two groups with different wasted space
        fs::write(temp.path().join("big1"), "B".repeat(500)).unwrap();
        fs::write(temp.path().join("big2"), "B".repeat(500)).unwrap();
        fs::write(temp.path().join("small1"), "s".repeat(10)).unwrap();
        fs::write(temp.path().join("small2"), "s".repeat(10)).unwrap();

        let config = DuplicateConfig::builder().max_groups(1usize).build().unwrap();
        let report = DuplicateFinder::with_config(config).find_duplicates(&scan_tree(&temp));

        assert_eq!(report.group_count, 1);
        assert_eq!(report.groups[0].size, 500);
    }

    #[test]
    fn test_unhashable_candidate_drops_without_poisoning_the_bucket() {
        let temp = TempDir::new().unwrap();
        let content = "z".repeat(64);
        fs::write(temp.path().join("keep1"), &content).unwrap();
        fs::write(temp.path().join("keep2"), &content).unwrap();
        fs::write(temp.path().join("gone"), &content).unwrap();

        let scan_result = scan_tree(&temp);
        // A file vanishing between the walk and hashing drops out of its
        // bucket; the remaining occupants still resolve.
        fs::remove_file(temp.path().join("gone")).unwrap();

        let report = DuplicateFinder::new().find_duplicates(&scan_result);

        assert_eq!(report.candidates_hashed, 3);
        assert_eq!(report.group_count, 1);
        assert_eq!(report.groups[0].count(), 2);
        assert!(!report.groups[0].paths.iter().any(|p| p.ends_with("gone")));
    }

    #[test]
    fn test_result_is_deterministic_for_fixed_tree() {
        let temp = TempDir::new().unwrap();
        for i in 0..3 {
            fs::write(temp.path().join(format!("p{i}")), "payload-a").unwrap();
            fs::write(temp.path().join(format!("q{i}")), "payload-b").unwrap();
        }

        let scan_result = scan_tree(&temp);
        let finder = DuplicateFinder::new();
        let first = finder.find_duplicates(&scan_result);
        let second = finder.find_duplicates(&scan_result);

        assert_eq!(first.group_count, second.group_count);
        for (a, b) in first.groups.iter().zip(second.groups.iter()) {
            assert_eq!(a.hash, b.hash);
            assert_eq!(a.paths, b.paths);
        }
    }
}
