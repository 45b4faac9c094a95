//! Single-pass accumulation of walker output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use dirlens_core::{DirStats, ExtKey, ExtStats, FileRecord, ScanResult, ScanWarning, SizeIndex};

/// Result accumulator owned by one scan invocation.
///
/// Consumes the walker's (path, size) stream and maintains all output
/// structures in one linear pass: totals, the global extension table, the
/// size index, and the per-directory rollups. Each file is folded into its
/// own directory and every ancestor up to the root exactly once, so every
/// directory's totals already cover its whole subtree when the walk ends.
#[derive(Debug)]
pub struct ScanAccumulator {
    root: PathBuf,
    files: Vec<FileRecord>,
    ext_stats: HashMap<ExtKey, ExtStats>,
    size_index: SizeIndex,
    dir_stats: HashMap<PathBuf, DirStats>,
    total_files: u64,
    total_dirs: u64,
    total_size: u64,
    warnings: Vec<ScanWarning>,
    started_at: SystemTime,
}

impl ScanAccumulator {
    /// Create an empty accumulator for the given (canonicalized) root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        // Seed the root so an empty tree still reports a rollup for ".".
        let mut dir_stats = HashMap::new();
        dir_stats.insert(PathBuf::from("."), DirStats::default());

        Self {
            root: root.into(),
            files: Vec::new(),
            ext_stats: HashMap::new(),
            size_index: SizeIndex::new(),
            dir_stats,
            total_files: 0,
            total_dirs: 0,
            total_size: 0,
            warnings: Vec::new(),
            started_at: SystemTime::now(),
        }
    }

    /// Fold one regular file into every output structure.
    pub fn record_file(&mut self, path: PathBuf, size: u64) {
        self.total_files += 1;
        self.total_size += size;

        let key = ExtKey::from_path(&path);
        self.ext_stats.entry(key.clone()).or_default().record(size);

        self.size_index.entry(size).or_default().push(path.clone());

        for dir in ancestor_chain(&self.relative_dir(&path)) {
            self.dir_stats.entry(dir).or_default().record(&key, size);
        }

        self.files.push(FileRecord { path, size });
    }

    /// Register a directory so it appears in the rollup map even when its
    /// subtree holds no files.
    pub fn record_dir(&mut self, path: &Path) {
        self.total_dirs += 1;
        let rel = relative_or_root(path.strip_prefix(&self.root).unwrap_or(path));
        self.dir_stats.entry(rel).or_default();
    }

    /// Record a skipped entry.
    pub fn record_warning(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }

    /// Seal the accumulator into a read-only scan result.
    pub fn finish(self, scan_duration: Duration) -> ScanResult {
        ScanResult {
            root_path: self.root,
            files: self.files,
            ext_stats: self.ext_stats,
            size_index: self.size_index,
            dir_stats: self.dir_stats,
            total_files: self.total_files,
            total_dirs: self.total_dirs,
            total_size: self.total_size,
            scanned_at: self.started_at,
            scan_duration,
            warnings: self.warnings,
        }
    }

    /// Directory containing `file`, relative to the scan root.
    fn relative_dir(&self, file: &Path) -> PathBuf {
        let parent = file.parent().unwrap_or(Path::new(""));
        parent
            .strip_prefix(&self.root)
            .unwrap_or(Path::new(""))
            .to_path_buf()
    }
}

/// The directory itself, each ancestor, then the root marker, each once.
///
/// The root is always represented by `"."` so it shares the rollup map with
/// every named ancestor; a file sitting directly in the root contributes to
/// the root entry exactly once.
fn ancestor_chain(rel_dir: &Path) -> Vec<PathBuf> {
    let mut chain = Vec::new();
    let mut current = rel_dir;
    while !current.as_os_str().is_empty() {
        chain.push(current.to_path_buf());
        current = current.parent().unwrap_or(Path::new(""));
    }
    chain.push(PathBuf::from("."));
    chain
}

/// Map the empty relative path (the root itself) to its `"."` key.
fn relative_or_root(rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel.to_path_buf()
    }
}
