//! JWalk-based directory walker.

use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, warn};

use dirlens_core::{ScanConfig, ScanError, ScanResult, ScanWarning};

use crate::accumulate::ScanAccumulator;

/// Walk the configured root and aggregate everything in one pass.
///
/// The root is validated up front; a missing path or a non-directory fails
/// with [`ScanError::InvalidRoot`] before any traversal begins. After that
/// no per-entry failure aborts the scan: entries that vanish or become
/// unreadable between discovery and stat are skipped and recorded as
/// warnings. No file content is read here.
pub fn scan(config: &ScanConfig) -> Result<ScanResult, ScanError> {
    let start = Instant::now();

    let root = config
        .root
        .canonicalize()
        .map_err(|_| ScanError::InvalidRoot {
            path: config.root.clone(),
        })?;
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot { path: root });
    }

    let parallelism = match config.threads {
        0 => Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_millis(100),
        },
        n => Parallelism::RayonNewPool(n),
    };

    let walker = WalkDir::new(&root)
        .parallelism(parallelism)
        .skip_hidden(!config.include_hidden)
        .follow_links(config.follow_symlinks)
        .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

    let mut acc = ScanAccumulator::new(&root);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                acc.record_warning(ScanWarning::read_error(path, err.to_string()));
                continue;
            }
        };

        let path = entry.path();
        if is_ignored(config, &root, &path) {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            acc.record_dir(&path);
        } else if file_type.is_file() {
            // Entries can vanish or lose permissions between discovery and
            // stat; such races skip the entry rather than abort the scan.
            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unstatable file");
                    let kind = err
                        .io_error()
                        .map(|io| io.kind())
                        .unwrap_or(std::io::ErrorKind::Other);
                    acc.record_warning(ScanWarning::metadata_error(&path, kind, &err.to_string()));
                    continue;
                }
            };
            acc.record_file(path, size);
        }
        // Symlinks and special files carry no size of their own and are not
        // followed; they contribute to no statistics.
    }

    let result = acc.finish(start.elapsed());
    debug!(
        files = result.total_files,
        dirs = result.total_dirs,
        bytes = result.total_size,
        warnings = result.warnings.len(),
        "scan complete"
    );
    Ok(result)
}

/// Check the path against the ignore patterns, component by component, so
/// ignoring a directory name also drops everything beneath it.
fn is_ignored(config: &ScanConfig, root: &std::path::Path, path: &std::path::Path) -> bool {
    if config.ignore_patterns.is_empty() {
        return false;
    }
    let Ok(rel) = path.strip_prefix(root) else {
        return false;
    };
    rel.components()
        .any(|c| config.should_ignore(&c.as_os_str().to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let result = scan(&config).unwrap();

        assert_eq!(result.total_files, 4);
        assert_eq!(result.total_size, 5 + 17 + 4 + 17);
        // root + dir1 + dir2 + subdir
        assert_eq!(result.total_dirs, 4);
    }

    #[test]
    fn test_root_rollup_equals_sum_of_all_files() {
        let temp = create_test_tree();
        let result = scan(&ScanConfig::new(temp.path())).unwrap();

        let root = result.root_stats().unwrap();
        assert_eq!(root.count, result.total_files);
        assert_eq!(root.size, result.total_size);
    }

    #[test]
    fn test_nested_rollups() {
        let temp = create_test_tree();
        let result = scan(&ScanConfig::new(temp.path())).unwrap();

        let dir1 = &result.dir_stats[Path::new("dir1")];
        assert_eq!(dir1.count, 2);
        assert_eq!(dir1.size, 17 + 4);

        let subdir = &result.dir_stats[Path::new("dir1/subdir")];
        assert_eq!(subdir.count, 1);
        assert_eq!(subdir.size, 4);
    }

    #[test]
    fn test_invalid_root_missing_path() {
        let config = ScanConfig::new("/definitely/not/a/real/path");
        let err = scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::InvalidRoot { .. }));
    }

    #[test]
    fn test_invalid_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "not a directory").unwrap();

        let err = scan(&ScanConfig::new(&file)).unwrap_err();
        assert!(matches!(err, ScanError::InvalidRoot { .. }));
    }

    #[test]
    fn test_empty_tree_reports_root_with_zero_counts() {
        let temp = TempDir::new().unwrap();
        let result = scan(&ScanConfig::new(temp.path())).unwrap();

        assert_eq!(result.total_files, 0);
        assert_eq!(result.total_size, 0);
        let root = result.root_stats().unwrap();
        assert_eq!(root.count, 0);
        assert_eq!(root.size, 0);
    }

    #[test]
    fn test_ignore_patterns_prune_whole_subtrees() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["dir2".to_string()])
            .build()
            .unwrap();

        let result = scan(&config).unwrap();

        assert_eq!(result.total_files, 3);
        assert!(!result.dir_stats.contains_key(Path::new("dir2")));
    }

    #[test]
    fn test_size_index_buckets_by_exact_size() {
        let temp = create_test_tree();
        let result = scan(&ScanConfig::new(temp.path())).unwrap();

        // file2.txt and file4.txt are both 17 bytes
        assert_eq!(result.size_index[&17].len(), 2);
        assert_eq!(result.size_index[&5].len(), 1);
        assert_eq!(result.size_index[&4].len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped_with_a_warning() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("real.txt"), "present").unwrap();
        std::os::unix::fs::symlink("no-such-target", temp.path().join("dangling")).unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .follow_symlinks(true)
            .build()
            .unwrap();
        let result = scan(&config).unwrap();

        // The link cannot be resolved, so it is skipped; the scan still
        // completes and counts everything else.
        assert_eq!(result.total_files, 1);
        assert_eq!(result.total_size, 7);
        assert!(result.has_warnings());
    }

    #[test]
    fn test_empty_directories_appear_in_rollup_map() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("vacant")).unwrap();

        let result = scan(&ScanConfig::new(temp.path())).unwrap();
        assert!(result.dir_stats[Path::new("vacant")].is_empty());
    }
}
