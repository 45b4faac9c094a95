//! Extension grouping keys.

use std::fmt;
use std::path::Path;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

/// Sentinel key for files without an extension.
pub const NO_EXT: &str = "<no_ext>";

/// Lowercased final file extension including the leading dot (`.jpg`),
/// or [`NO_EXT`] when the file has none.
///
/// Derived deterministically from a path; only the final suffix counts, so
/// `archive.tar.gz` keys as `.gz`. A filename ending in a bare dot has no
/// usable suffix and maps to the sentinel as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtKey(CompactString);

impl ExtKey {
    /// Derive the grouping key for a path.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if !ext.is_empty() => {
                let ext = ext.to_string_lossy().to_lowercase();
                Self(format_compact!(".{ext}"))
            }
            _ => Self::none(),
        }
    }

    /// The sentinel key for extensionless files.
    pub fn none() -> Self {
        Self(CompactString::const_new(NO_EXT))
    }

    /// Key as a displayable string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the extensionless sentinel.
    pub fn is_none(&self) -> bool {
        self.0 == NO_EXT
    }
}

impl fmt::Display for ExtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
