//! Streaming content hashing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use dirlens_core::{ContentHash, ScanError};

/// Read size for streaming hashes. Files of any size are digested chunk by
/// chunk; the whole file is never held in memory.
const CHUNK_SIZE: usize = 1024 * 1024;

/// Compute the BLAKE3 digest of a file's contents.
///
/// Fails with [`ScanError::UnreadableFile`] if the file cannot be opened or
/// fully read; callers drop such paths from duplicate consideration.
pub fn hash_file(path: &Path) -> Result<ContentHash, ScanError> {
    let mut file = File::open(path).map_err(|source| ScanError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buffer).map_err(|source| ScanError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}
