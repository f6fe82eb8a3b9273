use std::fs::File;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;

use crate::error::{BloatError, Result};

/// Read buffer size used while hashing.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Computes the BLAKE3 hash of a file's full content.
///
/// The file is streamed in [`CHUNK_SIZE`] chunks so memory use stays flat
/// regardless of file size.
///
/// # Returns
///
/// A hex-encoded string of the file's BLAKE3 hash.
///
/// # Errors
///
/// Returns [`BloatError::IoError`] if the file cannot be opened or read.
pub fn hash_file(path: &Path) -> Result<String> {
    let io_error = |source: std::io::Error| BloatError::IoError {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(io_error(err)),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
