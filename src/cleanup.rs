//! Permanent removal of selected targets.

use std::fs;
use std::path::Path;

use crate::error::{BloatError, Result};
use crate::guard::PathGuard;
use crate::logging::Logger;
use crate::size::format_size;

/// Statistics about a cleanup run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupStats {
    /// Paths removed (or that would be, in a dry run)
    pub removed: usize,
    /// Paths whose removal failed
    pub failed: usize,
    /// Paths refused by the guard
    pub skipped_protected: usize,
    /// Bytes freed (or that would be, in a dry run)
    pub bytes_freed: u64,
}

/// Removes every `(path, size)` entry.
///
/// Each path is checked against `guard` in deletion mode right before it is
/// touched, so project roots and credentials are refused even if they were
/// selected. A failure is counted and logged; it never stops the run.
pub fn remove_paths<'a, I>(
    entries: I,
    guard: &PathGuard,
    dry_run: bool,
    log: &Logger,
) -> CleanupStats
where
    I: IntoIterator<Item = (&'a Path, u64)>,
{
    let mut stats = CleanupStats::default();

    for (path, size) in entries {
        if guard.is_protected(path, false) {
            log.info(format!("Skipping protected path: {}", path.display()));
            stats.skipped_protected += 1;
            continue;
        }

        if dry_run {
            log.verbose(
                1,
                format!("Would remove {} ({})", path.display(), format_size(size)),
            );
            stats.removed += 1;
            stats.bytes_freed += size;
            continue;
        }

        match remove_path(path) {
            Ok(()) => {
                log.verbose(1, format!("Removed {} ({})", path.display(), format_size(size)));
                stats.removed += 1;
                stats.bytes_freed += size;
            }
            Err(BloatError::IoError { path, source }) => {
                log.info(format!("Failed to remove {}: {source}", path.display()));
                stats.failed += 1;
            }
            Err(err) => {
                log.info(format!("Failed to remove {}: {err}", path.display()));
                stats.failed += 1;
            }
        }
    }

    stats
}

/// Removes a directory tree or a single file. Symlinks are unlinked, never
/// followed.
pub fn remove_path(path: &Path) -> Result<()> {
    let io_error = |source: std::io::Error| BloatError::IoError {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::symlink_metadata(path).map_err(io_error)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(io_error)
    } else {
        fs::remove_file(path).map_err(io_error)
    }
}
