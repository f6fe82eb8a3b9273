use std::path::Path;

use walkdir::WalkDir;

use crate::error::{BloatError, Result};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;

/// Unit suffixes, longest first so "KB" is never read as "B".
const UNITS: &[(&str, u64)] = &[("TB", TB), ("GB", GB), ("MB", MB), ("KB", KB), ("B", 1)];

/// Parse a size string like "10MB", "1.5GB", "100B" or "2048" into bytes.
///
/// Units are binary multiples and case-insensitive. A bare number is a byte
/// count. Negative, non-finite and unparsable values are rejected.
pub fn parse_size(s: &str) -> Result<u64> {
    let upper = s.trim().to_ascii_uppercase();

    let (number, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|number| (number.trim(), *multiplier))
        })
        .unwrap_or((upper.as_str(), 1));

    if number.is_empty() {
        return Err(invalid(s, "No number found"));
    }

    // Exact integer path first so large byte counts keep full precision
    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| invalid(s, "Size is too large"));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| invalid(s, "Invalid number format"))?;

    if !value.is_finite() {
        return Err(invalid(s, "Size must be a finite number"));
    }
    if value < 0.0 {
        return Err(invalid(s, "Size cannot be negative"));
    }

    let bytes = value * multiplier as f64;
    if bytes >= u64::MAX as f64 {
        return Err(invalid(s, "Size is too large"));
    }

    Ok(bytes as u64)
}

fn invalid(value: &str, reason: &str) -> BloatError {
    BloatError::InvalidSize {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Format size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const LABELS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < LABELS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, LABELS[0])
    } else {
        format!("{:.1} {}", size, LABELS[unit_idx])
    }
}

/// Recursive size of a directory tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirSize {
    /// Sum of regular file lengths
    pub bytes: u64,
    /// Number of regular files
    pub files: u64,
}

/// Computes the total size and file count below `path`.
///
/// Symbolic links are neither followed nor counted. Entries that cannot be
/// read contribute nothing, and a directory that cannot be opened at all
/// measures as zero.
pub fn directory_size(path: &Path) -> DirSize {
    let mut size = DirSize::default();

    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(metadata) = entry.metadata() {
            size.bytes += metadata.len();
            size.files += 1;
        }
    }

    size
}
