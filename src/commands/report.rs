//! Plain-text reports written to stdout.

use std::io::{self, Write};

use super::info::HostInfo;
use crate::cleanup::CleanupStats;
use crate::duplicates::{DuplicateResult, KeepStrategy};
use crate::platform::WSL_USERS_DIR;
use crate::scanner::{BloatTarget, ScanResult};
use crate::size::format_size;

/// Rows shown when `--all` is not given
pub(crate) const DEFAULT_LIMIT: usize = 20;

fn limit(all: bool) -> usize {
    if all { usize::MAX } else { DEFAULT_LIMIT }
}

/// Table of targets, largest first.
pub(crate) fn write_targets<W: Write>(
    out: &mut W,
    heading: &str,
    targets: &[&BloatTarget],
    all: bool,
) -> io::Result<()> {
    if targets.is_empty() {
        writeln!(out, "{heading}: nothing found")?;
        return Ok(());
    }

    let total: u64 = targets.iter().map(|target| target.size_bytes).sum();
    writeln!(
        out,
        "{heading}: {} target(s), {}",
        targets.len(),
        format_size(total)
    )?;
    writeln!(
        out,
        "  {:>10}  {:<9}  {:<22}  PATH",
        "SIZE", "SAFETY", "CATEGORY"
    )?;

    let shown = limit(all);
    for target in targets.iter().take(shown) {
        writeln!(
            out,
            "  {:>10}  {:<9}  {:<22}  {}",
            format_size(target.size_bytes),
            target.safety(),
            target.category(),
            target.path.display()
        )?;
    }
    if targets.len() > shown {
        writeln!(
            out,
            "  ... and {} more (use --all to show everything)",
            targets.len() - shown
        )?;
    }
    Ok(())
}

/// Per-category totals of a scan.
pub(crate) fn write_category_totals<W: Write>(out: &mut W, result: &ScanResult) -> io::Result<()> {
    let totals = result.category_totals();
    if totals.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "By category:")?;
    for (category, bytes) in totals {
        writeln!(out, "  {category:<24}  {:>10}", format_size(bytes))?;
    }
    Ok(())
}

/// Per-package-manager totals of a scan.
pub(crate) fn write_manager_totals<W: Write>(out: &mut W, result: &ScanResult) -> io::Result<()> {
    let totals = result.manager_totals();
    if totals.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "By package manager:")?;
    for (manager, bytes) in totals {
        writeln!(out, "  {manager:<24}  {:>10}", format_size(bytes))?;
    }
    Ok(())
}

/// Duplicate groups with the copy each keeps under `strategy`.
pub(crate) fn write_duplicates<W: Write>(
    out: &mut W,
    result: &DuplicateResult,
    strategy: KeepStrategy,
    all: bool,
) -> io::Result<()> {
    if result.groups.is_empty() {
        writeln!(
            out,
            "No duplicates among {} file(s) under {}",
            result.files_scanned,
            result.root.display()
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "{} duplicate group(s), {} removable file(s), {} wasted (keeping {strategy})",
        result.groups.len(),
        result.total_duplicates(),
        format_size(result.total_wasted)
    )?;

    let shown = limit(all);
    for group in result.groups.iter().take(shown) {
        writeln!(out)?;
        writeln!(
            out,
            "  {} x {} ({} wasted)  {}",
            group.files.len(),
            format_size(group.size_bytes),
            format_size(group.wasted_bytes()),
            &group.hash[..group.hash.len().min(16)]
        )?;
        writeln!(out, "    keep    {}", group.select_keep(strategy).path.display())?;
        for file in group.select_delete(strategy) {
            writeln!(out, "    remove  {}", file.path.display())?;
        }
    }
    if result.groups.len() > shown {
        writeln!(out)?;
        writeln!(
            out,
            "  ... and {} more group(s) (use --all to show everything)",
            result.groups.len() - shown
        )?;
    }
    Ok(())
}

/// Outcome line of a cleanup run.
pub(crate) fn write_cleanup<W: Write>(
    out: &mut W,
    stats: &CleanupStats,
    dry_run: bool,
) -> io::Result<()> {
    writeln!(out)?;
    if dry_run {
        writeln!(
            out,
            "Dry run: would free {} from {} path(s). Re-run with --execute to delete.",
            format_size(stats.bytes_freed),
            stats.removed
        )?;
    } else {
        writeln!(
            out,
            "Freed {} from {} path(s).",
            format_size(stats.bytes_freed),
            stats.removed
        )?;
    }
    if stats.failed > 0 {
        writeln!(out, "{} path(s) could not be removed.", stats.failed)?;
    }
    if stats.skipped_protected > 0 {
        writeln!(
            out,
            "{} protected path(s) were skipped.",
            stats.skipped_protected
        )?;
    }
    Ok(())
}

/// Platform summary for `info`.
pub(crate) fn write_info<W: Write>(out: &mut W, host: &HostInfo) -> io::Result<()> {
    writeln!(out, "System information")?;
    writeln!(out, "  Platform: {}", host.platform)?;
    if let Some(variant) = &host.variant {
        writeln!(out, "  Variant:  {variant}")?;
    }
    match &host.home {
        Some(home) => writeln!(out, "  Home:     {}", home.display())?,
        None => writeln!(out, "  Home:     unknown")?,
    }
    if let Some(wsl) = &host.wsl {
        writeln!(out, "  WSL:      yes ({})", wsl.distro)?;
        match &wsl.windows_home {
            Some(windows_home) => writeln!(out, "  Windows:  {}", windows_home.display())?,
            None => writeln!(out, "  Windows:  not found under {WSL_USERS_DIR}")?,
        }
    }
    writeln!(out, "bloat-hunter v{}", env!("CARGO_PKG_VERSION"))
}
