//! `scan` and `clean`: project bloat under one directory tree.

use std::path::Path;

use super::{CommandContext, print_report, report, report_errors, resolve_root};
use crate::cleanup::{CleanupStats, remove_paths};
use crate::error::{BloatError, Result};
use crate::patterns::SafetyTier;
use crate::scanner::{BloatTarget, ScanResult, Scanner};
use crate::size::{format_size, parse_size};

/// Report project bloat under `path`.
pub(crate) fn scan(
    ctx: &CommandContext,
    path: &Path,
    deep: bool,
    min_size: &str,
    all: bool,
) -> Result<ScanResult> {
    let min_size = parse_size(min_size)?;
    let root = resolve_root(path)?;
    let result = scan_project(ctx, &root, deep, min_size);

    let targets: Vec<&BloatTarget> = result.targets.iter().collect();
    print_report(|out| {
        report::write_targets(out, "Project bloat", &targets, all)?;
        report::write_category_totals(out, &result)
    })?;

    Ok(result)
}

/// Remove the safe (and optionally caution) targets under `path`.
///
/// Without `execute` nothing is touched; the selection and the space it
/// would free are reported instead.
pub(crate) fn clean(
    ctx: &CommandContext,
    path: &Path,
    deep: bool,
    min_size: &str,
    include_caution: bool,
    execute: bool,
) -> Result<CleanupStats> {
    let min_size = parse_size(min_size)?;
    let root = resolve_root(path)?;
    if execute && ctx.guard.is_protected(&root, true) {
        return Err(BloatError::ProtectedPath { path: root });
    }
    let result = scan_project(ctx, &root, deep, min_size);

    let selected = select_for_clean(&result.targets, include_caution);
    let skipped = result.targets.len() - selected.len();
    if skipped > 0 {
        ctx.log.info(format!(
            "Leaving {skipped} target(s) that need review{}",
            if include_caution {
                ""
            } else {
                " (use --include-caution for caution targets)"
            }
        ));
    }

    let heading = if execute {
        "Removing"
    } else {
        "Would remove"
    };
    print_report(|out| report::write_targets(out, heading, &selected, true))?;
    if selected.is_empty() {
        return Ok(CleanupStats::default());
    }

    let stats = remove_paths(
        selected
            .iter()
            .map(|target| (target.path.as_path(), target.size_bytes)),
        &ctx.guard,
        !execute,
        &ctx.log,
    );
    print_report(|out| report::write_cleanup(out, &stats, !execute))?;

    Ok(stats)
}

/// Targets `clean` removes: safe ones, caution ones only on request, never
/// dangerous ones.
pub(crate) fn select_for_clean(
    targets: &[BloatTarget],
    include_caution: bool,
) -> Vec<&BloatTarget> {
    targets
        .iter()
        .filter(|target| match target.safety() {
            SafetyTier::Safe => true,
            SafetyTier::Caution => include_caution,
            SafetyTier::Dangerous => false,
        })
        .collect()
}

fn scan_project(ctx: &CommandContext, root: &Path, deep: bool, min_size: u64) -> ScanResult {
    let scanner = Scanner::builder()
        .guard(ctx.guard.clone())
        .deep(deep)
        .min_size(min_size)
        .parallelism(ctx.parallelism)
        .build();

    ctx.log.verbose(
        1,
        format!(
            "Scanning {} (max depth {}, min size {})",
            root.display(),
            scanner.max_depth(),
            format_size(min_size)
        ),
    );
    let result = scanner.scan_with_progress(root, &ctx.log);
    report_errors(&ctx.log, &result.errors);
    result
}
