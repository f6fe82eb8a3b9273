//! `duplicates`: identical files under one directory tree.

use std::path::Path;

use super::{CommandContext, print_report, report, report_errors, resolve_root};
use crate::cleanup::remove_paths;
use crate::duplicates::{DuplicateResult, DuplicateScanner, KeepStrategy};
use crate::error::{BloatError, Result};
use crate::size::{format_size, parse_size};

/// Report duplicate files under `path` and, with `execute`, delete every
/// copy except the one `keep` selects.
pub(crate) fn duplicates(
    ctx: &CommandContext,
    path: &Path,
    min_size: &str,
    keep: &str,
    all: bool,
    execute: bool,
) -> Result<DuplicateResult> {
    let min_size = parse_size(min_size)?;
    let strategy: KeepStrategy = keep.parse()?;
    let root = resolve_root(path)?;
    if execute && ctx.guard.is_protected(&root, true) {
        return Err(BloatError::ProtectedPath { path: root });
    }

    ctx.log.verbose(
        1,
        format!(
            "Looking for duplicates under {} (min size {}, keep {strategy})",
            root.display(),
            format_size(min_size)
        ),
    );
    let result = DuplicateScanner::builder()
        .min_size(min_size)
        .guard(ctx.guard.clone())
        .parallelism(ctx.parallelism)
        .build()
        .scan_with_progress(&root, &ctx.log);
    report_errors(&ctx.log, &result.errors);

    print_report(|out| report::write_duplicates(out, &result, strategy, all))?;

    if execute && !result.groups.is_empty() {
        let doomed = result
            .groups
            .iter()
            .flat_map(|group| group.select_delete(strategy))
            .map(|file| (file.path.as_path(), file.size_bytes));
        let stats = remove_paths(doomed, &ctx.guard, false, &ctx.log);
        print_report(|out| report::write_cleanup(out, &stats, false))?;
    }

    Ok(result)
}
