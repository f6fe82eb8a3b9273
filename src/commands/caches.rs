//! `caches` and `packages`: system-wide cache reports.

use std::path::{Path, PathBuf};

use super::{CommandContext, print_report, report, report_errors, resolve_root};
use crate::error::{BloatError, Result};
use crate::patterns::{CacheGroups, PackageManager, Registry};
use crate::platform::{self, HostPlatform};
use crate::scanner::{BloatTarget, CACHE_MAX_DEPTH, ScanResult, Scanner};
use crate::size::parse_size;

/// Report browser, package manager and application caches.
pub(crate) fn caches(
    ctx: &CommandContext,
    roots: &[PathBuf],
    groups: CacheGroups,
    include_windows: bool,
    min_size: &str,
    all: bool,
) -> Result<ScanResult> {
    if !groups.browsers && !groups.package_managers && !groups.apps {
        return Err(BloatError::ConfigError {
            message: "every cache group is disabled; nothing to scan".to_string(),
        });
    }

    let min_size = parse_size(min_size)?;
    let roots = cache_scan_roots(
        ctx,
        roots,
        DefaultRoots {
            host: platform::cache_roots,
            wsl: platform::wsl_cache_roots,
            include_windows,
        },
    )?;
    let result = scan_caches(ctx, Registry::system_caches(groups), &roots, min_size);

    let targets: Vec<&BloatTarget> = result.targets.iter().collect();
    print_report(|out| {
        report::write_targets(out, "System caches", &targets, all)?;
        report::write_category_totals(out, &result)
    })?;

    Ok(result)
}

/// Report package manager caches, leaving out the managers in `skip`.
pub(crate) fn packages(
    ctx: &CommandContext,
    roots: &[PathBuf],
    skip: &[String],
    include_windows: bool,
    min_size: &str,
    all: bool,
) -> Result<ScanResult> {
    let skipped = skip
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse::<PackageManager>())
        .collect::<Result<Vec<_>>>()?;
    let enabled: Vec<PackageManager> = PackageManager::ALL
        .into_iter()
        .filter(|manager| !skipped.contains(manager))
        .collect();
    if enabled.is_empty() {
        return Err(BloatError::ConfigError {
            message: "every package manager is skipped; nothing to scan".to_string(),
        });
    }

    let min_size = parse_size(min_size)?;
    let roots = cache_scan_roots(
        ctx,
        roots,
        DefaultRoots {
            host: platform::package_roots,
            wsl: platform::wsl_package_roots,
            include_windows,
        },
    )?;
    let result = scan_caches(ctx, Registry::package_managers(&enabled), &roots, min_size);

    let targets: Vec<&BloatTarget> = result.targets.iter().collect();
    print_report(|out| {
        report::write_targets(out, "Package caches", &targets, all)?;
        report::write_manager_totals(out, &result)
    })?;

    Ok(result)
}

/// Where a command looks when no roots are given.
struct DefaultRoots {
    host: fn(HostPlatform, &Path) -> Vec<PathBuf>,
    /// Roots under the Windows home when running inside WSL
    wsl: fn(&Path) -> Vec<PathBuf>,
    include_windows: bool,
}

/// Explicit roots must all exist; without any, the platform defaults under
/// the guard's home directory are used, plus the Windows side under WSL.
fn cache_scan_roots(
    ctx: &CommandContext,
    roots: &[PathBuf],
    defaults: DefaultRoots,
) -> Result<Vec<PathBuf>> {
    if !roots.is_empty() {
        return roots.iter().map(|root| resolve_root(root)).collect();
    }

    let home = ctx.guard.home().ok_or_else(|| BloatError::ConfigError {
        message: "could not determine the home directory; pass cache roots explicitly"
            .to_string(),
    })?;
    let platform = ctx.guard.platform();
    let mut roots = (defaults.host)(platform, home);
    ctx.log.verbose(
        1,
        format!("Using {} default root(s) for {platform}", roots.len()),
    );

    let windows_home = ctx.wsl.as_ref().and_then(|wsl| wsl.windows_home.as_deref());
    match windows_home {
        Some(windows_home) if defaults.include_windows => {
            let windows_roots = (defaults.wsl)(windows_home);
            ctx.log.verbose(
                1,
                format!(
                    "Including {} Windows root(s) under {}",
                    windows_roots.len(),
                    windows_home.display()
                ),
            );
            roots.extend(windows_roots);
        }
        Some(windows_home) => ctx.log.verbose(
            1,
            format!("Leaving out Windows roots under {}", windows_home.display()),
        ),
        None => {}
    }

    Ok(roots)
}

fn scan_caches(
    ctx: &CommandContext,
    registry: Registry,
    roots: &[PathBuf],
    min_size: u64,
) -> ScanResult {
    let scanner = Scanner::builder()
        .registry(registry)
        .guard(ctx.guard.clone())
        .max_depth(CACHE_MAX_DEPTH)
        .min_size(min_size)
        .parallelism(ctx.parallelism)
        .build();

    for root in roots {
        ctx.log.verbose(2, format!("Cache root: {}", root.display()));
    }
    let result = scanner.scan_roots(roots, &ctx.log);
    report_errors(&ctx.log, &result.errors);
    result
}
