//! Implementation of bloat-hunter subcommands.
//!
//! `mod.rs` is a thin dispatcher; command logic lives in dedicated modules
//! (`scan` for scan and clean, `duplicates`, `caches` for caches and
//! packages, `info`) and every report is rendered by `report`.
//!
//! # Example
//!
//! ```no_run
//! use bloat_hunter::cli::Cli;
//! use bloat_hunter::commands;
//!
//! // Parse CLI arguments and execute the command
//! let cli = Cli::parse_args();
//! if let Err(e) = commands::execute(&cli) {
//!     eprintln!("Error: {e:?}");
//! }
//! ```

use std::io::{self, StdoutLock};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use crate::error::{BloatError, Result};
use crate::guard::{PathGuard, lexically_clean};
use crate::logging::Logger;
use crate::parallel::Parallelism;
use crate::patterns::CacheGroups;
use crate::platform::{self, HostPlatform, WslInfo};

pub(crate) mod caches;
pub(crate) mod duplicates;
pub(crate) mod info;
pub(crate) mod report;
pub(crate) mod scan;


/// Everything a command needs besides its own arguments.
#[derive(Clone, Debug)]
pub(crate) struct CommandContext {
    pub(crate) log: Logger,
    pub(crate) guard: PathGuard,
    pub(crate) parallelism: Parallelism,
    /// Set when running inside WSL
    pub(crate) wsl: Option<WslInfo>,
}

/// Execute commands based on the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<()> {
    execute_with_guard(cli, &PathGuard::host())
}

/// Execute commands with an explicit protected-path guard.
pub fn execute_with_guard(cli: &Cli, guard: &PathGuard) -> Result<()> {
    let opts = cli.global_opts();
    let ctx = CommandContext {
        log: Logger::new(opts.verbose(), opts.quiet()),
        guard: guard.clone(),
        parallelism: opts.parallelism(),
        wsl: match guard.platform() {
            HostPlatform::Linux => platform::wsl_info(),
            _ => None,
        },
    };

    match cli.command() {
        Commands::Scan {
            path,
            deep,
            min_size,
            all,
        } => scan::scan(&ctx, path, *deep, min_size, *all).map(drop),
        Commands::Clean {
            path,
            deep,
            min_size,
            include_caution,
            execute,
        } => scan::clean(&ctx, path, *deep, min_size, *include_caution, *execute).map(drop),
        Commands::Duplicates {
            path,
            min_size,
            keep,
            all,
            execute,
        } => duplicates::duplicates(&ctx, path, min_size, keep, *all, *execute).map(drop),
        Commands::Caches {
            roots,
            no_browsers,
            no_package_managers,
            no_apps,
            no_wsl_windows,
            min_size,
            all,
        } => {
            let groups = CacheGroups {
                browsers: !no_browsers,
                package_managers: !no_package_managers,
                apps: !no_apps,
            };
            caches::caches(&ctx, roots, groups, !no_wsl_windows, min_size, *all).map(drop)
        }
        Commands::Packages {
            roots,
            skip,
            no_wsl_windows,
            min_size,
            all,
        } => caches::packages(&ctx, roots, skip, !no_wsl_windows, min_size, *all).map(drop),
        Commands::Info => info::info(&ctx).map(drop),
    }
}

/// Makes `path` absolute and lexically clean, and checks it is a directory.
pub(crate) fn resolve_root(path: &Path) -> Result<PathBuf> {
    let root = normalize_path(path)?;
    if !root.is_dir() {
        return Err(BloatError::ScanRootNotFound { path: root });
    }
    Ok(root)
}

/// Absolute form of `path` with `.` and `..` removed, without touching
/// symlinks or requiring the path to exist.
pub(crate) fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|source| BloatError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(lexically_clean(&absolute))
}

/// Write a report to stdout.
pub(crate) fn print_report<F>(write: F) -> Result<()>
where
    F: FnOnce(&mut StdoutLock<'static>) -> io::Result<()>,
{
    let mut out = io::stdout().lock();
    write(&mut out).map_err(|source| BloatError::IoError {
        path: PathBuf::from("<stdout>"),
        source,
    })
}

/// Surface traversal problems without failing the command.
pub(crate) fn report_errors(log: &Logger, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    log.info(format!(
        "Warning: {} location(s) could not be read (use -v for details)",
        errors.len()
    ));
    for error in errors {
        log.verbose(1, format!("  {error}"));
    }
}
