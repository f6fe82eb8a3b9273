//! # bloat-hunter CLI
//!
//! Finds and removes disk bloat: build output and dependency folders in
//! project trees, browser and application caches, package manager caches and
//! duplicate files.
//!
//! ## Commands
//!
//! - **scan**: Report project bloat under a directory
//! - **clean**: Remove safe project bloat (dry run unless `--execute`)
//! - **duplicates**: Find identical files and optionally remove extra copies
//! - **caches**: Report browser, package manager and application caches
//! - **packages**: Report package manager caches per manager
//! - **info**: Show platform, home directory and WSL details
//!
//! ## Quick Start
//!
//! ```bash
//! bloat-hunter scan ~/projects --min-size 10MB
//! bloat-hunter clean ~/projects --execute
//! bloat-hunter duplicates ~/Downloads --keep oldest
//! ```
//!
//! ## Environment Variables
//!
//! - `BLOAT_HUNTER_VERBOSE`: Enable verbose output
//! - `BLOAT_HUNTER_QUIET`: Silence everything except reports and errors
//! - `BLOAT_HUNTER_JOBS`: Worker threads for sizing and hashing
//! - `BLOAT_HUNTER_NO_PARALLEL`: Run sizing and hashing on one thread
//!
//! See individual commands for more environment variables.

use std::io::IsTerminal;

use bloat_hunter::cli::Cli;

fn main() -> miette::Result<()> {
    // Install miette's fancy panic and error report handler
    miette::set_panic_hook();

    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        // Plain output for pipes and log files
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse_args();

    bloat_hunter::commands::execute(&cli).map_err(Into::into)
}
