//! Command-line interface definitions for bloat-hunter.
//!
//! This module defines the CLI structure using clap, including all subcommands
//! and their arguments. The main entry point is the [`Cli`] struct.
//!
//! # Example
//!
//! ```no_run
//! use bloat_hunter::cli::{Cli, Commands};
//!
//! // Parse command-line arguments
//! let cli = Cli::parse_args();
//!
//! // Access the parsed command
//! match cli.command() {
//!     Commands::Scan { path, deep, .. } => {
//!         println!("Scanning {} (deep: {deep})", path.display());
//!     }
//!     Commands::Duplicates { keep, .. } => println!("Keeping the {keep} copy"),
//!     _ => {}
//! }
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::duplicates::KeepStrategy;
use crate::error::{BloatError, Result};
use crate::parallel::Parallelism;

/// Main command-line interface for bloat-hunter.
///
/// This struct represents the top-level CLI configuration, containing both
/// global options that apply to all commands and the specific subcommand
/// to execute.
#[derive(Debug, Parser)]
#[command(
    name = "bloat-hunter",
    bin_name = "bloat-hunter",
    author,
    version,
    about = "Find and remove build caches, package caches and duplicate files",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Global options that apply to all bloat-hunter commands.
///
/// These control output verbosity and how much of the machine the sizing
/// and hashing phases may use.
#[derive(Debug, Parser)]
pub struct GlobalOpts {
    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, env = "BLOAT_HUNTER_VERBOSE")]
    verbose: u8,

    /// Silence all output except for reports and errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        env = "BLOAT_HUNTER_QUIET"
    )]
    quiet: bool,

    /// Maximum number of worker threads for sizing and hashing (1-32)
    #[arg(short, long, global = true, env = "BLOAT_HUNTER_JOBS")]
    jobs: Option<usize>,

    /// Size and hash on the calling thread only
    #[arg(
        long,
        global = true,
        conflicts_with = "jobs",
        env = "BLOAT_HUNTER_NO_PARALLEL"
    )]
    no_parallel: bool,
}

impl GlobalOpts {
    /// Create a new builder for constructing `GlobalOpts` programmatically.
    pub fn builder() -> GlobalOptsBuilder {
        GlobalOptsBuilder::default()
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Get the requested worker count
    pub fn jobs(&self) -> Option<usize> {
        self.jobs
    }

    /// Check if parallel execution is disabled
    pub fn no_parallel(&self) -> bool {
        self.no_parallel
    }

    /// The worker pool configuration these options describe.
    pub fn parallelism(&self) -> Parallelism {
        if self.no_parallel {
            return Parallelism::sequential();
        }
        self.jobs.map(Parallelism::new).unwrap_or_default()
    }
}

/// Builder for constructing `GlobalOpts` programmatically.
///
/// Useful for testing and for embedding bloat-hunter without going through
/// command-line parsing.
#[derive(Debug, Default)]
pub struct GlobalOptsBuilder {
    verbose: u8,
    quiet: bool,
    jobs: Option<usize>,
    no_parallel: bool,
}

impl GlobalOptsBuilder {
    /// Set the verbosity level (0 = normal, 1+ = verbose).
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable or disable quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Limit the worker pool to `jobs` threads.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Disable the worker pool entirely.
    pub fn no_parallel(mut self, disabled: bool) -> Self {
        self.no_parallel = disabled;
        self
    }

    /// Build the `GlobalOpts` instance with the configured values.
    pub fn build(self) -> GlobalOpts {
        GlobalOpts {
            verbose: self.verbose,
            quiet: self.quiet,
            jobs: self.jobs,
            no_parallel: self.no_parallel,
        }
    }
}

impl Cli {
    /// Get the global options
    pub fn global_opts(&self) -> &GlobalOpts {
        &self.global_opts
    }

    /// Get the command
    pub fn command(&self) -> &Commands {
        &self.command
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    verbose: u8,
    quiet: bool,
    jobs: Option<usize>,
    no_parallel: bool,
    command: Option<Commands>,
}

impl CliBuilder {
    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Set the worker count
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Disable parallel sizing and hashing
    pub fn no_parallel(mut self, disabled: bool) -> Self {
        self.no_parallel = disabled;
        self
    }

    /// Set the command
    pub fn command(mut self, command: Commands) -> Self {
        self.command = Some(command);
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        let command = self.command.ok_or(BloatError::ConfigError {
            message: "Command is required".to_string(),
        })?;

        if self.quiet && self.verbose > 0 {
            return Err(BloatError::ConfigError {
                message: "quiet and verbose cannot be combined".to_string(),
            });
        }
        if self.no_parallel && self.jobs.is_some() {
            return Err(BloatError::ConfigError {
                message: "jobs cannot be set when parallelism is disabled".to_string(),
            });
        }

        Ok(Cli {
            global_opts: GlobalOpts::builder()
                .verbose(self.verbose)
                .quiet(self.quiet)
                .jobs(self.jobs)
                .no_parallel(self.no_parallel)
                .build(),
            command,
        })
    }
}

/// Available bloat-hunter subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory tree for project bloat
    ///
    /// Walks the tree looking for build output, dependency folders, language
    /// caches, IDE state and system junk, then reports the largest matches
    /// and per-category totals. Nothing is deleted.
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Search up to 10 levels deep instead of 5
        #[arg(long, env = "BLOAT_HUNTER_DEEP")]
        deep: bool,

        /// Ignore targets smaller than this (e.g. "10MB", "1.5GB", or bytes)
        #[arg(long, default_value = "0", env = "BLOAT_HUNTER_MIN_SIZE")]
        min_size: String,

        /// Show every target instead of the largest 20
        #[arg(long)]
        all: bool,
    },

    /// Remove project bloat
    ///
    /// Scans like `scan`, then selects every safe target for removal:
    /// - Caution targets (e.g. Rust `target`, `build`) only with
    ///   --include-caution
    /// - Dangerous targets (version control metadata) are never selected
    /// - Every path is re-checked against the protected-path rules right
    ///   before removal
    ///
    /// Without --execute this is a dry run that only reports what would go.
    Clean {
        /// Directory to clean
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Search up to 10 levels deep instead of 5
        #[arg(long, env = "BLOAT_HUNTER_DEEP")]
        deep: bool,

        /// Ignore targets smaller than this (e.g. "10MB", "1.5GB", or bytes)
        #[arg(long, default_value = "0", env = "BLOAT_HUNTER_MIN_SIZE")]
        min_size: String,

        /// Also remove targets marked as caution
        #[arg(long)]
        include_caution: bool,

        /// Permanently delete the selected targets
        #[arg(long)]
        execute: bool,
    },

    /// Find duplicate files
    ///
    /// Groups files by size, hashes same-size candidates with BLAKE3 and
    /// reports groups of identical files together with the copy that would
    /// be kept. With --execute every other copy is deleted.
    Duplicates {
        /// Directory to search
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Ignore files smaller than this (e.g. "1MB", "500KB", or bytes)
        #[arg(long, default_value = "1MB", env = "BLOAT_HUNTER_DUPLICATES_MIN_SIZE")]
        min_size: String,

        /// Which copy to keep: first, shortest, oldest or newest
        #[arg(long, default_value = "first", env = "BLOAT_HUNTER_KEEP")]
        keep: String,

        /// Show every group instead of the largest 20
        #[arg(long)]
        all: bool,

        /// Permanently delete every copy except the kept one
        #[arg(long)]
        execute: bool,
    },

    /// Report browser, package manager and application caches
    ///
    /// Without explicit roots, the usual cache locations under the home
    /// directory for this platform are scanned. Inside WSL the Windows
    /// profile's temporary files are included unless --no-wsl-windows is set.
    Caches {
        /// Cache roots to scan instead of the platform defaults
        roots: Vec<PathBuf>,

        /// Skip browser caches
        #[arg(long)]
        no_browsers: bool,

        /// Skip package manager caches
        #[arg(long)]
        no_package_managers: bool,

        /// Skip application caches
        #[arg(long)]
        no_apps: bool,

        /// Inside WSL, leave out caches under the Windows home directory
        #[arg(long, env = "BLOAT_HUNTER_NO_WSL_WINDOWS")]
        no_wsl_windows: bool,

        /// Ignore caches smaller than this (e.g. "10MB", "1.5GB", or bytes)
        #[arg(long, default_value = "0", env = "BLOAT_HUNTER_MIN_SIZE")]
        min_size: String,

        /// Show every cache instead of the largest 20
        #[arg(long)]
        all: bool,
    },

    /// Report package manager caches with per-manager totals
    ///
    /// Covers npm, yarn, pnpm, pip, cargo, go, gradle, maven, composer, nuget
    /// and bundler. Without explicit roots, the usual package cache
    /// locations under the home directory are scanned, plus the Windows
    /// profile's package caches when running inside WSL.
    Packages {
        /// Package cache roots to scan instead of the platform defaults
        roots: Vec<PathBuf>,

        /// Package managers to leave out (comma-separated, e.g. "npm,cargo")
        #[arg(long, value_delimiter = ',', env = "BLOAT_HUNTER_SKIP_MANAGERS")]
        skip: Vec<String>,

        /// Inside WSL, leave out caches under the Windows home directory
        #[arg(long, env = "BLOAT_HUNTER_NO_WSL_WINDOWS")]
        no_wsl_windows: bool,

        /// Ignore caches smaller than this (e.g. "10MB", "1.5GB", or bytes)
        #[arg(long, default_value = "0", env = "BLOAT_HUNTER_MIN_SIZE")]
        min_size: String,

        /// Show every cache instead of the largest 20
        #[arg(long)]
        all: bool,
    },

    /// Show platform, home directory and WSL details
    Info,
}

impl Commands {
    /// A `scan` of `path` with default options.
    pub fn scan(path: impl Into<PathBuf>) -> Self {
        Commands::Scan {
            path: path.into(),
            deep: false,
            min_size: "0".to_string(),
            all: false,
        }
    }

    /// A dry-run `clean` of `path` with default options.
    pub fn clean(path: impl Into<PathBuf>) -> Self {
        Commands::Clean {
            path: path.into(),
            deep: false,
            min_size: "0".to_string(),
            include_caution: false,
            execute: false,
        }
    }

    /// A report-only `duplicates` search of `path` with default options.
    pub fn duplicates(path: impl Into<PathBuf>) -> Self {
        Commands::Duplicates {
            path: path.into(),
            min_size: "1MB".to_string(),
            keep: KeepStrategy::default().to_string(),
            all: false,
            execute: false,
        }
    }
}
