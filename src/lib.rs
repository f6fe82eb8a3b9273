//! # bloat-hunter
//!
//! Finds and reclaims disk space taken by build caches, package manager
//! caches, browser and application caches, and duplicate files.
//!
//! ## Overview
//!
//! Two pipelines do the work:
//!
//! - **Bloat scanning**: a depth-bounded walk classifies directories against
//!   an ordered registry of [`BloatPattern`]s, prunes protected locations and
//!   never descends into a match. Matches are then measured in parallel and
//!   filtered by size thresholds.
//! - **Duplicate detection**: files are bucketed by exact size, and only
//!   same-size candidates are hashed (BLAKE3, in parallel) and grouped by
//!   content. A [`KeepStrategy`] decides which copy survives.
//!
//! Every path is checked against a [`PathGuard`] before it is entered or
//! removed, so system directories, credentials, personal folders and project
//! roots are left alone.
//!
//! ## Architecture
//!
//! - [`patterns`]: Pattern registries (project, system caches, package
//!   managers) and classification
//! - [`guard`]: Protected-path rules
//! - [`scanner`]: Tree walker and target measurement
//! - [`duplicates`]: Two-phase duplicate finder and keep/delete selection
//! - [`parallel`]: Bounded worker pool map with per-item failure isolation
//! - [`size`]: Size parsing, formatting and directory totals
//! - [`platform`]: Host and WSL detection, default cache roots
//! - [`cleanup`]: Guarded removal of selected targets
//! - [`cli`] and [`commands`]: The `bloat-hunter` command-line tool
//! - [`error`]: Error types with thiserror + miette
//!
//! ## Library Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bloat_hunter::{format_size, parse_size, scan, scan_duplicates};
//!
//! let result = scan(Path::new("."), false, parse_size("10MB")?);
//! for target in &result.targets {
//!     println!("{:>10}  {}", format_size(target.size_bytes), target.path.display());
//! }
//!
//! let duplicates = scan_duplicates(Path::new("."), parse_size("1MB")?);
//! println!("{} wasted", format_size(duplicates.total_wasted));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! For full control (custom registries, guards, depth, worker count and
//! progress reporting) use [`Scanner::builder`] and
//! [`DuplicateScanner::builder`].
//!
//! ## Error Handling
//!
//! The crate uses a combination of:
//! - `thiserror` for strongly-typed errors
//! - `miette` for rich diagnostic output in CLI
//!
//! Filesystem problems met during a scan are collected on the result instead
//! of failing it; only invalid input surfaces as a [`BloatError`].

pub mod cleanup;
pub mod cli;
pub mod commands;
pub mod duplicates;
pub mod error;
pub mod guard;
pub mod logging;
pub mod parallel;
pub mod patterns;
pub mod platform;
pub mod scanner;
pub mod size;

pub use duplicates::{
    DuplicateFile, DuplicateGroup, DuplicateResult, DuplicateScanner, KeepStrategy,
    scan_duplicates,
};
pub use error::{BloatError, Result};
pub use guard::{PathGuard, is_protected};
pub use logging::{NoProgress, Progress};
pub use parallel::Parallelism;
pub use patterns::{BloatPattern, PackageManager, Registry, SafetyTier, classify};
pub use scanner::{BloatTarget, ScanResult, Scanner, scan};
pub use size::{format_size, parse_size};
