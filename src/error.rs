//! Error types for bloat-hunter.
//!
//! This module defines all error types used throughout bloat-hunter, using
//! a combination of `thiserror` for ergonomic error definitions and `miette`
//! for rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - Filesystem problems met while walking or hashing never surface here; they
//!   are recorded as scan diagnostics or the offending entry is skipped
//! - Only input validation and top-level failures become a [`BloatError`]
//! - Each variant carries a diagnostic code and, where useful, a hint
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bloat_hunter::error::{BloatError, Result};
//!
//! fn require_dir(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(BloatError::ScanRootNotFound {
//!             path: path.to_path_buf(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in bloat-hunter operations
#[derive(Error, Debug, Diagnostic)]
pub enum BloatError {
    /// File system I/O error outside of a scan.
    ///
    /// Raised by cleanup and by command setup (resolving the working
    /// directory). Errors met during a scan are collected as diagnostics
    /// instead.
    #[error("I/O error accessing '{path}'")]
    #[diagnostic(code(bloat_hunter::io_error))]
    IoError {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A human size literal such as `--min-size` could not be parsed.
    #[error("Invalid size: '{value}' - {reason}")]
    #[diagnostic(
        code(bloat_hunter::size::invalid),
        help("Specify a size as a number with an optional unit (e.g. '100B', '512KB', '10MB', '1.5GB', '2TB')")
    )]
    InvalidSize {
        /// The rejected input
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Unknown duplicate keep strategy.
    #[error("Invalid keep strategy: '{value}'")]
    #[diagnostic(
        code(bloat_hunter::duplicates::invalid_keep),
        help("Use one of: first, shortest, oldest, newest")
    )]
    InvalidKeepStrategy {
        /// The rejected strategy name
        value: String,
    },

    /// A name matcher regular expression failed to compile.
    #[error("Invalid name pattern '{pattern}'")]
    #[diagnostic(code(bloat_hunter::patterns::invalid_regex))]
    InvalidPattern {
        /// The regular expression source
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Unknown package manager name passed to a filter.
    #[error("Unknown package manager: '{value}'")]
    #[diagnostic(
        code(bloat_hunter::packages::unknown_manager),
        help(
            "Known package managers: npm, yarn, pnpm, pip, cargo, go, gradle, maven, composer, \
             nuget, bundler"
        )
    )]
    UnknownPackageManager {
        /// The rejected name
        value: String,
    },

    /// The directory to scan does not exist or is not a directory.
    #[error("Scan root '{path}' is not a directory")]
    #[diagnostic(
        code(bloat_hunter::scan::root_not_found),
        help("Pass an existing directory to scan.")
    )]
    ScanRootNotFound {
        /// The missing root
        path: PathBuf,
    },

    /// Refused to remove files under a path that the guard protects.
    #[error("Refusing to remove files under protected path '{path}'")]
    #[diagnostic(
        code(bloat_hunter::cleanup::protected),
        help("System directories, credentials, personal folders and project roots are never deleted.")
    )]
    ProtectedPath {
        /// The protected path
        path: PathBuf,
    },

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(bloat_hunter::config::error),
        help("Check the command-line options and BLOAT_HUNTER_* environment variables.")
    )]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, BloatError>;
