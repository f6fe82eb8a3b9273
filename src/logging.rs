//! Console logging and scan progress reporting.

use std::fmt::Display;
use std::path::Path;

/// The stage of a scan a [`Progress`] sink is being told about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Walking directories and matching them against patterns
    Classifying,
    /// Measuring matched directories
    Sizing,
    /// Walking files and bucketing them by size
    Bucketing,
    /// Hashing same-size candidates
    Hashing,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Classifying => "Scanning for bloat",
            Phase::Sizing => "Calculating sizes",
            Phase::Bucketing => "Scanning files by size",
            Phase::Hashing => "Hashing candidates",
        };
        f.write_str(label)
    }
}

/// Observer for long-running scans.
///
/// Every method is called from the thread that drives the scan, never from
/// worker threads. Implementations only observe; they cannot influence the
/// outcome.
pub trait Progress {
    /// A phase started; `total` is known for the parallel phases.
    fn begin(&self, _phase: Phase, _total: Option<usize>) {}

    /// A path is being looked at.
    fn entry(&self, _path: &Path) {}

    /// One unit of work in the current phase finished.
    fn advance(&self, _path: &Path) {}

    /// A phase finished.
    fn finish(&self, _phase: Phase) {}
}

/// Progress sink that ignores every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

#[derive(Clone, Copy, Debug)]
pub struct Logger {
    verbose: u8,
    quiet: bool,
}

impl Logger {
    pub fn new(verbose: u8, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    pub fn verbose(&self, level: u8, message: impl Display) {
        if !self.quiet && self.verbose >= level {
            eprintln!("{message}");
        }
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn level(&self) -> u8 {
        self.verbose
    }
}

impl Progress for Logger {
    fn begin(&self, phase: Phase, total: Option<usize>) {
        match total {
            Some(total) => self.verbose(1, format!("{phase}... ({total} items)")),
            None => self.verbose(1, format!("{phase}...")),
        }
    }

    fn entry(&self, path: &Path) {
        self.verbose(3, format!("  Scanning: {}", path.display()));
    }

    fn advance(&self, path: &Path) {
        self.verbose(3, format!("  Done: {}", path.display()));
    }

    fn finish(&self, phase: Phase) {
        self.verbose(2, format!("{phase}: done"));
    }
}
