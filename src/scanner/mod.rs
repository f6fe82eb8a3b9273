//! Directory walker that finds bloat.
//!
//! A scan runs in two phases. Classification walks the tree sequentially,
//! matching each directory name against a [`Registry`] and collecting
//! candidates; a matched directory is never descended into. Sizing then
//! measures every candidate on the worker pool and keeps those that clear
//! both the pattern's and the caller's minimum size.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use bloat_hunter::scanner::Scanner;
//!
//! let scanner = Scanner::builder().deep(true).min_size(1024 * 1024).build();
//! let result = scanner.scan(Path::new("/home/me/code"));
//! for target in &result.targets {
//!     println!("{} {}", target.pattern.name(), target.path.display());
//! }
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::convert::Infallible;
use std::fs;
use std::path::{self, Path, PathBuf};
use std::sync::Arc;

use crate::guard::PathGuard;
use crate::logging::{NoProgress, Phase, Progress};
use crate::parallel::{Parallelism, parallel_map};
use crate::patterns::{BloatPattern, PackageManager, Registry, SafetyTier};
use crate::size::directory_size;

#[cfg(test)]
mod tests;

/// Depth bound for a regular project scan.
pub const DEFAULT_MAX_DEPTH: usize = 5;
/// Depth bound with `--deep`.
pub const DEEP_MAX_DEPTH: usize = 10;
/// Depth bound below a cache or package-manager root.
pub const CACHE_MAX_DEPTH: usize = 3;

/// A measured directory worth reporting.
#[derive(Clone, Debug)]
pub struct BloatTarget {
    pub path: PathBuf,
    pub pattern: Arc<BloatPattern>,
    pub size_bytes: u64,
    pub file_count: u64,
}

impl BloatTarget {
    pub fn category(&self) -> &str {
        self.pattern.category()
    }

    pub fn safety(&self) -> SafetyTier {
        self.pattern.safety()
    }
}

/// Outcome of a scan.
#[derive(Clone, Debug, Default)]
pub struct ScanResult {
    /// Roots the scan started from
    pub roots: Vec<PathBuf>,
    /// Targets, largest first
    pub targets: Vec<BloatTarget>,
    /// Sum of all target sizes
    pub total_size: u64,
    /// One `"<path>: <message>"` per directory that could not be listed
    pub errors: Vec<String>,
}

impl ScanResult {
    /// The first scanned root
    pub fn root(&self) -> Option<&Path> {
        self.roots.first().map(PathBuf::as_path)
    }

    /// Total bytes per pattern category, largest first.
    pub fn category_totals(&self) -> Vec<(String, u64)> {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for target in &self.targets {
            *totals.entry(target.category()).or_default() += target.size_bytes;
        }
        let mut totals: Vec<(String, u64)> = totals
            .into_iter()
            .map(|(category, bytes)| (category.to_string(), bytes))
            .collect();
        totals.sort_by_key(|(_, bytes)| Reverse(*bytes));
        totals
    }

    /// Total bytes per package manager, largest first. Targets not owned by
    /// a package manager are left out.
    pub fn manager_totals(&self) -> Vec<(PackageManager, u64)> {
        let mut totals: BTreeMap<PackageManager, u64> = BTreeMap::new();
        for target in &self.targets {
            if let Some(manager) = target.pattern.manager() {
                *totals.entry(manager).or_default() += target.size_bytes;
            }
        }
        let mut totals: Vec<(PackageManager, u64)> = totals.into_iter().collect();
        totals.sort_by_key(|(_, bytes)| Reverse(*bytes));
        totals
    }
}

/// What to do with one directory met during the walk.
#[derive(Clone, Debug)]
pub enum Visit {
    /// Record it as a candidate and do not descend
    Matched(Arc<BloatPattern>),
    /// Walk into it
    Descend,
    /// Leave it alone
    Skip,
}

struct Candidate {
    path: PathBuf,
    pattern: Arc<BloatPattern>,
}

/// Classification walk state owned by the coordinating thread.
#[derive(Default)]
struct Walk {
    candidates: Vec<Candidate>,
    errors: Vec<String>,
}

/// Pattern-matching directory scanner
#[derive(Clone, Debug)]
pub struct Scanner {
    registry: Registry,
    guard: PathGuard,
    max_depth: usize,
    min_size: u64,
    parallelism: Parallelism,
}

impl Scanner {
    /// Creates a new builder for [`Scanner`]
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Caller-supplied minimum target size
    pub fn min_size(&self) -> u64 {
        self.min_size
    }

    /// Scans a single root.
    pub fn scan(&self, root: &Path) -> ScanResult {
        self.scan_with_progress(root, &NoProgress)
    }

    /// Scans a single root, reporting to `progress`.
    pub fn scan_with_progress(&self, root: &Path, progress: &dyn Progress) -> ScanResult {
        self.scan_roots(&[root.to_path_buf()], progress)
    }

    /// Scans several roots as one. A directory reachable from more than one
    /// root is reported once.
    pub fn scan_roots(&self, roots: &[PathBuf], progress: &dyn Progress) -> ScanResult {
        progress.begin(Phase::Classifying, None);
        let mut walk = Walk::default();
        for root in roots {
            self.visit(root, 0, &mut walk, progress);
        }
        progress.finish(Phase::Classifying);

        let mut seen = HashSet::new();
        walk.candidates
            .retain(|candidate| seen.insert(candidate.path.clone()));

        let mut targets = self.measure(walk.candidates, progress);
        targets.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.path.cmp(&b.path))
        });

        ScanResult {
            roots: roots.to_vec(),
            total_size: targets.iter().map(|target| target.size_bytes).sum(),
            targets,
            errors: walk.errors,
        }
    }

    /// Decides what to do with a directory below the root.
    pub fn inspect(&self, path: &Path) -> Visit {
        if self.guard.is_protected(path, true) {
            return Visit::Skip;
        }
        match dir_name(path).and_then(|name| self.registry.classify(&name, path)) {
            Some(pattern) => Visit::Matched(Arc::clone(pattern)),
            None => Visit::Descend,
        }
    }

    fn visit(&self, path: &Path, depth: usize, walk: &mut Walk, progress: &dyn Progress) {
        if self.guard.is_protected(path, true) {
            return;
        }

        if depth == 0
            && let Some(pattern) =
                dir_name(path).and_then(|name| self.registry.classify(&name, path))
        {
            walk.candidates.push(Candidate {
                path: path.to_path_buf(),
                pattern: Arc::clone(pattern),
            });
            return;
        }

        if depth > self.max_depth {
            return;
        }

        for child in child_dirs(path, &mut walk.errors) {
            progress.entry(&child);
            match self.inspect(&child) {
                Visit::Skip => {}
                Visit::Matched(pattern) => walk.candidates.push(Candidate {
                    path: child,
                    pattern,
                }),
                Visit::Descend => self.visit(&child, depth + 1, walk, progress),
            }
        }
    }

    fn measure(&self, candidates: Vec<Candidate>, progress: &dyn Progress) -> Vec<BloatTarget> {
        progress.begin(Phase::Sizing, Some(candidates.len()));
        let mut targets = Vec::new();

        parallel_map(
            candidates,
            &self.parallelism,
            |candidate| Ok::<_, Infallible>(directory_size(&candidate.path)),
            |candidate, outcome| {
                progress.advance(&candidate.path);
                // A sizing panic drops the candidate
                let Ok(size) = outcome else { return };
                if self.qualifies(&candidate.pattern, size.bytes) {
                    targets.push(BloatTarget {
                        path: candidate.path,
                        pattern: candidate.pattern,
                        size_bytes: size.bytes,
                        file_count: size.files,
                    });
                }
            },
        );

        progress.finish(Phase::Sizing);
        targets
    }

    fn qualifies(&self, pattern: &BloatPattern, size: u64) -> bool {
        size > 0 && size >= pattern.min_size() && size >= self.min_size
    }
}

/// Builder for [`Scanner`]
#[derive(Debug, Default)]
pub struct ScannerBuilder {
    registry: Option<Registry>,
    guard: Option<PathGuard>,
    deep: bool,
    max_depth: Option<usize>,
    min_size: u64,
    parallelism: Option<Parallelism>,
}

impl ScannerBuilder {
    /// Set the patterns to classify with (default: project patterns)
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the protected-path guard (default: host guard)
    pub fn guard(mut self, guard: PathGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Walk up to [`DEEP_MAX_DEPTH`] levels instead of [`DEFAULT_MAX_DEPTH`]
    pub fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Set an explicit depth bound, overriding `deep`
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Drop targets smaller than `bytes`
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = bytes;
        self
    }

    /// Set the worker pool used for sizing
    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Build the [`Scanner`]
    pub fn build(self) -> Scanner {
        let default_depth = if self.deep {
            DEEP_MAX_DEPTH
        } else {
            DEFAULT_MAX_DEPTH
        };

        Scanner {
            registry: self.registry.unwrap_or_else(Registry::project),
            guard: self.guard.unwrap_or_else(PathGuard::host),
            max_depth: self.max_depth.unwrap_or(default_depth),
            min_size: self.min_size,
            parallelism: self.parallelism.unwrap_or_default(),
        }
    }
}

/// Name used for classification. Roots like `.` have no file name of their
/// own, so the absolute form is consulted.
fn dir_name(path: &Path) -> Option<String> {
    if let Some(name) = path.file_name() {
        return Some(name.to_string_lossy().into_owned());
    }
    let absolute = path::absolute(path).ok()?;
    absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Immediate subdirectories of `path` in file-name order. Symlinks and files
/// are skipped. Listing failures are recorded, not raised.
fn child_dirs(path: &Path, errors: &mut Vec<String>) -> Vec<PathBuf> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            errors.push(format!("{}: {err}", path.display()));
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                errors.push(format!("{}: {err}", path.display()));
                continue;
            }
        };
        // DirEntry::file_type does not follow symlinks
        if entry.file_type().is_ok_and(|file_type| file_type.is_dir()) {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    dirs
}

/// Scans `root` with the built-in project patterns and the host guard.
pub fn scan(root: &Path, deep: bool, min_size: u64) -> ScanResult {
    Scanner::builder()
        .deep(deep)
        .min_size(min_size)
        .build()
        .scan(root)
}
