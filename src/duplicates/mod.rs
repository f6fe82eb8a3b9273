//! Duplicate file detection.
//!
//! Detection runs in two phases so that only files that could possibly be
//! duplicates are ever read:
//!
//! 1. **Bucketing**: walk the tree and group regular files by exact size.
//!    Buckets with a single member cannot hold duplicates and are dropped.
//! 2. **Hashing**: hash the remaining candidates' full content on the worker
//!    pool and group them by `(size, hash)`.
//!
//! Every [`DuplicateGroup`] keeps its files in discovery order (file-name
//! order, depth first), which [`KeepStrategy::First`] and all tie-breaks
//! rely on.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::{BloatError, Result};
use crate::guard::PathGuard;
use crate::logging::{NoProgress, Phase, Progress};
use crate::parallel::{Parallelism, parallel_map_ordered};

mod hashing;

pub use hashing::{CHUNK_SIZE, hash_file};


/// Files smaller than this are ignored unless configured otherwise (1 MiB).
pub const DEFAULT_MIN_SIZE: u64 = 1024 * 1024;

/// One member of a duplicate group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: SystemTime,
}

/// Files with identical size and content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Hex BLAKE3 digest of the shared content
    pub hash: String,
    pub size_bytes: u64,
    /// Members in discovery order
    pub files: Vec<DuplicateFile>,
}

impl DuplicateGroup {
    /// Copies beyond the one that is kept
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes reclaimable by removing every copy but one
    pub fn wasted_bytes(&self) -> u64 {
        self.size_bytes.saturating_mul(self.duplicate_count() as u64)
    }

    /// The member to keep under `strategy`.
    ///
    /// # Panics
    ///
    /// Panics if the group has no members.
    pub fn select_keep(&self, strategy: KeepStrategy) -> &DuplicateFile {
        &self.files[self.keep_index(strategy)]
    }

    /// Every member except the kept one, in discovery order.
    ///
    /// # Panics
    ///
    /// Panics if the group has no members.
    pub fn select_delete(&self, strategy: KeepStrategy) -> Vec<&DuplicateFile> {
        let keep = self.keep_index(strategy);
        self.files
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != keep)
            .map(|(_, file)| file)
            .collect()
    }

    fn keep_index(&self, strategy: KeepStrategy) -> usize {
        assert!(
            !self.files.is_empty(),
            "cannot select from an empty duplicate group"
        );

        // Every comparison is strict so the earliest member wins ties
        let mut best = 0;
        for (index, file) in self.files.iter().enumerate().skip(1) {
            let current = &self.files[best];
            let better = match strategy {
                KeepStrategy::First => false,
                KeepStrategy::Shortest => path_len(&file.path) < path_len(&current.path),
                KeepStrategy::Oldest => file.modified < current.modified,
                KeepStrategy::Newest => file.modified > current.modified,
            };
            if better {
                best = index;
            }
        }
        best
    }
}

fn path_len(path: &Path) -> usize {
    path.to_string_lossy().chars().count()
}

/// Which member of a duplicate group survives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeepStrategy {
    /// First in discovery order
    #[default]
    First,
    /// Fewest characters in the path
    Shortest,
    /// Earliest modification time
    Oldest,
    /// Latest modification time
    Newest,
}

impl KeepStrategy {
    pub const ALL: [KeepStrategy; 4] = [
        KeepStrategy::First,
        KeepStrategy::Shortest,
        KeepStrategy::Oldest,
        KeepStrategy::Newest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeepStrategy::First => "first",
            KeepStrategy::Shortest => "shortest",
            KeepStrategy::Oldest => "oldest",
            KeepStrategy::Newest => "newest",
        }
    }
}

impl Display for KeepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeepStrategy {
    type Err = BloatError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == wanted)
            .ok_or_else(|| BloatError::InvalidKeepStrategy {
                value: s.to_string(),
            })
    }
}

/// Outcome of a duplicate scan.
#[derive(Clone, Debug, Default)]
pub struct DuplicateResult {
    pub root: PathBuf,
    /// Groups, most wasted bytes first
    pub groups: Vec<DuplicateGroup>,
    pub total_wasted: u64,
    /// Files at or above the size threshold that were bucketed
    pub files_scanned: u64,
    /// Traversal problems, one `"<path>: <message>"` each
    pub errors: Vec<String>,
}

impl DuplicateResult {
    /// Files that could be removed across all groups
    pub fn total_duplicates(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }
}

/// Two-phase duplicate file finder
#[derive(Clone, Debug)]
pub struct DuplicateScanner {
    min_size: u64,
    guard: PathGuard,
    parallelism: Parallelism,
}

impl DuplicateScanner {
    /// Creates a new builder for [`DuplicateScanner`]
    pub fn builder() -> DuplicateScannerBuilder {
        DuplicateScannerBuilder::default()
    }

    /// Smallest file size considered
    pub fn min_size(&self) -> u64 {
        self.min_size
    }

    pub fn scan(&self, root: &Path) -> DuplicateResult {
        self.scan_with_progress(root, &NoProgress)
    }

    pub fn scan_with_progress(&self, root: &Path, progress: &dyn Progress) -> DuplicateResult {
        let mut result = DuplicateResult {
            root: root.to_path_buf(),
            ..DuplicateResult::default()
        };

        progress.begin(Phase::Bucketing, None);
        let buckets = self.bucket_by_size(root, &mut result, progress);
        progress.finish(Phase::Bucketing);

        let candidates = hash_candidates(buckets);
        let mut groups = self.group_by_content(candidates, progress);

        groups.retain(|group| group.files.len() >= 2);
        groups.sort_by_key(|group| Reverse(group.wasted_bytes()));

        result.total_wasted = groups
            .iter()
            .map(DuplicateGroup::wasted_bytes)
            .fold(0, u64::saturating_add);
        result.groups = groups;
        result
    }

    /// Hashes every candidate and groups them by `(size, hash)`. Files that
    /// cannot be read are dropped; single-member groups are kept here and
    /// filtered by the caller.
    fn group_by_content(
        &self,
        candidates: Vec<(PathBuf, u64)>,
        progress: &dyn Progress,
    ) -> Vec<DuplicateGroup> {
        progress.begin(Phase::Hashing, Some(candidates.len()));
        let hashed = parallel_map_ordered(candidates, &self.parallelism, |(path, _)| {
            let hash = hash_file(path)?;
            let modified = fs::metadata(path)
                .and_then(|metadata| metadata.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Ok::<_, BloatError>((hash, modified))
        });

        let mut groups: Vec<DuplicateGroup> = Vec::new();
        let mut index: HashMap<(u64, String), usize> = HashMap::new();
        for ((path, size), outcome) in hashed {
            progress.advance(&path);
            // Unreadable files simply are not duplicates of anything
            let Ok((hash, modified)) = outcome else {
                continue;
            };

            let file = DuplicateFile {
                path,
                size_bytes: size,
                modified,
            };
            let key = (size, hash);
            match index.get(&key) {
                Some(&slot) => groups[slot].files.push(file),
                None => {
                    groups.push(DuplicateGroup {
                        hash: key.1.clone(),
                        size_bytes: size,
                        files: vec![file],
                    });
                    index.insert(key, groups.len() - 1);
                }
            }
        }
        progress.finish(Phase::Hashing);
        groups
    }

    fn bucket_by_size(
        &self,
        root: &Path,
        result: &mut DuplicateResult,
        progress: &dyn Progress,
    ) -> BTreeMap<u64, Vec<PathBuf>> {
        let mut buckets: BTreeMap<u64, Vec<PathBuf>> = BTreeMap::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && self.guard.is_protected(entry.path(), true))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root).display().to_string();
                    let message = match err.io_error() {
                        Some(io) => io.to_string(),
                        None => err.to_string(),
                    };
                    result.errors.push(format!("{path}: {message}"));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            progress.entry(entry.path());

            let size = metadata.len();
            if size >= self.min_size {
                buckets
                    .entry(size)
                    .or_default()
                    .push(entry.into_path());
                result.files_scanned += 1;
            }
        }

        buckets
    }
}

/// Flattens buckets that could hold duplicates into `(path, size)` pairs,
/// smallest size first, discovery order within a size.
fn hash_candidates(buckets: BTreeMap<u64, Vec<PathBuf>>) -> Vec<(PathBuf, u64)> {
    buckets
        .into_iter()
        .filter(|(_, paths)| paths.len() >= 2)
        .flat_map(|(size, paths)| paths.into_iter().map(move |path| (path, size)))
        .collect()
}

/// Builder for [`DuplicateScanner`]
#[derive(Debug, Default)]
pub struct DuplicateScannerBuilder {
    min_size: Option<u64>,
    guard: Option<PathGuard>,
    parallelism: Option<Parallelism>,
}

impl DuplicateScannerBuilder {
    /// Ignore files smaller than `bytes` (default [`DEFAULT_MIN_SIZE`])
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = Some(bytes);
        self
    }

    /// Set the protected-path guard (default: host guard)
    pub fn guard(mut self, guard: PathGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the worker pool used for hashing
    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Build the [`DuplicateScanner`]
    pub fn build(self) -> DuplicateScanner {
        DuplicateScanner {
            min_size: self.min_size.unwrap_or(DEFAULT_MIN_SIZE),
            guard: self.guard.unwrap_or_else(PathGuard::host),
            parallelism: self.parallelism.unwrap_or_default(),
        }
    }
}

/// Finds duplicate files below `root` using the host guard.
pub fn scan_duplicates(root: &Path, min_size: u64) -> DuplicateResult {
    DuplicateScanner::builder()
        .min_size(min_size)
        .build()
        .scan(root)
}
