//! Bloat pattern registry.
//!
//! A [`BloatPattern`] describes one kind of reclaimable directory: the names
//! it goes by, an optional contextual check, the minimum size worth
//! reporting and how safe it is to delete. Patterns live in a [`Registry`],
//! an ordered list consulted front to back. The first pattern whose name
//! matcher and validator both accept a directory classifies it, so the
//! declaration order of the built-in tables is part of their behavior.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use bloat_hunter::patterns::{BloatPattern, Registry, SafetyTier};
//!
//! let mut registry = Registry::project();
//! registry.push(
//!     BloatPattern::builder("Bazel output", "Build")
//!         .regex(r"bazel-.*")
//!         .safety(SafetyTier::Caution)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let hit = registry.classify("bazel-out", Path::new("/work/app/bazel-out"));
//! assert_eq!(hit.map(|p| p.name()), Some("Bazel output"));
//! ```

use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::error::{BloatError, Result};

mod project;
mod system_caches;


/// How risky deleting a match is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyTier {
    /// Regenerated automatically; always fine to delete
    Safe,
    /// Rebuildable but costly, or may hold user state
    Caution,
    /// Informational only; never selected for deletion
    Dangerous,
}

impl Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SafetyTier::Safe => "safe",
            SafetyTier::Caution => "caution",
            SafetyTier::Dangerous => "dangerous",
        })
    }
}

/// A package manager whose cache a pattern belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Pip,
    Cargo,
    Go,
    Gradle,
    Maven,
    Composer,
    Nuget,
    Bundler,
}

impl PackageManager {
    /// Every supported package manager
    pub const ALL: [PackageManager; 11] = [
        PackageManager::Npm,
        PackageManager::Yarn,
        PackageManager::Pnpm,
        PackageManager::Pip,
        PackageManager::Cargo,
        PackageManager::Go,
        PackageManager::Gradle,
        PackageManager::Maven,
        PackageManager::Composer,
        PackageManager::Nuget,
        PackageManager::Bundler,
    ];

    /// Lowercase command-line name
    pub fn name(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Pip => "pip",
            PackageManager::Cargo => "cargo",
            PackageManager::Go => "go",
            PackageManager::Gradle => "gradle",
            PackageManager::Maven => "maven",
            PackageManager::Composer => "composer",
            PackageManager::Nuget => "nuget",
            PackageManager::Bundler => "bundler",
        }
    }
}

impl Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for PackageManager {
    type Err = BloatError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|manager| manager.name() == wanted)
            .ok_or_else(|| BloatError::UnknownPackageManager {
                value: s.to_string(),
            })
    }
}

/// One way a directory name can match a pattern.
#[derive(Clone, Debug)]
pub enum NameMatcher {
    /// Byte-for-byte equality with the name
    Exact(String),
    /// Regular expression anchored at the start of the name
    Regex(Regex),
}

impl NameMatcher {
    /// Compiles `source` so it only matches at the start of a name.
    pub fn regex(source: &str) -> Result<Self> {
        Regex::new(&format!("^(?:{source})"))
            .map(NameMatcher::Regex)
            .map_err(|source_err| BloatError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })
    }

    /// Whether `name` matches
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Exact(exact) => exact == name,
            NameMatcher::Regex(regex) => regex.is_match(name),
        }
    }
}

/// Contextual check applied after a name matched.
#[derive(Clone, Copy, Debug)]
pub enum Validator {
    Always,
    Predicate(fn(&Path) -> bool),
}

impl Validator {
    /// Whether the directory at `path` passes
    pub fn holds(&self, path: &Path) -> bool {
        match self {
            Validator::Always => true,
            Validator::Predicate(check) => check(path),
        }
    }
}

/// A classification rule for reclaimable directories.
#[derive(Clone, Debug)]
pub struct BloatPattern {
    name: String,
    category: String,
    description: String,
    matchers: Vec<NameMatcher>,
    min_size: u64,
    safety: SafetyTier,
    validator: Validator,
    manager: Option<PackageManager>,
}

impl BloatPattern {
    /// Creates a new builder for [`BloatPattern`]
    pub fn builder(name: impl Into<String>, category: impl Into<String>) -> BloatPatternBuilder {
        BloatPatternBuilder {
            name: name.into(),
            category: category.into(),
            description: String::new(),
            matchers: Vec::new(),
            min_size: 0,
            safety: SafetyTier::Safe,
            validator: Validator::Always,
            manager: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn matchers(&self) -> &[NameMatcher] {
        &self.matchers
    }

    /// Smallest size in bytes worth reporting
    pub fn min_size(&self) -> u64 {
        self.min_size
    }

    pub fn safety(&self) -> SafetyTier {
        self.safety
    }

    pub fn validator(&self) -> Validator {
        self.validator
    }

    /// Package manager owning this cache, if any
    pub fn manager(&self) -> Option<PackageManager> {
        self.manager
    }

    /// Whether a directory called `name` at `path` is an instance of this
    /// pattern. The validator only runs once some matcher accepted the name.
    pub fn matches(&self, name: &str, path: &Path) -> bool {
        self.matchers.iter().any(|matcher| matcher.matches(name)) && self.validator.holds(path)
    }
}

enum MatcherSource {
    Exact(String),
    Regex(String),
}

/// Builder for [`BloatPattern`]
pub struct BloatPatternBuilder {
    name: String,
    category: String,
    description: String,
    matchers: Vec<MatcherSource>,
    min_size: u64,
    safety: SafetyTier,
    validator: Validator,
    manager: Option<PackageManager>,
}

impl BloatPatternBuilder {
    /// Match names equal to `name`
    pub fn exact(mut self, name: impl Into<String>) -> Self {
        self.matchers.push(MatcherSource::Exact(name.into()));
        self
    }

    /// Match names starting with a match of the regular expression `source`
    pub fn regex(mut self, source: impl Into<String>) -> Self {
        self.matchers.push(MatcherSource::Regex(source.into()));
        self
    }

    /// Set the human description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the minimum reportable size in bytes
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = bytes;
        self
    }

    /// Set the safety tier
    pub fn safety(mut self, safety: SafetyTier) -> Self {
        self.safety = safety;
        self
    }

    /// Require `check` to accept the directory path
    pub fn validator(mut self, check: fn(&Path) -> bool) -> Self {
        self.validator = Validator::Predicate(check);
        self
    }

    /// Attribute the pattern to a package manager
    pub fn manager(mut self, manager: PackageManager) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Build the [`BloatPattern`], compiling its regular expressions
    pub fn build(self) -> Result<BloatPattern> {
        let matchers = self
            .matchers
            .into_iter()
            .map(|source| match source {
                MatcherSource::Exact(name) => Ok(NameMatcher::Exact(name)),
                MatcherSource::Regex(source) => NameMatcher::regex(&source),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BloatPattern {
            name: self.name,
            category: self.category,
            description: self.description,
            matchers,
            min_size: self.min_size,
            safety: self.safety,
            validator: self.validator,
            manager: self.manager,
        })
    }
}

/// Row of a built-in pattern table.
pub(crate) struct PatternDef {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub exact: &'static [&'static str],
    pub regex: &'static [&'static str],
    pub min_size: u64,
    pub safety: SafetyTier,
    pub validator: Validator,
    pub manager: Option<PackageManager>,
}

impl PatternDef {
    pub(crate) const EMPTY: PatternDef = PatternDef {
        name: "",
        category: "",
        description: "",
        exact: &[],
        regex: &[],
        min_size: 0,
        safety: SafetyTier::Safe,
        validator: Validator::Always,
        manager: None,
    };

    fn compile(&self) -> Result<BloatPattern> {
        let mut builder = BloatPattern::builder(self.name, self.category)
            .description(self.description)
            .min_size(self.min_size)
            .safety(self.safety);
        for name in self.exact {
            builder = builder.exact(*name);
        }
        for source in self.regex {
            builder = builder.regex(*source);
        }
        if let Validator::Predicate(check) = self.validator {
            builder = builder.validator(check);
        }
        if let Some(manager) = self.manager {
            builder = builder.manager(manager);
        }
        builder.build()
    }
}

/// Which families of system caches to look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGroups {
    pub browsers: bool,
    pub package_managers: bool,
    pub apps: bool,
}

impl Default for CacheGroups {
    fn default() -> Self {
        Self {
            browsers: true,
            package_managers: true,
            apps: true,
        }
    }
}

/// Ordered collection of patterns.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    patterns: Vec<Arc<BloatPattern>>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Project caches, development environments and system junk.
    pub fn project() -> Self {
        project_registry().clone()
    }

    /// Browser, package manager and application caches.
    pub fn system_caches(groups: CacheGroups) -> Self {
        let mut tables = Vec::new();
        if groups.browsers {
            tables.push(system_caches::BROWSERS);
        }
        if groups.package_managers {
            tables.push(system_caches::PACKAGE_MANAGERS);
        }
        if groups.apps {
            tables.push(system_caches::APPS);
        }
        Registry::from_tables(&tables).expect("built-in cache patterns should compile")
    }

    /// Package manager caches for the `enabled` managers only.
    pub fn package_managers(enabled: &[PackageManager]) -> Self {
        let mut registry = Registry::from_tables(&[system_caches::PACKAGE_MANAGERS])
            .expect("built-in package manager patterns should compile");
        registry.patterns.retain(|pattern| {
            pattern
                .manager()
                .is_some_and(|manager| enabled.contains(&manager))
        });
        registry
    }

    fn from_tables(tables: &[&[PatternDef]]) -> Result<Self> {
        let patterns = tables
            .iter()
            .flat_map(|table| table.iter())
            .map(|def| def.compile().map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Appends a pattern; it is consulted after every existing one.
    pub fn push(&mut self, pattern: BloatPattern) {
        self.patterns.push(Arc::new(pattern));
    }

    /// The first pattern, in registry order, matching the directory `name`
    /// located at `path`.
    pub fn classify(&self, name: &str, path: &Path) -> Option<&Arc<BloatPattern>> {
        self.patterns
            .iter()
            .find(|pattern| pattern.matches(name, path))
    }

    /// Looks a pattern up by its name
    pub fn get(&self, name: &str) -> Option<&Arc<BloatPattern>> {
        self.patterns.iter().find(|pattern| pattern.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BloatPattern>> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn project_registry() -> &'static Registry {
    static PROJECT: OnceLock<Registry> = OnceLock::new();

    PROJECT.get_or_init(|| {
        Registry::from_tables(&[project::CACHE, project::DEV, project::SYSTEM])
            .expect("built-in project patterns should compile")
    })
}

/// Classifies a directory against the built-in project patterns.
pub fn classify(name: &str, path: &Path) -> Option<Arc<BloatPattern>> {
    project_registry().classify(name, path).cloned()
}
