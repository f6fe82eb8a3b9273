//! Project-level patterns: language caches, build output, development
//! environments and operating system junk.

use std::path::Path;

use super::{PatternDef, SafetyTier, Validator};

const MIB: u64 = 1024 * 1024;

/// A Python virtual environment has an interpreter config or activate script.
fn is_venv(path: &Path) -> bool {
    ["pyvenv.cfg", "bin/activate", "Scripts/activate.bat"]
        .iter()
        .any(|marker| path.join(marker).exists())
}

/// `dist` only counts when its parent is a Python package.
fn is_dist(path: &Path) -> bool {
    path.parent().is_some_and(|parent| {
        parent.join("setup.py").exists() || parent.join("pyproject.toml").exists()
    })
}

pub(super) const CACHE: &[PatternDef] = &[
    PatternDef {
        name: "__pycache__",
        category: "Python",
        description: "Python bytecode cache",
        exact: &["__pycache__"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".pytest_cache",
        category: "Python",
        description: "Pytest cache directory",
        exact: &[".pytest_cache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".mypy_cache",
        category: "Python",
        description: "Mypy type checker cache",
        exact: &[".mypy_cache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".ruff_cache",
        category: "Python",
        description: "Ruff linter cache",
        exact: &[".ruff_cache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".tox",
        category: "Python",
        description: "Tox test environments",
        exact: &[".tox"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".nox",
        category: "Python",
        description: "Nox test environments",
        exact: &[".nox"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".coverage",
        category: "Python",
        description: "Coverage reports",
        exact: &["htmlcov", ".coverage"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "node_modules",
        category: "Node.js",
        description: "Node.js dependencies (reinstallable with npm/yarn)",
        exact: &["node_modules"],
        min_size: MIB,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".next",
        category: "Node.js",
        description: "Next.js build cache",
        exact: &[".next"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".nuxt",
        category: "Node.js",
        description: "Nuxt.js build cache",
        exact: &[".nuxt"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".parcel-cache",
        category: "Node.js",
        description: "Parcel bundler cache",
        exact: &[".parcel-cache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".turbo",
        category: "Node.js",
        description: "Turborepo cache",
        exact: &[".turbo"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "target",
        category: "Rust",
        description: "Rust/Cargo build artifacts",
        exact: &["target"],
        min_size: 10 * MIB,
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".gradle",
        category: "Java",
        description: "Gradle build cache",
        exact: &[".gradle"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "build",
        category: "Build",
        description: "Build output directory",
        exact: &["build"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".cache",
        category: "Generic",
        description: "Generic cache directory",
        exact: &[".cache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "tmp",
        category: "Generic",
        description: "Temporary files",
        exact: &["tmp", "temp", ".tmp"],
        ..PatternDef::EMPTY
    },
];

pub(super) const DEV: &[PatternDef] = &[
    PatternDef {
        name: ".venv",
        category: "Python",
        description: "Python virtual environment",
        exact: &[".venv", "venv", ".virtualenv", "virtualenv", "env"],
        safety: SafetyTier::Caution,
        validator: Validator::Predicate(is_venv),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".eggs",
        category: "Python",
        description: "Python egg files",
        exact: &[".eggs"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "*.egg-info",
        category: "Python",
        description: "Python package metadata",
        regex: &[r".*\.egg-info$"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "dist",
        category: "Build",
        description: "Distribution files",
        exact: &["dist"],
        safety: SafetyTier::Caution,
        validator: Validator::Predicate(is_dist),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".idea",
        category: "IDE",
        description: "JetBrains IDE settings",
        exact: &[".idea"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".vscode",
        category: "IDE",
        description: "VS Code settings",
        exact: &[".vscode"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "docs/_build",
        category: "Docs",
        description: "Sphinx documentation build",
        exact: &["_build"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "site",
        category: "Docs",
        description: "MkDocs build output",
        exact: &["site"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "logs",
        category: "Logs",
        description: "Log directories",
        exact: &["logs", "log"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "vendor",
        category: "Vendor",
        description: "Vendored dependencies",
        exact: &["vendor", "vendors"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".terraform",
        category: "IaC",
        description: "Terraform provider cache",
        exact: &[".terraform"],
        ..PatternDef::EMPTY
    },
];

pub(super) const SYSTEM: &[PatternDef] = &[
    PatternDef {
        name: ".DS_Store",
        category: "System",
        description: "macOS folder metadata",
        exact: &[".DS_Store"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "__MACOSX",
        category: "System",
        description: "macOS resource fork data",
        exact: &["__MACOSX"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Thumbs.db",
        category: "System",
        description: "Windows thumbnail cache",
        exact: &["Thumbs.db", "thumbs.db"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "desktop.ini",
        category: "System",
        description: "Windows folder settings",
        exact: &["desktop.ini"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".git",
        category: "VCS",
        description: "Git repository (use 'git gc' to clean)",
        exact: &[".git"],
        safety: SafetyTier::Dangerous,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".svn",
        category: "VCS",
        description: "Subversion metadata",
        exact: &[".svn"],
        safety: SafetyTier::Dangerous,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: ".hg",
        category: "VCS",
        description: "Mercurial metadata",
        exact: &[".hg"],
        safety: SafetyTier::Dangerous,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "*.bak",
        category: "Backup",
        description: "Backup files",
        regex: &[r".*\.bak$", r".*~$"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "crash",
        category: "System",
        description: "Crash dump files",
        exact: &["CrashDumps", "crash_dumps", "dumps"],
        ..PatternDef::EMPTY
    },
];
