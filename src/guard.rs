//! Protected-path guard.
//!
//! Decides whether a path must never be scanned into or deleted. The rules,
//! checked in order with the first match winning:
//!
//! 1. The absolute path is, or lies below, a system directory (`/etc`, `/usr`,
//!    `C:\Windows`, `/System`, ...). A directory whose own name is a well known
//!    cache (`node_modules`, `__pycache__`, `.cache`, ...) is exempt from this
//!    rule. A filesystem root only protects itself.
//! 2. The last component is a credential store (`.ssh`, `.gnupg`, `.aws`, ...).
//! 3. The path is a personal folder directly inside the home directory.
//! 4. Platform system locations on Windows and macOS.
//! 5. For deletion only: the directory is a project root.

use std::path::{self, Component, MAIN_SEPARATOR, Path, PathBuf};
use std::sync::LazyLock;

use crate::platform::{self, HostPlatform};

/// Directories that are never descended into or deleted.
pub const SYSTEM_DIRS: &[&str] = &[
    "/",
    "/bin",
    "/boot",
    "/dev",
    "/etc",
    "/lib",
    "/lib64",
    "/opt",
    "/proc",
    "/root",
    "/run",
    "/sbin",
    "/srv",
    "/sys",
    "/tmp",
    "/usr",
    "/var",
    "C:\\",
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "C:\\ProgramData",
    "/mnt/c/Windows",
    "/mnt/c/Program Files",
    "/mnt/c/Program Files (x86)",
    "/mnt/c/ProgramData",
    "/System",
    "/Library",
    "/Applications",
    "/private",
];

/// Cache directory names exempt from the system directory rule.
pub const SAFE_CACHE_NAMES: &[&str] = &[
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "node_modules",
    ".next",
    ".nuxt",
    ".cache",
    ".parcel-cache",
    ".tox",
    ".nox",
];

/// Directory names protected wherever they appear.
pub const PROTECTED_NAMES: &[&str] = &[
    ".ssh",
    ".gnupg",
    ".gpg",
    ".aws",
    ".kube",
    ".docker",
    "credentials",
    "secrets",
    ".password-store",
];

/// Folders protected when they sit directly in the home directory.
pub const PERSONAL_FOLDERS: &[&str] = &[
    "Documents",
    "Desktop",
    "Downloads",
    "Pictures",
    "Music",
    "Videos",
];

/// Files whose presence marks a project root.
pub const PROJECT_MARKERS: &[&str] = &[
    ".git",
    "package.json",
    "pyproject.toml",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
];

const WINDOWS_PREFIXES: &[&str] = &[
    "C:\\WINDOWS",
    "C:\\PROGRAM FILES",
    "C:\\PROGRAMDATA",
    "C:\\USERS\\DEFAULT",
    "C:\\USERS\\PUBLIC",
    "C:\\$RECYCLE.BIN",
    "C:\\SYSTEM VOLUME INFORMATION",
];

const MACOS_DIRS: &[&str] = &["/System", "/Library", "/private", "/cores", "/Applications"];

const MACOS_HOME_DIRS: &[&str] = &["Library/Application Support", "Library/Preferences"];

/// Keyring directory relative to the home directory.
const KEYRINGS: &str = ".local/share/keyrings";

static HOST_GUARD: LazyLock<PathGuard> = LazyLock::new(PathGuard::host);

/// Predicate over paths that must never be scanned into or deleted.
#[derive(Clone, Debug)]
pub struct PathGuard {
    /// System directories, lowercased
    system_dirs: Vec<String>,
    home: Option<PathBuf>,
    platform: HostPlatform,
}

impl PathGuard {
    /// A guard describing the running machine.
    pub fn host() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for [`PathGuard`]
    pub fn builder() -> PathGuardBuilder {
        PathGuardBuilder::default()
    }

    /// The home directory personal-folder rules are relative to
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// The platform whose system locations are protected
    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    /// Whether `path` must be left alone.
    ///
    /// With `for_scanning_only` set, project roots are not protected: a
    /// scan may descend into them, only deleting them is refused. `.` and
    /// `..` components are resolved lexically before any rule is checked.
    pub fn is_protected(&self, path: &Path, for_scanning_only: bool) -> bool {
        let path = lexically_clean(path);
        let path = path.as_path();
        let name = path.file_name().and_then(|name| name.to_str());

        if !name.is_some_and(|name| SAFE_CACHE_NAMES.contains(&name))
            && self.under_system_dir(path)
        {
            return true;
        }

        if name.is_some_and(|name| PROTECTED_NAMES.contains(&name)) {
            return true;
        }

        if let Some(home) = &self.home {
            if path.parent() == Some(home.as_path())
                && name.is_some_and(|name| PERSONAL_FOLDERS.contains(&name))
            {
                return true;
            }
            if path == home.join(KEYRINGS) {
                return true;
            }
        }

        match self.platform {
            HostPlatform::Windows if windows_protected(path) => return true,
            HostPlatform::MacOs if self.macos_protected(path) => return true,
            _ => {}
        }

        !for_scanning_only && is_project_root(path)
    }

    fn under_system_dir(&self, path: &Path) -> bool {
        let absolute = path::absolute(path)
            .map(|absolute| lexically_clean(&absolute))
            .unwrap_or_else(|_| path.to_path_buf());
        let lowered = absolute.to_string_lossy().to_lowercase();
        self.system_dirs
            .iter()
            .any(|dir| is_within(&lowered, dir, MAIN_SEPARATOR))
    }

    fn macos_protected(&self, path: &Path) -> bool {
        let raw = path.to_string_lossy();
        let home_dirs = self.home.iter().flat_map(|home| {
            MACOS_HOME_DIRS
                .iter()
                .map(move |dir| home.join(dir).to_string_lossy().into_owned())
        });
        let protected = MACOS_DIRS
            .iter()
            .map(|dir| dir.to_string())
            .chain(home_dirs)
            .any(|dir| is_within(&raw, &dir, '/'));

        protected && !path.components().any(|c| c.as_os_str() == "Caches")
    }
}

/// Builder for [`PathGuard`]
#[derive(Debug, Default)]
pub struct PathGuardBuilder {
    system_dirs: Option<Vec<PathBuf>>,
    home: Option<Option<PathBuf>>,
    platform: Option<HostPlatform>,
}

impl PathGuardBuilder {
    /// Replace the system directory table
    pub fn system_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.system_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Set the home directory
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(Some(home.into()));
        self
    }

    /// Pretend there is no home directory
    pub fn no_home(mut self) -> Self {
        self.home = Some(None);
        self
    }

    /// Set the platform whose system locations are protected
    pub fn platform(mut self, platform: HostPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Build the [`PathGuard`]
    pub fn build(self) -> PathGuard {
        let system_dirs = match self.system_dirs {
            Some(dirs) => dirs
                .iter()
                .map(|dir| dir.to_string_lossy().to_lowercase())
                .collect(),
            None => SYSTEM_DIRS.iter().map(|dir| dir.to_lowercase()).collect(),
        };

        PathGuard {
            system_dirs,
            home: self.home.unwrap_or_else(platform::home_dir),
            platform: self.platform.unwrap_or_else(HostPlatform::current),
        }
    }
}

/// Removes `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above a root; leading `..` of a relative path are kept.
pub fn lexically_clean(path: &Path) -> PathBuf {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match clean.components().next_back() {
                Some(Component::Normal(_)) => {
                    clean.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => clean.push(Component::ParentDir),
            },
            other => clean.push(other),
        }
    }
    clean
}

/// `path` equals `dir` or lies below it. Roots only match themselves.
fn is_within(path: &str, dir: &str, separator: char) -> bool {
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with(separator) && !dir.ends_with(separator))
}

fn windows_protected(path: &Path) -> bool {
    let raw = path.to_string_lossy().to_uppercase();
    WINDOWS_PREFIXES.iter().any(|prefix| raw.starts_with(prefix))
}

fn is_project_root(path: &Path) -> bool {
    PROJECT_MARKERS
        .iter()
        .any(|marker| path.join(marker).exists())
}

/// Checks `path` against the guard for the running machine.
pub fn is_protected(path: &Path, for_scanning_only: bool) -> bool {
    HOST_GUARD.is_protected(path, for_scanning_only)
}
