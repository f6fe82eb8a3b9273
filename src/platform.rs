//! Host platform detection and default cache locations.

use std::env;
use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

/// Where WSL mounts the Windows user profiles.
pub const WSL_USERS_DIR: &str = "/mnt/c/Users";

/// Profile folders under `C:\Users` that never belong to a person.
const SHARED_PROFILE_PREFIXES: &[&str] = &["Default", "Public", "All"];

/// Operating system family the guard and cache discovery reason about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPlatform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl HostPlatform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            HostPlatform::Linux
        } else if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else {
            HostPlatform::Other
        }
    }
}

impl Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostPlatform::Linux if is_wsl() => "Linux (WSL)",
            HostPlatform::Linux => "Linux",
            HostPlatform::MacOs => "macOS",
            HostPlatform::Windows => "Windows",
            HostPlatform::Other => "Unknown",
        };
        f.write_str(name)
    }
}

/// Whether we are running inside the Windows Subsystem for Linux.
pub fn is_wsl() -> bool {
    if HostPlatform::current() != HostPlatform::Linux {
        return false;
    }
    fs::read_to_string("/proc/version")
        .map(|version| mentions_wsl(&version))
        .unwrap_or(false)
}

fn mentions_wsl(version: &str) -> bool {
    let version = version.to_ascii_lowercase();
    version.contains("microsoft") || version.contains("wsl")
}

/// The WSL side of the machine, when running inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WslInfo {
    /// Distribution name from `WSL_DISTRO_NAME`
    pub distro: String,
    /// The Windows user profile, reached through `/mnt/c`
    pub windows_home: Option<PathBuf>,
}

/// Describes the WSL environment, or `None` outside of it.
pub fn wsl_info() -> Option<WslInfo> {
    if !is_wsl() {
        return None;
    }
    let distro = env::var("WSL_DISTRO_NAME").unwrap_or_else(|_| "Unknown".to_string());
    let user = env::var("LOGNAME").or_else(|_| env::var("USER")).ok();
    Some(WslInfo {
        distro,
        windows_home: find_windows_home(Path::new(WSL_USERS_DIR), user.as_deref()),
    })
}

/// The Windows home directory visible from WSL, if any.
pub fn windows_home() -> Option<PathBuf> {
    wsl_info().and_then(|info| info.windows_home)
}

/// Picks the profile matching `user`, or else the first personal profile in
/// name order.
fn find_windows_home(users_dir: &Path, user: Option<&str>) -> Option<PathBuf> {
    if let Some(user) = user {
        let home = users_dir.join(user);
        if home.is_dir() {
            return Some(home);
        }
    }

    let mut profiles: Vec<PathBuf> = fs::read_dir(users_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            !SHARED_PROFILE_PREFIXES
                .iter()
                .any(|prefix| name.starts_with(prefix))
        })
        .map(|entry| entry.path())
        .collect();
    profiles.sort();
    profiles.into_iter().next()
}

/// Distribution or release name, e.g. `Ubuntu 24.04 LTS`.
pub fn os_variant(platform: HostPlatform) -> Option<String> {
    match platform {
        HostPlatform::Linux => fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| os_release_name(&content)),
        _ => None,
    }
}

/// `PRETTY_NAME` from an os-release file, falling back to `NAME`.
fn os_release_name(content: &str) -> Option<String> {
    let field = |key: &str| {
        content.lines().find_map(|line| {
            line.strip_prefix(key)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|value| value.trim().trim_matches('"').to_string())
                .filter(|value| !value.is_empty())
        })
    };
    field("PRETTY_NAME").or_else(|| field("NAME"))
}

/// The user's home directory, if it can be determined.
pub fn home_dir() -> Option<PathBuf> {
    home::home_dir()
}

/// Directories whose children are application and browser caches.
pub fn cache_roots(platform: HostPlatform, home: &Path) -> Vec<PathBuf> {
    let candidates = match platform {
        HostPlatform::Linux | HostPlatform::Other => vec![
            home.join(".cache"),
            home.join(".config"),
            home.join(".local/share/Trash"),
        ],
        HostPlatform::MacOs => vec![home.join("Library/Caches"), home.join(".cache")],
        HostPlatform::Windows => vec![
            home.join("AppData/Local/Temp"),
            home.join("AppData/Local/Google/Chrome/User Data"),
            home.join("AppData/Local/Microsoft/Edge/User Data"),
            home.join("AppData/Roaming/Code"),
        ],
    };
    existing(candidates)
}

/// Directories holding package manager caches.
pub fn package_roots(platform: HostPlatform, home: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![
        home.join(".npm"),
        home.join(".cargo"),
        home.join(".m2"),
        home.join(".gradle"),
        home.join("go/pkg"),
        home.join(".nuget"),
        home.join(".bundle"),
    ];
    match platform {
        HostPlatform::Linux | HostPlatform::Other => {
            candidates.extend([home.join(".cache"), home.join(".local/share/pnpm")])
        }
        HostPlatform::MacOs => {
            candidates.extend([home.join("Library/Caches"), home.join("Library/pnpm")])
        }
        HostPlatform::Windows => candidates.extend([
            home.join("AppData/Local/npm-cache"),
            home.join("AppData/Local/pip"),
            home.join("AppData/Local/Yarn"),
            home.join("AppData/Local/pnpm"),
            home.join("AppData/Local/NuGet"),
            home.join("AppData/Local/go-build"),
            home.join("AppData/Roaming/Composer"),
        ]),
    }
    existing(candidates)
}

/// Windows cache roots under a WSL-mounted Windows home.
pub fn wsl_cache_roots(windows_home: &Path) -> Vec<PathBuf> {
    existing(vec![windows_home.join("AppData/Local/Temp")])
}

/// Windows package cache roots under a WSL-mounted Windows home.
pub fn wsl_package_roots(windows_home: &Path) -> Vec<PathBuf> {
    package_roots(HostPlatform::Windows, windows_home)
}

fn existing(candidates: Vec<PathBuf>) -> Vec<PathBuf> {
    candidates.into_iter().filter(|path| path.is_dir()).collect()
}
