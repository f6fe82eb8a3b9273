#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::{env, fs};

use bloat_hunter::PathGuard;
use tempfile::TempDir;

/// Global mutex to ensure only one test manipulates HOME at a time.
static HOME_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// RAII guard that redirects HOME to a temporary directory.
///
/// While the guard is alive, anything that resolves the user's home directory
/// (default cache roots, the personal-folder rules) sees the sandbox instead
/// of the developer's real home.
pub struct TempHomeGuard {
    _lock: MutexGuard<'static, ()>,
    temp_home: TempDir,
    prev_home: Option<OsString>,
    #[cfg(windows)]
    prev_userprofile: Option<OsString>,
}

impl TempHomeGuard {
    /// Create a new guard with a fresh temporary home directory.
    pub fn new() -> Self {
        // A failed test may poison the lock; the environment is still restored
        let lock = HOME_MUTEX
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let temp_home = TempDir::new().expect("failed to create temporary HOME");
        let prev_home = env::var_os("HOME");
        #[cfg(windows)]
        let prev_userprofile = env::var_os("USERPROFILE");

        // SAFETY: we hold HOME_MUTEX, ensuring no other thread mutates the
        // environment while we redirect HOME for the test.
        unsafe {
            env::set_var("HOME", temp_home.path());
            #[cfg(windows)]
            env::set_var("USERPROFILE", temp_home.path());
        }

        Self {
            _lock: lock,
            temp_home,
            prev_home,
            #[cfg(windows)]
            prev_userprofile,
        }
    }

    /// Path to the temporary HOME directory.
    pub fn home(&self) -> &Path {
        self.temp_home.path()
    }
}

impl Drop for TempHomeGuard {
    fn drop(&mut self) {
        // SAFETY: guarded by HOME_MUTEX; we restore the environment to its
        // previous state before releasing the lock.
        unsafe {
            match self.prev_home.as_ref() {
                Some(prev) => env::set_var("HOME", prev),
                None => env::remove_var("HOME"),
            }
            #[cfg(windows)]
            match self.prev_userprofile.as_ref() {
                Some(prev) => env::set_var("USERPROFILE", prev),
                None => env::remove_var("USERPROFILE"),
            }
        }
    }
}

/// Guard for trees under the system temp directory: no system directories,
/// home at `<temp>/home`.
pub fn sandbox_guard(temp: &Path) -> PathGuard {
    PathGuard::builder()
        .system_dirs(Vec::<PathBuf>::new())
        .home(temp.join("home"))
        .build()
}

/// Write `len` filler bytes to `path`, creating parent directories.
pub fn write_file(path: &Path, len: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![b'x'; len]).unwrap();
}

/// A small workspace with typical project bloat:
///
/// - `web/node_modules/pkg/index.js` (1,048,676 B, safe)
/// - `web/package.json`
/// - `py/__pycache__/mod.pyc` (1,000 B, safe)
/// - `rust/target/debug/app` (2,000 B, below the 10 MiB `target` minimum)
/// - `rust/build/out.o` (3,000 B, caution)
/// - `repo/.git/HEAD` (500 B, dangerous)
pub fn mock_workspace(root: &Path) {
    write_file(&root.join("web/node_modules/pkg/index.js"), 1_048_676);
    fs::write(root.join("web/package.json"), "{}").unwrap();
    write_file(&root.join("py/__pycache__/mod.pyc"), 1_000);
    write_file(&root.join("py/app.py"), 50);
    write_file(&root.join("rust/target/debug/app"), 2_000);
    write_file(&root.join("rust/build/out.o"), 3_000);
    write_file(&root.join("repo/.git/HEAD"), 500);
}

/// `a.txt`, `sub/b.txt` and `c.txt` share 1 KiB of content; `d.txt` has
/// the same size but different bytes.
pub fn duplicate_tree(root: &Path) {
    let content = vec![42u8; 1024];
    for name in ["a.txt", "sub/b.txt", "c.txt"] {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &content).unwrap();
    }
    fs::write(root.join("d.txt"), vec![43u8; 1024]).unwrap();
}
