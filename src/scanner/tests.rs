use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::patterns::CacheGroups;

fn write_file(path: &Path, len: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![b'x'; len]).unwrap();
}

fn sandbox_guard(temp_dir: &TempDir) -> PathGuard {
    PathGuard::builder()
        .system_dirs(Vec::<PathBuf>::new())
        .home(temp_dir.path().join("home"))
        .build()
}

fn scanner(temp_dir: &TempDir) -> ScannerBuilder {
    Scanner::builder().guard(sandbox_guard(temp_dir))
}

fn names(result: &ScanResult) -> Vec<String> {
    result
        .targets
        .iter()
        .map(|target| target.pattern.name().to_string())
        .collect()
}

#[test]
fn test_node_modules_and_pycache() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("node_modules/pkg/index.js"), 1_048_676);
    write_file(&project.join("__pycache__/mod.pyc"), 1_000);

    let result = scanner(&temp_dir).build().scan(&project);

    assert_eq!(names(&result), vec!["node_modules", "__pycache__"]);
    assert_eq!(result.targets[0].path, project.join("node_modules"));
    assert_eq!(result.targets[0].size_bytes, 1_048_676);
    assert_eq!(result.targets[0].file_count, 1);
    assert_eq!(result.targets[1].size_bytes, 1_000);
    assert_eq!(result.total_size, 1_049_676);
    assert!(result.errors.is_empty());
    assert_eq!(result.root(), Some(project.as_path()));
}

#[test]
fn test_pattern_min_size_drops_small_matches() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("node_modules/pkg/index.js"), 10);
    write_file(&project.join("target/debug/app"), 4096);

    let result = scanner(&temp_dir).build().scan(&project);
    assert!(result.targets.is_empty());
    assert_eq!(result.total_size, 0);
}

#[test]
fn test_caller_min_size() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("__pycache__/a.pyc"), 5_000);
    write_file(&project.join("pkg/.pytest_cache/v/cache"), 500);

    let result = scanner(&temp_dir).min_size(1_000).build().scan(&project);
    assert_eq!(names(&result), vec!["__pycache__"]);
    for target in &result.targets {
        assert!(target.size_bytes >= 1_000);
        assert!(target.size_bytes >= target.pattern.min_size());
    }
}

#[test]
fn test_empty_matches_are_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    fs::create_dir_all(project.join("__pycache__")).unwrap();

    let result = scanner(&temp_dir).build().scan(&project);
    assert!(result.targets.is_empty());
}

#[test]
fn test_matched_directories_are_not_descended() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join(".tox/py312/lib/__pycache__/x.pyc"), 100);
    write_file(&project.join(".tox/py312/lib/site.py"), 100);

    let result = scanner(&temp_dir).build().scan(&project);
    assert_eq!(names(&result), vec![".tox"]);
    assert_eq!(result.targets[0].size_bytes, 200);
    assert_eq!(result.targets[0].file_count, 2);
}

#[test]
fn test_root_itself_is_classified() {
    let temp_dir = TempDir::new().unwrap();
    let cache = temp_dir.path().join("__pycache__");
    write_file(&cache.join("a.pyc"), 300);
    write_file(&cache.join("nested/__pycache__/b.pyc"), 200);

    let result = scanner(&temp_dir).build().scan(&cache);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].path, cache);
    assert_eq!(result.targets[0].size_bytes, 500);
}

#[test]
fn test_depth_bound() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("a/b/__pycache__/x.pyc"), 100);

    let shallow = scanner(&temp_dir).max_depth(1).build().scan(&project);
    assert!(shallow.targets.is_empty());

    let enough = scanner(&temp_dir).max_depth(2).build().scan(&project);
    assert_eq!(names(&enough), vec!["__pycache__"]);
}

#[test]
fn test_deep_mode_depth() {
    assert_eq!(Scanner::builder().build().max_depth(), DEFAULT_MAX_DEPTH);
    assert_eq!(Scanner::builder().deep(true).build().max_depth(), DEEP_MAX_DEPTH);
    assert_eq!(
        Scanner::builder().deep(true).max_depth(CACHE_MAX_DEPTH).build().max_depth(),
        CACHE_MAX_DEPTH
    );

    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("1/2/3/4/5/6/7/__pycache__/x.pyc"), 100);

    let normal = scanner(&temp_dir).build().scan(&project);
    assert!(normal.targets.is_empty());

    let deep = scanner(&temp_dir).deep(true).build().scan(&project);
    assert_eq!(names(&deep), vec!["__pycache__"]);
}

#[test]
fn test_protected_children_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("secrets/__pycache__/x.pyc"), 100);
    write_file(&project.join(".aws/cli/cache/x.json"), 100);
    write_file(&project.join("ok/__pycache__/y.pyc"), 100);

    let result = scanner(&temp_dir).build().scan(&project);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].path, project.join("ok/__pycache__"));
}

#[test]
fn test_project_roots_are_scanned() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("Cargo.toml"), 10);
    write_file(&project.join("crate/pyproject.toml"), 10);
    write_file(&project.join("crate/.mypy_cache/3.12/x.json"), 100);

    let result = scanner(&temp_dir).build().scan(&project);
    assert_eq!(names(&result), vec![".mypy_cache"]);
}

#[test]
fn test_protected_root_is_pruned() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("__pycache__/x.pyc"), 100);

    let guard = PathGuard::builder()
        .system_dirs([project.clone()])
        .no_home()
        .build();
    let result = Scanner::builder().guard(guard).build().scan(&project);
    assert!(result.targets.is_empty());
    assert!(result.errors.is_empty());
}

#[test]
fn test_dangerous_patterns_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join(".git/objects/pack/p.pack"), 2_000);

    let result = scanner(&temp_dir).build().scan(&project);
    assert_eq!(names(&result), vec![".git"]);
    assert_eq!(result.targets[0].safety(), SafetyTier::Dangerous);
}

#[test]
fn test_missing_root_records_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let result = scanner(&temp_dir).build().scan(&missing);
    assert!(result.targets.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with(&format!("{}: ", missing.display())));
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_does_not_abort() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let locked = project.join("locked");
    write_file(&locked.join("inner/x.txt"), 10);
    write_file(&project.join("open/__pycache__/y.pyc"), 100);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still list the directory
    let listable = fs::read_dir(&locked).is_ok();
    let result = scanner(&temp_dir).build().scan(&project);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(names(&result), vec!["__pycache__"]);
    if !listable {
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with(&format!("{}: ", locked.display())));
    }
}

#[test]
#[cfg(unix)]
fn test_symlinks_are_not_followed() {
    use std::os::unix::fs::symlink;

    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let elsewhere = temp_dir.path().join("elsewhere");
    write_file(&elsewhere.join("__pycache__/x.pyc"), 100);
    fs::create_dir_all(&project).unwrap();
    symlink(&elsewhere, project.join("link")).unwrap();
    symlink(elsewhere.join("__pycache__"), project.join("__pycache__")).unwrap();

    let result = scanner(&temp_dir).build().scan(&project);
    assert!(result.targets.is_empty());
}

#[test]
fn test_scan_is_repeatable() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    for (i, dir) in ["a", "b", "c", "d"].iter().enumerate() {
        write_file(&project.join(dir).join("__pycache__/m.pyc"), 100 * (i + 1));
        write_file(&project.join(dir).join(".ruff_cache/c"), 100);
    }

    let scanner = scanner(&temp_dir).build();
    let first = scanner.scan(&project);
    let second = scanner.scan(&project);

    let summary = |result: &ScanResult| -> Vec<(PathBuf, u64)> {
        result
            .targets
            .iter()
            .map(|t| (t.path.clone(), t.size_bytes))
            .collect()
    };
    assert_eq!(summary(&first), summary(&second));
    assert_eq!(first.targets.len(), 8);

    // Equal sizes are ordered by path
    let ruff: Vec<&PathBuf> = first
        .targets
        .iter()
        .filter(|t| t.size_bytes == 100)
        .map(|t| &t.path)
        .collect();
    let mut sorted = ruff.clone();
    sorted.sort();
    assert_eq!(ruff, sorted);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    for i in 0..12 {
        write_file(&project.join(format!("p{i}/__pycache__/m.pyc")), 10 + i);
    }

    let parallel = scanner(&temp_dir)
        .parallelism(Parallelism::new(4))
        .build()
        .scan(&project);
    let sequential = scanner(&temp_dir)
        .parallelism(Parallelism::sequential())
        .build()
        .scan(&project);

    let paths = |result: &ScanResult| -> Vec<PathBuf> {
        result.targets.iter().map(|t| t.path.clone()).collect()
    };
    assert_eq!(paths(&parallel), paths(&sequential));
    assert_eq!(parallel.total_size, sequential.total_size);
}

#[test]
fn test_overlapping_roots_are_deduplicated() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("sub/__pycache__/x.pyc"), 100);

    let result = scanner(&temp_dir)
        .build()
        .scan_roots(&[project.clone(), project.join("sub")], &NoProgress);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.total_size, 100);
    assert_eq!(result.roots.len(), 2);
}

#[test]
fn test_category_totals() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("__pycache__/a.pyc"), 100);
    write_file(&project.join(".mypy_cache/b"), 200);
    write_file(&project.join("web/.next/c"), 50);

    let result = scanner(&temp_dir).build().scan(&project);
    assert_eq!(
        result.category_totals(),
        vec![("Python".to_string(), 300), ("Node.js".to_string(), 50)]
    );
    assert!(result.manager_totals().is_empty());
}

#[test]
fn test_package_cache_scan_with_manager_totals() {
    let temp_dir = TempDir::new().unwrap();
    let home = temp_dir.path().join("home");
    write_file(&home.join(".m2/repository/org/lib.jar"), 700);
    write_file(&home.join(".npm/_cacache/index"), 300);
    write_file(&home.join(".cache/pip/http-v2/x"), 200);
    write_file(&home.join("code/repository/readme"), 999);

    let roots = vec![home.join(".m2"), home.join(".npm"), home.join(".cache")];
    let result = scanner(&temp_dir)
        .registry(Registry::package_managers(&PackageManager::ALL))
        .max_depth(CACHE_MAX_DEPTH)
        .build()
        .scan_roots(&roots, &NoProgress);

    assert_eq!(
        names(&result),
        vec!["Maven repository", "npm cache", "pip cache"]
    );
    assert_eq!(
        result.manager_totals(),
        vec![
            (PackageManager::Maven, 700),
            (PackageManager::Npm, 300),
            (PackageManager::Pip, 200),
        ]
    );
}

#[test]
fn test_system_cache_scan() {
    let temp_dir = TempDir::new().unwrap();
    let cache = temp_dir.path().join("home/.cache");
    write_file(&cache.join("google-chrome/Default/Cache/data_0"), 400);
    write_file(&cache.join("fontconfig/x.cache"), 100);

    let result = scanner(&temp_dir)
        .registry(Registry::system_caches(CacheGroups::default()))
        .max_depth(CACHE_MAX_DEPTH)
        .build()
        .scan(&cache);
    assert_eq!(names(&result), vec!["Chrome Cache", "Font Cache"]);
}

#[test]
fn test_inspect() {
    let temp_dir = TempDir::new().unwrap();
    let scanner = scanner(&temp_dir).build();
    assert!(matches!(
        scanner.inspect(Path::new("/w/node_modules")),
        Visit::Matched(ref p) if p.name() == "node_modules"
    ));
    assert!(matches!(scanner.inspect(Path::new("/w/src")), Visit::Descend));
    assert!(matches!(scanner.inspect(Path::new("/w/.ssh")), Visit::Skip));
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl Progress for Recorder {
    fn begin(&self, phase: Phase, total: Option<usize>) {
        self.events
            .borrow_mut()
            .push(format!("begin {phase:?} {total:?}"));
    }

    fn advance(&self, _path: &Path) {
        self.events.borrow_mut().push("advance".to_string());
    }

    fn finish(&self, phase: Phase) {
        self.events.borrow_mut().push(format!("finish {phase:?}"));
    }
}

#[test]
fn test_progress_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    write_file(&project.join("a/__pycache__/x.pyc"), 10);
    write_file(&project.join("b/__pycache__/x.pyc"), 10);

    let recorder = Recorder::default();
    let result = scanner(&temp_dir)
        .build()
        .scan_with_progress(&project, &recorder);
    assert_eq!(result.targets.len(), 2);

    assert_eq!(
        recorder.events.into_inner(),
        vec![
            "begin Classifying None",
            "finish Classifying",
            "begin Sizing Some(2)",
            "advance",
            "advance",
            "finish Sizing",
        ]
    );
}

#[test]
fn test_crate_level_scan() {
    let temp_dir = TempDir::new().unwrap();
    let result = scan(&temp_dir.path().join("absent"), false, 0);
    assert!(result.targets.is_empty());
}
