//! Browser, package manager and application cache patterns, used when
//! scanning the per-user cache roots rather than project trees.

use std::path::Path;

use super::{PackageManager, PatternDef, SafetyTier, Validator};

/// Cargo caches are only worth reporting once they grow this large.
const LARGE_CACHE: u64 = 50 * 1024 * 1024;

/// `repository` is far too common a name to match anywhere but `~/.m2`.
fn parent_is_m2(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|name| name == ".m2")
}

pub(super) const BROWSERS: &[PatternDef] = &[
    PatternDef {
        name: "Chrome Cache",
        category: "Browser",
        description: "Chrome browser cache",
        exact: &["Cache", "Code Cache", "GPUCache", "ShaderCache", "GrShaderCache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Chrome Media Cache",
        category: "Browser",
        description: "Chrome media and service worker cache",
        exact: &["Media Cache", "Service Worker"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Chrome Storage",
        category: "Browser",
        description: "Chrome local storage (safe if not important)",
        exact: &["IndexedDB", "Local Storage", "Session Storage"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Firefox Cache",
        category: "Browser",
        description: "Firefox browser cache",
        exact: &["cache2", "startupCache", "shader-cache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Firefox Offline Cache",
        category: "Browser",
        description: "Firefox offline cache",
        exact: &["OfflineCache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Edge Cache",
        category: "Browser",
        description: "Microsoft Edge cache",
        exact: &["Cache", "Code Cache", "GPUCache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Safari Cache",
        category: "Browser",
        description: "Safari browser cache",
        regex: &[r"com\.apple\.Safari.*"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "WebKit Cache",
        category: "Browser",
        description: "WebKit shared cache",
        regex: &[r"com\.apple\.WebKit.*"],
        ..PatternDef::EMPTY
    },
];

pub(super) const PACKAGE_MANAGERS: &[PatternDef] = &[
    PatternDef {
        name: "Maven repository",
        category: "Package Manager",
        description: "Maven local repository (.m2/repository)",
        exact: &["repository"],
        validator: Validator::Predicate(parent_is_m2),
        manager: Some(PackageManager::Maven),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "npm cache",
        category: "Package Manager",
        description: "npm cache files",
        exact: &["_cacache", "_npx", "_logs"],
        manager: Some(PackageManager::Npm),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "yarn cache",
        category: "Package Manager",
        description: "Yarn package cache",
        exact: &["yarn"],
        regex: &[r"v[0-9]+-tmp"],
        manager: Some(PackageManager::Yarn),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "pnpm store",
        category: "Package Manager",
        description: "pnpm package store",
        exact: &["pnpm-store", "pnpm"],
        manager: Some(PackageManager::Pnpm),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "pip cache",
        category: "Package Manager",
        description: "pip download cache",
        exact: &["pip", "wheels"],
        regex: &[r"http-v[0-9]+$"],
        manager: Some(PackageManager::Pip),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "pipx cache",
        category: "Package Manager",
        description: "pipx cache",
        exact: &["pipx"],
        manager: Some(PackageManager::Pip),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Cargo registry",
        category: "Package Manager",
        description: "Cargo package registry cache",
        exact: &["registry"],
        min_size: LARGE_CACHE,
        safety: SafetyTier::Caution,
        manager: Some(PackageManager::Cargo),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Cargo git",
        category: "Package Manager",
        description: "Cargo git dependencies cache",
        exact: &["checkouts"],
        regex: &[r"db$"],
        min_size: LARGE_CACHE,
        safety: SafetyTier::Caution,
        manager: Some(PackageManager::Cargo),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Go build cache",
        category: "Package Manager",
        description: "Go build cache",
        exact: &["go-build"],
        manager: Some(PackageManager::Go),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Go mod cache",
        category: "Package Manager",
        description: "Go module cache",
        regex: &[r"mod$"],
        safety: SafetyTier::Caution,
        manager: Some(PackageManager::Go),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Gradle caches",
        category: "Package Manager",
        description: "Gradle build cache",
        exact: &["modules-2", "build-cache-1"],
        regex: &[r"caches$"],
        manager: Some(PackageManager::Gradle),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Composer cache",
        category: "Package Manager",
        description: "PHP Composer cache",
        exact: &["composer"],
        manager: Some(PackageManager::Composer),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "NuGet cache",
        category: "Package Manager",
        description: "NuGet package cache",
        exact: &["nuget", "NuGet"],
        manager: Some(PackageManager::Nuget),
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Bundler cache",
        category: "Package Manager",
        description: "Ruby Bundler cache",
        exact: &["bundler"],
        manager: Some(PackageManager::Bundler),
        ..PatternDef::EMPTY
    },
];

pub(super) const APPS: &[PatternDef] = &[
    PatternDef {
        name: "VS Code Cache",
        category: "App",
        description: "VS Code cached data",
        exact: &["CachedData", "CachedExtensions", "CachedExtensionVSIXs"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "VS Code Crashpad",
        category: "App",
        description: "VS Code crash reports",
        exact: &["Crashpad"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "JetBrains Caches",
        category: "App",
        description: "JetBrains IDE caches",
        regex: &[
            r"(IntelliJ|PyCharm|WebStorm|GoLand|CLion|Rider|PhpStorm|RubyMine|DataGrip|AndroidStudio).*",
            r"JetBrains$",
        ],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "JetBrains Local History",
        category: "App",
        description: "JetBrains local history",
        exact: &["LocalHistory"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Docker buildx cache",
        category: "App",
        description: "Docker buildx cache",
        exact: &["buildx"],
        safety: SafetyTier::Caution,
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Electron GPU Cache",
        category: "App",
        description: "Electron app GPU cache",
        exact: &["GPUCache", "gpu-process-preferences"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Electron Blob Storage",
        category: "App",
        description: "Electron blob storage",
        exact: &["blob_storage"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Teams Cache",
        category: "App",
        description: "Microsoft Teams cache",
        regex: &[r"Teams$", r"microsoft-teams$"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Slack Cache",
        category: "App",
        description: "Slack cache",
        regex: &[r"[Ss]lack$"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Discord Cache",
        category: "App",
        description: "Discord cache",
        regex: &[r"[Dd]iscord$"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Zoom Cache",
        category: "App",
        description: "Zoom cache",
        regex: &[r"[Zz]oom$", r"zoom\.us$"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Spotify Cache",
        category: "App",
        description: "Spotify streaming cache",
        regex: &[r"spotify$", r"Spotify$"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Thumbnails",
        category: "System",
        description: "Image thumbnail cache",
        exact: &["thumbnails", "Thumbnails"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Font Cache",
        category: "System",
        description: "Font rendering cache",
        exact: &["fontconfig"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "Mesa Shader Cache",
        category: "System",
        description: "Mesa GPU shader cache",
        exact: &["mesa_shader_cache", "mesa_shader_cache_db"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "NVIDIA Cache",
        category: "System",
        description: "NVIDIA GPU cache",
        exact: &["nvidia", "GLCache", "ComputeCache"],
        ..PatternDef::EMPTY
    },
    PatternDef {
        name: "AMD Cache",
        category: "System",
        description: "AMD GPU cache",
        exact: &["AMD", "VkCache"],
        ..PatternDef::EMPTY
    },
];
