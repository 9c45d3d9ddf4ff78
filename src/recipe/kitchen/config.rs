// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use super::collect::PackageInfo;
use super::patch::PatchReport;
use super::requirements::ResolvedRequirement;
use super::system::SystemInstallResult;
use crate::platform::{HostPlatform, Os};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum_macros::{AsRefStr, Display, EnumString};

/// CMake build configuration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

/// Build matrix values identifying one binary package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl Settings {
    /// Settings for the given host, with the platform's usual compiler
    pub fn for_host(platform: &HostPlatform, build_type: BuildType) -> Self {
        let compiler = match platform.os {
            Os::Windows => "msvc",
            Os::Macos => "apple-clang",
            Os::Linux | Os::Other => "gcc",
        };
        Self {
            os: platform.os,
            compiler: compiler.to_string(),
            build_type,
            arch: platform.arch.clone(),
        }
    }
}

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Holds `source/`, `build/` and `package/`
    pub workdir: PathBuf,
    /// Number of parallel build jobs
    pub jobs: u32,
    /// Kill external commands after this long (None = wait forever)
    pub timeout: Option<Duration>,
    pub build_type: BuildType,
    /// Remove an existing checkout and clone again
    pub fresh_source: bool,
    /// Where prebuilt requirement prefixes live (`<root>/<name>-<version>/`)
    pub deps_root: Option<PathBuf>,
    /// Prefix apt-get with sudo (None = decide from the effective uid)
    pub use_sudo: Option<bool>,
    /// Commands are logged, not run
    pub dry_run: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            workdir: PathBuf::from("kitchen"),
            jobs,
            timeout: None,
            build_type: BuildType::default(),
            fresh_source: false,
            deps_root: None,
            use_sudo: None,
            dry_run: false,
        }
    }
}

impl KitchenConfig {
    /// Default configuration rooted at `workdir`
    pub fn for_workdir(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_deps_root(mut self, root: &Path) -> Self {
        self.deps_root = Some(root.to_path_buf());
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    pub fn source_dir(&self) -> PathBuf {
        self.workdir.join("source")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.workdir.join("build")
    }

    pub fn package_dir(&self) -> PathBuf {
        self.workdir.join("package")
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Install prefix the package hook populated
    pub package_dir: PathBuf,
    /// Consumer metadata from the package_info hook
    pub package_info: PackageInfo,
    /// System packages checked or installed
    pub system: SystemInstallResult,
    /// Requirements pinned to prefixes
    pub requirements: Vec<ResolvedRequirement>,
    /// One report per patch operation, in recipe order
    pub patches: Vec<PatchReport>,
    /// SHA-256 over the package directory (None when nothing was installed)
    pub layout_digest: Option<String>,
    /// Build log
    pub log: String,
    /// Warnings generated during the cook
    pub warnings: Vec<String>,
}
