// src/recipe/kitchen/mod.rs

//! Kitchen: runs recipe hooks against a working directory
//!
//! The Kitchen owns the configuration and the command runner. Every
//! external tool (git, cmake, apt-get, dpkg-query) is reached through the
//! runner, so a cook can run for real, as a dry run, or under test.
//!
//! Working directory layout:
//! - `source/`: the git checkout, patched in place, with `.kitchen-patches.json`
//! - `build/`: CMake build tree plus the generated build-info include
//! - `package/`: install prefix
//! - `package_info.json`: consumer metadata

mod buildinfo;
pub mod cmake;
mod collect;
mod config;
mod cook;
pub mod patch;
pub mod requirements;
pub mod runner;
pub mod system;
mod vcs;

pub use buildinfo::{render_buildinfo, write_buildinfo, BUILDINFO_FILE};
pub use cmake::{CMakeDefinitions, CMakeProject};
pub use collect::{collect_libs, PackageInfo, PACKAGE_INFO_FILE};
pub use config::{BuildType, CookResult, KitchenConfig, Settings};
pub use cook::Cook;
pub use patch::{PatchLedger, PatchOutcome, PatchReport, PATCH_LEDGER_FILE};
pub use requirements::{PrefixResolver, Requirement, RequirementResolver, ResolvedRequirement};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, DryRunRunner, SystemRunner};
pub use system::SystemInstallResult;
pub use vcs::SourceFetch;

use crate::error::Result;
use crate::platform::HostPlatform;
use crate::recipe::format::Recipe;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::info;

/// Life-cycle hooks, in the order a full cook runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Hook {
    SystemRequirements,
    Requirements,
    Source,
    Build,
    Package,
    PackageInfo,
}

impl Hook {
    pub const ALL: [Hook; 6] = [
        Hook::SystemRequirements,
        Hook::Requirements,
        Hook::Source,
        Hook::Build,
        Hook::Package,
        Hook::PackageInfo,
    ];
}

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    runner: Arc<dyn CommandRunner>,
    /// Overrides the dependency-root resolver
    resolver: Option<Arc<dyn RequirementResolver>>,
}

impl Kitchen {
    /// Create a Kitchen with an explicit command runner
    pub fn new(config: KitchenConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            runner,
            resolver: None,
        }
    }

    /// Create a Kitchen that runs commands on the host, or only logs them
    /// when `config.dry_run` is set
    pub fn for_config(config: KitchenConfig) -> Self {
        let runner: Arc<dyn CommandRunner> = if config.dry_run {
            Arc::new(DryRunRunner)
        } else {
            Arc::new(SystemRunner::new(config.timeout))
        };
        Self::new(config, runner)
    }

    /// Create a new Kitchen with a requirement resolver
    pub fn with_resolver(
        config: KitchenConfig,
        runner: Arc<dyn CommandRunner>,
        resolver: Arc<dyn RequirementResolver>,
    ) -> Self {
        Self {
            config,
            runner,
            resolver: Some(resolver),
        }
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Start a cook without running any hook
    pub fn prepare<'a>(&'a self, recipe: &'a Recipe, platform: &HostPlatform) -> Cook<'a> {
        Cook::new(self, recipe, platform)
    }

    /// Cook a recipe: run all six hooks in order
    ///
    /// The first failing hook aborts the cook. Nothing is retried.
    pub fn cook(&self, recipe: &Recipe, platform: &HostPlatform) -> Result<CookResult> {
        info!("Cooking {} on {}", recipe.reference(), platform);

        let mut cook = self.prepare(recipe, platform);
        for hook in Hook::ALL {
            info!("Hook: {}", hook);
            cook.run_hook(hook)?;
        }

        let result = cook.into_result()?;
        info!(
            "Cooked {} into {}",
            recipe.reference(),
            result.package_dir.display()
        );
        Ok(result)
    }

    /// Run a single hook against the working directory
    pub fn run_hook<'a>(
        &'a self,
        recipe: &'a Recipe,
        platform: &HostPlatform,
        hook: Hook,
    ) -> Result<Cook<'a>> {
        info!("Running {} hook for {}", hook, recipe.reference());
        let mut cook = self.prepare(recipe, platform);
        cook.run_hook(hook)?;
        Ok(cook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::flags::OgreFlags;
    use crate::recipe::parser::builtin_recipe;
    use runner::RecordingRunner;
    use std::str::FromStr;

    #[test]
    fn test_hook_names() {
        assert_eq!(Hook::SystemRequirements.to_string(), "system_requirements");
        assert_eq!(Hook::from_str("package_info").unwrap(), Hook::PackageInfo);
        assert!(Hook::from_str("deploy").is_err());
        assert_eq!(Hook::ALL.first(), Some(&Hook::SystemRequirements));
        assert_eq!(Hook::ALL.last(), Some(&Hook::PackageInfo));
    }

    #[test]
    fn test_definitions_linux() {
        let dir = tempfile::tempdir().unwrap();
        let kitchen = Kitchen::new(
            KitchenConfig::for_workdir(dir.path()),
            Arc::new(RecordingRunner::default()),
        );
        let recipe = builtin_recipe().unwrap();
        let cook = kitchen.prepare(&recipe, &HostPlatform::linux_apt());

        let defs = cook.definitions();
        assert_eq!(defs.len(), OgreFlags::COUNT + 2);
        assert_eq!(defs.get("CMAKE_BUILD_TYPE"), Some("Release"));
        assert_eq!(
            defs.get("CMAKE_INSTALL_PREFIX"),
            Some(cmake::cmake_path(cook.package_dir()).as_str())
        );
        assert_eq!(defs.get("CMAKE_CXX_FLAGS"), None);
        assert_eq!(defs.get("CMAKE_PREFIX_PATH"), None);
    }

    #[test]
    fn test_definitions_windows() {
        let dir = tempfile::tempdir().unwrap();
        let kitchen = Kitchen::new(
            KitchenConfig::for_workdir(dir.path()),
            Arc::new(RecordingRunner::default()),
        );
        let recipe = builtin_recipe().unwrap();
        let cook = kitchen.prepare(&recipe, &HostPlatform::windows());

        assert_eq!(
            cook.definitions().get("CMAKE_CXX_FLAGS"),
            Some("-D_OGRE_FILESYSTEM_ARCHIVE_UNICODE")
        );
    }

    #[test]
    fn test_windows_requirements_need_a_root() {
        let dir = tempfile::tempdir().unwrap();
        let kitchen = Kitchen::new(
            KitchenConfig::for_workdir(dir.path()),
            Arc::new(RecordingRunner::default()),
        );
        let recipe = builtin_recipe().unwrap();
        let err = kitchen
            .run_hook(&recipe, &HostPlatform::windows(), Hook::Requirements)
            .err()
            .unwrap();
        assert!(matches!(err, crate::error::Error::ResolutionError(_)));
    }

    #[test]
    fn test_for_config_dry_run() {
        let mut config = KitchenConfig::default();
        config.dry_run = true;
        let kitchen = Kitchen::for_config(config);
        let out = kitchen.runner().run(&CommandSpec::new("cmake")).unwrap();
        assert!(out.success());
    }
}
