// src/recipe/kitchen/system.rs

//! System package installation for the `system_requirements` hook

use super::runner::{CommandRunner, CommandSpec};
use crate::error::Result;
use std::collections::HashSet;
use tracing::{debug, info};

/// Trait for checking and installing OS packages before building
///
/// Keeps the Kitchen decoupled from the host's package manager.
pub trait SystemPackageTool {
    /// Check which packages are missing
    ///
    /// Returns the names that are not currently installed.
    fn check_missing(&self, packages: &[&str]) -> Result<Vec<String>>;

    /// Install the given packages
    ///
    /// Returns the packages that were actually installed. Any installer
    /// failure is returned as an error; nothing is retried.
    fn install(&self, packages: &[String]) -> Result<Vec<String>>;
}

/// A no-op tool that assumes everything is already present
///
/// Use this in a pre-provisioned build container.
pub struct NoopPackageTool;

impl SystemPackageTool for NoopPackageTool {
    fn check_missing(&self, _packages: &[&str]) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn install(&self, _packages: &[String]) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Debian/Ubuntu packages via `dpkg-query` and `apt-get`
pub struct AptPackageTool<'a> {
    runner: &'a dyn CommandRunner,
    sudo: bool,
}

impl<'a> AptPackageTool<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sudo: bool) -> Self {
        Self { runner, sudo }
    }

    fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self.runner.run(
            &CommandSpec::new("dpkg-query")
                .args(["-W", "-f=${Status}"])
                .arg(package),
        )?;
        Ok(output.success() && output.stdout.contains("install ok installed"))
    }

    /// `apt-get`, non-interactive even behind sudo's env_reset
    fn apt_get(&self) -> CommandSpec {
        if self.sudo {
            CommandSpec::new("sudo")
                .arg("DEBIAN_FRONTEND=noninteractive")
                .arg("apt-get")
        } else {
            CommandSpec::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive")
        }
    }

    fn update_command(&self) -> CommandSpec {
        self.apt_get().arg("update")
    }

    fn install_command(&self, package: &str) -> CommandSpec {
        self.apt_get()
            .args(["install", "-y", "--no-install-recommends"])
            .arg(package)
    }
}

impl SystemPackageTool for AptPackageTool<'_> {
    fn check_missing(&self, packages: &[&str]) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for package in packages {
            if self.is_installed(package)? {
                debug!("{} already installed", package);
            } else {
                missing.push(package.to_string());
            }
        }
        Ok(missing)
    }

    fn install(&self, packages: &[String]) -> Result<Vec<String>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }

        // Fresh images ship without package lists
        info!("Refreshing apt package lists");
        self.runner.run_checked(&self.update_command())?;

        let mut installed = Vec::with_capacity(packages.len());
        for package in packages {
            info!("Installing system package: {}", package);
            self.runner.run_checked(&self.install_command(package))?;
            installed.push(package.clone());
        }
        Ok(installed)
    }
}

/// Result of the `system_requirements` hook
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SystemInstallResult {
    /// Packages that were already installed
    pub already_installed: Vec<String>,
    /// Packages that were installed by this run
    pub newly_installed: Vec<String>,
}

/// Ensure every package is present, installing each missing one once
pub fn ensure_installed(
    tool: &dyn SystemPackageTool,
    packages: &[String],
) -> Result<SystemInstallResult> {
    let mut seen = HashSet::new();
    let wanted: Vec<&str> = packages
        .iter()
        .map(String::as_str)
        .filter(|p| seen.insert(*p))
        .collect();

    if wanted.is_empty() {
        return Ok(SystemInstallResult::default());
    }

    let missing = tool.check_missing(&wanted)?;
    let missing_set: HashSet<&str> = missing.iter().map(String::as_str).collect();
    let already_installed = wanted
        .iter()
        .filter(|p| !missing_set.contains(*p))
        .map(|p| p.to_string())
        .collect();

    let newly_installed = if missing.is_empty() {
        info!("All system requirements are already installed");
        Vec::new()
    } else {
        info!("Installing missing system packages: {}", missing.join(", "));
        tool.install(&missing)?
    };

    Ok(SystemInstallResult {
        already_installed,
        newly_installed,
    })
}

/// Whether package installs need `sudo` on this host
pub fn needs_sudo() -> bool {
    #[cfg(unix)]
    {
        !nix::unistd::Uid::effective().is_root() && which::which("sudo").is_ok()
    }
    #[cfg(not(unix))]
    {
        false
    }
}
