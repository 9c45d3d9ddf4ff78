// src/recipe/kitchen/cook.rs

//! Cook: the hooks of a single recipe execution

use super::buildinfo::write_buildinfo;
use super::cmake::{cmake_path, CMakeDefinitions, CMakeProject};
use super::collect::PackageInfo;
use super::config::{CookResult, Settings};
use super::patch::{apply_patches, PatchOutcome, PatchReport};
use super::requirements::{collect_requirements, resolve_all, PrefixResolver, ResolvedRequirement};
use super::runner::CommandSpec;
use super::system::{ensure_installed, needs_sudo, AptPackageTool, NoopPackageTool, SystemInstallResult};
use super::vcs::{GitSource, SourceFetch};
use super::{Hook, Kitchen};
use crate::error::{Error, Result};
use crate::hash::layout_digest;
use crate::platform::HostPlatform;
use crate::recipe::format::Recipe;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a Recipe,
    platform: HostPlatform,
    settings: Settings,
    source_dir: PathBuf,
    build_dir: PathBuf,
    package_dir: PathBuf,
    system: SystemInstallResult,
    /// None until the requirements hook has run
    resolved: Option<Vec<ResolvedRequirement>>,
    patches: Vec<PatchReport>,
    package_info: Option<PackageInfo>,
    /// Build log accumulator
    log: String,
    warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(kitchen: &'a Kitchen, recipe: &'a Recipe, platform: &HostPlatform) -> Self {
        let config = &kitchen.config;
        Self {
            kitchen,
            recipe,
            platform: platform.clone(),
            settings: Settings::for_host(platform, config.build_type),
            source_dir: absolute(config.source_dir()),
            build_dir: absolute(config.build_dir()),
            package_dir: absolute(config.package_dir()),
            system: SystemInstallResult::default(),
            resolved: None,
            patches: Vec::new(),
            package_info: None,
            log: String::new(),
            warnings: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Run one hook by name
    pub fn run_hook(&mut self, hook: Hook) -> Result<()> {
        self.log_line(&format!("### {} ###", hook));
        match hook {
            Hook::SystemRequirements => self.system_requirements().map(|_| ()),
            Hook::Requirements => self.requirements().map(|_| ()),
            Hook::Source => self.source().map(|_| ()),
            Hook::Build => self.build(),
            Hook::Package => self.package(),
            Hook::PackageInfo => self.package_info().map(|_| ()),
        }
    }

    /// Hook 1: make sure the host's OS packages are installed
    pub fn system_requirements(&mut self) -> Result<&SystemInstallResult> {
        let recipe = self.recipe;
        let section = &recipe.system_requirements;
        if !self.platform.satisfies(section.when) || section.packages.is_empty() {
            debug!("No system requirements for {}", self.platform);
            self.log_line("No system requirements for this host");
            return Ok(&self.system);
        }

        let result = if self.platform.has_apt() {
            let sudo = self.kitchen.config.use_sudo.unwrap_or_else(needs_sudo);
            let tool = AptPackageTool::new(self.kitchen.runner(), sudo);
            ensure_installed(&tool, &section.packages)?
        } else {
            self.warn(format!(
                "No supported system package tool on {}, assuming {} package(s) are present",
                self.platform,
                section.packages.len()
            ));
            ensure_installed(&NoopPackageTool, &section.packages)?
        };

        for package in &result.newly_installed {
            self.log_line(&format!("Installed system package: {}", package));
        }
        for package in &result.already_installed {
            self.log_line(&format!("System package present: {}", package));
        }
        self.system = result;
        Ok(&self.system)
    }

    /// Hook 2: register library requirements and pin them to prefixes
    pub fn requirements(&mut self) -> Result<&[ResolvedRequirement]> {
        let requirements = collect_requirements(self.recipe, &self.platform)?;
        let resolved = if requirements.is_empty() {
            Vec::new()
        } else {
            for requirement in &requirements {
                self.log_line(&format!("Requirement: {}", requirement));
            }
            match (&self.kitchen.resolver, &self.kitchen.config.deps_root) {
                (Some(resolver), _) => resolve_all(resolver.as_ref(), &requirements)?,
                (None, Some(root)) => resolve_all(&PrefixResolver::new(root), &requirements)?,
                (None, None) => {
                    return Err(Error::ResolutionError(format!(
                        "{} requirement(s) declared but no dependency root is configured",
                        requirements.len()
                    )));
                }
            }
        };

        for req in &resolved {
            self.log_line(&format!(
                "Resolved {}/{} at {}",
                req.name,
                req.version,
                req.prefix.display()
            ));
        }
        Ok(self.resolved.insert(resolved))
    }

    /// Hook 3: check out the pinned revision and patch it
    pub fn source(&mut self) -> Result<&[PatchReport]> {
        let kitchen = self.kitchen;
        let recipe = self.recipe;
        let config = &kitchen.config;
        let url = recipe.source_url();
        let tag = recipe.source_tag();
        let git = GitSource {
            url: &url,
            tag: &tag,
            submodules: recipe.source.submodules,
        };

        let fetched = git.fetch(
            kitchen.runner(),
            &self.source_dir,
            config.fresh_source && !config.dry_run,
        )?;
        self.log_line(&match fetched {
            SourceFetch::Cloned => format!("Cloned {} at {}", url, tag),
            SourceFetch::Reused => format!("Reusing checkout of {}", tag),
        });

        if config.dry_run && !self.source_dir.exists() {
            self.warn(format!(
                "Dry run: no checkout at {}, {} patch(es) not applied",
                self.source_dir.display(),
                recipe.patches.len()
            ));
            return Ok(&self.patches);
        }

        let reports = apply_patches(&self.source_dir, &recipe.patches, &self.platform)?;
        for report in &reports {
            match &report.outcome {
                PatchOutcome::Applied { occurrences, diff } => {
                    self.log_line(&format!("Patched {} ({} occurrence(s))", report.file, occurrences));
                    self.log.push_str(diff);
                }
                PatchOutcome::AlreadyApplied => {
                    self.log_line(&format!("Already patched: {}", report.file));
                }
                PatchOutcome::Skipped { condition } => {
                    self.log_line(&format!("Skipped {} patch: {}", condition, report.file));
                }
            }
        }
        info!(
            "{} of {} patches applied",
            reports.iter().filter(|r| r.is_applied()).count(),
            reports.len()
        );
        self.patches = reports;
        Ok(&self.patches)
    }

    /// CMake definitions for the configure step
    pub fn definitions(&self) -> CMakeDefinitions {
        let mut defs = CMakeDefinitions::new();
        self.recipe.build.flags.write_definitions(&mut defs);

        defs.set("CMAKE_BUILD_TYPE", self.settings.build_type.as_ref());
        defs.set_path("CMAKE_INSTALL_PREFIX", &self.package_dir);

        let resolved = self.resolved.as_deref().unwrap_or_default();
        if !resolved.is_empty() {
            let prefixes: Vec<String> = resolved.iter().map(|r| cmake_path(&r.prefix)).collect();
            defs.set("CMAKE_PREFIX_PATH", prefixes.join(";"));
        }

        if self.platform.is_windows()
            && let Some(flags) = &self.recipe.build.windows_cxx_flags
        {
            defs.set("CMAKE_CXX_FLAGS", flags.as_str());
        }
        defs
    }

    fn cmake_project(&self) -> CMakeProject {
        CMakeProject::new(&self.source_dir, &self.build_dir, self.settings.build_type)
            .with_generator(self.recipe.build.generator.clone())
            .with_jobs(self.kitchen.config.jobs)
    }

    /// Hook 4: configure and compile
    pub fn build(&mut self) -> Result<()> {
        if self.resolved.is_none() {
            self.requirements()?;
        }

        let defs = self.definitions();
        let resolved = self.resolved.as_deref().unwrap_or_default();
        let buildinfo = write_buildinfo(&self.build_dir, resolved)?;
        self.log_line(&format!("Wrote {}", buildinfo.display()));

        let project = self.cmake_project();
        self.run_step("configure", &project.configure(&defs))?;
        self.run_step("build", &project.build())
    }

    /// Hook 5: install into the package directory
    pub fn package(&mut self) -> Result<()> {
        fs::create_dir_all(&self.package_dir)?;
        let project = self.cmake_project();
        self.run_step("install", &project.install())?;

        if !self.kitchen.config.dry_run && fs::read_dir(&self.package_dir)?.next().is_none() {
            self.warn(format!(
                "Install step left {} empty",
                self.package_dir.display()
            ));
        }
        Ok(())
    }

    /// Hook 6: export include directories and library names
    pub fn package_info(&mut self) -> Result<&PackageInfo> {
        let resolved = self.resolved.as_deref().unwrap_or_default();
        let info = PackageInfo::collect(self.recipe, &self.settings, &self.package_dir, resolved)?;
        if info.libs.is_empty() {
            self.warn(format!(
                "No libraries found in {}",
                self.package_dir.join(&self.recipe.package_info.lib_dir).display()
            ));
        }

        let path = info.write(&self.kitchen.config.workdir)?;
        self.log_line(&format!(
            "Wrote {} ({} include dirs, {} libs)",
            path.display(),
            info.include_dirs.len(),
            info.libs.len()
        ));
        Ok(self.package_info.insert(info))
    }

    /// Finish the cook, digesting whatever the package hook installed
    pub(super) fn into_result(self) -> Result<CookResult> {
        let package_info = self
            .package_info
            .ok_or_else(|| Error::NotFound("package_info hook has not run".to_string()))?;
        let layout_digest = if self.package_dir.is_dir() {
            Some(layout_digest(&self.package_dir)?)
        } else {
            None
        };

        Ok(CookResult {
            package_dir: self.package_dir,
            package_info,
            system: self.system,
            requirements: self.resolved.unwrap_or_default(),
            patches: self.patches,
            layout_digest,
            log: self.log,
            warnings: self.warnings,
        })
    }

    /// Run an external step, logging its output under a phase header
    fn run_step(&mut self, phase: &str, cmd: &CommandSpec) -> Result<()> {
        info!("Running {} phase", phase);
        let output = self.kitchen.runner().run(cmd)?;

        self.log_line(&format!("=== {} ===", phase));
        self.log_line(&cmd.command_line());
        if !output.stdout.is_empty() {
            self.log_line(output.stdout.trim_end());
        }
        if !output.stderr.is_empty() {
            self.log_line(output.stderr.trim_end());
        }

        if !output.success() {
            return Err(Error::CommandFailed {
                program: cmd.program.clone(),
                code: output.code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(())
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
