// src/commands/cook.rs

//! Cook command - run the recipe hooks

use super::{check_recipe, load_recipe};
use crate::cli::KitchenArgs;
use anyhow::{Context, Result};
use ogre_kitchen::recipe::kitchen::{CookResult, PatchOutcome};
use ogre_kitchen::{HostPlatform, Hook, Kitchen, KitchenConfig};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

impl KitchenArgs {
    fn to_config(&self) -> KitchenConfig {
        let mut config = KitchenConfig::for_workdir(&self.workdir).with_build_type(self.build_type);
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(root) = &self.deps_root {
            config = config.with_deps_root(root);
        }
        if self.no_sudo {
            config.use_sudo = Some(false);
        }
        config.timeout = self.timeout.map(Duration::from_secs);
        config.fresh_source = self.fresh;
        config.dry_run = self.dry_run;
        config
    }
}

/// Cook a recipe: all six hooks in order
pub fn cmd_cook(args: &KitchenArgs) -> Result<()> {
    let recipe = load_recipe(args.recipe.as_deref())?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);
    check_recipe(&recipe)?;

    let platform = HostPlatform::detect();
    println!("Host: {}", platform);
    if args.dry_run {
        println!("Dry run: external commands are logged, not run");
    }

    let kitchen = Kitchen::for_config(args.to_config());
    let result = kitchen
        .cook(&recipe, &platform)
        .with_context(|| format!("Failed to cook {}", recipe.reference()))?;

    write_log(&args.workdir, &result.log)?;
    print_summary(&result);
    Ok(())
}

/// Run one hook on its own
pub fn cmd_hook(hook: Hook, args: &KitchenArgs) -> Result<()> {
    let recipe = load_recipe(args.recipe.as_deref())?;
    check_recipe(&recipe)?;

    let platform = HostPlatform::detect();
    let kitchen = Kitchen::for_config(args.to_config());
    let cook = kitchen
        .run_hook(&recipe, &platform, hook)
        .with_context(|| format!("{} hook failed for {}", hook, recipe.reference()))?;

    print!("{}", cook.log());
    for warning in cook.warnings() {
        println!("Warning: {}", warning);
    }
    println!("[OK] {} hook finished", hook);
    Ok(())
}

fn write_log(workdir: &Path, log: &str) -> Result<()> {
    fs::create_dir_all(workdir)
        .with_context(|| format!("Failed to create {}", workdir.display()))?;
    let path = workdir.join("cook.log");
    fs::write(&path, log).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Cook log written to {}", path.display());
    Ok(())
}

fn print_summary(result: &CookResult) {
    let (mut applied, mut already, mut skipped) = (0, 0, 0);
    for report in &result.patches {
        match report.outcome {
            PatchOutcome::Applied { .. } => applied += 1,
            PatchOutcome::AlreadyApplied => already += 1,
            PatchOutcome::Skipped { .. } => skipped += 1,
        }
    }

    println!();
    println!("Cooked {} {}", result.package_info.name, result.package_info.version);
    println!("  Package:      {}", result.package_dir.display());
    println!(
        "  System:       {} installed, {} already present",
        result.system.newly_installed.len(),
        result.system.already_installed.len()
    );
    println!("  Requirements: {}", result.requirements.len());
    println!(
        "  Patches:      {} applied, {} already applied, {} skipped",
        applied, already, skipped
    );
    println!("  Include dirs: {}", result.package_info.include_dirs.len());
    println!("  Libraries:    {}", result.package_info.libs.join(", "));
    if let Some(digest) = &result.layout_digest {
        println!("  Layout:       sha256:{}", digest);
    }

    if result.warnings.is_empty() {
        println!("[OK] No warnings");
    } else {
        for warning in &result.warnings {
            println!("Warning: {}", warning);
        }
        println!("[OK] {} warning(s)", result.warnings.len());
    }
}
