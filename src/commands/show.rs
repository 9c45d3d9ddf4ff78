// src/commands/show.rs

//! Show and validate commands - inspect a recipe without cooking it

use super::{check_recipe, load_recipe};
use anyhow::{Context, Result};
use ogre_kitchen::hash::sha256;
use ogre_kitchen::recipe::kitchen::requirements::collect_requirements;
use ogre_kitchen::recipe::kitchen::BuildType;
use ogre_kitchen::{HostPlatform, Kitchen, KitchenConfig, Os};
use std::path::Path;

/// Print the recipe as this host (or `os`) would cook it
pub fn cmd_show(recipe_path: Option<&Path>, os: Option<Os>, build_type: BuildType) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    let platform = match os {
        Some(Os::Linux) => HostPlatform::linux_apt(),
        Some(os) => HostPlatform::new(os, std::env::consts::ARCH),
        None => HostPlatform::detect(),
    };

    let canonical = serde_json::to_string(&recipe).context("Failed to serialize recipe")?;
    println!("{} {}", recipe.package.name, recipe.package.version);
    if let Some(description) = &recipe.package.description {
        println!("  {}", description);
    }
    println!("  Source:  {} @ {}", recipe.source_url(), recipe.source_tag());
    println!("  Digest:  sha256:{}", sha256(canonical.as_bytes()));
    println!("  Host:    {}", platform);
    println!();

    let system = &recipe.system_requirements;
    if platform.satisfies(system.when) && !system.packages.is_empty() {
        println!("System packages ({}):", system.packages.len());
        for package in &system.packages {
            println!("  {}", package);
        }
    } else {
        println!("System packages: none for this host");
    }

    let requirements = collect_requirements(&recipe, &platform)?;
    if requirements.is_empty() {
        println!("Requirements: none for this host");
    } else {
        println!("Requirements ({}):", requirements.len());
        for requirement in &requirements {
            println!("  {}", requirement);
        }
    }

    println!("Patches ({}):", recipe.patches.len());
    for patch in &recipe.patches {
        let marker = if platform.satisfies(patch.when) { "apply" } else { "skip " };
        println!("  [{}] {} ({})", marker, patch.file, patch.when);
    }

    let config = KitchenConfig {
        dry_run: true,
        ..KitchenConfig::default()
    }
    .with_build_type(build_type);
    let kitchen = Kitchen::for_config(config);
    let cook = kitchen.prepare(&recipe, &platform);
    let defs = cook.definitions();
    println!("CMake definitions ({}):", defs.len());
    for (key, value) in defs.iter() {
        println!("  {}={}", key, value);
    }
    Ok(())
}

/// Parse and validate a recipe, printing warnings
pub fn cmd_validate(recipe_path: Option<&Path>) -> Result<()> {
    let recipe = load_recipe(recipe_path)?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let warnings = check_recipe(&recipe)?;
    println!("Recipe validation passed");
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }
    Ok(())
}
