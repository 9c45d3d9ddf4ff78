// src/commands/mod.rs
//! Command handlers for the ogre-kitchen CLI

mod cook;
mod show;

pub use cook::{cmd_cook, cmd_hook};
pub use show::{cmd_show, cmd_validate};

use anyhow::{Context, Result};
use ogre_kitchen::recipe::{builtin_recipe, parse_recipe_file, validate_recipe, Recipe};
use std::path::Path;

/// Load a recipe file, or the embedded recipe when no path is given
fn load_recipe(path: Option<&Path>) -> Result<Recipe> {
    match path {
        Some(path) => {
            println!("Reading recipe: {}", path.display());
            parse_recipe_file(path)
                .with_context(|| format!("Failed to parse recipe: {}", path.display()))
        }
        None => builtin_recipe().context("Failed to parse the embedded recipe"),
    }
}

/// Validate and print warnings, failing on errors
fn check_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let warnings = validate_recipe(recipe).context("Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }
    Ok(warnings)
}
