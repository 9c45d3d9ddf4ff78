// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::collections::HashSet;
use std::path::{Component, Path};

/// The OGRE-Next recipe shipped with the binary
pub const BUILTIN_RECIPE: &str = include_str!("../../recipes/ogre-next.toml");

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Parse the embedded OGRE-Next recipe
pub fn builtin_recipe() -> Result<Recipe> {
    parse_recipe(BUILTIN_RECIPE)
}

/// Validate a recipe for completeness and correctness
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::InvalidRecipe("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::InvalidRecipe("Recipe package version cannot be empty".to_string()));
    }

    let url = recipe.source_url();
    if !["https://", "http://", "git://", "ssh://", "file://", "git@"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        return Err(Error::InvalidRecipe(format!(
            "Unsupported source URL: {}. Expected https://, ssh://, git://, file:// or git@",
            url
        )));
    }
    if recipe.source_tag().trim().is_empty() {
        return Err(Error::InvalidRecipe("Source tag cannot be empty".to_string()));
    }

    for req in &recipe.requirements.requires {
        if req.name.is_empty() {
            return Err(Error::InvalidRecipe("Requirement name cannot be empty".to_string()));
        }
        semver::VersionReq::parse(&req.version).map_err(|e| {
            Error::InvalidRecipe(format!("Bad version range for {}: {}", req.name, e))
        })?;
    }

    for (i, patch) in recipe.patches.iter().enumerate() {
        if patch.search.is_empty() {
            return Err(Error::InvalidRecipe(format!(
                "Patch #{} for {} has an empty search text",
                i + 1,
                patch.file
            )));
        }
        if patch.search == patch.replace {
            warnings.push(format!("Patch #{} for {} is a no-op", i + 1, patch.file));
        }
        let path = Path::new(&patch.file);
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if patch.file.is_empty() || escapes {
            return Err(Error::InvalidRecipe(format!(
                "Patch target must be a relative path inside the source tree: {:?}",
                patch.file
            )));
        }
    }

    recipe
        .build
        .flags
        .validate()
        .map_err(Error::InvalidRecipe)?;

    // Warn about missing fields
    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }

    let mut seen = HashSet::new();
    for pkg in &recipe.system_requirements.packages {
        if !seen.insert(pkg.as_str()) {
            warnings.push(format!("System package {} listed more than once", pkg));
        }
    }

    let info = &recipe.package_info;
    if info.include_dirs.is_empty() {
        warnings.push("No include directories exported".to_string());
    }
    for dir in &info.include_dirs {
        if !Path::new(dir).starts_with(&info.include_root) {
            warnings.push(format!(
                "Include directory {} is outside include root {}",
                dir, info.include_root
            ));
        }
    }

    Ok(warnings)
}
