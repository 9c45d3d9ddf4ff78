// src/recipe/mod.rs

//! Recipe system for building packages from source
//!
//! A recipe describes how to turn an upstream source tree into a binary
//! package:
//! - OS packages the host needs
//! - Versioned library requirements
//! - The git source and the literal patches applied to it
//! - The typed CMake flag table
//! - The include and library metadata exported to consumers
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build specification (like a recipe card)
//! - **Kitchen**: Owns configuration and the command runner
//! - **Cook**: One execution of a recipe's hooks
//!
//! # Hooks
//!
//! A cook runs six hooks, once each, in this order:
//! `system_requirements`, `requirements`, `source`, `build`, `package`,
//! `package_info`. They only share state through the working directory
//! and the cook itself.
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "hello"
//! version = "1.4.0"
//!
//! [source]
//! git = "https://example.com/hello.git"
//! tag = "v%(version)s"
//!
//! [[patches]]
//! file = "CMakeLists.txt"
//! search = "project(hello)"
//! replace = "project(hello LANGUAGES CXX)"
//!
//! [build.flags]
//! tests = false
//! ```

pub mod flags;
mod format;
pub mod kitchen;
pub mod parser;

pub use flags::{OgreFlags, ThreadProvider};
pub use format::{
    BuildSection, PackageInfoSection, PackageSection, PatchOperation, Recipe, RequirementSpec,
    RequirementsSection, SourceSection, SystemRequirementsSection,
};
pub use kitchen::{Cook, CookResult, Hook, Kitchen, KitchenConfig, PackageInfo, Settings};
pub use parser::{builtin_recipe, parse_recipe, parse_recipe_file, validate_recipe, BUILTIN_RECIPE};
