// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how to fetch, patch, build and
//! publish a third-party library. Every section that only applies to some
//! hosts carries a `when` condition instead of the recipe code checking
//! the OS itself.

use crate::platform::Condition;
use crate::recipe::flags::OgreFlags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A complete recipe for building a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// OS packages installed before anything else (optional)
    #[serde(default)]
    pub system_requirements: SystemRequirementsSection,

    /// Versioned library dependencies (optional)
    #[serde(default)]
    pub requirements: RequirementsSection,

    /// Version control source
    pub source: SourceSection,

    /// Literal search-and-replace edits on the fetched tree (optional)
    #[serde(default)]
    pub patches: Vec<PatchOperation>,

    /// Build configuration
    #[serde(default)]
    pub build: BuildSection,

    /// Consumer metadata exported after packaging
    #[serde(default)]
    pub package_info: PackageInfoSection,

    /// Variables for substitution (optional)
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s` patterns with their values from:
    /// 1. Built-in variables (version, name)
    /// 2. Custom variables from the [variables] section
    pub fn substitute(&self, template: &str) -> String {
        let mut result = template.to_string();

        result = result.replace("%(version)s", &self.package.version);
        result = result.replace("%(name)s", &self.package.name);

        for (key, value) in &self.variables {
            result = result.replace(&format!("%({})s", key), value);
        }

        result
    }

    /// Git tag with variables substituted
    pub fn source_tag(&self) -> String {
        self.substitute(&self.source.tag)
    }

    /// Git URL with variables substituted
    pub fn source_url(&self) -> String {
        self.substitute(&self.source.git)
    }

    /// `name/version` reference
    pub fn reference(&self) -> String {
        format!("{}/{}", self.package.name, self.package.version)
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Recipe homepage URL
    #[serde(default)]
    pub url: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Build matrix axes that identify a binary package
    #[serde(default = "default_settings")]
    pub settings: Vec<String>,
}

fn default_settings() -> Vec<String> {
    ["os", "compiler", "build_type", "arch"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// System packages to install through the host package tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRequirementsSection {
    /// Only materialized when this holds
    #[serde(default = "default_system_when")]
    pub when: Condition,

    /// Package names, installed in order
    #[serde(default)]
    pub packages: Vec<String>,
}

fn default_system_when() -> Condition {
    Condition::LinuxApt
}

impl Default for SystemRequirementsSection {
    fn default() -> Self {
        Self {
            when: default_system_when(),
            packages: Vec::new(),
        }
    }
}

/// Library requirements resolved before building
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsSection {
    /// Only materialized when this holds
    #[serde(default)]
    pub when: Condition,

    /// Required libraries, in declaration order
    #[serde(default)]
    pub requires: Vec<RequirementSpec>,
}

/// A single `name/[range]@user/channel` requirement as written in the recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSpec {
    /// Library name
    pub name: String,

    /// Semver range (`1.x`, `0.13.x`, `>=2.10, <3`)
    pub version: String,

    /// `user/channel` the binary comes from (optional)
    #[serde(default)]
    pub channel: Option<String>,
}

impl fmt::Display for RequirementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/[{}]", self.name, self.version)?;
        if let Some(channel) = &self.channel {
            write!(f, "@{}", channel)?;
        }
        Ok(())
    }
}

/// Version control source section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Repository URL
    pub git: String,

    /// Tag or branch to check out
    ///
    /// Supports `%(version)s` substitution.
    pub tag: String,

    /// Initialize nested submodules recursively (default: true)
    #[serde(default = "default_true")]
    pub submodules: bool,
}

fn default_true() -> bool {
    true
}

/// A literal search-and-replace edit on one file of the source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Path relative to the source root
    pub file: String,

    /// Exact text to find
    pub search: String,

    /// Text to put in its place
    pub replace: String,

    /// Only applied when this holds
    #[serde(default)]
    pub when: Condition,

    /// Replace every occurrence instead of requiring exactly one
    #[serde(default)]
    pub all: bool,
}

/// Build configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// CMake generator (default: whatever cmake picks)
    #[serde(default)]
    pub generator: Option<String>,

    /// Typed feature flag table
    #[serde(default)]
    pub flags: OgreFlags,

    /// `CMAKE_CXX_FLAGS` override applied on Windows hosts only
    #[serde(default)]
    pub windows_cxx_flags: Option<String>,
}

/// Consumer metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfoSection {
    /// Include root, relative to the package directory
    #[serde(default = "default_include_root")]
    pub include_root: String,

    /// Include directory suffixes below the install prefix
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Directory scanned for libraries
    #[serde(default = "default_lib_dir")]
    pub lib_dir: String,
}

fn default_include_root() -> String {
    "include".to_string()
}

fn default_lib_dir() -> String {
    "lib".to_string()
}

impl Default for PackageInfoSection {
    fn default() -> Self {
        Self {
            include_root: default_include_root(),
            include_dirs: Vec::new(),
            lib_dir: default_lib_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECIPE: &str = r#"
[package]
name = "hello"
version = "1.4.0"
license = "MIT"

[source]
git = "https://example.com/hello.git"
tag = "v%(version)s"

[[patches]]
file = "CMakeLists.txt"
search = "project(hello)"
replace = "project(hello LANGUAGES CXX)"

[[patches]]
file = "src/CMakeLists.txt"
search = "${ZLIB_LIBRARIES}"
replace = "KITCHEN_PKG::zlib"
when = "windows"
all = true

[requirements]
when = "windows"
requires = [
    { name = "zlib", version = "1.x" },
    { name = "freeimage", version = "3.x", channel = "someone/stable" },
]

[build.flags]
tests = true

[variables]
suffix = "-rc1"
"#;

    #[test]
    fn test_parse_recipe() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();

        assert_eq!(recipe.package.name, "hello");
        assert_eq!(recipe.package.license.as_deref(), Some("MIT"));
        assert_eq!(recipe.package.settings.len(), 4);
        assert!(recipe.source.submodules);

        assert_eq!(recipe.patches.len(), 2);
        assert_eq!(recipe.patches[0].when, Condition::Always);
        assert!(!recipe.patches[0].all);
        assert_eq!(recipe.patches[1].when, Condition::Windows);
        assert!(recipe.patches[1].all);

        assert_eq!(recipe.requirements.when, Condition::Windows);
        assert_eq!(recipe.requirements.requires.len(), 2);
        assert!(recipe.build.flags.tests);
    }

    #[test]
    fn test_variable_substitution() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();
        assert_eq!(recipe.source_tag(), "v1.4.0");
        assert_eq!(recipe.substitute("%(name)s%(suffix)s"), "hello-rc1");
        assert_eq!(recipe.reference(), "hello/1.4.0");
    }

    #[test]
    fn test_section_defaults() {
        let minimal = r#"
[package]
name = "tiny"
version = "0.1"

[source]
git = "https://example.com/tiny.git"
tag = "main"
"#;
        let recipe: Recipe = toml::from_str(minimal).unwrap();
        assert_eq!(recipe.system_requirements.when, Condition::LinuxApt);
        assert!(recipe.system_requirements.packages.is_empty());
        assert_eq!(recipe.requirements.when, Condition::Always);
        assert!(recipe.patches.is_empty());
        assert_eq!(recipe.package_info.include_root, "include");
        assert_eq!(recipe.package_info.lib_dir, "lib");
        assert_eq!(recipe.build.flags, OgreFlags::default());
    }

    #[test]
    fn test_requirement_display() {
        let recipe: Recipe = toml::from_str(SAMPLE_RECIPE).unwrap();
        assert_eq!(recipe.requirements.requires[0].to_string(), "zlib/[1.x]");
        assert_eq!(
            recipe.requirements.requires[1].to_string(),
            "freeimage/[3.x]@someone/stable"
        );
    }

    #[test]
    fn test_unknown_build_key_rejected() {
        let bad = r#"
[package]
name = "tiny"
version = "0.1"

[source]
git = "https://example.com/tiny.git"
tag = "main"

[build]
definitions = { FOO = "ON" }
"#;
        assert!(toml::from_str::<Recipe>(bad).is_err());
    }
}
