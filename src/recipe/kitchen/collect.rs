// src/recipe/kitchen/collect.rs

//! Consumer metadata for the `package_info` hook

use super::config::Settings;
use super::requirements::ResolvedRequirement;
use crate::error::Result;
use crate::recipe::format::{PackageInfoSection, Recipe};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File written next to the package directory
pub const PACKAGE_INFO_FILE: &str = "package_info.json";

/// What consumers of the package need to compile and link against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub settings: Settings,
    /// Include root, relative to the package directory
    pub include_root: String,
    /// Include directories below the package directory, root first
    pub include_dirs: Vec<String>,
    /// Library names without prefix or extension, sorted
    pub libs: Vec<String>,
    /// `name/version` of each requirement the package was built against
    #[serde(default)]
    pub requires: Vec<String>,
}

impl PackageInfo {
    /// Build the metadata for an installed package
    pub fn collect(
        recipe: &Recipe,
        settings: &Settings,
        package_dir: &Path,
        resolved: &[ResolvedRequirement],
    ) -> Result<Self> {
        let section = &recipe.package_info;
        let libs = collect_libs(&package_dir.join(&section.lib_dir))?;
        info!("Collected {} libraries from {}", libs.len(), section.lib_dir);

        Ok(Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            settings: settings.clone(),
            include_root: section.include_root.clone(),
            include_dirs: include_dirs(section),
            libs,
            requires: resolved
                .iter()
                .map(|r| format!("{}/{}", r.name, r.version))
                .collect(),
        })
    }

    /// Write as pretty JSON, returning the path written
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(PACKAGE_INFO_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

/// The include root followed by each declared suffix, without duplicates
fn include_dirs(section: &PackageInfoSection) -> Vec<String> {
    let mut dirs = vec![section.include_root.clone()];
    for dir in &section.include_dirs {
        if !dirs.contains(dir) {
            dirs.push(dir.clone());
        }
    }
    dirs
}

/// Library names found directly in `lib_dir`
///
/// Not recursive. A missing directory yields an empty list.
pub fn collect_libs(lib_dir: &Path) -> Result<Vec<String>> {
    if !lib_dir.is_dir() {
        debug!("No library directory at {}", lib_dir.display());
        return Ok(Vec::new());
    }

    let mut libs = BTreeSet::new();
    for entry in WalkDir::new(lib_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str().and_then(library_name) {
            libs.insert(name);
        }
    }
    Ok(libs.into_iter().collect())
}

/// `libOgreMain.so.2.2.5` -> `OgreMain`, `OgreMain.lib` -> `OgreMain`
fn library_name(file_name: &str) -> Option<String> {
    if let Some(stem) = file_name.strip_suffix(".lib") {
        return non_empty(stem);
    }

    let stem = [".a", ".dylib"]
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .or_else(|| shared_object_stem(file_name))?;
    non_empty(stem.strip_prefix("lib").unwrap_or(stem))
}

/// Stem of `name.so` or `name.so.<digits>[.<digits>...]`
fn shared_object_stem(file_name: &str) -> Option<&str> {
    file_name.match_indices(".so").find_map(|(idx, _)| {
        let rest = &file_name[idx + 3..];
        let versioned = rest
            .strip_prefix('.')
            .is_some_and(|v| !v.is_empty() && v.split('.').all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit())));
        (rest.is_empty() || versioned).then(|| &file_name[..idx])
    })
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostPlatform;
    use crate::recipe::kitchen::config::BuildType;
    use crate::recipe::parser::builtin_recipe;

    #[test]
    fn test_library_names() {
        assert_eq!(library_name("libOgreMain.so"), Some("OgreMain".to_string()));
        assert_eq!(library_name("libOgreMain.so.2.2.5"), Some("OgreMain".to_string()));
        assert_eq!(library_name("libOgreOverlay.a"), Some("OgreOverlay".to_string()));
        assert_eq!(library_name("libOgreMain.dylib"), Some("OgreMain".to_string()));
        assert_eq!(library_name("OgreMain_d.lib"), Some("OgreMain_d".to_string()));
        assert_eq!(library_name("libsound.so"), Some("sound".to_string()));
        assert_eq!(library_name("OgreMain.pc"), None);
        assert_eq!(library_name("libfoo.so.debug"), None);
        assert_eq!(library_name(".so"), None);
    }

    #[test]
    fn test_collect_libs_flat_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("lib");
        fs::create_dir_all(lib.join("OGRE")).unwrap();
        for name in [
            "libOgreMain.so.2.2.5",
            "libOgreMain.so",
            "libOgreHlmsPbs.so",
            "libOgreBites.a",
        ] {
            fs::write(lib.join(name), b"").unwrap();
        }
        // Nested plugins are not collected
        fs::write(lib.join("OGRE/RenderSystem_GL3Plus.so"), b"").unwrap();
        fs::create_dir(lib.join("pkgconfig")).unwrap();

        let libs = collect_libs(&lib).unwrap();
        assert_eq!(libs, vec!["OgreBites", "OgreHlmsPbs", "OgreMain"]);
    }

    #[test]
    fn test_collect_libs_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_libs(&dir.path().join("lib")).unwrap().is_empty());
    }

    #[test]
    fn test_package_info_round_trip() {
        let recipe = builtin_recipe().unwrap();
        let settings = Settings::for_host(&HostPlatform::linux_apt(), BuildType::Release);
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/libOgreMain.so"), b"").unwrap();

        let info = PackageInfo::collect(&recipe, &settings, dir.path(), &[]).unwrap();
        assert_eq!(info.include_dirs.len(), 14);
        assert_eq!(info.include_dirs[0], "include");
        assert_eq!(info.include_dirs[1], "include/OGRE");
        assert_eq!(info.libs, vec!["OgreMain"]);
        assert_eq!(info.include_dirs[13], "include/OGRE/Volume");

        let path = info.write(dir.path()).unwrap();
        assert_eq!(PackageInfo::read(&path).unwrap(), info);
    }
}
