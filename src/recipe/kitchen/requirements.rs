// src/recipe/kitchen/requirements.rs

//! Library requirements for the `requirements` hook
//!
//! Requirements are materialized only when the recipe's condition holds on
//! the host, then resolved to prebuilt prefixes before anything is built.

use crate::error::{Error, Result};
use crate::platform::HostPlatform;
use crate::recipe::format::{Recipe, RequirementSpec};
use semver::{Version, VersionReq};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// A registered library requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    /// Range as written in the recipe
    pub version: String,
    pub range: VersionReq,
    pub channel: Option<String>,
}

impl Requirement {
    pub fn from_spec(spec: &RequirementSpec) -> Result<Self> {
        let range = VersionReq::parse(&spec.version).map_err(|e| {
            Error::ParseError(format!("Bad version range {:?} for {}: {}", spec.version, spec.name, e))
        })?;
        Ok(Self {
            name: spec.name.clone(),
            version: spec.version.clone(),
            range,
            channel: spec.channel.clone(),
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/[{}]", self.name, self.version)?;
        if let Some(channel) = &self.channel {
            write!(f, "@{}", channel)?;
        }
        Ok(())
    }
}

/// A requirement pinned to an installed prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRequirement {
    pub name: String,
    pub version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub prefix: PathBuf,
}

/// Register the recipe's requirements for this host
///
/// Returns an empty set when the recipe's condition does not hold.
pub fn collect_requirements(recipe: &Recipe, platform: &HostPlatform) -> Result<Vec<Requirement>> {
    let section = &recipe.requirements;
    if !platform.satisfies(section.when) {
        debug!(
            "Requirements apply to {} only, skipping on {}",
            section.when, platform
        );
        return Ok(Vec::new());
    }

    section.requires.iter().map(Requirement::from_spec).collect()
}

/// Trait for resolving requirements to installed prefixes
pub trait RequirementResolver {
    fn resolve(&self, requirement: &Requirement) -> Result<ResolvedRequirement>;
}

/// Resolves against `<root>/<name>-<version>/` directories
///
/// The highest version matching the range wins.
pub struct PrefixResolver {
    root: PathBuf,
}

impl PrefixResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, name: &str) -> Result<Vec<(Version, PathBuf)>> {
        if !self.root.is_dir() {
            return Err(Error::NotFound(format!(
                "Dependency root does not exist: {}",
                self.root.display()
            )));
        }

        let prefix = format!("{}-", name);
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(dir_name) = file_name.to_str() else {
                continue;
            };
            if let Some(version) = dir_name.strip_prefix(&prefix).and_then(parse_loose_version) {
                found.push((version, entry.path()));
            }
        }
        Ok(found)
    }
}

impl RequirementResolver for PrefixResolver {
    fn resolve(&self, requirement: &Requirement) -> Result<ResolvedRequirement> {
        let candidates = self.candidates(&requirement.name)?;
        let best = candidates
            .iter()
            .filter(|(version, _)| requirement.range.matches(version))
            .max_by(|a, b| a.0.cmp(&b.0));

        match best {
            Some((version, prefix)) => {
                info!("Resolved {} -> {} ({})", requirement, version, prefix.display());
                Ok(ResolvedRequirement {
                    name: requirement.name.clone(),
                    version: version.clone(),
                    channel: requirement.channel.clone(),
                    prefix: prefix.clone(),
                })
            }
            None => {
                let available: Vec<String> =
                    candidates.iter().map(|(v, _)| v.to_string()).collect();
                Err(Error::ResolutionError(format!(
                    "No version of {} in {} satisfies {} (available: {})",
                    requirement.name,
                    self.root.display(),
                    requirement.version,
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                )))
            }
        }
    }
}

/// Resolve every requirement, failing on the first one that cannot be met
pub fn resolve_all(
    resolver: &dyn RequirementResolver,
    requirements: &[Requirement],
) -> Result<Vec<ResolvedRequirement>> {
    requirements.iter().map(|r| resolver.resolve(r)).collect()
}

/// Parse `1.2.3`, `1.2` or `1` as a semver version
fn parse_loose_version(s: &str) -> Option<Version> {
    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }
    let parts: Vec<&str> = s.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut nums = [0u64; 3];
    for (i, part) in parts.iter().enumerate() {
        nums[i] = part.parse().ok()?;
    }
    Some(Version::new(nums[0], nums[1], nums[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::builtin_recipe;

    fn req(name: &str, range: &str) -> Requirement {
        Requirement::from_spec(&RequirementSpec {
            name: name.to_string(),
            version: range.to_string(),
            channel: None,
        })
        .unwrap()
    }

    #[test]
    fn test_windows_registers_five() {
        let recipe = builtin_recipe().unwrap();
        let reqs = collect_requirements(&recipe, &HostPlatform::windows()).unwrap();

        let rendered: Vec<String> = reqs.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "zlib/[1.x]",
                "zziplib/[0.13.x]",
                "freetype/[2.x]",
                "freeimage/[3.x]@AnotherFoxGuy/stable",
                "pugixml/[1.x]",
            ]
        );
    }

    #[test]
    fn test_non_windows_registers_none() {
        let recipe = builtin_recipe().unwrap();
        assert!(collect_requirements(&recipe, &HostPlatform::linux_apt()).unwrap().is_empty());
        assert!(collect_requirements(&recipe, &HostPlatform::linux()).unwrap().is_empty());
    }

    #[test]
    fn test_ranges_match() {
        let zziplib = req("zziplib", "0.13.x");
        assert!(zziplib.range.matches(&Version::new(0, 13, 72)));
        assert!(!zziplib.range.matches(&Version::new(0, 14, 0)));

        let zlib = req("zlib", "1.x");
        assert!(zlib.range.matches(&Version::new(1, 3, 1)));
        assert!(!zlib.range.matches(&Version::new(2, 0, 0)));
    }

    #[test]
    fn test_loose_versions() {
        assert_eq!(parse_loose_version("1.2.13"), Some(Version::new(1, 2, 13)));
        assert_eq!(parse_loose_version("3.18"), Some(Version::new(3, 18, 0)));
        assert_eq!(parse_loose_version("2"), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_loose_version("latest"), None);
    }

    #[test]
    fn test_prefix_resolver_picks_highest_match() {
        let root = tempfile::tempdir().unwrap();
        for dir in ["zlib-1.2.11", "zlib-1.3.1", "zlib-2.0.0", "zlib-ng-2.1.0"] {
            fs::create_dir(root.path().join(dir)).unwrap();
        }

        let resolver = PrefixResolver::new(root.path());
        let resolved = resolver.resolve(&req("zlib", "1.x")).unwrap();
        assert_eq!(resolved.version, Version::new(1, 3, 1));
        assert_eq!(resolved.prefix, root.path().join("zlib-1.3.1"));
    }

    #[test]
    fn test_prefix_resolver_unsatisfied() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("freetype-1.9.0")).unwrap();

        let resolver = PrefixResolver::new(root.path());
        let err = resolver.resolve(&req("freetype", "2.x")).unwrap_err();
        assert!(matches!(err, Error::ResolutionError(ref msg) if msg.contains("1.9.0")));
    }

    #[test]
    fn test_prefix_resolver_missing_root() {
        let resolver = PrefixResolver::new("/nonexistent/ogre-kitchen-deps");
        assert!(matches!(
            resolver.resolve(&req("zlib", "1.x")),
            Err(Error::NotFound(_))
        ));
    }
}
