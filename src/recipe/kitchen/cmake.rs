// src/recipe/kitchen/cmake.rs

//! CMake definitions and command lines for the `build` and `package` hooks

use super::config::BuildType;
use super::runner::CommandSpec;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Ordered `-DKEY=VALUE` definitions for the configure step
///
/// Setting a key twice replaces the value in place, keeping the first
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CMakeDefinitions {
    entries: Vec<(String, String)>,
}

impl CMakeDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// `ON` / `OFF`
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, if value { "ON" } else { "OFF" });
    }

    pub fn set_int<T: Display>(&mut self, key: &str, value: T) {
        self.set(key, value.to_string());
    }

    /// Path with forward slashes, which CMake accepts on every host
    pub fn set_path(&mut self, key: &str, path: &Path) {
        self.set(key, cmake_path(path));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_args(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("-D{}={}", k, v)).collect()
    }
}

/// Render a path the way CMake scripts expect it
pub fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// A CMake project with a separate build directory
#[derive(Debug, Clone)]
pub struct CMakeProject {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub build_type: BuildType,
    pub generator: Option<String>,
    pub jobs: u32,
}

impl CMakeProject {
    pub fn new(source_dir: &Path, build_dir: &Path, build_type: BuildType) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            build_type,
            generator: None,
            jobs: 1,
        }
    }

    pub fn with_generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// `cmake -S <src> -B <build> [-G <gen>] -D...`
    pub fn configure(&self, defs: &CMakeDefinitions) -> CommandSpec {
        let mut cmd = CommandSpec::new("cmake")
            .arg("-S")
            .path_arg(&self.source_dir)
            .arg("-B")
            .path_arg(&self.build_dir);
        if let Some(generator) = &self.generator {
            cmd = cmd.arg("-G").arg(generator.clone());
        }
        cmd.args(defs.to_args())
    }

    /// `cmake --build <build> --config <type> --parallel <jobs>`
    pub fn build(&self) -> CommandSpec {
        CommandSpec::new("cmake")
            .arg("--build")
            .path_arg(&self.build_dir)
            .args(["--config", self.build_type.as_ref()])
            .arg("--parallel")
            .arg(self.jobs.to_string())
    }

    /// `cmake --build <build> --config <type> --target install`
    ///
    /// Installs into the `CMAKE_INSTALL_PREFIX` given at configure time.
    pub fn install(&self) -> CommandSpec {
        CommandSpec::new("cmake")
            .arg("--build")
            .path_arg(&self.build_dir)
            .args(["--config", self.build_type.as_ref()])
            .args(["--target", "install"])
    }
}
