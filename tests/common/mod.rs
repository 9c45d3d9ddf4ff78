// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use ogre_kitchen::recipe::kitchen::{CommandOutput, CommandRunner, CommandSpec};
use ogre_kitchen::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Files of an unpatched OGRE-Next checkout, reduced to the lines the
/// recipe patches touch.
pub const PRISTINE_TREE: &[(&str, &str)] = &[
    (
        "CMakeLists.txt",
        "cmake_minimum_required(VERSION 3.3)\n\
         project(OGRE)\n\
         # Set up the basic build environment\n\
         include(CMakeDependentOption)\n\
         # Include necessary submodules\n\
         set(CMAKE_MODULE_PATH \"${OGRE_SOURCE_DIR}/CMake\")\n\
         if(FreeImage_FOUND)\n\
         \x20 set(OGRE_CONFIG_ENABLE_FREEIMAGE TRUE)\n\
         endif(FreeImage_FOUND)\n",
    ),
    (
        "Components/Overlay/CMakeLists.txt",
        "target_link_libraries(OgreOverlay OgreMain ${FREETYPE_LIBRARIES})\n\
         include_directories(${FREETYPE_INCLUDE_DIRS})\n",
    ),
    (
        "OgreMain/CMakeLists.txt",
        "set(LIBRARIES ${PLATFORM_LIBS})\n\
         list(APPEND LIBRARIES ${FreeImage_LIBRARIES})\n",
    ),
    (
        "CMake/Packages/FindFreeImage.cmake",
        "set(FreeImage_LIBRARY_NAMES freeimage freeimageLib FreeImage FreeImageLib)\n\
         get_debug_names(FreeImage_LIBRARY_NAMES)\n",
    ),
    (
        "CMake/Packages/FindZZip.cmake",
        "set(ZZip_LIBRARY_NAMES zziplib zzip)\n\
         get_debug_names(ZZip_LIBRARY_NAMES)\n",
    ),
    (
        "CMake/Dependencies.cmake",
        "set(OGRE_DEPENDENCIES_DIR \"\" CACHE PATH \"Path to prebuilt OGRE dependencies\")\n",
    ),
    (
        "CMake/Utils/FindPkgMacros.cmake",
        "macro(make_library_set PREFIX)\n\
         \x20 set(${PREFIX} optimized ${${PREFIX}_REL} debug ${${PREFIX}_DBG})\n\
         endmacro()\n",
    ),
];

/// Commit both HEAD and the pinned tag resolve to in a cloned tree
pub const CHECKOUT_COMMIT: &str = "3c9bd2fe0a4e";

/// Files `cmake --target install` puts below the install prefix
pub const INSTALLED_FILES: &[&str] = &[
    "include/OGRE/Ogre.h",
    "include/OGRE/Overlay/OgreOverlay.h",
    "lib/libOgreMain.so.2.2.5",
    "lib/libOgreMain.so",
    "lib/libOgreOverlay.so.2.2.5",
    "lib/OGRE/RenderSystem_GL3Plus.so",
    "lib/pkgconfig/OGRE.pc",
];

pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Stands in for git, dpkg-query, apt-get and cmake
///
/// `git clone` writes [`PRISTINE_TREE`] into the destination, the cmake
/// install step writes [`INSTALLED_FILES`] into the configured prefix, and
/// every command is recorded.
#[derive(Default)]
pub struct FakeToolchain {
    /// Packages dpkg-query reports as installed
    pub installed: Vec<String>,
    /// Overrides for files of the cloned tree
    pub tree_overrides: Vec<(String, String)>,
    /// HEAD of an existing checkout, when not [`CHECKOUT_COMMIT`]
    pub head: Option<String>,
    calls: Mutex<Vec<CommandSpec>>,
    install_prefix: Mutex<Option<PathBuf>>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_installed(packages: &[&str]) -> Self {
        Self {
            installed: packages.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Packages passed to apt-get install, in call order
    pub fn apt_installs(&self) -> Vec<String> {
        self.apt_calls()
            .into_iter()
            .filter(|c| c.args.iter().any(|a| a == "install"))
            .filter_map(|c| c.args.last().cloned())
            .collect()
    }

    /// Every apt-get call, direct or through sudo
    pub fn apt_calls(&self) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == "apt-get" || c.args.iter().any(|a| a == "apt-get"))
            .collect()
    }

    /// Arguments of the cmake configure call
    pub fn configure_args(&self) -> Option<Vec<String>> {
        self.calls()
            .into_iter()
            .find(|c| c.program == "cmake" && c.args.first().is_some_and(|a| a == "-S"))
            .map(|c| c.args)
    }

    pub fn cmake_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.program == "cmake").count()
    }

    fn clone_into(&self, dest: &Path) {
        write_tree(dest, PRISTINE_TREE);
        for (name, content) in &self.tree_overrides {
            write_tree(dest, &[(name.as_str(), content.as_str())]);
        }
        fs::create_dir_all(dest.join(".git")).unwrap();
    }

    fn install(&self) {
        let prefix = self.install_prefix.lock().unwrap().clone();
        let Some(prefix) = prefix else {
            return;
        };
        for name in INSTALLED_FILES {
            let path = prefix.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, format!("contents of {}\n", name)).unwrap();
        }
    }
}

impl CommandRunner for FakeToolchain {
    fn run(&self, cmd: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(cmd.clone());
        let args: Vec<&str> = cmd.args.iter().map(String::as_str).collect();

        match (cmd.program.as_str(), args.as_slice()) {
            ("git", ["clone", .., dest]) => self.clone_into(Path::new(dest)),
            ("git", ["rev-parse", rev, ..]) => {
                let commit = match (*rev, &self.head) {
                    ("HEAD", Some(head)) => head.as_str(),
                    _ => CHECKOUT_COMMIT,
                };
                return Ok(CommandOutput {
                    code: Some(0),
                    stdout: format!("{}\n", commit),
                    stderr: String::new(),
                });
            }
            ("dpkg-query", [.., package]) => {
                if self.installed.iter().any(|p| p == *package) {
                    return Ok(CommandOutput {
                        code: Some(0),
                        stdout: "install ok installed".to_string(),
                        stderr: String::new(),
                    });
                }
                return Ok(CommandOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: format!("dpkg-query: no packages found matching {}", package),
                });
            }
            ("cmake", ["-S", ..]) => {
                let prefix = args
                    .iter()
                    .find_map(|a| a.strip_prefix("-DCMAKE_INSTALL_PREFIX="))
                    .map(PathBuf::from);
                *self.install_prefix.lock().unwrap() = prefix;
            }
            ("cmake", [.., "--target", "install"]) => self.install(),
            _ => {}
        }
        Ok(CommandOutput::ok())
    }
}

/// `<root>/<name>-<version>/lib/<name>.lib` for each requirement
pub fn windows_deps_root(root: &Path) -> PathBuf {
    let deps = root.join("deps");
    for (dir, lib) in [
        ("zlib-1.3.1", "zlib.lib"),
        ("zziplib-0.13.72", "zziplib.lib"),
        ("freetype-2.13.2", "freetype.lib"),
        ("freeimage-3.18.0", "FreeImage.lib"),
        ("pugixml-1.14", "pugixml.lib"),
    ] {
        let lib_dir = deps.join(dir).join("lib");
        fs::create_dir_all(&lib_dir).unwrap();
        fs::write(lib_dir.join(lib), b"").unwrap();
        fs::create_dir_all(deps.join(dir).join("include")).unwrap();
    }
    deps
}
