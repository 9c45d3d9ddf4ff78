// src/recipe/kitchen/buildinfo.rs

//! Generated CMake include that exposes resolved requirements
//!
//! The patched `CMakeLists.txt` includes this file from the build directory
//! and calls `kitchen_basic_setup(TARGETS)`. Each resolved requirement
//! becomes an imported interface target `KITCHEN_PKG::<name>`.

use super::cmake::cmake_path;
use super::collect::collect_libs;
use super::requirements::ResolvedRequirement;
use crate::error::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the generated file inside the build directory
pub const BUILDINFO_FILE: &str = "kitchenbuildinfo.cmake";

/// Render the include for the given requirements
///
/// Libraries for each target are taken from the requirement's `lib/`.
pub fn render_buildinfo(resolved: &[ResolvedRequirement]) -> Result<String> {
    let mut out = String::from("# Generated by ogre-kitchen. Do not edit.\n\n");

    let names: Vec<&str> = resolved.iter().map(|r| r.name.as_str()).collect();
    let _ = writeln!(out, "set(KITCHEN_REQUIREMENTS {})", names.join(" "));
    for req in resolved {
        let _ = writeln!(
            out,
            "set(KITCHEN_ROOT_{} \"{}\")",
            req.name.to_uppercase(),
            cmake_path(&req.prefix)
        );
    }
    out.push('\n');

    out.push_str("macro(kitchen_basic_setup)\n");
    if resolved.is_empty() {
        out.push_str("    message(STATUS \"kitchen: no requirements\")\n");
        out.push_str("endmacro()\n");
        return Ok(out);
    }

    let prefixes: Vec<String> = resolved
        .iter()
        .map(|r| format!("\"{}\"", cmake_path(&r.prefix)))
        .collect();
    let _ = writeln!(out, "    list(PREPEND CMAKE_PREFIX_PATH {})", prefixes.join(" "));
    out.push_str("    set(_kitchen_args ${ARGN})\n");
    out.push_str("    if(\"TARGETS\" IN_LIST _kitchen_args)\n");
    for req in resolved {
        render_target(&mut out, req)?;
    }
    out.push_str("    endif()\n");
    out.push_str("endmacro()\n");
    Ok(out)
}

fn render_target(out: &mut String, req: &ResolvedRequirement) -> Result<()> {
    let target = format!("KITCHEN_PKG::{}", req.name);
    let prefix = cmake_path(&req.prefix);
    let libs = collect_libs(&req.prefix.join("lib"))?;

    let _ = writeln!(out, "        if(NOT TARGET {})", target);
    let _ = writeln!(out, "            add_library({} INTERFACE IMPORTED)", target);
    let _ = writeln!(out, "            set_target_properties({} PROPERTIES", target);
    let _ = writeln!(out, "                INTERFACE_INCLUDE_DIRECTORIES \"{}/include\"", prefix);
    let _ = writeln!(out, "                INTERFACE_LINK_DIRECTORIES \"{}/lib\"", prefix);
    let _ = writeln!(out, "                INTERFACE_LINK_LIBRARIES \"{}\")", libs.join(";"));
    let _ = writeln!(out, "        endif()");
    Ok(())
}

/// Write the include into `build_dir`
pub fn write_buildinfo(build_dir: &Path, resolved: &[ResolvedRequirement]) -> Result<PathBuf> {
    fs::create_dir_all(build_dir)?;
    let path = build_dir.join(BUILDINFO_FILE);
    fs::write(&path, render_buildinfo(resolved)?)?;
    debug!("Wrote {} ({} requirements)", path.display(), resolved.len());
    Ok(path)
}
