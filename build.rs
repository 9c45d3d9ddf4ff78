// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .short('r')
        .long("recipe")
        .value_name("FILE")
        .help("Recipe file (default: the embedded OGRE-Next recipe)")
}

/// Arguments shared by cook and hook
fn kitchen_args() -> Vec<Arg> {
    vec![
        recipe_arg(),
        Arg::new("workdir")
            .short('w')
            .long("workdir")
            .default_value("kitchen")
            .help("Working directory holding source/, build/ and package/"),
        Arg::new("jobs")
            .short('j')
            .long("jobs")
            .help("Number of parallel build jobs (default: number of CPUs)"),
        Arg::new("build_type")
            .long("build-type")
            .default_value("Release")
            .help("CMake build type"),
        Arg::new("deps_root")
            .long("deps-root")
            .help("Directory with prebuilt requirements as <name>-<version>/"),
        Arg::new("fresh")
            .long("fresh")
            .action(ArgAction::SetTrue)
            .help("Remove an existing checkout and clone again"),
        Arg::new("dry_run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Log external commands instead of running them"),
        Arg::new("timeout")
            .long("timeout")
            .value_name("SECONDS")
            .help("Kill external commands that run longer than this"),
        Arg::new("no_sudo")
            .long("no-sudo")
            .action(ArgAction::SetTrue)
            .help("Never prefix apt-get with sudo"),
    ]
}

fn build_cli() -> Command {
    Command::new("ogre-kitchen")
        .version(env!("CARGO_PKG_VERSION"))
        .author("ogre-kitchen Contributors")
        .about("Fetch, patch, build and package OGRE-Next from a recipe")
        .subcommand_required(true)
        .subcommand(
            Command::new("cook")
                .about("Run all six hooks in order")
                .args(kitchen_args()),
        )
        .subcommand(
            Command::new("hook")
                .about("Run a single hook against the working directory")
                .arg(
                    Arg::new("hook")
                        .required(true)
                        .value_parser([
                            "system_requirements",
                            "requirements",
                            "source",
                            "build",
                            "package",
                            "package_info",
                        ])
                        .help("Hook to run"),
                )
                .args(kitchen_args()),
        )
        .subcommand(
            Command::new("show")
                .about("Show the recipe and the CMake definitions it renders")
                .arg(recipe_arg())
                .arg(
                    Arg::new("os")
                        .long("os")
                        .value_parser(["linux", "windows", "macos"])
                        .help("Render for this OS instead of the host"),
                )
                .arg(
                    Arg::new("build_type")
                        .long("build-type")
                        .default_value("Release")
                        .help("CMake build type"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Parse and validate a recipe")
                .arg(Arg::new("recipe").help("Recipe file (default: the embedded OGRE-Next recipe)")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("ogre-kitchen.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
