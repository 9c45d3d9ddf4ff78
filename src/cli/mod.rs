// src/cli/mod.rs
//! CLI definitions for ogre-kitchen
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use ogre_kitchen::platform::Os;
use ogre_kitchen::recipe::kitchen::BuildType;
use ogre_kitchen::Hook;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ogre-kitchen")]
#[command(author = "ogre-kitchen Contributors")]
#[command(version)]
#[command(about = "Fetch, patch, build and package OGRE-Next from a recipe", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that touches a working directory
#[derive(Args, Debug, Clone)]
pub struct KitchenArgs {
    /// Recipe file (default: the embedded OGRE-Next recipe)
    #[arg(short, long)]
    pub recipe: Option<PathBuf>,

    /// Working directory holding source/, build/ and package/
    #[arg(short, long, default_value = "kitchen")]
    pub workdir: PathBuf,

    /// Number of parallel build jobs (default: number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<u32>,

    /// CMake build type
    #[arg(long, default_value = "Release")]
    pub build_type: BuildType,

    /// Directory with prebuilt requirements as <name>-<version>/
    #[arg(long)]
    pub deps_root: Option<PathBuf>,

    /// Remove an existing checkout and clone again
    #[arg(long)]
    pub fresh: bool,

    /// Log external commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Kill external commands that run longer than this
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Never prefix apt-get with sudo
    #[arg(long)]
    pub no_sudo: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run all six hooks in order
    Cook {
        #[command(flatten)]
        kitchen: KitchenArgs,
    },

    /// Run a single hook against the working directory
    Hook {
        /// system_requirements, requirements, source, build, package or package_info
        hook: Hook,

        #[command(flatten)]
        kitchen: KitchenArgs,
    },

    /// Show the recipe and the CMake definitions it renders
    Show {
        /// Recipe file (default: the embedded OGRE-Next recipe)
        #[arg(short, long)]
        recipe: Option<PathBuf>,

        /// Render for this OS instead of the host (linux, windows, macos)
        #[arg(long)]
        os: Option<Os>,

        /// CMake build type
        #[arg(long, default_value = "Release")]
        build_type: BuildType,
    },

    /// Parse and validate a recipe
    Validate {
        /// Recipe file (default: the embedded OGRE-Next recipe)
        recipe: Option<PathBuf>,
    },
}
