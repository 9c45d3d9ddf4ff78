// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cook { kitchen } => commands::cmd_cook(&kitchen),
        Commands::Hook { hook, kitchen } => commands::cmd_hook(hook, &kitchen),
        Commands::Show {
            recipe,
            os,
            build_type,
        } => commands::cmd_show(recipe.as_deref(), os, build_type),
        Commands::Validate { recipe } => commands::cmd_validate(recipe.as_deref()),
    }
}
