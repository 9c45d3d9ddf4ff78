// src/recipe/kitchen/vcs.rs

//! Git checkout for the `source` hook

use super::runner::{CommandRunner, CommandSpec};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// How the source tree came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFetch {
    Cloned,
    /// An earlier checkout was kept
    Reused,
}

/// Pinned revision of a git repository
#[derive(Debug, Clone)]
pub struct GitSource<'a> {
    pub url: &'a str,
    pub tag: &'a str,
    pub submodules: bool,
}

impl GitSource<'_> {
    /// Clone into `dest` (or reuse it), then bring submodules up to date
    ///
    /// With `fresh`, any existing `dest` is removed first.
    pub fn fetch(
        &self,
        runner: &dyn CommandRunner,
        dest: &Path,
        fresh: bool,
    ) -> Result<SourceFetch> {
        if dest.exists() && fresh {
            info!("Removing existing checkout at {}", dest.display());
            fs::remove_dir_all(dest)
                .map_err(|e| Error::IoError(format!("Failed to remove {}: {}", dest.display(), e)))?;
        }

        let outcome = if dest.join(".git").exists() {
            self.verify_checkout(runner, dest)?;
            info!("Reusing checkout at {}", dest.display());
            SourceFetch::Reused
        } else {
            if dest.exists() && fs::read_dir(dest)?.next().is_some() {
                return Err(Error::IoError(format!(
                    "{} exists and is not a git checkout",
                    dest.display()
                )));
            }
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            info!("Cloning {} at {}", self.url, self.tag);
            runner.run_checked(&self.clone_command(dest))?;
            SourceFetch::Cloned
        };

        if self.submodules {
            runner.run_checked(&self.submodule_command(dest))?;
        }
        Ok(outcome)
    }

    /// Fail unless HEAD of `dest` is the commit the tag points at
    fn verify_checkout(&self, runner: &dyn CommandRunner, dest: &Path) -> Result<()> {
        let head = runner.run_checked(&self.git_in(dest).args(["rev-parse", "HEAD"]))?;
        let head = head.stdout.trim();
        let pinned = runner.run(
            &self
                .git_in(dest)
                .args(["rev-parse", "--verify", "--quiet"])
                .arg(format!("{}^{{commit}}", self.tag)),
        )?;

        if !pinned.success() || pinned.stdout.trim() != head {
            return Err(Error::StaleCheckout {
                path: dest.display().to_string(),
                tag: self.tag.to_string(),
                head: head.to_string(),
            });
        }
        debug!("Checkout at {} is on {} ({})", dest.display(), self.tag, head);
        Ok(())
    }

    fn git_in(&self, dest: &Path) -> CommandSpec {
        CommandSpec::new("git")
            .current_dir(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
    }

    fn clone_command(&self, dest: &Path) -> CommandSpec {
        CommandSpec::new("git")
            .args(["clone", "--branch", self.tag])
            .arg(self.url)
            .path_arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
    }

    fn submodule_command(&self, dest: &Path) -> CommandSpec {
        self.git_in(dest)
            .args(["submodule", "update", "--init", "--recursive"])
    }
}
