// src/recipe/kitchen/patch.rs

//! Literal search-and-replace patching of the fetched source tree
//!
//! Every operation reports what happened to it. A search text that is not
//! in the file aborts the cook with [`Error::PatchNotApplicable`] rather than
//! silently leaving the tree unpatched.
//!
//! Applied operations are recorded in a ledger inside the checkout
//! ([`PATCH_LEDGER_FILE`]). Only an operation found in the ledger may be
//! reported as [`PatchOutcome::AlreadyApplied`] on a later run.

use crate::error::{Error, Result};
use crate::platform::{Condition, HostPlatform};
use crate::recipe::format::PatchOperation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ledger of applied operations, relative to the source directory
pub const PATCH_LEDGER_FILE: &str = ".kitchen-patches.json";

/// What happened to one patch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Search text replaced
    Applied {
        occurrences: usize,
        /// Unified diff of the change
        diff: String,
    },
    /// Recorded in the ledger by an earlier run
    AlreadyApplied,
    /// Condition does not hold on this host
    Skipped { condition: Condition },
}

/// Per-operation result of the `source` hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub file: String,
    pub outcome: PatchOutcome,
}

impl PatchReport {
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, PatchOutcome::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LedgerEntry {
    file: String,
    search: String,
    replace: String,
}

impl LedgerEntry {
    fn matches(&self, op: &PatchOperation) -> bool {
        self.file == op.file && self.search == op.search && self.replace == op.replace
    }
}

/// Operations already applied to a checkout
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchLedger {
    applied: Vec<LedgerEntry>,
}

impl PatchLedger {
    /// Read the ledger of `source_dir`; a checkout without one has none applied
    pub fn load(source_dir: &Path) -> Result<Self> {
        let path = source_dir.join(PATCH_LEDGER_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, source_dir: &Path) -> Result<()> {
        let path = source_dir.join(PATCH_LEDGER_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn contains(&self, op: &PatchOperation) -> bool {
        self.applied.iter().any(|entry| entry.matches(op))
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    fn record(&mut self, op: &PatchOperation) {
        if !self.contains(op) {
            self.applied.push(LedgerEntry {
                file: op.file.clone(),
                search: op.search.clone(),
                replace: op.replace.clone(),
            });
        }
    }
}

/// Apply one operation against `source_dir`
///
/// An absent search text is only accepted when `ledger` records this exact
/// operation and the replacement is still in the file.
pub fn apply_patch(
    source_dir: &Path,
    op: &PatchOperation,
    platform: &HostPlatform,
    ledger: &PatchLedger,
) -> Result<PatchReport> {
    if !platform.satisfies(op.when) {
        debug!("Skipping {} patch for {}", op.when, op.file);
        return Ok(PatchReport {
            file: op.file.clone(),
            outcome: PatchOutcome::Skipped { condition: op.when },
        });
    }

    let not_applicable = || Error::PatchNotApplicable {
        file: op.file.clone(),
        search: op.search.clone(),
    };

    let path = source_dir.join(&op.file);
    if !path.is_file() {
        return Err(not_applicable());
    }
    let original = fs::read_to_string(&path)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    let occurrences = original.matches(op.search.as_str()).count();
    match occurrences {
        0 if ledger.contains(op) && original.contains(op.replace.as_str()) => {
            info!("Patch for {} already applied", op.file);
            return Ok(PatchReport {
                file: op.file.clone(),
                outcome: PatchOutcome::AlreadyApplied,
            });
        }
        0 => return Err(not_applicable()),
        n if n > 1 && !op.all => {
            return Err(Error::PatchAmbiguous {
                file: op.file.clone(),
                search: op.search.clone(),
                occurrences: n,
            });
        }
        _ => {}
    }

    let patched = original.replace(op.search.as_str(), &op.replace);
    let diff = diffy::create_patch(&original, &patched).to_string();
    fs::write(&path, &patched)
        .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Patched {} ({} occurrence(s))", op.file, occurrences);
    Ok(PatchReport {
        file: op.file.clone(),
        outcome: PatchOutcome::Applied { occurrences, diff },
    })
}

/// Apply operations in order, stopping at the first failure
///
/// The ledger is saved after every applied operation, so a rerun after a
/// failure recognises the ones that already went in.
pub fn apply_patches(
    source_dir: &Path,
    ops: &[PatchOperation],
    platform: &HostPlatform,
) -> Result<Vec<PatchReport>> {
    let mut ledger = PatchLedger::load(source_dir)?;
    let mut reports = Vec::with_capacity(ops.len());
    for op in ops {
        let report = apply_patch(source_dir, op, platform, &ledger)?;
        if report.is_applied() {
            ledger.record(op);
            ledger.save(source_dir)?;
        }
        reports.push(report);
    }
    Ok(reports)
}
