use crate::planner::RenamePlan;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub applied: usize,
}

/// Moves one file. An existing file at `to` is never overwritten.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if from != to && to.exists() {
        bail!(
            "リネーム先が既に存在します: {} -> {}",
            from.display(),
            to.display()
        );
    }
    fs::rename(from, to).with_context(|| {
        format!(
            "リネームに失敗しました: {} -> {}",
            from.display(),
            to.display()
        )
    })?;
    debug!(from = %from.display(), to = %to.display(), "リネームしました");
    Ok(())
}

/// Applies the plan in order and stops at the first failure. Files already moved stay
/// moved.
pub fn apply_plan(plan: &RenamePlan) -> Result<ApplyResult> {
    let mut applied = 0usize;
    for candidate in &plan.candidates {
        move_file(&candidate.original_path, &candidate.target_path)?;
        applied += 1;
    }
    info!(applied, "リネームを適用しました");
    Ok(ApplyResult { applied })
}
