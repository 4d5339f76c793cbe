use crate::changer::BatchNameChanger;
use crate::converter::TemplateConverter;
use crate::ordinal::OrdinalFormatter;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Ordinal,
    Template {
        old_template: String,
        new_template: String,
    },
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub input: PathBuf,
    pub recursive: bool,
    pub include_hidden: bool,
    pub strategy: Strategy,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            recursive: false,
            include_hidden: false,
            strategy: Strategy::Ordinal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameCandidate {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub scanned_files: usize,
    pub skipped_hidden: usize,
    pub planned: usize,
    pub untouched: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub input_root: PathBuf,
    pub strategy: Strategy,
    pub created_at: DateTime<Local>,
    pub candidates: Vec<RenameCandidate>,
    pub stats: RenameStats,
}

/// Works out every rename without touching the filesystem.
pub fn generate_plan(options: &PlanOptions) -> Result<RenamePlan> {
    // Templates are checked before the folder is read.
    let converter = match &options.strategy {
        Strategy::Template {
            old_template,
            new_template,
        } => Some(
            TemplateConverter::new(old_template, new_template)
                .context("テンプレートが不正です")?,
        ),
        Strategy::Ordinal => None,
    };

    if !options.input.is_dir() {
        anyhow::bail!("入力フォルダが存在しません: {}", options.input.display());
    }

    let mut stats = RenameStats::default();
    let files = collect_files(
        &options.input,
        options.recursive,
        options.include_hidden,
        &mut stats,
    )?;

    let candidates = match &converter {
        Some(converter) => plan_with(converter, &files)?,
        None => plan_with(&OrdinalFormatter, &files)?,
    };

    stats.planned = candidates.len();
    stats.untouched = files.len().saturating_sub(candidates.len());
    info!(
        input = %options.input.display(),
        scanned = stats.scanned_files,
        planned = stats.planned,
        "リネーム計画を作成しました"
    );

    Ok(RenamePlan {
        input_root: options.input.clone(),
        strategy: options.strategy.clone(),
        created_at: Local::now(),
        candidates,
        stats,
    })
}

fn plan_with<C: BatchNameChanger>(changer: &C, files: &[PathBuf]) -> Result<Vec<RenameCandidate>> {
    let mut candidates = Vec::new();
    changer.change_names(files, |old, new| {
        candidates.push(RenameCandidate {
            original_path: old.to_path_buf(),
            target_path: new.to_path_buf(),
        });
        Ok(())
    })?;
    Ok(candidates)
}

pub fn collect_files(
    root: &Path,
    recursive: bool,
    include_hidden: bool,
    stats: &mut RenameStats,
) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    if recursive {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("フォルダ走査に失敗しました: {}", root.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            stats.scanned_files += 1;
            if is_hidden(path) && !include_hidden {
                stats.skipped_hidden += 1;
                continue;
            }
            out.push(path.to_path_buf());
        }
    } else {
        for entry in fs::read_dir(root)
            .with_context(|| format!("フォルダを読めませんでした: {}", root.display()))?
        {
            let entry =
                entry.with_context(|| format!("エントリ読み取り失敗: {}", root.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            stats.scanned_files += 1;
            if is_hidden(&path) && !include_hidden {
                stats.skipped_hidden += 1;
                continue;
            }
            out.push(path);
        }
        out.sort();
    }

    Ok(out)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
