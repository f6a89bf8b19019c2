pub mod html;
pub mod terminal;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

pub const JSON_FILE: &str = "report.json";

/// Pretty-print `value` to `dir/report.json`, creating `dir` if needed.
pub fn write_json<T: Serialize>(value: &T, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(JSON_FILE);
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
