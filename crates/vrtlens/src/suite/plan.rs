use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Normalize a string for filter comparison: lowercase + treat `_` and ` ` as equivalent.
fn normalize_for_filter(s: &str) -> String {
    s.to_lowercase().replace('_', " ")
}

/// One reference/test pair to analyse.
#[derive(Debug, Clone)]
pub struct PairJob {
    /// Relative path without extension, e.g. `home/header`.
    pub id: String,
    pub reference: PathBuf,
    pub test: PathBuf,
}

/// Case-insensitive filter match. A trailing `.png` in the pattern is ignored
/// (users may copy names from the HTML report).
pub fn matches_filter(id: &str, pattern: &str) -> bool {
    let pattern = pattern.strip_suffix(".png").unwrap_or(pattern);
    normalize_for_filter(id).contains(&normalize_for_filter(pattern))
}

/// Pairs found by matching two directory trees.
#[derive(Debug, Default)]
pub struct SuitePlan {
    pub jobs: Vec<PairJob>,
    /// IDs with a reference but no test image.
    pub missing: Vec<String>,
    /// IDs with a test image but no reference.
    pub new: Vec<String>,
}

impl SuitePlan {
    pub fn plan(reference_dir: &Path, test_dir: &Path, filter: Option<&str>) -> Result<Self> {
        for dir in [reference_dir, test_dir] {
            if !dir.is_dir() {
                bail!("{} is not a directory", dir.display());
            }
        }
        let reference = list_png_ids(reference_dir);
        let test = list_png_ids(test_dir);
        let keep = |id: &String| filter.is_none_or(|pat| matches_filter(id, pat));

        let jobs = reference
            .intersection(&test)
            .filter(|&id| keep(id))
            .map(|id| PairJob {
                id: id.clone(),
                reference: reference_dir.join(format!("{id}.png")),
                test: test_dir.join(format!("{id}.png")),
            })
            .collect();
        let missing = reference
            .difference(&test)
            .filter(|&id| keep(id))
            .cloned()
            .collect();
        let new = test
            .difference(&reference)
            .filter(|&id| keep(id))
            .cloned()
            .collect();

        Ok(Self { jobs, missing, new })
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }
}

/// Recursively walk a directory, collecting all `.png` files as IDs
/// (relative path without the `.png` extension, `/`-separated).
fn collect_png_ids(base: &Path, dir: &Path, ids: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_png_ids(base, &path, ids);
        } else if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"))
            && let Ok(rel) = path.strip_prefix(base)
        {
            let id = rel.with_extension("");
            ids.insert(id.to_string_lossy().replace('\\', "/"));
        }
    }
}

pub fn list_png_ids(dir: &Path) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    collect_png_ids(dir, dir, &mut ids);
    ids
}
