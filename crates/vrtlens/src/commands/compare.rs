use std::path::Path;

use anyhow::{Context, Result};

use vrtlens::VisualAnalysisEngine;
use vrtlens::config::{self, ConfigOverrides};
use vrtlens::report::{self, terminal};
use vrtlens::suite::PairStatus;

/// `vrtlens compare`: grade one reference/test pair.
/// Returns exit code: 0 = pass or minor, 1 = warning or critical.
pub fn compare(
    reference: &Path,
    test: &Path,
    output: Option<&Path>,
    json: bool,
    overrides: &ConfigOverrides,
) -> Result<i32> {
    let engine = VisualAnalysisEngine::new(config::resolve(overrides)?);
    let report = engine
        .compare_files(reference, test, output)
        .with_context(|| {
            format!(
                "Failed to compare {} with {}",
                reference.display(),
                test.display()
            )
        })?;
    let status = PairStatus::of(&report, &engine.config().thresholds);

    if let Some(dir) = output {
        let path = report::write_json(&report, dir)?;
        if !json {
            println!("Report: {}", path.display());
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        println!(
            "  {}  {} vs {}",
            terminal::status_label(status),
            reference.display(),
            test.display()
        );
        terminal::print_report(&report);
    }

    Ok(if status.is_failure() { 1 } else { 0 })
}
