use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use vrtlens::VisualAnalysisEngine;
use vrtlens::config::{self, ConfigOverrides};
use vrtlens::report::html::{self, ImageSources};
use vrtlens::report::{self, terminal};
use vrtlens::suite::{SuitePlan, SuiteReport, analyze_all};

/// Remove stale difference maps, but only from a directory that holds an
/// earlier report; anything else under `output` is left alone.
fn clear_previous_run(output: &Path) -> Result<bool> {
    let diff_root = output.join("difference");
    if !diff_root.is_dir() || !output.join(report::JSON_FILE).is_file() {
        return Ok(false);
    }
    std::fs::remove_dir_all(&diff_root)
        .with_context(|| format!("Failed to clear {}", diff_root.display()))?;
    debug!(dir = %diff_root.display(), "cleared previous difference maps");
    Ok(true)
}

pub struct SuiteArgs {
    pub reference_dir: PathBuf,
    pub test_dir: PathBuf,
    pub output: PathBuf,
    pub filter: Option<String>,
    pub parallel: usize,
}

/// `vrtlens suite`: analyse every matching pair, then summarise.
/// Returns exit code: 0 = nothing failed, 1 = any warning, critical or error.
pub async fn suite(args: SuiteArgs, overrides: &ConfigOverrides) -> Result<i32> {
    let config = config::resolve(overrides)?;
    let thresholds = config.thresholds;
    let plan = SuitePlan::plan(&args.reference_dir, &args.test_dir, args.filter.as_deref())?;

    for id in &plan.missing {
        println!("  \x1b[2mGONE\x1b[0m  \x1b[2m{id}  (no test image)\x1b[0m");
    }
    for id in &plan.new {
        println!("  \x1b[33m  NEW\x1b[0m  {id}  (no reference)");
    }

    clear_previous_run(&args.output)?;

    let run_start = Instant::now();
    let total = plan.total();
    let engine = Arc::new(VisualAnalysisEngine::new(config));
    let mut rx = analyze_all(
        engine,
        plan.jobs,
        args.parallel,
        Some(args.output.clone()),
    );

    let mut results = Vec::with_capacity(total);
    debug!(total, "waiting for analysis results");
    while let Some((outcome, elapsed)) = rx.recv().await {
        debug!(done = results.len() + 1, total, pair = %outcome.id, "received result");
        terminal::print_line(&outcome, elapsed);
        results.push(outcome);
        terminal::show_progress(results.len(), total);
    }

    let report = SuiteReport::build(results, plan.missing, plan.new, &thresholds);

    terminal::print_actionable_summary(&report.results, &report.summary);
    terminal::print_summary(&report.summary, run_start.elapsed());
    terminal::print_recommendations(&report.recommendations);

    let json_path = report::write_json(&report, &args.output)?;
    let reference_dir = std::fs::canonicalize(&args.reference_dir)
        .with_context(|| format!("Failed to resolve {}", args.reference_dir.display()))?;
    let test_dir = std::fs::canonicalize(&args.test_dir)
        .with_context(|| format!("Failed to resolve {}", args.test_dir.display()))?;
    let sources = ImageSources {
        reference_dir: &reference_dir,
        test_dir: &test_dir,
    };
    let html_path = html::write(&report, &sources, &args.output)?;
    info!(json = %json_path.display(), html = %html_path.display(), "reports written");

    println!();
    println!("Report: {}", html_path.display());

    Ok(if report.summary.failed > 0 { 1 } else { 0 })
}
