use std::path::Path;

use anyhow::{Context, Result};

use vrtlens::VisualAnalysisEngine;
use vrtlens::buffer;
use vrtlens::config::{self, ConfigOverrides};
use vrtlens::report::terminal;

/// `vrtlens analyze`: profile a single image.
pub fn analyze(image: &Path, json: bool, overrides: &ConfigOverrides) -> Result<()> {
    let engine = VisualAnalysisEngine::new(config::resolve(overrides)?);
    let buf = buffer::decode(image)?;
    let analysis = engine.analyze(&buf);

    if json {
        let out = serde_json::to_string_pretty(&analysis).context("Failed to serialize analysis")?;
        println!("{out}");
    } else {
        terminal::print_analysis(&image.display().to_string(), &analysis);
    }
    Ok(())
}
