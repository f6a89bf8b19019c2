use std::path::Path;

use anyhow::{Result, bail};

use vrtlens::config::{self, Thresholds};

/// `vrtlens init`: create .vrtlens/config.toml.
pub fn init(force: bool) -> Result<()> {
    let here = Path::new(".");
    if !force && config::config_file_exists(here) {
        bail!(".vrtlens/config.toml already exists (use --force to overwrite)");
    }

    let critical = Thresholds::default().critical;
    config::write_template(here, critical)?;
    config::write_gitignore(here, force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} .vrtlens/config.toml");
    println!("  thresholds.critical = {critical:.1}");
    Ok(())
}
