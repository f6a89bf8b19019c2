use std::path::Path;

use anyhow::{Context, Result};

use super::{CONFIG_DIR, CONFIG_FILE};

/// Hand-crafted config template with commented-out keys.
/// Written by `vrtlens init` so users can see every knob and its default.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Comparison stages, all enabled by default.
# ─────────────────────────────────────────────────────────
[analysis]
# enable_pixel_analysis = true
# enable_structural_similarity = true
# enable_color_analysis = true
# enable_layout_analysis = true

# ─────────────────────────────────────────────────────────
# Mismatch bands (percent of differing pixels).
# ─────────────────────────────────────────────────────────
[thresholds]
critical = {critical}
# warning = 2.0
# minor = 0.5

[colors]
# max_colors = 5                    # dominant colours per image

[regions]
# enabled = true
# intensity_threshold = 50          # 0-255 difference intensity
# min_size = 100                    # pixels
"#;

pub fn config_file_exists(dir: &Path) -> bool {
    dir.join(CONFIG_DIR).join(CONFIG_FILE).exists()
}

pub fn write_gitignore(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_DIR).join(".gitignore");
    if !force && path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "output/\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the commented config template under `dir/.vrtlens/`.
pub fn write_template(dir: &Path, critical: f64) -> Result<()> {
    let config_dir = dir.join(CONFIG_DIR);
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    let path = config_dir.join(CONFIG_FILE);
    let content = CONFIG_TEMPLATE.replace("{critical}", &format!("{critical:.1}"));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
