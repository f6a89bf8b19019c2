pub mod resolve;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::resolve::{ConfigOverrides, resolve};
pub use self::template::{config_file_exists, write_gitignore, write_template};

pub const CONFIG_DIR: &str = ".vrtlens";
pub(crate) const CONFIG_FILE: &str = "config.toml";

/// Which comparison stages run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisToggles {
    pub enable_pixel_analysis: bool,
    pub enable_structural_similarity: bool,
    pub enable_color_analysis: bool,
    pub enable_layout_analysis: bool,
}

impl Default for AnalysisToggles {
    fn default() -> Self {
        Self {
            enable_pixel_analysis: true,
            enable_structural_similarity: true,
            enable_color_analysis: true,
            enable_layout_analysis: true,
        }
    }
}

/// Mismatch bands, as a percentage of differing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub critical: f64,
    pub warning: f64,
    pub minor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical: 5.0,
            warning: 2.0,
            minor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorSettings {
    pub max_colors: usize,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self { max_colors: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionSettings {
    pub enabled: bool,
    /// Difference intensity (0–255) a pixel must exceed to join a region.
    pub intensity_threshold: u8,
    /// Components with fewer pixels are discarded.
    pub min_size: usize,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity_threshold: 50,
            min_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub analysis: AnalysisToggles,
    pub thresholds: Thresholds,
    pub colors: ColorSettings,
    pub regions: RegionSettings,
}

impl EngineConfig {
    /// Validate semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, v) in [
            ("critical", t.critical),
            ("warning", t.warning),
            ("minor", t.minor),
        ] {
            validate_threshold(v).map_err(|e| anyhow::anyhow!("thresholds.{name}: {e}"))?;
        }
        if !(t.minor <= t.warning && t.warning <= t.critical) {
            bail!(
                "Thresholds must satisfy minor <= warning <= critical, got {} / {} / {}",
                t.minor,
                t.warning,
                t.critical,
            );
        }
        if self.colors.max_colors == 0 {
            bail!("colors.max_colors must be at least 1");
        }
        Ok(())
    }
}

pub fn validate_threshold(v: f64) -> Result<f64, String> {
    if !(0.0..=100.0).contains(&v) {
        return Err(format!("threshold must be between 0 and 100 (percent), got {v}"));
    }
    Ok(v)
}

/// Read a config file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: EngineConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn default_path() -> std::path::PathBuf {
    Path::new(CONFIG_DIR).join(CONFIG_FILE)
}
