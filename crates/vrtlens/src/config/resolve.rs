use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{EngineConfig, default_path, load, validate_threshold};

fn parse_threshold(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    validate_threshold(v)
}

/// Engine settings that can be overridden from the command line.
///
/// `None`/`false` means "keep the lower layer's value".
#[derive(Clone, Debug, Default, clap::Args)]
pub struct ConfigOverrides {
    /// Config file (default: .vrtlens/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Percent of differing pixels above which a pair is critical
    #[arg(long, value_parser = parse_threshold)]
    pub critical: Option<f64>,

    /// Percent of differing pixels above which a pair is a warning
    #[arg(long, value_parser = parse_threshold)]
    pub warning: Option<f64>,

    /// Percent of differing pixels above which a pair is a minor change
    #[arg(long, value_parser = parse_threshold)]
    pub minor: Option<f64>,

    /// Number of dominant colours to extract per image
    #[arg(long)]
    pub max_colors: Option<usize>,

    /// Skip pixel-level comparison
    #[arg(long)]
    pub no_pixel: bool,

    /// Skip structural comparison
    #[arg(long)]
    pub no_structure: bool,

    /// Skip colour comparison
    #[arg(long)]
    pub no_color: bool,

    /// Skip layout comparison
    #[arg(long)]
    pub no_layout: bool,
}

/// Values read from `VRTLENS_*` environment variables.
#[derive(Debug, Default)]
struct EnvLayer {
    critical: Option<f64>,
    warning: Option<f64>,
    minor: Option<f64>,
}

impl EnvLayer {
    fn read(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let float = |name: &str| -> Result<Option<f64>> {
            var(name)
                .map(|v| v.parse::<f64>())
                .transpose()
                .with_context(|| format!("{name} must be a valid float"))
        };
        Ok(Self {
            critical: float("VRTLENS_CRITICAL_THRESHOLD")?,
            warning: float("VRTLENS_WARNING_THRESHOLD")?,
            minor: float("VRTLENS_MINOR_THRESHOLD")?,
        })
    }
}

/// Build the effective config: CLI > env > file > defaults.
pub fn resolve(cli: &ConfigOverrides) -> Result<EngineConfig> {
    let path = cli.config.clone().unwrap_or_else(default_path);
    let file = load(&path)?;
    let env = EnvLayer::read(|name| std::env::var(name).ok())?;
    merge(file, env, cli)
}

fn merge(file: EngineConfig, env: EnvLayer, cli: &ConfigOverrides) -> Result<EngineConfig> {
    let mut config = file;

    let t = &mut config.thresholds;
    t.critical = cli.critical.or(env.critical).unwrap_or(t.critical);
    t.warning = cli.warning.or(env.warning).unwrap_or(t.warning);
    t.minor = cli.minor.or(env.minor).unwrap_or(t.minor);

    if let Some(n) = cli.max_colors {
        config.colors.max_colors = n;
    }

    let a = &mut config.analysis;
    a.enable_pixel_analysis &= !cli.no_pixel;
    a.enable_structural_similarity &= !cli.no_structure;
    a.enable_color_analysis &= !cli.no_color;
    a.enable_layout_analysis &= !cli.no_layout;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let mut file = EngineConfig::default();
        file.thresholds.critical = 9.0;
        file.thresholds.warning = 3.0;
        let env = EnvLayer::read(env(&[
            ("VRTLENS_CRITICAL_THRESHOLD", "7.5"),
            ("VRTLENS_WARNING_THRESHOLD", "2.5"),
        ]))
        .unwrap();
        let cli = ConfigOverrides {
            critical: Some(6.0),
            ..ConfigOverrides::default()
        };
        let config = merge(file, env, &cli).unwrap();
        assert_eq!(config.thresholds.critical, 6.0);
        assert_eq!(config.thresholds.warning, 2.5);
        assert_eq!(config.thresholds.minor, 0.5);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let err = EnvLayer::read(env(&[("VRTLENS_MINOR_THRESHOLD", "lots")])).unwrap_err();
        assert!(err.to_string().contains("VRTLENS_MINOR_THRESHOLD"));
    }

    #[test]
    fn disable_flags_only_turn_stages_off() {
        let mut file = EngineConfig::default();
        file.analysis.enable_color_analysis = false;
        let cli = ConfigOverrides {
            no_layout: true,
            ..ConfigOverrides::default()
        };
        let config = merge(file, EnvLayer::default(), &cli).unwrap();
        assert!(!config.analysis.enable_color_analysis);
        assert!(!config.analysis.enable_layout_analysis);
        assert!(config.analysis.enable_pixel_analysis);
    }

    #[test]
    fn merged_result_is_validated() {
        let cli = ConfigOverrides {
            minor: Some(10.0),
            ..ConfigOverrides::default()
        };
        assert!(merge(EngineConfig::default(), EnvLayer::default(), &cli).is_err());
    }
}
