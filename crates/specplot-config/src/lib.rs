//! Configuration types and loaders for specplot.
//!
//! A plot configuration file is TOML with an optional `[style]` table
//! (cosmetics applied after drawing) and an optional `[export]` table
//! (where to save the finished figure).

pub mod export;
pub mod style;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use export::ExportConfig;
pub use style::StyleConfig;

/// Top-level plot configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub export: Option<ExportConfig>,
}

impl PlotConfig {
    /// Parse and validate configuration TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse plot config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read plot config at {}", path.display()))?;

        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid plot config at {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.style.validate()?;
        if let Some(export) = &self.export {
            export.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_CONFIG: &str = r#"
[style]
title = "Resting-state PSD"
xlim = [1.0, 100.0]
legend_loc = "lower left"
grid = true

[export]
file_name = "psd"
file_path = "figures"
dpi = 150.0
"#;

    #[test]
    fn parses_valid_config() {
        let config = PlotConfig::from_toml_str(VALID_CONFIG).unwrap();
        assert_eq!(config.style.title.as_deref(), Some("Resting-state PSD"));
        assert_eq!(config.style.xlim, Some([1.0, 100.0]));
        assert_eq!(config.style.label_size, 16.0);
        assert!(config.style.grid);

        let export = config.export.unwrap();
        assert_eq!(export.resolve_path(), PathBuf::from("figures/psd.png"));
        assert_eq!(export.dpi, 150.0);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = PlotConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlotConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = PlotConfig::from_toml_str("[style]\ncolour = \"red\"\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to parse plot config TOML"));
    }

    #[test]
    fn semantic_errors_are_reported() {
        let raw = VALID_CONFIG.replace("legend_loc = \"lower left\"", "legend_loc = \"nowhere\"");
        let err = PlotConfig::from_toml_str(&raw).unwrap_err().to_string();
        assert!(err.contains("legend_loc"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PlotConfig::from_path(Path::new("/nonexistent/specplot.toml"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/specplot.toml"));
    }
}
