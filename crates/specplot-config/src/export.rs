use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use specplot_core::figure::DEFAULT_DPI;

/// Where and how a finished figure is saved, from the `[export]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    pub file_name: String,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    #[serde(default = "default_dpi")]
    pub dpi: f64,
}

fn default_dpi() -> f64 {
    DEFAULT_DPI
}

impl ExportConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: None,
            dpi: DEFAULT_DPI,
        }
    }

    /// Validate the file name and resolution.
    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            bail!("export.file_name must not be empty");
        }
        if self.file_name.contains(['/', '\\']) {
            bail!(
                "export.file_name {:?} must not contain path separators; use export.file_path",
                self.file_name
            );
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            bail!("export.dpi must be a positive number, got {}", self.dpi);
        }
        Ok(())
    }

    /// Full output path: `file_path/file_name`, with `.png` added when the
    /// name has no extension.
    pub fn resolve_path(&self) -> PathBuf {
        let mut path = match &self.file_path {
            Some(dir) => dir.join(&self.file_name),
            None => PathBuf::from(&self.file_name),
        };
        if path.extension().is_none() {
            path.set_extension("png");
        }
        path
    }
}
