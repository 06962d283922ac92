use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use specplot_core::figure::{FontSizes, Legend, LegendLoc};
use specplot_core::{Figure, StyleApplier};

/// Cosmetic plot options loaded from the `[style]` table.
///
/// Unset optional fields leave whatever the renderer drew untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StyleConfig {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Option<[f64; 2]>,
    pub ylim: Option<[f64; 2]>,
    pub line_width: Option<f64>,
    pub alpha: Option<f64>,
    pub title_fontsize: f64,
    pub label_size: f64,
    pub tick_labelsize: f64,
    pub legend_size: f64,
    pub legend_loc: String,
    pub grid: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            xlim: None,
            ylim: None,
            line_width: None,
            alpha: None,
            title_fontsize: 18.0,
            label_size: 16.0,
            tick_labelsize: 12.0,
            legend_size: 12.0,
            legend_loc: "best".into(),
            grid: false,
        }
    }
}

impl StyleConfig {
    /// Validate value ranges and the legend location name.
    pub fn validate(&self) -> Result<()> {
        validate_positive("style.title_fontsize", self.title_fontsize)?;
        validate_positive("style.label_size", self.label_size)?;
        validate_positive("style.tick_labelsize", self.tick_labelsize)?;
        validate_positive("style.legend_size", self.legend_size)?;

        if let Some(width) = self.line_width {
            validate_positive("style.line_width", width)?;
        }
        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                bail!("style.alpha must be within [0, 1], got {alpha}");
            }
        }

        validate_limits("style.xlim", self.xlim)?;
        validate_limits("style.ylim", self.ylim)?;
        parse_legend_loc(&self.legend_loc)?;
        Ok(())
    }

    fn legend_loc(&self) -> LegendLoc {
        parse_legend_loc(&self.legend_loc).unwrap_or_default()
    }
}

impl StyleApplier for StyleConfig {
    fn apply(&self, figure: &mut Figure) {
        let ax = &mut figure.axes;

        if let Some(title) = &self.title {
            ax.title = Some(title.clone());
        }
        if let Some(xlabel) = &self.xlabel {
            ax.set_xlabel(xlabel);
        }
        if let Some(ylabel) = &self.ylabel {
            ax.set_ylabel(ylabel);
        }
        if let Some([lo, hi]) = self.xlim {
            ax.xlim = Some((lo, hi));
        }
        if let Some([lo, hi]) = self.ylim {
            ax.ylim = Some((lo, hi));
        }

        for line in &mut ax.lines {
            if let Some(width) = self.line_width {
                line.width = width;
            }
            if let Some(alpha) = self.alpha {
                line.alpha = alpha;
            }
        }

        ax.fonts = FontSizes {
            title: self.title_fontsize,
            label: self.label_size,
            tick: self.tick_labelsize,
        };
        ax.grid = self.grid;

        if ax.labeled_lines().next().is_some() {
            ax.legend = Some(Legend {
                loc: self.legend_loc(),
                font_size: self.legend_size,
            });
        }
    }
}

/// Parse a legend location name such as `"best"` or `"upper right"`.
pub fn parse_legend_loc(name: &str) -> Result<LegendLoc> {
    let loc = match name.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
        "best" => LegendLoc::Best,
        "upper right" => LegendLoc::UpperRight,
        "upper left" => LegendLoc::UpperLeft,
        "lower left" => LegendLoc::LowerLeft,
        "lower right" => LegendLoc::LowerRight,
        _ => bail!("style.legend_loc {:?} is not a known location", name),
    };
    Ok(loc)
}

fn validate_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{field} must be a positive number, got {value}");
    }
    Ok(())
}

fn validate_limits(field: &str, limits: Option<[f64; 2]>) -> Result<()> {
    let Some([lo, hi]) = limits else {
        return Ok(());
    };
    if !lo.is_finite() || !hi.is_finite() {
        bail!("{field} bounds must be finite");
    }
    if lo == hi {
        bail!("{field} bounds must differ, got [{lo}, {hi}]");
    }
    Ok(())
}
