use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use specplot_core::{Figure, Matrix, PlotError, PowerSpectra};
use specplot_render::SpectralRenderer;

/// A plot request read from JSON, tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotRequest {
    PowerSpectra(PowerSpectra),
    Scv {
        freqs: Vec<f64>,
        scv: Vec<f64>,
    },
    ScvResampledLines {
        freqs: Vec<f64>,
        scv_resampled: Matrix,
    },
    ScvResampledMatrix {
        freqs: Vec<f64>,
        time_indices: Vec<f64>,
        scv_resampled: Matrix,
    },
    SpectralHistogram {
        freqs: Vec<f64>,
        power_bins: Vec<f64>,
        histogram: Matrix,
        #[serde(default)]
        spectrum_freqs: Option<Vec<f64>>,
        #[serde(default)]
        spectrum: Option<Vec<f64>>,
    },
}

impl PlotRequest {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse plot request JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read plot request at {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid plot request at {}", path.display()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PowerSpectra(_) => "power_spectra",
            Self::Scv { .. } => "scv",
            Self::ScvResampledLines { .. } => "scv_resampled_lines",
            Self::ScvResampledMatrix { .. } => "scv_resampled_matrix",
            Self::SpectralHistogram { .. } => "spectral_histogram",
        }
    }

    /// Draw the request through `renderer`, running its style and sink hooks.
    pub fn render(self, renderer: &SpectralRenderer) -> Result<Figure, PlotError> {
        match self {
            Self::PowerSpectra(spectra) => renderer.power_spectra(spectra, None),
            Self::Scv { freqs, scv } => renderer.scv(&freqs, &scv, None),
            Self::ScvResampledLines {
                freqs,
                scv_resampled,
            } => renderer.scv_resampled_lines(&freqs, &scv_resampled, None),
            Self::ScvResampledMatrix {
                freqs,
                time_indices,
                scv_resampled,
            } => renderer.scv_resampled_matrix(&freqs, &time_indices, &scv_resampled),
            Self::SpectralHistogram {
                freqs,
                power_bins,
                histogram,
                spectrum_freqs,
                spectrum,
            } => renderer.spectral_histogram(
                &freqs,
                &power_bins,
                &histogram,
                spectrum_freqs.as_deref(),
                spectrum.as_deref(),
            ),
        }
    }
}
