//! Normalization of one-or-many spectra into explicit series records.
//!
//! Callers describe a plot as a frequency axis (shared or per series), a list
//! of value vectors, and optional labels and colors. [`PowerSpectra::into_series`]
//! resolves all of that into one [`SpectrumSeries`] per drawn line.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PlotError;

/// One drawable series: its frequency vector, values, and legend/color.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSeries {
    pub freqs: Vec<f64>,
    pub values: Vec<f64>,
    pub label: Option<String>,
    pub color: Option<Color>,
}

impl SpectrumSeries {
    /// Check that the frequency and value vectors line up.
    pub fn validate(&self, context: &str) -> Result<(), PlotError> {
        if self.values.len() != self.freqs.len() {
            return Err(PlotError::shape(
                format!("{context} values"),
                self.freqs.len(),
                self.values.len(),
            ));
        }
        Ok(())
    }
}

/// Frequency axis for a set of spectra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreqAxis {
    /// One vector used by every series.
    Shared(Vec<f64>),
    /// One vector per series, paired positionally.
    PerSeries(Vec<Vec<f64>>),
}

/// Legend labels for a set of spectra.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Labels {
    /// Resolve to one entry per drawn series.
    ///
    /// A `Many` list shorter than `n` yields a shorter vector; the caller
    /// draws only that many series.
    pub fn resolve(&self, n: usize) -> Vec<Option<String>> {
        match self {
            Labels::None => vec![None; n],
            Labels::One(label) => vec![Some(label.clone()); n],
            Labels::Many(labels) => labels.iter().take(n).cloned().map(Some).collect(),
        }
    }
}

/// Line colors for a set of spectra.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Colors {
    #[default]
    Default,
    One(Color),
    Many(Vec<Color>),
}

impl Colors {
    /// Resolve to exactly `n` entries, cycling a `Many` list.
    pub fn resolve(&self, n: usize) -> Vec<Option<Color>> {
        match self {
            Colors::Default => vec![None; n],
            Colors::One(color) => vec![Some(*color); n],
            Colors::Many(colors) if colors.is_empty() => vec![None; n],
            Colors::Many(colors) => colors.iter().copied().cycle().take(n).map(Some).collect(),
        }
    }
}

/// One or more power spectra to overlay on a single plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSpectra {
    pub freqs: FreqAxis,
    pub powers: Vec<Vec<f64>>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub colors: Colors,
}

impl PowerSpectra {
    /// A single spectrum.
    pub fn single(freqs: Vec<f64>, powers: Vec<f64>) -> Self {
        Self::shared(freqs, vec![powers])
    }

    /// Several spectra sampled on the same frequency vector.
    pub fn shared(freqs: Vec<f64>, powers: Vec<Vec<f64>>) -> Self {
        Self {
            freqs: FreqAxis::Shared(freqs),
            powers,
            labels: Labels::None,
            colors: Colors::Default,
        }
    }

    /// Several spectra, each with its own frequency vector.
    pub fn paired(freqs: Vec<Vec<f64>>, powers: Vec<Vec<f64>>) -> Self {
        Self {
            freqs: FreqAxis::PerSeries(freqs),
            powers,
            labels: Labels::None,
            colors: Colors::Default,
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Number of value series supplied, before any label truncation.
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// Validate shapes and expand into one record per drawn line.
    pub fn into_series(self) -> Result<Vec<SpectrumSeries>, PlotError> {
        if self.powers.is_empty() {
            return Err(PlotError::EmptyInput("powers"));
        }
        let n = self.powers.len();

        let freqs: Vec<Vec<f64>> = match self.freqs {
            FreqAxis::Shared(f) => vec![f; n],
            FreqAxis::PerSeries(fs) => {
                if fs.len() != n {
                    return Err(PlotError::shape("frequency vector count", n, fs.len()));
                }
                fs
            }
        };

        let labels = self.labels.resolve(n);
        if labels.len() < n {
            tracing::warn!(
                series = n,
                labels = labels.len(),
                "fewer labels than series; extra series are not drawn"
            );
        }
        let colors = self.colors.resolve(n);

        let series: Vec<SpectrumSeries> = freqs
            .into_iter()
            .zip(self.powers)
            .zip(labels)
            .zip(colors)
            .map(|(((freqs, values), label), color)| SpectrumSeries {
                freqs,
                values,
                label,
                color,
            })
            .collect();

        for (i, s) in series.iter().enumerate() {
            s.validate(&format!("series {i}"))?;
        }

        Ok(series)
    }
}
