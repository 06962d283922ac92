use specplot_core::{Figure, Matrix, OutputSink, PlotError, PowerSpectra, StyleApplier};

use crate::spectral;

/// Spectral renderer with optional style and output hooks.
///
/// Every operation draws its data, then runs the style applier (if any),
/// then hands the finished figure to the output sink (if any). The drawn
/// figure is returned either way so callers can keep composing on it.
#[derive(Default)]
pub struct SpectralRenderer {
    style: Option<Box<dyn StyleApplier>>,
    sink: Option<Box<dyn OutputSink>>,
}

impl SpectralRenderer {
    /// Create a renderer with no style applier and no output sink.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: impl StyleApplier + 'static) -> Self {
        self.style = Some(Box::new(style));
        self
    }

    pub fn with_sink(mut self, sink: impl OutputSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn power_spectra(
        &self,
        spectra: PowerSpectra,
        canvas: Option<Figure>,
    ) -> Result<Figure, PlotError> {
        self.finish(spectral::render_power_spectra(spectra, canvas)?)
    }

    pub fn scv(
        &self,
        freqs: &[f64],
        scv: &[f64],
        canvas: Option<Figure>,
    ) -> Result<Figure, PlotError> {
        self.finish(spectral::render_scv(freqs, scv, canvas)?)
    }

    pub fn scv_resampled_lines(
        &self,
        freqs: &[f64],
        scv_resampled: &Matrix,
        canvas: Option<Figure>,
    ) -> Result<Figure, PlotError> {
        self.finish(spectral::render_scv_resampled_lines(
            freqs,
            scv_resampled,
            canvas,
        )?)
    }

    pub fn scv_resampled_matrix(
        &self,
        freqs: &[f64],
        time_indices: &[f64],
        scv_resampled: &Matrix,
    ) -> Result<Figure, PlotError> {
        self.finish(spectral::render_scv_resampled_matrix(
            freqs,
            time_indices,
            scv_resampled,
        )?)
    }

    pub fn spectral_histogram(
        &self,
        freqs: &[f64],
        power_bins: &[f64],
        histogram: &Matrix,
        spectrum_freqs: Option<&[f64]>,
        spectrum: Option<&[f64]>,
    ) -> Result<Figure, PlotError> {
        self.finish(spectral::render_spectral_histogram(
            freqs,
            power_bins,
            histogram,
            spectrum_freqs,
            spectrum,
        )?)
    }

    /// Apply the style hook and hand the figure to the sink.
    pub fn finish(&self, mut figure: Figure) -> Result<Figure, PlotError> {
        if let Some(style) = &self.style {
            style.apply(&mut figure);
        }
        if let Some(sink) = &self.sink {
            sink.write(&figure)?;
            tracing::info!("figure exported");
        }
        Ok(figure)
    }
}
