//! Spectral plot rendering.
//!
//! Turns already-computed power spectra, SCV estimates and spectral
//! histograms into [`specplot_core::Figure`]s. The free functions in
//! [`spectral`] only draw; [`SpectralRenderer`] adds the style and output
//! hooks around them.

pub mod renderer;
pub mod spectral;

pub use renderer::SpectralRenderer;
pub use spectral::{
    render_power_spectra, render_scv, render_scv_resampled_lines, render_scv_resampled_matrix,
    render_spectral_histogram,
};
