//! Core types for specplot.
//!
//! This crate provides the building blocks shared by the renderer, the
//! configuration layer and the output backends: series normalization, the
//! [`figure::Figure`] drawing surface, colors, matrices, the style/output
//! hook traits, typed errors and the logging subsystem.

pub mod color;
pub mod error;
pub mod figure;
pub mod hooks;
pub mod logging;
pub mod matrix;
pub mod series;

pub use color::{Color, Colormap};
pub use error::PlotError;
pub use figure::{Aspect, Axes, Extent, Figure, FigureSize, LineStyle, Scale};
pub use hooks::{OutputSink, StyleApplier};
pub use matrix::Matrix;
pub use series::{Colors, FreqAxis, Labels, PowerSpectra, SpectrumSeries};
