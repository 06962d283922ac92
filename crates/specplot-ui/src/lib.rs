//! Output backends for specplot figures.
//!
//! Rasterizes [`specplot_core::Figure`]s into RGBA images and ships them to
//! PNG files, iTerm2 inline images, or a ratatui terminal preview.

pub mod iterm;
pub mod png;
pub mod preview;
pub mod raster;

pub use iterm::ItermSink;
pub use png::PngSink;
pub use raster::{rasterize, rasterize_with_dpi};
