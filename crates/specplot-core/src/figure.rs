//! The drawable surface that renderers issue commands against.
//!
//! A [`Figure`] owns a single [`Axes`] which records lines, images, labels,
//! scales and decorations. Backends (rasterizer, terminal preview) read the
//! recorded state; nothing is rasterized until a backend asks for it.

use crate::color::{cycle_color, Color, Colormap};
use crate::matrix::Matrix;

/// Dots per inch used when a figure is rasterized without an override.
pub const DEFAULT_DPI: f64 = 100.0;

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions at the given dpi, at least one pixel each way.
    pub fn pixels(&self, dpi: f64) -> (u32, u32) {
        let px = |inches: f64| (inches * dpi).round().max(1.0) as u32;
        (px(self.width), px(self.height))
    }
}

/// Axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// A polyline in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub label: Option<String>,
    pub color: Color,
    pub alpha: f64,
    pub width: f64,
}

/// Styling for a line before it is added to the axes.
///
/// A `None` color takes the next color from the axes' default cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub label: Option<String>,
    pub color: Option<Color>,
    pub alpha: f64,
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            label: None,
            color: None,
            alpha: 1.0,
            width: 1.5,
        }
    }
}

impl LineStyle {
    pub fn label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

/// Data-space rectangle an image is stretched over.
///
/// Row 0 of the image is drawn at `top`, the last row at `bottom`; `top`
/// may be numerically smaller than `bottom`, which flips the y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

/// How an image's aspect ratio relates to the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aspect {
    /// Stretch to fill the axes.
    #[default]
    Auto,
    /// One data unit is the same length on both axes.
    Equal,
}

/// A color-mapped matrix image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub data: Matrix,
    pub extent: Extent,
    pub aspect: Aspect,
    pub colormap: Colormap,
}

/// Color-intensity legend for the most recent image.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub label: String,
    pub colormap: Colormap,
    pub range: (f64, f64),
}

/// Legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendLoc {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// Legend settings attached by the style applier.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub loc: LegendLoc,
    pub font_size: f64,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub title: f64,
    pub label: f64,
    pub tick: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 12.0,
            label: 10.0,
            tick: 10.0,
        }
    }
}

/// A single plotting area and everything drawn on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axes {
    pub lines: Vec<LineSeries>,
    pub images: Vec<ImageLayer>,
    pub colorbar: Option<Colorbar>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xscale: Scale,
    pub yscale: Scale,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub legend: Option<Legend>,
    pub grid: bool,
    pub fonts: FontSizes,
    cycle_pos: usize,
}

impl Axes {
    /// Add a line on the current scales.
    pub fn plot(&mut self, xs: Vec<f64>, ys: Vec<f64>, style: LineStyle) {
        let color = match style.color {
            Some(c) => c,
            None => self.next_cycle_color(),
        };
        self.lines.push(LineSeries {
            xs,
            ys,
            label: style.label,
            color,
            alpha: style.alpha,
            width: style.width,
        });
    }

    /// Add a line and switch both axes to log scale.
    pub fn loglog(&mut self, xs: Vec<f64>, ys: Vec<f64>, style: LineStyle) {
        self.xscale = Scale::Log;
        self.yscale = Scale::Log;
        self.plot(xs, ys, style);
    }

    /// Add a color-mapped image.
    pub fn imshow(&mut self, data: Matrix, extent: Extent, aspect: Aspect) {
        self.images.push(ImageLayer {
            data,
            extent,
            aspect,
            colormap: Colormap::default(),
        });
    }

    /// Attach a colorbar describing the most recently added image.
    pub fn colorbar(&mut self, label: &str) {
        let Some(image) = self.images.last() else {
            return;
        };
        let range = image.data.finite_range().unwrap_or((0.0, 1.0));
        self.colorbar = Some(Colorbar {
            label: label.to_string(),
            colormap: image.colormap,
            range,
        });
    }

    pub fn set_xlabel(&mut self, label: &str) {
        self.xlabel = Some(label.to_string());
    }

    pub fn set_ylabel(&mut self, label: &str) {
        self.ylabel = Some(label.to_string());
    }

    /// Lines that carry a legend label.
    pub fn labeled_lines(&self) -> impl Iterator<Item = &LineSeries> {
        self.lines.iter().filter(|l| l.label.is_some())
    }

    fn next_cycle_color(&mut self) -> Color {
        let color = cycle_color(self.cycle_pos);
        self.cycle_pos += 1;
        color
    }
}

/// A sized drawing surface holding one set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub size: FigureSize,
    pub dpi: f64,
    pub axes: Axes,
}

impl Figure {
    pub fn new(size: FigureSize) -> Self {
        Self {
            size,
            dpi: DEFAULT_DPI,
            axes: Axes::default(),
        }
    }

    /// Reuse `existing` unchanged, or create a new figure of `default` size.
    pub fn acquire(existing: Option<Figure>, default: FigureSize) -> Self {
        existing.unwrap_or_else(|| Self::new(default))
    }

    /// Pixel dimensions at the figure's dpi.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.size.pixels(self.dpi)
    }
}
