//! Software rasterizer for [`Figure`]s.
//!
//! Produces an RGBA bitmap at the figure's resolution: white background,
//! framed plot area, color-mapped images, alpha-blended lines, ticks, an
//! optional grid, colorbar and legend swatches. Text (titles, axis labels,
//! tick labels) is not rasterized; terminal previews print it instead.

use image::{Rgba, RgbaImage};

use specplot_core::figure::{Axes, ImageLayer, LegendLoc, LineSeries};
use specplot_core::{Color, Figure, Scale};

// Plot area as fractions of the figure.
const LEFT: f64 = 0.125;
const RIGHT: f64 = 0.9;
const BOTTOM: f64 = 0.11;
const TOP: f64 = 0.88;
// Horizontal space taken from the plot area when a colorbar is attached.
const COLORBAR_RESERVE: f64 = 0.1;
const COLORBAR_WIDTH: f64 = 0.025;

const FRAME: Color = Color::BLACK;
const GRID: Color = Color::rgb(0xb0, 0xb0, 0xb0);
const TICK_LEN: i64 = 4;
const POINTS_PER_INCH: f64 = 72.0;

/// Pixel rectangle, inclusive of `x0`/`y0`, exclusive of `x1`/`y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelRect {
    fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    fn height(&self) -> i64 {
        self.y1 - self.y0
    }
}

/// Maps one data axis onto a pixel span.
///
/// `lo` lands on pixel `p_lo` and `hi` on `p_hi`; either pair may be
/// reversed, which is how inverted axes are expressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    pub lo: f64,
    pub hi: f64,
    pub scale: Scale,
    p_lo: f64,
    p_hi: f64,
}

impl AxisMap {
    fn new(limits: (f64, f64), scale: Scale, p_lo: f64, p_hi: f64) -> Self {
        Self {
            lo: limits.0,
            hi: limits.1,
            scale,
            p_lo,
            p_hi,
        }
    }

    fn forward(&self, v: f64) -> Option<f64> {
        match self.scale {
            Scale::Linear if v.is_finite() => Some(v),
            Scale::Log if v.is_finite() && v > 0.0 => Some(v.log10()),
            _ => None,
        }
    }

    fn inverse(&self, t: f64) -> f64 {
        match self.scale {
            Scale::Linear => t,
            Scale::Log => 10f64.powf(t),
        }
    }

    /// Data value to pixel coordinate.
    pub fn to_px(&self, v: f64) -> Option<f64> {
        let t = self.forward(v)?;
        let t_lo = self.forward(self.lo)?;
        let t_hi = self.forward(self.hi)?;
        if t_hi == t_lo {
            return None;
        }
        Some(self.p_lo + (t - t_lo) / (t_hi - t_lo) * (self.p_hi - self.p_lo))
    }

    /// Pixel coordinate (pixel centre) back to a data value.
    pub fn from_px(&self, p: f64) -> Option<f64> {
        let t_lo = self.forward(self.lo)?;
        let t_hi = self.forward(self.hi)?;
        if self.p_hi == self.p_lo {
            return None;
        }
        let frac = (p - self.p_lo) / (self.p_hi - self.p_lo);
        Some(self.inverse(t_lo + frac * (t_hi - t_lo)))
    }

    /// Tick positions in data units within the axis range.
    pub fn ticks(&self) -> Vec<f64> {
        let (Some(a), Some(b)) = (self.forward(self.lo), self.forward(self.hi)) else {
            return Vec::new();
        };
        let (a, b) = (a.min(b), a.max(b));
        match self.scale {
            Scale::Log => {
                let first = a.ceil() as i64;
                let last = b.floor() as i64;
                (first..=last).map(|k| 10f64.powi(k as i32)).collect()
            }
            Scale::Linear => {
                let step = nice_step((b - a) / 5.0);
                if step <= 0.0 || !step.is_finite() {
                    return Vec::new();
                }
                let first = (a / step).ceil() as i64;
                let last = (b / step).floor() as i64;
                (first..=last).map(|k| k as f64 * step).collect()
            }
        }
    }
}

/// Round a raw step up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

/// Pixel-space layout of a rasterized figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub plot: PixelRect,
    pub colorbar: Option<PixelRect>,
    pub x: AxisMap,
    pub y: AxisMap,
}

impl Layout {
    /// Compute the plot area and axis mappings for `figure` at `width × height`.
    pub fn new(figure: &Figure, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let ax = &figure.axes;

        let right = if ax.colorbar.is_some() {
            RIGHT - COLORBAR_RESERVE
        } else {
            RIGHT
        };
        let plot = PixelRect {
            x0: (LEFT * w).round() as i64,
            y0: ((1.0 - TOP) * h).round() as i64,
            x1: (right * w).round() as i64,
            y1: ((1.0 - BOTTOM) * h).round() as i64,
        };

        let colorbar = ax.colorbar.as_ref().map(|_| PixelRect {
            x0: plot.x1 + (0.03 * w).round() as i64,
            y0: plot.y0,
            x1: plot.x1 + ((0.03 + COLORBAR_WIDTH) * w).round() as i64,
            y1: plot.y1,
        });

        let (xlim, ylim) = data_limits(ax);
        let x = AxisMap::new(xlim, ax.xscale, plot.x0 as f64, plot.x1 as f64);
        let y = AxisMap::new(ylim, ax.yscale, plot.y1 as f64, plot.y0 as f64);

        Self {
            plot,
            colorbar,
            x,
            y,
        }
    }
}

/// Axis limits: explicit limits first, then the first image's extent, then
/// the line data with a 5% margin in (possibly log) axis space.
fn data_limits(ax: &Axes) -> ((f64, f64), (f64, f64)) {
    let image = ax.images.first();
    let xlim = ax
        .xlim
        .or_else(|| image.map(|i| (i.extent.left, i.extent.right)))
        .unwrap_or_else(|| line_limits(ax.lines.iter().flat_map(|l| l.xs.iter()), ax.xscale));
    let ylim = ax
        .ylim
        .or_else(|| image.map(|i| (i.extent.bottom, i.extent.top)))
        .unwrap_or_else(|| line_limits(ax.lines.iter().flat_map(|l| l.ys.iter()), ax.yscale));
    (xlim, ylim)
}

fn line_limits<'a>(values: impl Iterator<Item = &'a f64>, scale: Scale) -> (f64, f64) {
    let forward = |v: f64| match scale {
        Scale::Linear if v.is_finite() => Some(v),
        Scale::Log if v.is_finite() && v > 0.0 => Some(v.log10()),
        _ => None,
    };
    let inverse = |t: f64| match scale {
        Scale::Linear => t,
        Scale::Log => 10f64.powf(t),
    };

    let range = values
        .filter_map(|v| forward(*v))
        .fold(None, |acc: Option<(f64, f64)>, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        });

    let (lo, hi) = match range {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    };
    (inverse(lo), inverse(hi))
}

/// Rasterize a figure at its own dpi.
pub fn rasterize(figure: &Figure) -> RgbaImage {
    rasterize_with_dpi(figure, figure.dpi)
}

/// Rasterize a figure at an explicit dpi.
pub fn rasterize_with_dpi(figure: &Figure, dpi: f64) -> RgbaImage {
    let (width, height) = figure.size.pixels(dpi);
    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let layout = Layout::new(figure, width, height);
    let ax = &figure.axes;

    for image in &ax.images {
        draw_image(&mut img, &layout, image);
    }

    if ax.grid {
        draw_grid(&mut img, &layout);
    }

    let px_per_point = dpi / POINTS_PER_INCH;
    let mut coverage = Coverage::new(width, height);
    for line in &ax.lines {
        draw_line(&mut img, &mut coverage, &layout, line, px_per_point);
    }

    draw_frame(&mut img, layout.plot);
    draw_ticks(&mut img, &layout);

    if let (Some(bar), Some(rect)) = (&ax.colorbar, layout.colorbar) {
        for y in rect.y0..rect.y1 {
            let t = (rect.y1 - 1 - y) as f64 / (rect.height() - 1).max(1) as f64;
            let color = bar.colormap.sample(t);
            for x in rect.x0..rect.x1 {
                blend(&mut img, x, y, color, 1.0);
            }
        }
        draw_frame(&mut img, rect);
    }

    if ax.legend.is_some() {
        draw_legend(&mut img, &layout, ax, px_per_point);
    }

    img
}

fn draw_image(img: &mut RgbaImage, layout: &Layout, image: &ImageLayer) {
    let data = &image.data;
    if data.is_empty() {
        return;
    }
    let (vmin, vmax) = data.finite_range().unwrap_or((0.0, 1.0));
    let span = if vmax > vmin { vmax - vmin } else { 1.0 };
    let e = image.extent;

    for py in layout.plot.y0..layout.plot.y1 {
        let Some(dy) = layout.y.from_px(py as f64 + 0.5) else {
            continue;
        };
        let fy = (dy - e.top) / (e.bottom - e.top);
        if !(0.0..1.0).contains(&fy) {
            continue;
        }
        let row = ((fy * data.rows() as f64) as usize).min(data.rows() - 1);

        for px in layout.plot.x0..layout.plot.x1 {
            let Some(dx) = layout.x.from_px(px as f64 + 0.5) else {
                continue;
            };
            let fx = (dx - e.left) / (e.right - e.left);
            if !(0.0..1.0).contains(&fx) {
                continue;
            }
            let col = ((fx * data.cols() as f64) as usize).min(data.cols() - 1);
            let Some(v) = data.get(row, col).filter(|v| v.is_finite()) else {
                continue;
            };
            blend(img, px, py, image.colormap.sample((v - vmin) / span), 1.0);
        }
    }
}

/// Per-pixel coverage scratch buffer shared by every line of a figure.
struct Coverage {
    width: u32,
    height: u32,
    mask: Vec<bool>,
}

impl Coverage {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mask: vec![false; width as usize * height as usize],
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn draw_line(
    img: &mut RgbaImage,
    coverage: &mut Coverage,
    layout: &Layout,
    line: &LineSeries,
    px_per_point: f64,
) {
    let radius = (line.width * px_per_point / 2.0).max(0.5);

    let points: Vec<Option<(f64, f64)>> = line
        .xs
        .iter()
        .zip(&line.ys)
        .map(|(x, y)| Some((layout.x.to_px(*x)?, layout.y.to_px(*y)?)))
        .collect();

    let mut segments: Vec<((f64, f64), (f64, f64))> = points
        .windows(2)
        .filter_map(|pair| Some((pair[0]?, pair[1]?)))
        .collect();
    if let [Some(a)] = points.as_slice() {
        segments.push((*a, *a));
    }

    // Segments are clipped to the plot area grown by the pen radius.
    let bounds = (
        layout.plot.x0 as f64 - radius,
        layout.plot.y0 as f64 - radius,
        layout.plot.x1 as f64 + radius,
        layout.plot.y1 as f64 + radius,
    );
    let mut touched: Option<PixelRect> = None;
    for (a, b) in segments {
        let Some((a, b)) = clip_segment(a, b, bounds) else {
            continue;
        };
        let r = radius.ceil() as i64 + 1;
        let rect = PixelRect {
            x0: a.0.min(b.0).floor() as i64 - r,
            y0: a.1.min(b.1).floor() as i64 - r,
            x1: a.0.max(b.0).ceil() as i64 + r,
            y1: a.1.max(b.1).ceil() as i64 + r,
        };
        touched = Some(match touched {
            None => rect,
            Some(t) => PixelRect {
                x0: t.x0.min(rect.x0),
                y0: t.y0.min(rect.y0),
                x1: t.x1.max(rect.x1),
                y1: t.y1.max(rect.y1),
            },
        });
        stamp_segment(coverage, layout.plot, a, b, radius);
    }

    // Each covered pixel is blended once so translucent lines stay uniform,
    // then cleared for the next line.
    let Some(t) = touched else {
        return;
    };
    for y in t.y0.max(layout.plot.y0)..t.y1.min(layout.plot.y1) {
        for x in t.x0.max(layout.plot.x0)..t.x1.min(layout.plot.x1) {
            let Some(idx) = coverage.index(x, y) else {
                continue;
            };
            if coverage.mask[idx] {
                coverage.mask[idx] = false;
                blend(img, x, y, line.color, line.alpha);
            }
        }
    }
}

/// Clip segment `a`-`b` to `(x0, y0, x1, y1)` (Liang-Barsky).
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    (x0, y0, x1, y1): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, a.0 - x0), (dx, x1 - a.0), (-dy, a.1 - y0), (dy, y1 - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

fn stamp_segment(
    coverage: &mut Coverage,
    clip: PixelRect,
    a: (f64, f64),
    b: (f64, f64),
    radius: f64,
) {
    let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
    let r = radius.ceil() as i64;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let cx = a.0 + (b.0 - a.0) * t;
        let cy = a.1 + (b.1 - a.1) * t;
        for oy in -r..=r {
            for ox in -r..=r {
                let x = cx.floor() as i64 + ox;
                let y = cy.floor() as i64 + oy;
                let (ddx, ddy) = (x as f64 + 0.5 - cx, y as f64 + 0.5 - cy);
                if ddx * ddx + ddy * ddy > radius * radius || !clip.contains(x, y) {
                    continue;
                }
                if let Some(idx) = coverage.index(x, y) {
                    coverage.mask[idx] = true;
                }
            }
        }
    }
}

fn draw_frame(img: &mut RgbaImage, rect: PixelRect) {
    for x in rect.x0..rect.x1 {
        blend(img, x, rect.y0, FRAME, 1.0);
        blend(img, x, rect.y1 - 1, FRAME, 1.0);
    }
    for y in rect.y0..rect.y1 {
        blend(img, rect.x0, y, FRAME, 1.0);
        blend(img, rect.x1 - 1, y, FRAME, 1.0);
    }
}

fn draw_ticks(img: &mut RgbaImage, layout: &Layout) {
    let plot = layout.plot;
    for x in layout.x.ticks().into_iter().filter_map(|v| layout.x.to_px(v)) {
        let x = x.round() as i64;
        for d in 1..=TICK_LEN {
            blend(img, x, plot.y1 - 1 + d, FRAME, 1.0);
        }
    }
    for y in layout.y.ticks().into_iter().filter_map(|v| layout.y.to_px(v)) {
        let y = y.round() as i64;
        for d in 1..=TICK_LEN {
            blend(img, plot.x0 - d, y, FRAME, 1.0);
        }
    }
}

fn draw_grid(img: &mut RgbaImage, layout: &Layout) {
    let plot = layout.plot;
    for x in layout.x.ticks().into_iter().filter_map(|v| layout.x.to_px(v)) {
        let x = x.round() as i64;
        for y in plot.y0..plot.y1 {
            blend(img, x, y, GRID, 0.6);
        }
    }
    for y in layout.y.ticks().into_iter().filter_map(|v| layout.y.to_px(v)) {
        let y = y.round() as i64;
        for x in plot.x0..plot.x1 {
            blend(img, x, y, GRID, 0.6);
        }
    }
}

/// Legend swatches: one short horizontal stroke per labeled line.
fn draw_legend(img: &mut RgbaImage, layout: &Layout, ax: &Axes, px_per_point: f64) {
    let labeled: Vec<&LineSeries> = ax.labeled_lines().collect();
    if labeled.is_empty() {
        return;
    }
    let plot = layout.plot;
    let swatch_w = (plot.width() / 12).max(8);
    let row_h = (plot.height() / 20).max(6);
    let pad = 6;
    let box_w = swatch_w + 2 * pad;
    let box_h = row_h * labeled.len() as i64 + 2 * pad;

    let loc = ax.legend.as_ref().map(|l| l.loc).unwrap_or_default();
    let (bx, by) = match loc {
        LegendLoc::UpperLeft => (plot.x0 + pad, plot.y0 + pad),
        LegendLoc::LowerLeft => (plot.x0 + pad, plot.y1 - pad - box_h),
        LegendLoc::LowerRight => (plot.x1 - pad - box_w, plot.y1 - pad - box_h),
        LegendLoc::Best | LegendLoc::UpperRight => (plot.x1 - pad - box_w, plot.y0 + pad),
    };

    for y in by..by + box_h {
        for x in bx..bx + box_w {
            blend(img, x, y, Color::WHITE, 0.8);
        }
    }
    draw_frame(
        img,
        PixelRect {
            x0: bx,
            y0: by,
            x1: bx + box_w,
            y1: by + box_h,
        },
    );

    for (i, line) in labeled.iter().enumerate() {
        let cy = by + pad + row_h * i as i64 + row_h / 2;
        let thickness = (line.width * px_per_point).round().max(1.0) as i64;
        for dy in 0..thickness {
            for x in bx + pad..bx + pad + swatch_w {
                blend(img, x, cy - thickness / 2 + dy, line.color, line.alpha);
            }
        }
    }
}

fn blend(img: &mut RgbaImage, x: i64, y: i64, color: Color, alpha: f64) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let px = img.get_pixel_mut(x as u32, y as u32);
    let mix = |dst: u8, src: u8| (src as f64 * a + dst as f64 * (1.0 - a)).round() as u8;
    px.0 = [
        mix(px.0[0], color.r),
        mix(px.0[1], color.g),
        mix(px.0[2], color.b),
        255,
    ];
}
