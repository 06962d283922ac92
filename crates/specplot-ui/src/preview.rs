//! Terminal preview of a rasterized figure.
//!
//! Each terminal cell shows two vertically stacked pixels via the upper
//! half-block character (`▀`), downsampled from the raster with
//! nearest-neighbour sampling. The surrounding block carries the title and
//! axis labels, and the last inner row lists the legend.

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TermColor, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use specplot_core::{Color, Figure};

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb(c.r, c.g, c.b)
}

/// Truncate `s` so it occupies at most `max_width` terminal columns.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(ch);
    }
    out
}

/// Title line for the preview block.
fn block_title(figure: &Figure) -> String {
    let ax = &figure.axes;
    match (&ax.title, &ax.ylabel) {
        (Some(title), _) => title.clone(),
        (None, Some(ylabel)) => ylabel.clone(),
        (None, None) => "figure".into(),
    }
}

/// Legend spans, each entry no wider than `max_label` columns.
fn legend_line(figure: &Figure, max_label: usize) -> Option<Line<'static>> {
    let mut spans = Vec::new();
    for line in figure.axes.labeled_lines() {
        let label = line.label.as_deref().unwrap_or_default();
        spans.push(Span::styled("■ ", Style::default().fg(term_color(line.color))));
        spans.push(Span::raw(truncate_to_width(label, max_label)));
        spans.push(Span::raw("  "));
    }
    if let Some(bar) = &figure.axes.colorbar {
        let lo = bar.colormap.sample(0.0);
        let hi = bar.colormap.sample(1.0);
        spans.push(Span::styled("▄", Style::default().fg(term_color(lo))));
        spans.push(Span::styled("▄ ", Style::default().fg(term_color(hi))));
        spans.push(Span::raw(format!(
            "{} [{:.3}, {:.3}]",
            truncate_to_width(&bar.label, max_label),
            bar.range.0,
            bar.range.1
        )));
    }
    (!spans.is_empty()).then(|| Line::from(spans))
}

/// Render `figure` (already rasterized as `image`) into `area` of `buf`.
pub fn render_preview(buf: &mut Buffer, area: Rect, figure: &Figure, image: &RgbaImage) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(block_title(figure));
    if let Some(xlabel) = &figure.axes.xlabel {
        block = block.title_bottom(Line::from(xlabel.clone()).centered());
    }
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut plot_area = inner;
    let max_label = (inner.width as usize / 3).max(4);
    if let Some(legend) = legend_line(figure, max_label) {
        if inner.height > 1 {
            plot_area.height -= 1;
            let legend_area = Rect::new(inner.x, inner.y + plot_area.height, inner.width, 1);
            Paragraph::new(legend).render(legend_area, buf);
        }
    }

    render_half_blocks(buf, plot_area, image);
}

fn render_half_blocks(buf: &mut Buffer, area: Rect, image: &RgbaImage) {
    let (src_width, src_height) = image.dimensions();
    if area.width == 0 || area.height == 0 || src_width == 0 || src_height == 0 {
        return;
    }

    let cell_w = area.width as u32;
    let cell_h = area.height as u32;
    let pixel_h = cell_h * 2;

    for cy in 0..cell_h {
        for cx in 0..cell_w {
            let px = (cx * src_width) / cell_w;
            let top_py = (cy * 2 * src_height) / pixel_h;
            let bot_py = ((cy * 2 + 1) * src_height) / pixel_h;

            let top = image.get_pixel(px, top_py).0;
            let bot = image.get_pixel(px, bot_py).0;

            let x = area.x + cx as u16;
            let y = area.y + cy as u16;
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char('▀');
                cell.set_fg(TermColor::Rgb(top[0], top[1], top[2]));
                cell.set_bg(TermColor::Rgb(bot[0], bot[1], bot[2]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use specplot_core::{FigureSize, LineStyle};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("alpha", 3), "alp");
        assert_eq!(truncate_to_width("日本語", 4), "日本");
        assert_eq!(truncate_to_width("ok", 10), "ok");
    }

    #[test]
    fn zero_area_is_noop() {
        let fig = Figure::new(FigureSize::new(1.0, 1.0));
        let img = RgbaImage::new(4, 4);
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 5));
        let before = buf.clone();
        render_preview(&mut buf, Rect::new(0, 0, 0, 0), &fig, &img);
        assert_eq!(buf, before);
    }

    #[test]
    fn half_blocks_carry_top_and_bottom_pixels() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 255, 255]));

        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 1));
        render_half_blocks(&mut buf, Rect::new(0, 0, 2, 1), &img);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, TermColor::Rgb(255, 0, 0));
        assert_eq!(cell.bg, TermColor::Rgb(0, 0, 255));
    }

    #[test]
    fn block_shows_labels_and_legend() {
        let mut fig = Figure::new(FigureSize::new(2.0, 2.0));
        fig.axes.loglog(
            vec![1.0, 10.0],
            vec![1.0, 10.0],
            LineStyle::default().label(Some("rest".into())),
        );
        fig.axes.set_xlabel("Hz");
        fig.axes.set_ylabel("Power");
        let img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));

        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        render_preview(&mut buf, area, &fig, &img);

        assert!(row_text(&buf, 0).contains("Power"));
        assert!(row_text(&buf, 7).contains("Hz"));
        assert!(row_text(&buf, 6).contains("■ rest"));
        assert_eq!(buf[(1, 1)].symbol(), "▀");
    }
}
