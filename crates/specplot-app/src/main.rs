use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};

use specplot_config::PlotConfig;
use specplot_core::{logging, Figure, OutputSink, PlotError};
use specplot_render::SpectralRenderer;
use specplot_ui::{preview::render_preview, rasterize, ItermSink, PngSink};

mod args;
mod request;

use args::Args;
use request::PlotRequest;

/// Terminal rows used by the inline preview.
const PREVIEW_ROWS: u16 = 24;

/// Sends each figure to every configured sink in order, stopping at the
/// first failure.
struct FanOut(Vec<Box<dyn OutputSink>>);

impl OutputSink for FanOut {
    fn write(&self, figure: &Figure) -> Result<(), PlotError> {
        self.0.iter().try_for_each(|sink| sink.write(figure))
    }
}

fn build_renderer(args: &Args, config: PlotConfig) -> SpectralRenderer {
    let mut sinks: Vec<Box<dyn OutputSink>> = Vec::new();

    let dpi = config.export.as_ref().map(|e| e.dpi);
    let out = args
        .out
        .clone()
        .or_else(|| config.export.as_ref().map(|e| e.resolve_path()));
    if let Some(path) = out {
        let sink = PngSink::new(path);
        sinks.push(Box::new(match dpi {
            Some(dpi) => sink.with_dpi(dpi),
            None => sink,
        }));
    }
    if args.inline {
        sinks.push(Box::new(ItermSink::stdout()));
    }

    let renderer = SpectralRenderer::new().with_style(config.style);
    if sinks.is_empty() {
        renderer
    } else {
        renderer.with_sink(FanOut(sinks))
    }
}

fn show_preview(figure: &Figure) -> Result<()> {
    let image = rasterize(figure);
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(PREVIEW_ROWS),
        },
    )
    .context("failed to open terminal for preview")?;
    terminal.draw(|f| {
        let area = f.area();
        render_preview(f.buffer_mut(), area, figure, &image);
    })?;
    println!();
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PlotConfig::from_path(path)?,
        None => PlotConfig::default(),
    };
    let request = PlotRequest::from_path(&args.request)?;
    let kind = request.kind();
    tracing::info!(kind, request = %args.request.display(), "rendering plot request");

    let renderer = build_renderer(&args, config);
    let figure = request
        .render(&renderer)
        .with_context(|| format!("failed to render {kind}"))?;

    if args.preview {
        show_preview(&figure)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use specplot_config::ExportConfig;

    #[test]
    fn out_flag_overrides_export_table() {
        let dir = std::env::temp_dir().join("specplot-app-out-test");
        let _ = std::fs::remove_dir_all(&dir);
        let out = dir.join("flag.png");

        let mut export = ExportConfig::new("from_config");
        export.file_path = Some(dir.clone());
        export.dpi = 20.0;
        let config = PlotConfig {
            export: Some(export),
            ..PlotConfig::default()
        };
        let args = Args {
            request: "unused.json".into(),
            out: Some(out.clone()),
            ..Args::default()
        };

        let renderer = build_renderer(&args, config);
        let req = PlotRequest::from_json_str(r#"{"kind": "scv", "freqs": [1, 2, 4], "scv": [1.0, 0.9, 1.1]}"#)
            .unwrap();
        req.render(&renderer).unwrap();

        assert!(out.exists());
        assert!(!dir.join("from_config.png").exists());
        let decoded = image::open(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 100));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn no_sink_still_renders() {
        let renderer = build_renderer(&Args::default(), PlotConfig::default());
        let req = PlotRequest::from_json_str(
            r#"{"kind": "scv_resampled_matrix", "freqs": [1, 2], "time_indices": [0, 1, 2], "scv_resampled": [[1, 2, 3], [1, 1, 1]]}"#,
        )
        .unwrap();
        let fig = req.render(&renderer).unwrap();
        assert_eq!(fig.axes.images.len(), 1);
    }
}
