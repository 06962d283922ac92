use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use specplot_core::{Figure, OutputSink, PlotError};

use crate::raster::rasterize_with_dpi;

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PlotError> {
    let mut png_bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| PlotError::Output(format!("failed to encode PNG: {e}")))?;
    Ok(png_bytes)
}

/// Output sink that saves figures as PNG files.
#[derive(Debug, Clone, PartialEq)]
pub struct PngSink {
    path: PathBuf,
    dpi: Option<f64>,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dpi: None,
        }
    }

    /// Rasterize at `dpi` instead of the figure's own resolution.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for PngSink {
    fn write(&self, figure: &Figure) -> Result<(), PlotError> {
        let image = rasterize_with_dpi(figure, self.dpi.unwrap_or(figure.dpi));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlotError::Output(format!(
                    "failed to create output directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        image
            .save_with_format(&self.path, ImageFormat::Png)
            .map_err(|e| {
                PlotError::Output(format!("failed to write {}: {e}", self.path.display()))
            })?;

        tracing::info!(
            path = %self.path.display(),
            width = image.width(),
            height = image.height(),
            "saved figure"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specplot_core::{FigureSize, LineStyle};

    #[test]
    fn writes_decodable_png_and_creates_dirs() {
        let dir = std::env::temp_dir().join("specplot-png-sink-test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("psd.png");

        let mut fig = Figure::new(FigureSize::new(2.0, 1.0));
        fig.axes
            .loglog(vec![1.0, 10.0], vec![1.0, 0.1], LineStyle::default());

        PngSink::new(&path).with_dpi(50.0).write(&fig).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 50));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn encode_png_has_signature() {
        let img = RgbaImage::new(2, 2);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
