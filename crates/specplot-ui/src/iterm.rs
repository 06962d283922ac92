//! iTerm2 inline image output.
//!
//! Writes a rasterized figure to the terminal using iTerm2's OSC 1337 escape
//! sequence. Works in iTerm2 and WezTerm.
//!
//! The escape sequence format is:
//! ```text
//! \x1b]1337;File=inline=1;size={bytes};preserveAspectRatio=1[;width={cells}]:{base64}\x07
//! ```

use std::io::{self, Write};
use std::sync::Mutex;

use specplot_core::{Figure, OutputSink, PlotError};

use crate::png::encode_png;
use crate::raster::rasterize;

/// Write PNG bytes as an inline image.
///
/// `width_cells` limits the displayed width in terminal columns; the height
/// follows from the image's aspect ratio.
pub fn write_inline_png(
    writer: &mut impl Write,
    png: &[u8],
    width_cells: Option<u16>,
) -> io::Result<()> {
    if png.is_empty() {
        return Ok(());
    }

    write!(
        writer,
        "\x1b]1337;File=inline=1;size={};preserveAspectRatio=1",
        png.len()
    )?;
    if let Some(cells) = width_cells {
        write!(writer, ";width={cells}")?;
    }
    write!(writer, ":{}\x07", base64_encode(png))?;
    writeln!(writer)?;
    writer.flush()
}

/// Output sink that shows figures inline in the terminal.
pub struct ItermSink {
    writer: Mutex<Box<dyn Write + Send>>,
    width_cells: Option<u16>,
}

impl ItermSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            width_cells: None,
        }
    }

    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn with_width(mut self, cells: u16) -> Self {
        self.width_cells = Some(cells);
        self
    }
}

impl OutputSink for ItermSink {
    fn write(&self, figure: &Figure) -> Result<(), PlotError> {
        let png = encode_png(&rasterize(figure))?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| PlotError::Output("terminal writer lock poisoned".into()))?;
        write_inline_png(&mut *writer, &png, self.width_cells)
            .map_err(|e| PlotError::Output(format!("failed to write inline image: {e}")))
    }
}

/// Base64-encode bytes using the standard alphabet.
fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);

        result.push(ALPHABET[(b0 >> 2) as usize] as char);
        result.push(ALPHABET[(((b0 & 0x03) << 4) | (b1 >> 4)) as usize] as char);
        result.push(match chunk.len() {
            1 => '=',
            _ => ALPHABET[(((b1 & 0x0f) << 2) | (b2 >> 6)) as usize] as char,
        });
        result.push(match chunk.len() {
            3 => ALPHABET[(b2 & 0x3f) as usize] as char,
            _ => '=',
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use specplot_core::FigureSize;

    /// Writer that shares its buffer so tests can inspect sink output.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn base64_encode_empty() {
        assert_eq!(base64_encode(&[]), "");
    }

    #[test]
    fn base64_encode_with_padding() {
        assert_eq!(base64_encode(b"Man"), "TWFu");
        assert_eq!(base64_encode(b"Ma"), "TWE=");
        assert_eq!(base64_encode(b"M"), "TQ==");
    }

    #[test]
    fn empty_png_writes_nothing() {
        let mut out = Vec::new();
        write_inline_png(&mut out, &[], Some(10)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn escape_sequence_is_framed() {
        let mut out = Vec::new();
        write_inline_png(&mut out, b"Man", Some(40)).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert_eq!(
            s,
            "\x1b]1337;File=inline=1;size=3;preserveAspectRatio=1;width=40:TWFu\x07\n"
        );
    }

    #[test]
    fn sink_writes_png_payload() {
        let buf = SharedBuf::default();
        let sink = ItermSink::new(buf.clone());
        let mut fig = Figure::new(FigureSize::new(1.0, 1.0));
        fig.dpi = 20.0;
        sink.write(&fig).unwrap();

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(out.starts_with("\x1b]1337;File=inline=1"));
        // PNG signature in base64
        assert!(out.contains(":iVBORw0KGgo"));
        assert!(out.ends_with("\x07\n"));
    }
}
