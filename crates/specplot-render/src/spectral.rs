//! Drawing routines for spectral statistics.
//!
//! Each `render_*` function validates its inputs, acquires a figure, and
//! records the drawing commands for one kind of plot. Shapes are checked
//! before anything is drawn, so a failed call never returns a half-drawn
//! figure.

use specplot_core::{
    figure::{Aspect, Extent, Figure, FigureSize, LineStyle},
    Color, Matrix, PlotError, PowerSpectra,
};

pub const POWER_SPECTRA_SIZE: FigureSize = FigureSize::new(6.0, 6.0);
pub const SCV_SIZE: FigureSize = FigureSize::new(5.0, 5.0);
pub const SCV_LINES_SIZE: FigureSize = FigureSize::new(8.0, 8.0);
pub const SCV_MATRIX_SIZE: FigureSize = FigureSize::new(10.0, 5.0);

const HISTOGRAM_WIDTH: f64 = 8.0;
const HISTOGRAM_HEIGHT_SCALE: f64 = 12.0;

const FREQ_LABEL: &str = "Frequency (Hz)";
const POWER_LABEL: &str = "Power (V^2/Hz)";
const SCV_LABEL: &str = "SCV";

/// Figure size for a spectral histogram with the given bin and frequency counts.
///
/// Height grows with the ratio of power bins to frequencies so cells keep a
/// comparable on-screen density across resolutions.
pub fn histogram_figure_size(n_power_bins: usize, n_freqs: usize) -> FigureSize {
    FigureSize::new(
        HISTOGRAM_WIDTH,
        HISTOGRAM_HEIGHT_SCALE * n_power_bins as f64 / n_freqs as f64,
    )
}

/// Plot one or more power spectra as log-log lines.
pub fn render_power_spectra(
    spectra: PowerSpectra,
    canvas: Option<Figure>,
) -> Result<Figure, PlotError> {
    let series = spectra.into_series()?;

    let mut fig = Figure::acquire(canvas, POWER_SPECTRA_SIZE);
    tracing::debug!(series = series.len(), "rendering power spectra");

    for s in series {
        let style = LineStyle::default().label(s.label).color(s.color);
        fig.axes.loglog(s.freqs, s.values, style);
    }

    fig.axes.set_xlabel(FREQ_LABEL);
    fig.axes.set_ylabel(POWER_LABEL);
    Ok(fig)
}

/// Plot the spectral coefficient of variation as a single log-log line.
pub fn render_scv(freqs: &[f64], scv: &[f64], canvas: Option<Figure>) -> Result<Figure, PlotError> {
    if scv.len() != freqs.len() {
        return Err(PlotError::shape("scv values", freqs.len(), scv.len()));
    }

    let mut fig = Figure::acquire(canvas, SCV_SIZE);
    tracing::debug!(points = freqs.len(), "rendering scv");

    fig.axes
        .loglog(freqs.to_vec(), scv.to_vec(), LineStyle::default());

    fig.axes.set_xlabel(FREQ_LABEL);
    fig.axes.set_ylabel(SCV_LABEL);
    Ok(fig)
}

/// Plot resampled SCV estimates as faint lines with their mean and the
/// unit reference line.
///
/// `scv_resampled` has one row per frequency and one column per repetition.
pub fn render_scv_resampled_lines(
    freqs: &[f64],
    scv_resampled: &Matrix,
    canvas: Option<Figure>,
) -> Result<Figure, PlotError> {
    validate_rows(scv_resampled, freqs, "scv_resampled rows")?;
    if scv_resampled.cols() == 0 {
        return Err(PlotError::EmptyInput("scv_resampled"));
    }

    let mut fig = Figure::acquire(canvas, SCV_LINES_SIZE);
    tracing::debug!(
        freqs = freqs.len(),
        repetitions = scv_resampled.cols(),
        "rendering resampled scv lines"
    );

    for col in 0..scv_resampled.cols() {
        let style = LineStyle::default().color(Some(Color::BLACK)).alpha(0.1);
        fig.axes
            .loglog(freqs.to_vec(), scv_resampled.column(col), style);
    }

    fig.axes.loglog(
        freqs.to_vec(),
        scv_resampled.row_means(),
        LineStyle::default().width(2.0),
    );

    // A stationary random process has SCV == 1 at every frequency.
    fig.axes
        .loglog(freqs.to_vec(), vec![1.0; freqs.len()], LineStyle::default());

    fig.axes.set_xlabel(FREQ_LABEL);
    fig.axes.set_ylabel(SCV_LABEL);
    Ok(fig)
}

/// Plot resampled SCV as a log10 time-frequency image.
///
/// Always draws on a new figure. The first frequency is placed at the top
/// of the image.
pub fn render_scv_resampled_matrix(
    freqs: &[f64],
    time_indices: &[f64],
    scv_resampled: &Matrix,
) -> Result<Figure, PlotError> {
    let (Some(&f_first), Some(&f_last)) = (freqs.first(), freqs.last()) else {
        return Err(PlotError::EmptyInput("frequencies"));
    };
    let (Some(&t_first), Some(&t_last)) = (time_indices.first(), time_indices.last()) else {
        return Err(PlotError::EmptyInput("time_indices"));
    };
    validate_rows(scv_resampled, freqs, "scv_resampled rows")?;

    let mut fig = Figure::new(SCV_MATRIX_SIZE);
    tracing::debug!(
        rows = scv_resampled.rows(),
        cols = scv_resampled.cols(),
        "rendering resampled scv matrix"
    );

    let extent = Extent {
        left: t_first,
        right: t_last,
        bottom: f_last,
        top: f_first,
    };
    fig.axes
        .imshow(scv_resampled.map(f64::log10), extent, Aspect::Auto);
    fig.axes.colorbar(SCV_LABEL);

    fig.axes.set_xlabel("Time (s)");
    fig.axes.set_ylabel(FREQ_LABEL);
    Ok(fig)
}

/// Plot a spectral histogram, optionally overlaying a power spectrum.
///
/// `histogram` has one row per power bin and one column per frequency;
/// `power_bins` may hold either the bin centres or the bin edges. The
/// overlay needs both `spectrum_freqs` and `spectrum`; only points inside
/// `[freqs[0], freqs[-1]]` are drawn.
pub fn render_spectral_histogram(
    freqs: &[f64],
    power_bins: &[f64],
    histogram: &Matrix,
    spectrum_freqs: Option<&[f64]>,
    spectrum: Option<&[f64]>,
) -> Result<Figure, PlotError> {
    let (Some(&f_first), Some(&f_last)) = (freqs.first(), freqs.last()) else {
        return Err(PlotError::EmptyInput("frequencies"));
    };
    let (Some(&pb_first), Some(&pb_last)) = (power_bins.first(), power_bins.last()) else {
        return Err(PlotError::EmptyInput("power_bins"));
    };
    if histogram.cols() != freqs.len() {
        return Err(PlotError::shape("histogram columns", freqs.len(), histogram.cols()));
    }
    let rows = histogram.rows();
    if rows != power_bins.len() && rows + 1 != power_bins.len() {
        return Err(PlotError::shape("histogram rows", power_bins.len(), rows));
    }

    let overlay = match (spectrum_freqs, spectrum) {
        (Some(sf), Some(sp)) => {
            if sp.len() != sf.len() {
                return Err(PlotError::shape("spectrum values", sf.len(), sp.len()));
            }
            Some(overlay_points(sf, sp, f_first, f_last))
        }
        (None, None) => None,
        (Some(_), None) => {
            return Err(PlotError::MissingOptionalPair {
                provided: "spectrum_frequencies",
                missing: "spectrum",
            })
        }
        (None, Some(_)) => {
            return Err(PlotError::MissingOptionalPair {
                provided: "spectrum",
                missing: "spectrum_frequencies",
            })
        }
    };

    let mut fig = Figure::new(histogram_figure_size(power_bins.len(), freqs.len()));
    tracing::debug!(
        power_bins = power_bins.len(),
        freqs = freqs.len(),
        height = fig.size.height,
        "rendering spectral histogram"
    );

    let extent = Extent {
        left: f_first,
        right: f_last,
        bottom: pb_first,
        top: pb_last,
    };
    fig.axes.imshow(histogram.clone(), extent, Aspect::Auto);
    fig.axes.set_xlabel(FREQ_LABEL);
    fig.axes.set_ylabel("Log10 Power");
    fig.axes.colorbar("Probability");

    if let Some((xs, ys)) = overlay {
        let style = LineStyle::default().color(Some(Color::WHITE)).alpha(0.8);
        fig.axes.plot(xs, ys, style);
    }

    Ok(fig)
}

/// Keep spectrum points whose frequency lies in `[lo, hi]`, as `(f, log10(p))`.
fn overlay_points(freqs: &[f64], spectrum: &[f64], lo: f64, hi: f64) -> (Vec<f64>, Vec<f64>) {
    freqs
        .iter()
        .zip(spectrum)
        .filter(|(f, _)| **f >= lo && **f <= hi)
        .map(|(f, p)| (*f, p.log10()))
        .unzip()
}

fn validate_rows(matrix: &Matrix, freqs: &[f64], context: &str) -> Result<(), PlotError> {
    if matrix.rows() != freqs.len() {
        return Err(PlotError::shape(context, freqs.len(), matrix.rows()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use specplot_core::{color::DEFAULT_CYCLE, Colors, Labels, Scale};

    const F: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

    #[test]
    fn single_spectrum_draws_one_loglog_line() {
        let fig =
            render_power_spectra(PowerSpectra::single(F.to_vec(), vec![10.0, 5.0, 2.0, 1.0]), None)
                .unwrap();

        assert_eq!(fig.size, POWER_SPECTRA_SIZE);
        assert_eq!(fig.axes.lines.len(), 1);
        let line = &fig.axes.lines[0];
        assert_eq!(line.xs, F.to_vec());
        assert_eq!(line.ys, vec![10.0, 5.0, 2.0, 1.0]);
        assert_eq!(line.label, None);
        assert_eq!((fig.axes.xscale, fig.axes.yscale), (Scale::Log, Scale::Log));
        assert_eq!(fig.axes.xlabel.as_deref(), Some("Frequency (Hz)"));
        assert_eq!(fig.axes.ylabel.as_deref(), Some("Power (V^2/Hz)"));
        assert!(fig.axes.legend.is_none());
    }

    #[test]
    fn shared_frequencies_are_used_for_every_line() {
        let powers = vec![vec![1.0; 4], vec![2.0; 4], vec![3.0; 4]];
        let fig = render_power_spectra(PowerSpectra::shared(F.to_vec(), powers), None).unwrap();
        assert_eq!(fig.axes.lines.len(), 3);
        assert!(fig.axes.lines.iter().all(|l| l.xs == F.to_vec()));
    }

    #[test]
    fn labels_align_positionally() {
        let powers = vec![vec![1.0; 4], vec![2.0; 4]];
        let spectra = PowerSpectra::shared(F.to_vec(), powers)
            .with_labels(Labels::Many(vec!["rest".into(), "task".into()]));
        let fig = render_power_spectra(spectra, None).unwrap();
        let labels: Vec<_> = fig.axes.lines.iter().map(|l| l.label.clone()).collect();
        assert_eq!(labels, vec![Some("rest".into()), Some("task".into())]);
    }

    #[test]
    fn single_label_is_shared() {
        let powers = vec![vec![1.0; 4], vec![2.0; 4], vec![3.0; 4]];
        let spectra = PowerSpectra::shared(F.to_vec(), powers).with_labels(Labels::One("x".into()));
        let fig = render_power_spectra(spectra, None).unwrap();
        assert!(fig
            .axes
            .lines
            .iter()
            .all(|l| l.label.as_deref() == Some("x")));
    }

    #[test]
    fn colors_cycle_past_the_end_of_the_list() {
        let powers = vec![vec![1.0; 4]; 5];
        let red = Color::rgb(255, 0, 0);
        let spectra = PowerSpectra::shared(F.to_vec(), powers)
            .with_colors(Colors::Many(vec![Color::BLACK, red]));
        let fig = render_power_spectra(spectra, None).unwrap();
        let colors: Vec<Color> = fig.axes.lines.iter().map(|l| l.color).collect();
        assert_eq!(colors, vec![Color::BLACK, red, Color::BLACK, red, Color::BLACK]);
    }

    #[test]
    fn default_colors_come_from_the_cycle() {
        let powers = vec![vec![1.0; 4]; 2];
        let fig = render_power_spectra(PowerSpectra::shared(F.to_vec(), powers), None).unwrap();
        assert_eq!(fig.axes.lines[0].color, DEFAULT_CYCLE[0]);
        assert_eq!(fig.axes.lines[1].color, DEFAULT_CYCLE[1]);
    }

    #[test]
    fn existing_canvas_is_reused() {
        let mut canvas = Figure::new(FigureSize::new(3.0, 3.0));
        canvas.axes.title = Some("mine".into());
        let fig = render_scv(&F, &[1.0; 4], Some(canvas)).unwrap();
        assert_eq!(fig.size, FigureSize::new(3.0, 3.0));
        assert_eq!(fig.axes.title.as_deref(), Some("mine"));
        assert_eq!(fig.axes.ylabel.as_deref(), Some("SCV"));
    }

    #[test]
    fn scv_length_mismatch_is_reported() {
        let err = render_scv(&F, &[1.0; 3], None).unwrap_err();
        assert_eq!(err, PlotError::shape("scv values", 4, 3));
    }

    #[test]
    fn resampled_lines_of_ones_coincide() {
        let scv_rs = Matrix::filled(4, 3, 1.0);
        let fig = render_scv_resampled_lines(&F, &scv_rs, None).unwrap();

        assert_eq!(fig.size, SCV_LINES_SIZE);
        assert_eq!(fig.axes.lines.len(), 5);

        let (faint, rest) = fig.axes.lines.split_at(3);
        for line in faint {
            assert_eq!(line.color, Color::BLACK);
            assert_eq!(line.alpha, 0.1);
            assert_eq!(line.ys, vec![1.0; 4]);
        }
        let (mean, reference) = (&rest[0], &rest[1]);
        assert_eq!(mean.width, 2.0);
        assert_eq!(mean.ys, vec![1.0; 4]);
        assert_eq!(reference.ys, vec![1.0; 4]);
        assert_eq!(fig.axes.xlabel.as_deref(), Some("Frequency (Hz)"));
        assert_eq!(fig.axes.ylabel.as_deref(), Some("SCV"));
    }

    #[test]
    fn resampled_lines_mean_is_row_wise() {
        let scv_rs = Matrix::from_rows(vec![vec![1.0, 3.0], vec![2.0, 4.0]]).unwrap();
        let fig = render_scv_resampled_lines(&[1.0, 2.0], &scv_rs, None).unwrap();
        assert_eq!(fig.axes.lines[2].ys, vec![2.0, 3.0]);
    }

    #[test]
    fn resampled_lines_reject_row_mismatch() {
        let err = render_scv_resampled_lines(&F, &Matrix::filled(3, 2, 1.0), None).unwrap_err();
        assert_eq!(err, PlotError::shape("scv_resampled rows", 4, 3));
    }

    #[test]
    fn matrix_places_first_frequency_on_top() {
        let t = [0.0, 1.0, 2.0];
        let fig = render_scv_resampled_matrix(&F, &t, &Matrix::filled(4, 3, 10.0)).unwrap();

        assert_eq!(fig.size, SCV_MATRIX_SIZE);
        let image = &fig.axes.images[0];
        assert_eq!(image.extent.top, 1.0);
        assert_eq!(image.extent.bottom, 8.0);
        assert_eq!((image.extent.left, image.extent.right), (0.0, 2.0));
        assert_eq!(image.aspect, Aspect::Auto);
        assert_eq!(image.data.get(0, 0), Some(1.0));
        assert_eq!(fig.axes.colorbar.as_ref().unwrap().label, "SCV");
        assert_eq!(fig.axes.xlabel.as_deref(), Some("Time (s)"));
        assert_eq!(fig.axes.ylabel.as_deref(), Some("Frequency (Hz)"));
    }

    #[test]
    fn matrix_requires_time_indices() {
        let err = render_scv_resampled_matrix(&F, &[], &Matrix::filled(4, 1, 1.0)).unwrap_err();
        assert_eq!(err, PlotError::EmptyInput("time_indices"));
    }

    #[test]
    fn histogram_height_scales_with_bin_count() {
        let freqs: Vec<f64> = (1..=10).map(f64::from).collect();
        let bins_20: Vec<f64> = (0..20).map(f64::from).collect();
        let bins_40: Vec<f64> = (0..40).map(f64::from).collect();

        let a = render_spectral_histogram(&freqs, &bins_20, &Matrix::filled(20, 10, 0.1), None, None)
            .unwrap();
        let b = render_spectral_histogram(&freqs, &bins_40, &Matrix::filled(40, 10, 0.1), None, None)
            .unwrap();

        assert_eq!(a.size.width, b.size.width);
        assert_eq!(a.size.height, 24.0);
        assert_eq!(b.size.height, 2.0 * a.size.height);
    }

    #[test]
    fn histogram_extent_and_labels() {
        let fig = render_spectral_histogram(
            &F,
            &[-2.0, -1.0, 0.0],
            &Matrix::filled(2, 4, 0.5),
            None,
            None,
        )
        .unwrap();
        let image = &fig.axes.images[0];
        assert_eq!(
            image.extent,
            Extent {
                left: 1.0,
                right: 8.0,
                bottom: -2.0,
                top: 0.0
            }
        );
        assert_eq!(fig.axes.ylabel.as_deref(), Some("Log10 Power"));
        assert_eq!(fig.axes.colorbar.as_ref().unwrap().label, "Probability");
        assert!(fig.axes.lines.is_empty());
    }

    #[test]
    fn histogram_overlay_keeps_inclusive_range() {
        let sf = [0.5, 1.0, 3.0, 8.0, 9.0];
        let sp = [1.0, 10.0, 100.0, 1000.0, 1.0];
        let fig = render_spectral_histogram(
            &F,
            &[0.0, 1.0],
            &Matrix::filled(2, 4, 0.5),
            Some(&sf),
            Some(&sp),
        )
        .unwrap();

        let overlay = &fig.axes.lines[0];
        assert_eq!(overlay.xs, vec![1.0, 3.0, 8.0]);
        for (y, expected) in overlay.ys.iter().zip([1.0, 2.0, 3.0]) {
            assert!((y - expected).abs() < 1e-12);
        }
        assert_eq!(overlay.color, Color::WHITE);
        assert_eq!(overlay.alpha, 0.8);
    }

    #[test]
    fn histogram_overlay_needs_both_halves() {
        let hist = Matrix::filled(2, 4, 0.5);
        let err = render_spectral_histogram(&F, &[0.0, 1.0], &hist, None, Some(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            PlotError::MissingOptionalPair {
                provided: "spectrum",
                missing: "spectrum_frequencies"
            }
        );
    }

    #[test]
    fn histogram_rejects_wrong_column_count() {
        let err = render_spectral_histogram(&F, &[0.0, 1.0], &Matrix::filled(2, 3, 0.5), None, None)
            .unwrap_err();
        assert_eq!(err, PlotError::shape("histogram columns", 4, 3));
    }

    #[test]
    fn histogram_rejects_wrong_row_count() {
        let err = render_spectral_histogram(&F, &[0.0, 1.0], &Matrix::filled(5, 4, 0.5), None, None)
            .unwrap_err();
        assert_eq!(err, PlotError::shape("histogram rows", 2, 5));
    }
}
