use crate::error::PlotError;
use crate::figure::Figure;

/// Cosmetic post-processing applied after a renderer has drawn its data.
///
/// Renderers set fixed axis labels as defaults; an applier may override them
/// along with titles, limits, fonts and legend placement.
pub trait StyleApplier: Send + Sync {
    fn apply(&self, figure: &mut Figure);
}

/// Destination for a finished figure (file, terminal, stream).
pub trait OutputSink: Send + Sync {
    fn write(&self, figure: &Figure) -> Result<(), PlotError>;
}

impl<F> StyleApplier for F
where
    F: Fn(&mut Figure) + Send + Sync,
{
    fn apply(&self, figure: &mut Figure) {
        self(figure)
    }
}
