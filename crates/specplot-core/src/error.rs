use std::fmt;

/// Errors raised while preparing or exporting a plot.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    /// Two inputs that must line up have different lengths.
    ShapeMismatch {
        context: String,
        expected: usize,
        found: usize,
    },
    /// An input that needs at least one element was empty.
    EmptyInput(&'static str),
    /// Only one half of an optional argument pair was supplied.
    MissingOptionalPair {
        provided: &'static str,
        missing: &'static str,
    },
    /// The output sink failed to write the finished figure.
    Output(String),
}

impl PlotError {
    pub fn shape(context: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            found,
        }
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                context,
                expected,
                found,
            } => write!(f, "shape mismatch in {context}: expected {expected}, found {found}"),
            Self::EmptyInput(what) => write!(f, "{what} must not be empty"),
            Self::MissingOptionalPair { provided, missing } => {
                write!(f, "{provided} was supplied without {missing}")
            }
            Self::Output(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PlotError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_names_dimensions() {
        let err = PlotError::shape("series 2 values", 4, 3);
        assert_eq!(
            err.to_string(),
            "shape mismatch in series 2 values: expected 4, found 3"
        );
    }

    #[test]
    fn missing_pair_names_both_sides() {
        let err = PlotError::MissingOptionalPair {
            provided: "spectrum",
            missing: "spectrum_frequencies",
        };
        assert_eq!(
            err.to_string(),
            "spectrum was supplied without spectrum_frequencies"
        );
    }
}
