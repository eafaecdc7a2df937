//! Error kinds raised by plotting calls.

use crate::mesh::MeshError;

/// Errors that can occur while building or manipulating figures and plots
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlotError {
    /// An array argument has a shape the broadcasting rules do not accept
    #[error("shape not understood: {what} has shape {shape:?}, expected {expected}")]
    ShapeMismatch {
        what: String,
        shape: Vec<usize>,
        expected: String,
    },

    #[error("color not recognized: {0:?}")]
    UnknownColor(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("no current figure: auto_figure is off and no figure was given")]
    NoCurrentFigure,

    #[error("figure '{0}' has been closed")]
    FigureClosed(String),

    /// A capability (GUI, display, ...) was requested but is not available
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("plot has been removed from its figure")]
    PlotRemoved,

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl PlotError {
    /// Shorthand for a [`PlotError::ShapeMismatch`].
    pub fn shape(what: impl Into<String>, shape: &[usize], expected: impl Into<String>) -> Self {
        PlotError::ShapeMismatch {
            what: what.into(),
            shape: shape.to_vec(),
            expected: expected.into(),
        }
    }
}

impl From<std::io::Error> for PlotError {
    fn from(e: std::io::Error) -> Self {
        PlotError::Io(e.to_string())
    }
}

/// Result type for plotting operations
pub type PlotResult<T> = Result<T, PlotError>;
