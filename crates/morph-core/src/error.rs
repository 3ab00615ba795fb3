//! Error and diagnostic types for shape morphing.

use morph_path::{CommandKind, PathError};
use thiserror::Error;

/// Result type for morphing operations.
pub type Result<T> = std::result::Result<T, MorphError>;

/// Fatal errors raised while building an interpolator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorphError {
    /// One of the path descriptions could not be parsed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// An arc had to be split or degraded and strict arc handling is on.
    #[error("unsupported arc alignment: {0}")]
    UnsupportedArc(Diagnostic),

    /// Circle descriptor with a negative or non-finite field.
    #[error("invalid circle (x: {x}, y: {y}, r: {r})")]
    InvalidCircle { x: f64, y: f64, r: f64 },

    /// Fan-out called with shape lists of different lengths.
    #[error("cannot pair {from} source shapes with {to} target shapes")]
    LengthMismatch { from: usize, to: usize },
}

/// Non-fatal problems met while aligning two shapes.
///
/// Positions refer to the aligned command sequences of the whole shape.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    #[error("arc at position {index} cannot be split and was kept whole")]
    ArcSplitUnsupported { index: usize },

    #[error("arc at position {index} paired with a {other} command was drawn straight")]
    ArcDegraded { index: usize, other: CommandKind },

    #[error("{padded} missing subpaths were replaced by zero-radius circles")]
    SegmentsPadded { padded: usize },
}

impl Diagnostic {
    /// Whether the diagnostic comes from arc handling.
    pub fn is_arc(&self) -> bool {
        matches!(
            self,
            Self::ArcSplitUnsupported { .. } | Self::ArcDegraded { .. }
        )
    }

    /// The same diagnostic with its position moved by `offset`.
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Self::ArcSplitUnsupported { index } => Self::ArcSplitUnsupported {
                index: index + offset,
            },
            Self::ArcDegraded { index, other } => Self::ArcDegraded {
                index: index + offset,
                other,
            },
            padded @ Self::SegmentsPadded { .. } => padded,
        }
    }
}
