//! Error types for path handling.

use thiserror::Error;

use crate::CommandKind;

/// Result type for path operations.
pub type Result<T> = std::result::Result<T, PathError>;

/// Errors that can occur while reading a path description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// The lexer rejected the input (bad number, unknown command letter, ...).
    #[error("invalid path data: {0}")]
    Syntax(String),

    /// Path data must open with a move command.
    #[error("path data must start with a move command, found {0}")]
    MissingMoveTo(CommandKind),
}

/// Errors raised when a command cannot be subdivided.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SplitError {
    /// Moves and elliptical arcs cannot be split into shorter commands.
    #[error("{0} commands cannot be split")]
    Unsplittable(CommandKind),

    /// Split parameter outside the open interval (0, 1).
    #[error("split parameter {0} is outside (0, 1)")]
    OutOfRange(f64),

    /// A command cannot be split into zero pieces.
    #[error("cannot split a command into zero pieces")]
    ZeroPieces,
}
