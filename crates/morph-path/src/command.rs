//! Canonical drawing commands.
//!
//! Every path description is reduced to the five command kinds below, all
//! with absolute coordinates. Horizontal/vertical lines, shorthand curves and
//! close-path instructions never survive parsing.

use std::fmt;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::Point;

/// Tag of a [`Command`], used to compare commands position by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Move,
    Line,
    Quadratic,
    Cubic,
    Arc,
}

impl CommandKind {
    /// Single-letter path grammar name of the kind.
    pub fn letter(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Line => 'L',
            Self::Quadratic => 'Q',
            Self::Cubic => 'C',
            Self::Arc => 'A',
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Move => "move",
            Self::Line => "line",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Arc => "arc",
        };
        f.write_str(name)
    }
}

/// One drawing instruction with absolute coordinates.
///
/// The start point of a command is implicit: it is the end point of the
/// command before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move {
        to: Point,
    },
    Line {
        to: Point,
    },
    Quadratic {
        ctrl: Point,
        to: Point,
    },
    Cubic {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Arc {
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Move { .. } => CommandKind::Move,
            Self::Line { .. } => CommandKind::Line,
            Self::Quadratic { .. } => CommandKind::Quadratic,
            Self::Cubic { .. } => CommandKind::Cubic,
            Self::Arc { .. } => CommandKind::Arc,
        }
    }

    /// Terminal point of the command.
    pub fn end(&self) -> Point {
        match *self {
            Self::Move { to }
            | Self::Line { to }
            | Self::Quadratic { to, .. }
            | Self::Cubic { to, .. }
            | Self::Arc { to, .. } => to,
        }
    }

    /// Flat coordinate list in path grammar order.
    ///
    /// Arc flags are reported as `0.0` / `1.0`.
    pub fn coords(&self) -> Vec<f64> {
        match *self {
            Self::Move { to } | Self::Line { to } => vec![to.x, to.y],
            Self::Quadratic { ctrl, to } => vec![ctrl.x, ctrl.y, to.x, to.y],
            Self::Cubic { ctrl1, ctrl2, to } => {
                vec![ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y]
            }
            Self::Arc {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                to,
            } => vec![
                rx,
                ry,
                x_axis_rotation,
                flag(large_arc),
                flag(sweep),
                to.x,
                to.y,
            ],
        }
    }

    /// Boundary length contributed by this command when drawn from `from`.
    ///
    /// Lengths are straight endpoint distances; a move does not contribute.
    pub fn chord_length(&self, from: Point) -> f64 {
        match self {
            Self::Move { .. } => 0.0,
            _ => from.distance_to(self.end()),
        }
    }

    /// A command of the given kind that draws nothing when started at `at`.
    pub fn degenerate(kind: CommandKind, at: Point) -> Self {
        match kind {
            CommandKind::Move => Self::Move { to: at },
            CommandKind::Line => Self::Line { to: at },
            CommandKind::Quadratic => Self::Quadratic { ctrl: at, to: at },
            CommandKind::Cubic => Self::Cubic {
                ctrl1: at,
                ctrl2: at,
                to: at,
            },
            CommandKind::Arc => Self::Arc {
                rx: 0.0,
                ry: 0.0,
                x_axis_rotation: 0.0,
                large_arc: false,
                sweep: false,
                to: at,
            },
        }
    }

    /// A zero-curvature command of the given kind from `from` to `to`.
    ///
    /// Control points collapse onto the chord midpoint. A zero-radius arc is
    /// drawn as a straight line.
    pub fn straight(kind: CommandKind, from: Point, to: Point) -> Self {
        let mid = from.lerp(to, 0.5);
        match kind {
            CommandKind::Move => Self::Move { to },
            CommandKind::Line => Self::Line { to },
            CommandKind::Quadratic => Self::Quadratic { ctrl: mid, to },
            CommandKind::Cubic => Self::Cubic {
                ctrl1: mid,
                ctrl2: mid,
                to,
            },
            CommandKind::Arc => Self::Arc {
                rx: 0.0,
                ry: 0.0,
                x_axis_rotation: 0.0,
                large_arc: false,
                sweep: false,
                to,
            },
        }
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Move { to } => write!(f, "M{},{}", to.x, to.y),
            Self::Line { to } => write!(f, "L{},{}", to.x, to.y),
            Self::Quadratic { ctrl, to } => {
                write!(f, "Q{},{},{},{}", ctrl.x, ctrl.y, to.x, to.y)
            }
            Self::Cubic { ctrl1, ctrl2, to } => write!(
                f,
                "C{},{},{},{},{},{}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
            Self::Arc {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                to,
            } => write!(
                f,
                "A{},{},{},{},{},{},{}",
                rx,
                ry,
                x_axis_rotation,
                u8::from(large_arc),
                u8::from(sweep),
                to.x,
                to.y
            ),
        }
    }
}

/// Write a command sequence as a compact path description.
pub fn write_path<W: Write>(out: &mut W, commands: &[Command]) -> fmt::Result {
    for command in commands {
        write!(out, "{command}")?;
    }
    Ok(())
}

/// Serialize a command sequence back into a compact path description.
pub fn to_path_string(commands: &[Command]) -> String {
    let mut out = String::with_capacity(commands.len() * 16);
    // Writing into a String cannot fail.
    let _ = write_path(&mut out, commands);
    out
}

/// Sum of the chord lengths of a command sequence.
pub fn total_length(commands: &[Command]) -> f64 {
    let mut pen = match commands.first() {
        Some(first) => first.end(),
        None => return 0.0,
    };
    let mut length = 0.0;
    for command in &commands[1..] {
        length += command.chord_length(pen);
        pen = command.end();
    }
    length
}
