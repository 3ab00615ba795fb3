//! Curve subdivision.
//!
//! Quadratic and cubic commands are split with de Casteljau's construction
//! (delegated to `lyon_geom`), so the two halves trace exactly the original
//! curve and meet at `curve.sample(t)`. Elliptical arcs cannot be shortened
//! without recomputing their flags and are reported as unsplittable.

use lyon_geom::{CubicBezierSegment, LineSegment, QuadraticBezierSegment};

use crate::error::SplitError;
use crate::{Command, Point};

/// A quadratic or cubic Bézier segment with an explicit start point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Quadratic(QuadraticBezierSegment<f64>),
    Cubic(CubicBezierSegment<f64>),
}

impl Curve {
    /// Build the curve a command draws when started at `from`.
    ///
    /// Returns `None` for commands that are not Bézier curves.
    pub fn from_command(from: Point, command: &Command) -> Option<Self> {
        match *command {
            Command::Quadratic { ctrl, to } => {
                Some(Self::Quadratic(QuadraticBezierSegment { from, ctrl, to }))
            }
            Command::Cubic { ctrl1, ctrl2, to } => Some(Self::Cubic(CubicBezierSegment {
                from,
                ctrl1,
                ctrl2,
                to,
            })),
            _ => None,
        }
    }

    /// The command drawing this curve from its start point.
    pub fn to_command(&self) -> Command {
        match *self {
            Self::Quadratic(seg) => Command::Quadratic {
                ctrl: seg.ctrl,
                to: seg.to,
            },
            Self::Cubic(seg) => Command::Cubic {
                ctrl1: seg.ctrl1,
                ctrl2: seg.ctrl2,
                to: seg.to,
            },
        }
    }

    pub fn start(&self) -> Point {
        match self {
            Self::Quadratic(seg) => seg.from,
            Self::Cubic(seg) => seg.from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Self::Quadratic(seg) => seg.to,
            Self::Cubic(seg) => seg.to,
        }
    }

    /// Evaluate the curve at parameter `t`.
    pub fn sample(&self, t: f64) -> Point {
        match self {
            Self::Quadratic(seg) => seg.sample(t),
            Self::Cubic(seg) => seg.sample(t),
        }
    }

    /// Split the curve at `t` into two curves of the same degree.
    pub fn split(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Quadratic(seg) => {
                let (left, right) = seg.split(t);
                (Self::Quadratic(left), Self::Quadratic(right))
            }
            Self::Cubic(seg) => {
                let (left, right) = seg.split(t);
                (Self::Cubic(left), Self::Cubic(right))
            }
        }
    }
}

/// Split `curve` at parameter `t`.
pub fn split(curve: &Curve, t: f64) -> (Curve, Curve) {
    curve.split(t)
}

/// Split a canonical command drawn from `from` at parameter `t`.
///
/// Lines are split linearly, curves with de Casteljau. The second command's
/// end point is the original end point, bit for bit.
pub fn split_command(
    from: Point,
    command: &Command,
    t: f64,
) -> Result<(Command, Command), SplitError> {
    if !(t > 0.0 && t < 1.0) {
        return Err(SplitError::OutOfRange(t));
    }

    match *command {
        Command::Line { to } => {
            let (left, _) = LineSegment { from, to }.split(t);
            Ok((Command::Line { to: left.to }, Command::Line { to }))
        }
        Command::Quadratic { .. } | Command::Cubic { .. } => {
            let Some(curve) = Curve::from_command(from, command) else {
                return Err(SplitError::Unsplittable(command.kind()));
            };
            let (left, right) = curve.split(t);
            Ok((left.to_command(), right.to_command()))
        }
        Command::Move { .. } | Command::Arc { .. } => {
            Err(SplitError::Unsplittable(command.kind()))
        }
    }
}

/// Break a command into `pieces` consecutive commands of equal parameter span.
///
/// The remaining tail is re-split at `1 / (pieces - i)` on each step, so every
/// piece covers the same share of the original parameter range.
pub fn split_even(
    from: Point,
    command: &Command,
    pieces: usize,
) -> Result<Vec<Command>, SplitError> {
    match pieces {
        0 => return Err(SplitError::ZeroPieces),
        1 => return Ok(vec![*command]),
        _ => {}
    }

    let mut out = Vec::with_capacity(pieces);
    let mut start = from;
    let mut tail = *command;
    for i in 0..pieces - 1 {
        let t = 1.0 / (pieces - i) as f64;
        let (left, right) = split_command(start, &tail, t)?;
        start = left.end();
        out.push(left);
        tail = right;
    }
    out.push(tail);
    Ok(out)
}

/// Exact degree elevation of a quadratic curve to a cubic one.
pub fn elevate_quadratic(from: Point, ctrl: Point, to: Point) -> Command {
    Command::Cubic {
        ctrl1: from.lerp(ctrl, 2.0 / 3.0),
        ctrl2: to.lerp(ctrl, 2.0 / 3.0),
        to,
    }
}
