//! Path grammar reduction.
//!
//! Path data is lexed by [`svgtypes::PathParser`] into a typed segment
//! stream (absolute/relative flag preserved, implicit repetition already
//! expanded). The reducer below folds that stream into canonical
//! [`Command`]s, threading an explicit [`ParserState`] from one segment to
//! the next:
//!
//! - `H`/`V` become lines,
//! - `Z` becomes a line back to the start of the current subpath,
//! - `S`/`T` are expanded by reflecting the previous control point.

use lyon_geom::point;
use svgtypes::{PathParser, PathSegment};
use tracing::trace;

use crate::error::{PathError, Result};
use crate::{Command, Point};

/// Control point remembered for shorthand curve reflection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum LastControl {
    #[default]
    None,
    Quadratic(Point),
    Cubic(Point),
}

/// Reducer state carried between two path segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserState {
    current: Point,
    subpath_start: Point,
    last_control: LastControl,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            current: point(0.0, 0.0),
            subpath_start: point(0.0, 0.0),
            last_control: LastControl::None,
        }
    }
}

impl ParserState {
    /// Current pen position.
    pub fn current(&self) -> Point {
        self.current
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            point(x, y)
        } else {
            point(self.current.x + x, self.current.y + y)
        }
    }

    fn reflect(&self, control: Point) -> Point {
        point(
            2.0 * self.current.x - control.x,
            2.0 * self.current.y - control.y,
        )
    }

    fn reflected_cubic_control(&self) -> Point {
        match self.last_control {
            LastControl::Cubic(ctrl) => self.reflect(ctrl),
            _ => self.current,
        }
    }

    fn reflected_quadratic_control(&self) -> Point {
        match self.last_control {
            LastControl::Quadratic(ctrl) => self.reflect(ctrl),
            _ => self.current,
        }
    }

    fn advance(self, to: Point, last_control: LastControl) -> Self {
        Self {
            current: to,
            last_control,
            ..self
        }
    }

    /// Reduce one lexed segment, returning the next state and the canonical
    /// command it stands for.
    pub fn step(self, segment: PathSegment) -> (Self, Command) {
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                let next = Self {
                    current: to,
                    subpath_start: to,
                    last_control: LastControl::None,
                };
                (next, Command::Move { to })
            }
            PathSegment::LineTo { abs, x, y } => {
                let to = self.resolve(abs, x, y);
                (self.advance(to, LastControl::None), Command::Line { to })
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let to = if abs {
                    point(x, self.current.y)
                } else {
                    point(self.current.x + x, self.current.y)
                };
                (self.advance(to, LastControl::None), Command::Line { to })
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let to = if abs {
                    point(self.current.x, y)
                } else {
                    point(self.current.x, self.current.y + y)
                };
                (self.advance(to, LastControl::None), Command::Line { to })
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let ctrl1 = self.resolve(abs, x1, y1);
                let ctrl2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                (
                    self.advance(to, LastControl::Cubic(ctrl2)),
                    Command::Cubic { ctrl1, ctrl2, to },
                )
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = self.reflected_cubic_control();
                let ctrl2 = self.resolve(abs, x2, y2);
                let to = self.resolve(abs, x, y);
                (
                    self.advance(to, LastControl::Cubic(ctrl2)),
                    Command::Cubic { ctrl1, ctrl2, to },
                )
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = self.resolve(abs, x1, y1);
                let to = self.resolve(abs, x, y);
                (
                    self.advance(to, LastControl::Quadratic(ctrl)),
                    Command::Quadratic { ctrl, to },
                )
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = self.reflected_quadratic_control();
                let to = self.resolve(abs, x, y);
                (
                    self.advance(to, LastControl::Quadratic(ctrl)),
                    Command::Quadratic { ctrl, to },
                )
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let to = self.resolve(abs, x, y);
                (
                    self.advance(to, LastControl::None),
                    Command::Arc {
                        rx: rx.abs(),
                        ry: ry.abs(),
                        x_axis_rotation,
                        large_arc,
                        sweep,
                        to,
                    },
                )
            }
            PathSegment::ClosePath { .. } => {
                let to = self.subpath_start;
                (self.advance(to, LastControl::None), Command::Line { to })
            }
        }
    }
}

/// Parse a path description into canonical absolute commands.
///
/// Fails on the first malformed token; no partial output is returned.
pub fn parse_path(data: &str) -> Result<Vec<Command>> {
    let mut state = ParserState::default();
    let mut commands = Vec::new();

    for segment in PathParser::from(data) {
        let segment = segment.map_err(|err| PathError::Syntax(err.to_string()))?;
        let (next, command) = state.step(segment);
        if commands.is_empty() && !matches!(command, Command::Move { .. }) {
            return Err(PathError::MissingMoveTo(command.kind()));
        }
        commands.push(command);
        state = next;
    }

    trace!(commands = commands.len(), "parsed path data");
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::to_path_string;

    const EPSILON: f64 = 1e-9;

    fn assert_point_close(actual: Point, expected: Point) {
        let diff = actual.distance_to(expected);
        assert!(
            diff < EPSILON,
            "Expected {expected:?}, got {actual:?} (diff {diff})"
        );
    }

    #[test]
    fn test_relative_commands_become_absolute() {
        let commands = parse_path("m 10,10 l 5,0 v 5 h -5 z").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Move { to: point(10.0, 10.0) },
                Command::Line { to: point(15.0, 10.0) },
                Command::Line { to: point(15.0, 15.0) },
                Command::Line { to: point(10.0, 15.0) },
                Command::Line { to: point(10.0, 10.0) },
            ]
        );
    }

    #[test]
    fn test_close_path_resets_to_subpath_start() {
        let commands = parse_path("M0,0 L10,0 L10,10 Z m 20,0 l 5,5 z").unwrap();
        assert_eq!(commands.len(), 7);
        assert_eq!(commands[3], Command::Line { to: point(0.0, 0.0) });
        // The relative move is resolved against the closed subpath's start.
        assert_eq!(commands[4], Command::Move { to: point(20.0, 0.0) });
        assert_eq!(commands[6], Command::Line { to: point(20.0, 0.0) });
    }

    #[test]
    fn test_implicit_lines_after_move() {
        let commands = parse_path("M 0 0 10 0 10 10").unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[2], Command::Line { to: point(10.0, 10.0) });
    }

    #[test]
    fn test_smooth_cubic_reflection() {
        let commands = parse_path("M0,0 C0,1 1,1 2,0 S4,2 5,0").unwrap();
        match commands[2] {
            Command::Cubic { ctrl1, ctrl2, to } => {
                assert_point_close(ctrl1, point(3.0, -1.0));
                assert_point_close(ctrl2, point(4.0, 2.0));
                assert_point_close(to, point(5.0, 0.0));
            }
            other => panic!("Expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn test_smooth_cubic_without_previous_cubic() {
        let commands = parse_path("M0,0 Q1,1 2,0 S4,2 5,0").unwrap();
        match commands[2] {
            Command::Cubic { ctrl1, .. } => assert_point_close(ctrl1, point(2.0, 0.0)),
            other => panic!("Expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn test_smooth_quadratic_reflection() {
        let commands = parse_path("M0,0 Q1,1 2,0 T4,0 t2,0").unwrap();
        match commands[2] {
            Command::Quadratic { ctrl, to } => {
                assert_point_close(ctrl, point(3.0, -1.0));
                assert_point_close(to, point(4.0, 0.0));
            }
            other => panic!("Expected quadratic, got {other:?}"),
        }
        // Chained shorthand keeps reflecting the synthesized control point.
        match commands[3] {
            Command::Quadratic { ctrl, to } => {
                assert_point_close(ctrl, point(5.0, 1.0));
                assert_point_close(to, point(6.0, 0.0));
            }
            other => panic!("Expected quadratic, got {other:?}"),
        }
    }

    #[test]
    fn test_smooth_quadratic_after_line_uses_current_point() {
        let commands = parse_path("M0,0 L2,0 T4,0").unwrap();
        match commands[2] {
            Command::Quadratic { ctrl, .. } => assert_point_close(ctrl, point(2.0, 0.0)),
            other => panic!("Expected quadratic, got {other:?}"),
        }
    }

    #[test]
    fn test_relative_arc() {
        let commands = parse_path("M10,10 a5,5 0 0 1 10,0").unwrap();
        assert_eq!(
            commands[1],
            Command::Arc {
                rx: 5.0,
                ry: 5.0,
                x_axis_rotation: 0.0,
                large_arc: false,
                sweep: true,
                to: point(20.0, 10.0),
            }
        );
    }

    #[test]
    fn test_signed_and_exponent_numbers() {
        let commands = parse_path("M1e1,-2.5E0 L-.5-.5").unwrap();
        assert_eq!(commands[0], Command::Move { to: point(10.0, -2.5) });
        assert_eq!(commands[1], Command::Line { to: point(-0.5, -0.5) });
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = parse_path("M 0,0 X 1,1").unwrap_err();
        assert!(matches!(err, PathError::Syntax(_)), "got {err:?}");
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        assert!(parse_path("M 0,abc L 1,1").is_err());
    }

    #[test]
    fn test_path_must_start_with_move() {
        assert!(parse_path("L 1,1 L 2,2").is_err());
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(parse_path("").unwrap(), Vec::new());
    }

    #[test]
    fn test_serialized_path_parses_back() {
        let original = parse_path("M0,0 C0,1 1,1 2,0 S4,2 5,0 Q6,1 7,0 A3,2 15 1 0 9,9 Z").unwrap();
        let reparsed = parse_path(&to_path_string(&original)).unwrap();
        assert_eq!(reparsed, original);
    }
}
