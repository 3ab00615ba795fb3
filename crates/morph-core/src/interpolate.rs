//! Interpolation of path geometry.
//!
//! Aligned command sequences are interpolated position by position. Both
//! commands at a position must have the same kind; arc flags cannot be
//! blended and switch to the target's flags halfway.

use morph_path::{Command, Point};

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    ///
    /// When t = 0.0, returns self.
    /// When t = 1.0, returns to.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

impl Interpolate for Command {
    /// Both commands must be of the same kind. If they differ, returns self unchanged.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (*self, *to) {
            (Self::Move { to: a }, Self::Move { to: b }) => Self::Move {
                to: a.interpolate(&b, t),
            },
            (Self::Line { to: a }, Self::Line { to: b }) => Self::Line {
                to: a.interpolate(&b, t),
            },
            (
                Self::Quadratic { ctrl: c, to: a },
                Self::Quadratic { ctrl: d, to: b },
            ) => Self::Quadratic {
                ctrl: c.interpolate(&d, t),
                to: a.interpolate(&b, t),
            },
            (
                Self::Cubic {
                    ctrl1: c1,
                    ctrl2: c2,
                    to: a,
                },
                Self::Cubic {
                    ctrl1: d1,
                    ctrl2: d2,
                    to: b,
                },
            ) => Self::Cubic {
                ctrl1: c1.interpolate(&d1, t),
                ctrl2: c2.interpolate(&d2, t),
                to: a.interpolate(&b, t),
            },
            (
                Self::Arc {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    to: a,
                },
                Self::Arc {
                    rx: rx2,
                    ry: ry2,
                    x_axis_rotation: rotation2,
                    large_arc: large_arc2,
                    sweep: sweep2,
                    to: b,
                },
            ) => {
                let first_half = t < 0.5;
                Self::Arc {
                    rx: rx.interpolate(&rx2, t),
                    ry: ry.interpolate(&ry2, t),
                    x_axis_rotation: x_axis_rotation.interpolate(&rotation2, t),
                    large_arc: if first_half { large_arc } else { large_arc2 },
                    sweep: if first_half { sweep } else { sweep2 },
                    to: a.interpolate(&b, t),
                }
            }
            // Kind mismatch - return self unchanged
            _ => *self,
        }
    }
}

/// Interpolate two aligned command sequences.
pub fn interpolate_commands(from: &[Command], to: &[Command], t: f64) -> Vec<Command> {
    from.iter()
        .zip(to)
        .map(|(from, to)| from.interpolate(to, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon_geom::point;

    const EPSILON: f64 = 0.0001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_f64_interpolation() {
        let from = -50.0_f64;
        let to = 50.0_f64;

        assert!(approx_eq(from.interpolate(&to, 0.0), -50.0));
        assert!(approx_eq(from.interpolate(&to, 0.25), -25.0));
        assert!(approx_eq(from.interpolate(&to, 1.0), 50.0));
    }

    #[test]
    fn test_point_interpolation() {
        let mid = point(0.0, 10.0).interpolate(&point(20.0, -10.0), 0.5);
        assert!(approx_eq(mid.x, 10.0));
        assert!(approx_eq(mid.y, 0.0));
    }

    #[test]
    fn test_cubic_interpolation() {
        let from = Command::Cubic {
            ctrl1: point(0.0, 0.0),
            ctrl2: point(10.0, 0.0),
            to: point(10.0, 10.0),
        };
        let to = Command::Cubic {
            ctrl1: point(10.0, 10.0),
            ctrl2: point(20.0, 20.0),
            to: point(30.0, 30.0),
        };

        match from.interpolate(&to, 0.5) {
            Command::Cubic { ctrl1, ctrl2, to } => {
                assert!(approx_eq(ctrl1.x, 5.0) && approx_eq(ctrl1.y, 5.0));
                assert!(approx_eq(ctrl2.x, 15.0) && approx_eq(ctrl2.y, 10.0));
                assert!(approx_eq(to.x, 20.0) && approx_eq(to.y, 20.0));
            }
            other => panic!("Expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn test_arc_flags_switch_halfway() {
        let from = Command::Arc {
            rx: 10.0,
            ry: 10.0,
            x_axis_rotation: 0.0,
            large_arc: false,
            sweep: false,
            to: point(0.0, 10.0),
        };
        let to = Command::Arc {
            rx: 20.0,
            ry: 20.0,
            x_axis_rotation: 0.0,
            large_arc: true,
            sweep: true,
            to: point(0.0, 20.0),
        };

        let Command::Arc { rx, sweep, .. } = from.interpolate(&to, 0.25) else {
            panic!("Expected arc");
        };
        assert!(approx_eq(rx, 12.5));
        assert!(!sweep);

        let Command::Arc {
            large_arc, sweep, ..
        } = from.interpolate(&to, 0.5)
        else {
            panic!("Expected arc");
        };
        assert!(large_arc && sweep);
    }

    #[test]
    fn test_kind_mismatch() {
        // When kinds don't match, return self unchanged
        let from = Command::Line { to: point(1.0, 1.0) };
        let to = Command::Move { to: point(5.0, 5.0) };
        assert_eq!(from.interpolate(&to, 0.5), from);
    }

    #[test]
    fn test_sequence_interpolation() {
        let from = vec![
            Command::Move { to: point(0.0, 0.0) },
            Command::Line { to: point(10.0, 0.0) },
        ];
        let to = vec![
            Command::Move { to: point(0.0, 10.0) },
            Command::Line { to: point(10.0, 10.0) },
        ];

        let mid = interpolate_commands(&from, &to, 0.5);
        assert_eq!(mid.len(), 2);
        assert_eq!(mid[0], Command::Move { to: point(0.0, 5.0) });
        assert_eq!(mid[1], Command::Line { to: point(10.0, 5.0) });

        assert_eq!(interpolate_commands(&from, &to, 0.0), from);
        assert_eq!(interpolate_commands(&from, &to, 1.0), to);
    }
}
