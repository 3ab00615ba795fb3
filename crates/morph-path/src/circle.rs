//! Circles: sampling, canonical path form and recognition.
//!
//! A circle is written as two half-circle arcs starting at its top point:
//!
//! ```text
//! M{x},{y-r}A{r},{r},0,0,{s},{x},{y+r}A{r},{r},0,0,{s},{x},{y-r}
//! ```
//!
//! where the sweep flag `s` is 1 for clockwise and 0 for counter-clockwise
//! circles. [`circle_path`] and [`recognize`] are exact inverses.

use std::f64::consts::TAU;

use lyon_geom::point;
use serde::{Deserialize, Serialize};

use crate::parse::parse_path;
use crate::{Command, Point};

/// Upper bound on the number of samples drawn from one circle.
///
/// Huge radii or tiny sample distances would otherwise ask for more
/// samples than can be allocated.
pub const MAX_CIRCLE_SAMPLES: usize = 65_536;

/// Circle descriptor. `r` is never negative for a valid circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    #[serde(default)]
    pub clockwise: bool,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64, clockwise: bool) -> Self {
        Self { x, y, r, clockwise }
    }

    /// Zero-radius circle used as a stand-in for a missing subpath.
    pub fn point(at: Point) -> Self {
        Self::new(at.x, at.y, 0.0, false)
    }

    /// Finite coordinates and a non-negative radius.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.r.is_finite() && self.r >= 0.0
    }

    pub fn center(&self) -> Point {
        point(self.x, self.y)
    }

    pub fn circumference(&self) -> f64 {
        TAU * self.r
    }

    /// Number of boundary samples so that neighbouring samples are at most
    /// `min_sample_distance` apart along the circumference, capped at
    /// [`MAX_CIRCLE_SAMPLES`].
    pub fn num_points(&self, min_sample_distance: f64) -> usize {
        let distance = if min_sample_distance > 0.0 {
            min_sample_distance
        } else {
            1.0
        };
        let count = (self.circumference() / distance).ceil();
        if count.is_finite() && count < MAX_CIRCLE_SAMPLES as f64 {
            count as usize
        } else {
            MAX_CIRCLE_SAMPLES
        }
    }

    /// Boundary point at `angle`, measured clockwise from the top.
    pub fn project(&self, angle: f64) -> Point {
        point(self.x + self.r * angle.sin(), self.y - self.r * angle.cos())
    }

    /// The canonical move + two arcs command sequence of this circle.
    pub fn commands(&self) -> Vec<Command> {
        let top = point(self.x, self.y - self.r);
        let bottom = point(self.x, self.y + self.r);
        let half = |to| Command::Arc {
            rx: self.r,
            ry: self.r,
            x_axis_rotation: 0.0,
            large_arc: false,
            sweep: self.clockwise,
            to,
        };
        vec![Command::Move { to: top }, half(bottom), half(top)]
    }
}

/// `n` points evenly spaced by angle, starting at `offset` and walking in the
/// circle's winding direction.
pub fn sample(circle: &Circle, n: usize, offset: f64) -> Vec<Point> {
    let direction = if circle.clockwise { 1.0 } else { -1.0 };
    (0..n)
        .map(|i| circle.project(offset + direction * (i as f64 / n as f64) * TAU))
        .collect()
}

/// Sampled circle as canonical commands: a move to the first sample, lines
/// through the others and a closing line back to the first one.
pub fn sample_commands(circle: &Circle, n: usize, offset: f64) -> Vec<Command> {
    let points = sample(circle, n.max(1), offset);
    let mut commands = Vec::with_capacity(points.len() + 1);
    commands.push(Command::Move { to: points[0] });
    commands.extend(points[1..].iter().map(|&to| Command::Line { to }));
    commands.push(Command::Line { to: points[0] });
    commands
}

/// Canonical path description of a circle.
pub fn circle_path(circle: &Circle) -> String {
    let Circle { x, y, r, clockwise } = *circle;
    let s = u8::from(clockwise);
    format!(
        "M{x},{top}A{r},{r},0,0,{s},{x},{bottom}A{r},{r},0,0,{s},{x},{top}",
        top = y - r,
        bottom = y + r,
    )
}

/// Recover the circle written by [`circle_path`].
///
/// Spacing and separator variants are accepted. Any other path yields `None`.
pub fn recognize(path: &str) -> Option<Circle> {
    let commands = parse_path(path).ok()?;
    let [
        Command::Move { to: start },
        Command::Arc {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            to: middle,
        },
        Command::Arc {
            rx: rx2,
            ry: ry2,
            x_axis_rotation: rotation2,
            large_arc: large_arc2,
            sweep: sweep2,
            to: end,
        },
    ] = commands.as_slice()
    else {
        return None;
    };

    let r = *rx;
    let same_radii = *ry == r && *rx2 == r && *ry2 == r;
    let flat = *x_axis_rotation == 0.0 && *rotation2 == 0.0 && !large_arc && !large_arc2;
    let vertical = middle.x == start.x && end == start && middle.y >= start.y;
    if !(same_radii && flat && vertical && sweep == sweep2) {
        return None;
    }

    let y = recover_center_y(start.y, middle.y, r)?;
    Some(Circle::new(start.x, y, r, *sweep))
}

/// Pick the center whose serialization reproduces both `top` and `bottom`.
fn recover_center_y(top: f64, bottom: f64, r: f64) -> Option<f64> {
    let candidates = [top + r, bottom - r, (top + bottom) / 2.0];
    if let Some(&y) = candidates
        .iter()
        .find(|&&y| y - r == top && y + r == bottom)
    {
        return Some(y);
    }

    // Hand-written circles may not round-trip bit for bit.
    let tolerance = 1e-9 * r.abs().max(1.0);
    ((bottom - top - 2.0 * r).abs() <= tolerance).then_some(candidates[2])
}
