//! Subpath segmentation.
//!
//! A path is cut at every move command. Each piece keeps the geometry the
//! aligner and the factory need: boundary points, centroid, length and the
//! angle of its start point as seen from the centroid.

use std::f64::consts::FRAC_PI_2;

use lyon_geom::point;
use tracing::trace;

use crate::bezier::split_command;
use crate::{Command, Point};

/// Upper bound on the number of halvings a single densify pass performs.
const MAX_DENSIFY_SPLITS: usize = 4096;

/// One subpath: a move followed by the commands drawn from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub commands: Vec<Command>,
    /// Terminal point of every command, in order.
    pub points: Vec<Point>,
    pub centroid: Point,
    pub length: f64,
    /// Angle of the start point around the centroid, in the circle sampler's
    /// convention (0 is straight up, growing clockwise).
    pub offset: f64,
}

impl Segment {
    pub fn new(commands: Vec<Command>) -> Self {
        let points: Vec<Point> = commands.iter().map(Command::end).collect();
        let centroid = polygon_centroid(&points);
        let length = points
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .sum();
        let offset = match (points.first(), points.last()) {
            (Some(&first), Some(&last)) => {
                let mid = first.lerp(last, 0.5);
                (mid.y - centroid.y).atan2(mid.x - centroid.x) + FRAC_PI_2
            }
            _ => 0.0,
        };

        Self {
            commands,
            points,
            centroid,
            length,
            offset,
        }
    }

    pub fn num_points(&self) -> usize {
        self.commands.len()
    }

    /// Pen position at the start of the segment.
    pub fn start(&self) -> Point {
        self.points.first().copied().unwrap_or_else(|| point(0.0, 0.0))
    }

    /// Whether the outline winds clockwise on a y-down canvas.
    pub fn is_clockwise(&self) -> bool {
        polygon_area(&self.points) > 0.0
    }

    /// Halve the longest command while it is more than `gap_ratio` times
    /// longer than the average of the others.
    ///
    /// Long edges against a finely sampled partner would otherwise stretch
    /// over many partner commands. Ratios below 1 are ignored.
    pub fn densify(&mut self, gap_ratio: f64) {
        if gap_ratio.is_nan() || gap_ratio < 1.0 || self.commands.len() < 3 {
            return;
        }

        let mut splits = 0;
        while splits < MAX_DENSIFY_SPLITS {
            let lengths = command_lengths(&self.commands);
            let Some((index, longest)) = lengths
                .iter()
                .copied()
                .enumerate()
                .skip(1)
                .max_by(|a, b| a.1.total_cmp(&b.1))
            else {
                break;
            };

            // Everything but the leading move and the longest command.
            let others = (lengths.len() - 2) as f64;
            let mean = (lengths.iter().sum::<f64>() - longest) / others;
            if mean <= 0.0 || longest <= gap_ratio * mean {
                break;
            }

            let from = self.commands[index - 1].end();
            let Ok((left, right)) = split_command(from, &self.commands[index], 0.5) else {
                break;
            };
            self.commands.splice(index..=index, [left, right]);
            splits += 1;
        }

        if splits > 0 {
            trace!(splits, commands = self.commands.len(), "densified segment");
            *self = Self::new(std::mem::take(&mut self.commands));
        }
    }
}

/// Chord length of every command; moves count as zero.
fn command_lengths(commands: &[Command]) -> Vec<f64> {
    let mut pen = point(0.0, 0.0);
    commands
        .iter()
        .map(|command| {
            let length = command.chord_length(pen);
            pen = command.end();
            length
        })
        .collect()
}

/// Signed area of the closed polygon through `points`.
///
/// Positive for clockwise outlines on a y-down canvas.
pub fn polygon_area(points: &[Point]) -> f64 {
    let Some(&last) = points.last() else {
        return 0.0;
    };
    let mut previous = last;
    let mut area = 0.0;
    for &p in points {
        area += previous.x * p.y - p.x * previous.y;
        previous = p;
    }
    area / 2.0
}

/// Area-weighted centroid, or the plain mean for flat polygons.
pub fn polygon_centroid(points: &[Point]) -> Point {
    let Some(&last) = points.last() else {
        return point(0.0, 0.0);
    };

    let mut previous = last;
    let (mut k, mut x, mut y) = (0.0, 0.0, 0.0);
    for &p in points {
        let c = previous.x * p.y - p.x * previous.y;
        k += c;
        x += (previous.x + p.x) * c;
        y += (previous.y + p.y) * c;
        previous = p;
    }

    if k.abs() > f64::EPSILON {
        let k = k * 3.0;
        return point(x / k, y / k);
    }

    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    point(sx / n, sy / n)
}

/// Cut a command sequence at every move and order the pieces by descending
/// length. Pieces of equal length keep their input order.
pub fn segment(commands: &[Command]) -> Vec<Segment> {
    let mut pieces: Vec<Vec<Command>> = Vec::new();
    for command in commands {
        match (command, pieces.last_mut()) {
            (Command::Move { .. }, _) | (_, None) => pieces.push(vec![*command]),
            (_, Some(current)) => current.push(*command),
        }
    }

    let mut segments: Vec<Segment> = pieces.into_iter().map(Segment::new).collect();
    sort_by_length(&mut segments);
    segments
}

/// Stable sort by descending length.
///
/// Densifying a curved segment changes its length, so callers that densify
/// sort again afterwards.
pub fn sort_by_length(segments: &mut [Segment]) {
    segments.sort_by(|a, b| b.length.total_cmp(&a.length));
}
