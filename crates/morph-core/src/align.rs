//! Command alignment.
//!
//! Two command sequences are walked in lockstep so that they end up with the
//! same number of commands, the same command kind at every position and
//! comparable progress along their boundaries at every position.
//!
//! The walk has two phases:
//!
//! 1. Pacing. Each step emits exactly one command per side. A side that runs
//!    ahead of the other either holds (emits a zero-length stand-in) or has
//!    its command split where its progress meets the other side's. Arcs
//!    cannot be split and pass whole while within the misalignment
//!    tolerance. A side that runs out of commands keeps re-splitting its
//!    last command into more and more even pieces.
//! 2. Kind reconciliation. Lines are raised to curves, quadratics to cubics,
//!    and arcs facing another kind are drawn straight.

use std::collections::VecDeque;

use lyon_geom::point;
use morph_config::MorphConfig;
use morph_path::{Command, CommandKind, Point, SplitError, elevate_quadratic, split_command, split_even};
use tracing::{debug, warn};

use crate::error::{Diagnostic, MorphError, Result};

/// Tuning for [`ShapeAligner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignOptions {
    /// Progress values closer than this are considered tied.
    pub progress_epsilon: f64,
    /// Maximum progress difference at which an arc and its partner advance
    /// together. Lines and curves are always split to meet.
    pub misalignment_tolerance: f64,
    /// Turn arc diagnostics into [`MorphError::UnsupportedArc`].
    pub strict_arcs: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self::from(&MorphConfig::default())
    }
}

impl From<&MorphConfig> for AlignOptions {
    fn from(config: &MorphConfig) -> Self {
        Self {
            progress_epsilon: config.alignment.progress_epsilon,
            misalignment_tolerance: config.alignment.misalignment_tolerance,
            strict_arcs: config.diagnostics.strict_arcs,
        }
    }
}

/// Two command sequences ready for position-wise interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub from: Vec<Command>,
    pub to: Vec<Command>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A queued command with its share of the side's length and command count.
#[derive(Debug, Clone, Copy)]
struct Item {
    command: Command,
    length: f64,
    weight: f64,
}

/// Re-splitting state of the last command of an exhausted side.
///
/// The last `depth` emitted commands are the even pieces of `original`
/// drawn from `from`.
#[derive(Debug, Clone, Copy)]
struct TailSplit {
    original: Command,
    from: Point,
    depth: usize,
}

impl TailSplit {
    fn pieces(&self) -> std::result::Result<Vec<Command>, SplitError> {
        split_even(self.from, &self.original, self.depth)
    }
}

/// Walking state of one side.
#[derive(Debug)]
struct Cursor {
    queue: VecDeque<Item>,
    emitted: Vec<Command>,
    travelled: f64,
    consumed: f64,
    total: f64,
    count: usize,
    pen: Point,
    tail: Option<TailSplit>,
}

impl Cursor {
    fn new(commands: &[Command]) -> Self {
        let mut queue = VecDeque::with_capacity(commands.len());
        let mut pen = commands.first().map_or(point(0.0, 0.0), Command::end);
        let start = pen;
        for &command in commands {
            let length = command.chord_length(pen);
            pen = command.end();
            queue.push_back(Item {
                command,
                length,
                weight: 1.0,
            });
        }

        Self {
            total: queue.iter().map(|item| item.length).sum(),
            count: queue.len(),
            queue,
            emitted: Vec::with_capacity(commands.len()),
            travelled: 0.0,
            consumed: 0.0,
            pen: start,
            tail: None,
        }
    }

    fn progress(&self, epsilon: f64) -> f64 {
        self.progress_with(0.0, 0.0, epsilon)
    }

    fn progress_after(&self, item: &Item, epsilon: f64) -> f64 {
        self.progress_with(item.length, item.weight, epsilon)
    }

    /// Length-based progress, or the consumed share of commands when the
    /// side has no length to speak of.
    fn progress_with(&self, length: f64, weight: f64, epsilon: f64) -> f64 {
        if self.total > epsilon {
            (self.travelled + length) / self.total
        } else if self.count == 0 {
            1.0
        } else {
            (self.consumed + weight) / self.count as f64
        }
    }

    fn emit(&mut self, item: Item) {
        self.travelled += item.length;
        self.consumed += item.weight;
        self.pen = item.command.end();
        self.emitted.push(item.command);
        self.tail = None;
    }

    /// Pop and emit the next queued command.
    fn advance(&mut self) -> Option<Item> {
        let item = self.queue.pop_front()?;
        self.emit(item);
        Some(item)
    }

    /// Emit a zero-length command of `kind` at the pen.
    fn hold(&mut self, kind: CommandKind) {
        self.emitted.push(Command::degenerate(kind, self.pen));
        self.tail = None;
    }

    /// Replace the pieces of the last command by one more even piece.
    fn stretch_tail(&mut self) -> bool {
        let Some(tail) = self.tail.or_else(|| self.tail_candidate()) else {
            return false;
        };
        let next = TailSplit {
            depth: tail.depth + 1,
            ..tail
        };
        let Ok(pieces) = next.pieces() else {
            return false;
        };

        self.emitted.truncate(self.emitted.len() - tail.depth);
        self.emitted.extend(pieces);
        self.tail = Some(next);
        true
    }

    fn tail_candidate(&self) -> Option<TailSplit> {
        let [.., previous, last] = self.emitted.as_slice() else {
            return None;
        };
        let from = previous.end();
        (is_splittable(last) && last.chord_length(from) > 0.0).then_some(TailSplit {
            original: *last,
            from,
            depth: 1,
        })
    }

    fn last_is_arc(&self) -> bool {
        matches!(self.emitted.last(), Some(Command::Arc { .. }))
    }
}

fn is_splittable(command: &Command) -> bool {
    matches!(
        command,
        Command::Line { .. } | Command::Quadratic { .. } | Command::Cubic { .. }
    )
}

/// Which of the two inputs a step refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    From,
    To,
}

/// The side whose next progress is ahead by more than `epsilon`.
fn in_front(from: f64, to: f64, epsilon: f64) -> Option<Side> {
    if from - to > epsilon {
        Some(Side::From)
    } else if to - from > epsilon {
        Some(Side::To)
    } else {
        None
    }
}

/// Lockstep aligner for two command sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeAligner {
    options: AlignOptions,
}

impl ShapeAligner {
    pub fn new(options: AlignOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AlignOptions {
        &self.options
    }

    /// Align two command sequences.
    ///
    /// The result has `from.len() == to.len()` and equal command kinds at
    /// every position. Each sequence still draws its input outline.
    pub fn align(&self, from: &[Command], to: &[Command]) -> Result<Alignment> {
        let mut a = Cursor::new(from);
        let mut b = Cursor::new(to);
        let mut diagnostics = Vec::new();

        loop {
            let index = a.emitted.len();
            match (a.queue.front().copied(), b.queue.front().copied()) {
                (None, None) => break,
                (Some(_), None) => self.fill_missing(&mut a, &mut b, &mut diagnostics),
                (None, Some(_)) => self.fill_missing(&mut b, &mut a, &mut diagnostics),
                (Some(x), Some(y)) => match (x.command, y.command) {
                    (Command::Move { .. }, Command::Move { .. }) => {
                        a.advance();
                        b.advance();
                    }
                    (Command::Move { .. }, other) => {
                        b.advance();
                        a.hold(other.kind());
                    }
                    (other, Command::Move { .. }) => {
                        a.advance();
                        b.hold(other.kind());
                    }
                    _ => self.pace(&mut a, &mut b, x, y, index, &mut diagnostics),
                },
            }
            debug_assert_eq!(a.emitted.len(), b.emitted.len());
        }

        let (mut from, mut to) = (a.emitted, b.emitted);
        reconcile(&mut from, &mut to, &mut diagnostics);

        if self.options.strict_arcs {
            if let Some(diagnostic) = diagnostics.iter().find(|d| d.is_arc()) {
                return Err(MorphError::UnsupportedArc(*diagnostic));
            }
        }

        debug!(
            commands = from.len(),
            diagnostics = diagnostics.len(),
            "aligned command sequences"
        );
        Ok(Alignment {
            from,
            to,
            diagnostics,
        })
    }

    /// One side is exhausted: the other advances, the missing side stretches
    /// its last command or holds.
    fn fill_missing(
        &self,
        present: &mut Cursor,
        missing: &mut Cursor,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let index = missing.emitted.len();
        let Some(item) = present.advance() else {
            return;
        };

        let kind = item.command.kind();
        if kind == CommandKind::Move || !missing.stretch_tail() {
            if kind != CommandKind::Move && missing.last_is_arc() {
                record(diagnostics, Diagnostic::ArcSplitUnsupported { index: index - 1 });
            }
            missing.hold(kind);
        }
    }

    /// Both sides have a drawing command.
    fn pace(
        &self,
        a: &mut Cursor,
        b: &mut Cursor,
        x: Item,
        y: Item,
        index: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let epsilon = self.options.progress_epsilon;
        let next_a = a.progress_after(&x, epsilon);
        let next_b = b.progress_after(&y, epsilon);
        let within_tolerance = (next_a - next_b).abs() <= self.options.misalignment_tolerance;

        // Splittable commands always meet the other side exactly; the
        // tolerance only lets arcs through whole.
        match in_front(next_a, next_b, epsilon) {
            Some(Side::From) if is_splittable(&x.command) || !within_tolerance => {
                self.catch_up(a, b, x, y, index, diagnostics)
            }
            Some(Side::To) if is_splittable(&y.command) || !within_tolerance => {
                self.catch_up(b, a, y, x, index, diagnostics)
            }
            _ => {
                a.advance();
                b.advance();
            }
        }
    }

    /// The trailing side advances; the front side holds or emits the part of
    /// its command that brings it level with the trailing side.
    fn catch_up(
        &self,
        front: &mut Cursor,
        trail: &mut Cursor,
        front_item: Item,
        trail_item: Item,
        index: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let epsilon = self.options.progress_epsilon;
        let target = trail.progress_after(&trail_item, epsilon);
        let current = front.progress(epsilon);
        let next = front.progress_after(&front_item, epsilon);
        trail.advance();

        if target <= current + epsilon || next - current <= epsilon {
            front.hold(trail_item.command.kind());
            return;
        }

        let t = (target - current) / (next - current);
        match split_command(front.pen, &front_item.command, t) {
            Ok((left, right)) => {
                front.queue.pop_front();
                front.queue.push_front(Item {
                    command: right,
                    length: front_item.length * (1.0 - t),
                    weight: front_item.weight * (1.0 - t),
                });
                front.emit(Item {
                    command: left,
                    length: front_item.length * t,
                    weight: front_item.weight * t,
                });
            }
            Err(_) => {
                if front_item.command.kind() == CommandKind::Arc {
                    record(diagnostics, Diagnostic::ArcSplitUnsupported { index });
                }
                front.advance();
            }
        }
    }
}

/// Align two command sequences with default options.
pub fn align(from: &[Command], to: &[Command]) -> Result<Alignment> {
    ShapeAligner::default().align(from, to)
}

fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    if diagnostics.contains(&diagnostic) {
        return;
    }
    warn!(%diagnostic, "alignment degraded");
    diagnostics.push(diagnostic);
}

fn rank(kind: CommandKind) -> u8 {
    match kind {
        CommandKind::Move => 0,
        CommandKind::Line => 1,
        CommandKind::Quadratic => 2,
        CommandKind::Cubic => 3,
        CommandKind::Arc => 4,
    }
}

/// Rewrite `command` drawn from `from` as a command of the higher `target` kind.
fn raise(command: Command, from: Point, target: CommandKind) -> Command {
    match (command, target) {
        (Command::Quadratic { ctrl, to }, CommandKind::Cubic) => elevate_quadratic(from, ctrl, to),
        _ => Command::straight(target, from, command.end()),
    }
}

/// Give both commands at each position the same kind.
fn reconcile(from: &mut [Command], to: &mut [Command], diagnostics: &mut Vec<Diagnostic>) {
    let mut pen_a = from.first().map_or(point(0.0, 0.0), Command::end);
    let mut pen_b = to.first().map_or(point(0.0, 0.0), Command::end);

    for (index, (a, b)) in from.iter_mut().zip(to.iter_mut()).enumerate() {
        let (end_a, end_b) = (a.end(), b.end());
        let (kind_a, kind_b) = (a.kind(), b.kind());

        if kind_a != kind_b && kind_a != CommandKind::Move && kind_b != CommandKind::Move {
            match (kind_a, kind_b) {
                (CommandKind::Arc, other) => {
                    *a = Command::straight(other, pen_a, end_a);
                    record(diagnostics, Diagnostic::ArcDegraded { index, other });
                }
                (other, CommandKind::Arc) => {
                    *b = Command::straight(other, pen_b, end_b);
                    record(diagnostics, Diagnostic::ArcDegraded { index, other });
                }
                _ if rank(kind_a) < rank(kind_b) => *a = raise(*a, pen_a, kind_b),
                _ => *b = raise(*b, pen_b, kind_a),
            }
        }

        pen_a = end_a;
        pen_b = end_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_path::{parse_path, total_length};

    const EPSILON: f64 = 1e-9;

    fn assert_aligned(alignment: &Alignment) {
        assert_eq!(alignment.from.len(), alignment.to.len());
        for (a, b) in alignment.from.iter().zip(&alignment.to) {
            assert_eq!(a.kind(), b.kind(), "{a:?} vs {b:?}");
        }
    }

    fn path(data: &str) -> Vec<Command> {
        parse_path(data).unwrap()
    }

    #[test]
    fn test_identical_sequences_pass_through() {
        let square = path("M0,0 L10,0 L10,10 L0,10 Z");
        let alignment = align(&square, &square).unwrap();
        assert_eq!(alignment.from, square);
        assert_eq!(alignment.to, square);
        assert!(alignment.diagnostics.is_empty());
    }

    #[test]
    fn test_long_edge_is_split_to_keep_pace() {
        let fine = path("M0,0 L1,0 L2,0 L3,0 L4,0 L5,0 L6,0 L7,0 L8,0 L9,0 L10,0");
        let coarse = path("M0,5 L10,5");
        let alignment = align(&fine, &coarse).unwrap();
        assert_aligned(&alignment);

        // The coarse side keeps drawing the same outline.
        assert_eq!(alignment.to.last().map(Command::end), Some(point(10.0, 5.0)));
        assert!((total_length(&alignment.to) - 10.0).abs() < EPSILON);
        assert!(alignment.to.len() > 2);
    }

    #[test]
    fn test_exhausted_side_stretches_last_command() {
        let many = path("M0,0 L1,0 L2,0 L3,0");
        let one = path("M0,0 L3,3");
        let alignment = align(&one, &many).unwrap();
        assert_aligned(&alignment);
        assert_eq!(alignment.from.len(), 4);

        // The single line is cut into even pieces, all on the original chord.
        for command in &alignment.from[1..] {
            let end = command.end();
            assert!((end.x - end.y).abs() < EPSILON);
        }
        assert_eq!(alignment.from[3].end(), point(3.0, 3.0));
    }

    #[test]
    fn test_move_pairs_with_held_commands() {
        let two = path("M0,0 L10,0 M20,0 L30,0");
        let one = path("M0,0 L5,0 L10,0 L15,0");
        let alignment = align(&two, &one).unwrap();
        assert_aligned(&alignment);
        assert_eq!(alignment.from.last().map(Command::end), Some(point(30.0, 0.0)));
        assert_eq!(alignment.to.last().map(Command::end), Some(point(15.0, 0.0)));
    }

    #[test]
    fn test_kinds_are_reconciled() {
        let lines = path("M0,0 L10,0 L10,10");
        let curves = path("M0,0 Q5,-5 10,0 C15,0 15,5 10,10");
        let alignment = align(&lines, &curves).unwrap();
        assert_aligned(&alignment);
        assert_eq!(alignment.from[1].kind(), CommandKind::Quadratic);
        assert_eq!(alignment.from[2].kind(), CommandKind::Cubic);

        // Raised lines still end where they did.
        assert_eq!(alignment.from[2].end(), point(10.0, 10.0));
    }

    #[test]
    fn test_quadratic_is_elevated_against_cubic() {
        let quadratic = path("M0,0 Q5,10 10,0");
        let cubic = path("M0,0 C0,10 10,10 10,0");
        let alignment = align(&quadratic, &cubic).unwrap();
        assert_eq!(
            alignment.from[1],
            elevate_quadratic(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0))
        );
    }

    #[test]
    fn test_arc_against_line_is_degraded() {
        let arc = path("M0,0 A5,5 0 0 1 10,0");
        let line = path("M0,0 L10,0");
        let alignment = align(&arc, &line).unwrap();
        assert_aligned(&alignment);
        assert_eq!(alignment.from[1], Command::Line { to: point(10.0, 0.0) });
        assert_eq!(
            alignment.diagnostics,
            vec![Diagnostic::ArcDegraded {
                index: 1,
                other: CommandKind::Line
            }]
        );
    }

    #[test]
    fn test_unsplittable_arc_is_kept_whole() {
        let arc = path("M0,0 A50,50 0 0 1 100,0");
        let lines = path("M0,0 L10,0 L20,0 L30,0 L40,0 L50,0 L60,0 L70,0 L80,0 L90,0 L100,0");
        let alignment = align(&arc, &lines).unwrap();
        assert_aligned(&alignment);
        assert!(
            alignment
                .diagnostics
                .iter()
                .any(|d| matches!(d, Diagnostic::ArcSplitUnsupported { .. }))
        );
    }

    #[test]
    fn test_strict_arcs_fail_fast() {
        let aligner = ShapeAligner::new(AlignOptions {
            strict_arcs: true,
            ..AlignOptions::default()
        });
        let arc = path("M0,0 A5,5 0 0 1 10,0");
        let line = path("M0,0 L10,0");
        let err = aligner.align(&arc, &line).unwrap_err();
        assert!(matches!(err, MorphError::UnsupportedArc(_)), "got {err:?}");
    }

    #[test]
    fn test_zero_length_side_uses_command_count() {
        let dot = path("M5,5 L5,5 L5,5 L5,5");
        let square = path("M0,0 L10,0 L10,10 L0,10 Z");
        let alignment = align(&dot, &square).unwrap();
        assert_aligned(&alignment);
        assert!(alignment.from.iter().all(|c| c.end() == point(5.0, 5.0)));
    }

    #[test]
    fn test_in_front() {
        assert_eq!(in_front(0.5, 0.2, 1e-6), Some(Side::From));
        assert_eq!(in_front(0.2, 0.5, 1e-6), Some(Side::To));
        assert_eq!(in_front(0.5, 0.5 + 1e-9, 1e-6), None);
    }
}
