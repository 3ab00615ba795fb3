//! Interpolator factory.
//!
//! [`Morpher::interpolate`] turns two shapes into a [`ShapeInterpolator`]
//! that yields a path description for any `t` in `[0, 1]`.
//!
//! Shapes are either circle descriptors or path descriptions. Paths that
//! spell a canonical circle are treated as circles. Two circles are blended
//! through their two-arc form directly; everything else is cut into
//! subpaths, paired by descending length and aligned pair by pair, with
//! circles sampled into polylines that start where their partner starts.

use morph_config::MorphConfig;
use morph_path::{
    Circle, Command, Point, Segment, circle_path, parse_path, recognize, sample_commands, segment,
    sort_by_length, to_path_string,
};
use tracing::{debug, warn};

use crate::align::{AlignOptions, Alignment, ShapeAligner};
use crate::error::{Diagnostic, MorphError, Result};
use crate::interpolate::interpolate_commands;

/// One end of a morph.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeInput {
    /// Path description in the path grammar.
    Path(String),
    Circle(Circle),
}

impl ShapeInput {
    /// The description returned verbatim at this end of the morph.
    pub fn description(&self) -> String {
        match self {
            Self::Path(data) => data.clone(),
            Self::Circle(circle) => circle_path(circle),
        }
    }
}

impl From<&str> for ShapeInput {
    fn from(data: &str) -> Self {
        Self::Path(data.to_owned())
    }
}

impl From<String> for ShapeInput {
    fn from(data: String) -> Self {
        Self::Path(data)
    }
}

impl From<Circle> for ShapeInput {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

/// A classified shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { circle: Circle, num_points: usize },
    Path { segments: Vec<Segment> },
}

impl Shape {
    /// Classify an input, parsing and segmenting path descriptions.
    pub fn classify(input: &ShapeInput, config: &MorphConfig) -> Result<Self> {
        let data = match input {
            ShapeInput::Circle(circle) => return Self::circle(*circle, config),
            ShapeInput::Path(data) => data,
        };
        if let Some(circle) = recognize(data) {
            return Self::circle(circle, config);
        }

        let mut segments = segment(&parse_path(data)?);
        if config.sampling.densify {
            for segment in &mut segments {
                segment.densify(config.sampling.gap_ratio);
            }
            sort_by_length(&mut segments);
        }
        Ok(Self::Path { segments })
    }

    fn circle(circle: Circle, config: &MorphConfig) -> Result<Self> {
        if !circle.is_valid() {
            return Err(MorphError::InvalidCircle {
                x: circle.x,
                y: circle.y,
                r: circle.r,
            });
        }
        let num_points = circle.num_points(config.sampling.min_sample_distance);
        Ok(Self::Circle { circle, num_points })
    }

    /// Boundary length of the whole shape.
    pub fn length(&self) -> f64 {
        match self {
            Self::Circle { circle, .. } => circle.circumference(),
            Self::Path { segments } => segments.iter().map(|s| s.length).sum(),
        }
    }

    fn into_pieces(self) -> Vec<Piece> {
        match self {
            Self::Circle { circle, .. } => vec![Piece::Circle(circle)],
            Self::Path { segments } => segments.into_iter().map(Piece::Path).collect(),
        }
    }
}

/// One subpath of a shape, paired with a subpath of the other shape.
#[derive(Debug, Clone)]
enum Piece {
    Circle(Circle),
    Path(Segment),
}

impl Piece {
    fn centroid(&self) -> Point {
        match self {
            Self::Circle(circle) => circle.center(),
            Self::Path(segment) => segment.centroid,
        }
    }
}

/// Builds interpolators with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Morpher {
    config: MorphConfig,
    aligner: ShapeAligner,
}

impl Morpher {
    pub fn new(config: MorphConfig) -> Self {
        let aligner = ShapeAligner::new(AlignOptions::from(&config));
        Self { config, aligner }
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Build the interpolator morphing `from` into `to`.
    pub fn interpolate(&self, from: &ShapeInput, to: &ShapeInput) -> Result<ShapeInterpolator> {
        let (start, end) = (from.description(), to.description());
        let shape_a = Shape::classify(from, &self.config)?;
        let shape_b = Shape::classify(to, &self.config)?;

        if start == end {
            return Ok(ShapeInterpolator::constant(start, end));
        }

        if let (Shape::Circle { circle: a, .. }, Shape::Circle { circle: b, .. }) = (&shape_a, &shape_b)
        {
            debug!("morphing circle into circle");
            return Ok(ShapeInterpolator::morph(
                start,
                end,
                a.commands(),
                b.commands(),
                Vec::new(),
            ));
        }

        if shape_a.length() <= self.aligner.options().progress_epsilon
            && shape_b.length() <= self.aligner.options().progress_epsilon
        {
            debug!("both shapes have zero length");
            return Ok(ShapeInterpolator::constant(start, end));
        }

        let mut pieces_a = shape_a.into_pieces();
        let mut pieces_b = shape_b.into_pieces();
        let mut diagnostics = Vec::new();
        let several = pieces_a.len() > 1 && pieces_b.len() > 1;
        let padded = pad(&mut pieces_a, &pieces_b) + pad(&mut pieces_b, &pieces_a);
        if padded > 0 && several {
            let diagnostic = Diagnostic::SegmentsPadded { padded };
            warn!(%diagnostic, "subpath counts differ");
            diagnostics.push(diagnostic);
        }

        let mut from_commands = Vec::new();
        let mut to_commands = Vec::new();
        for (a, b) in pieces_a.iter().zip(&pieces_b) {
            let alignment = self.align_pieces(a, b)?;
            let offset = from_commands.len();
            diagnostics.extend(alignment.diagnostics.into_iter().map(|d| d.shifted(offset)));
            from_commands.extend(alignment.from);
            to_commands.extend(alignment.to);
        }

        debug!(
            subpaths = pieces_a.len(),
            commands = from_commands.len(),
            "built shape interpolator"
        );
        Ok(ShapeInterpolator::morph(
            start,
            end,
            from_commands,
            to_commands,
            diagnostics,
        ))
    }

    fn align_pieces(&self, a: &Piece, b: &Piece) -> Result<Alignment> {
        let min_distance = self.config.sampling.min_sample_distance;
        match (a, b) {
            (Piece::Circle(a), Piece::Circle(b)) => Ok(Alignment {
                from: a.commands(),
                to: b.commands(),
                diagnostics: Vec::new(),
            }),
            (Piece::Path(a), Piece::Path(b)) => self.aligner.align(&a.commands, &b.commands),
            (Piece::Circle(circle), Piece::Path(path)) => {
                let n = circle.num_points(min_distance).max(path.num_points());
                let sampled = sample_against(circle, path, n);
                self.aligner.align(&sampled, &path.commands)
            }
            (Piece::Path(path), Piece::Circle(circle)) => {
                let n = circle.num_points(min_distance).max(path.num_points());
                let sampled = sample_against(circle, path, n);
                // The circle side goes first; swap the result back.
                let Alignment {
                    from,
                    to,
                    diagnostics,
                } = self.aligner.align(&sampled, &path.commands)?;
                Ok(Alignment {
                    from: to,
                    to: from,
                    diagnostics,
                })
            }
        }
    }
}

/// Sample `circle` into `n` points starting at the angle `path` starts at and
/// winding the same way.
fn sample_against(circle: &Circle, path: &Segment, n: usize) -> Vec<Command> {
    let oriented = Circle {
        clockwise: path.is_clockwise(),
        ..*circle
    };
    sample_commands(&oriented, n, path.offset)
}

/// Append zero-radius circles to `pieces` for every piece of `other` without
/// a partner. Returns how many were added.
fn pad(pieces: &mut Vec<Piece>, other: &[Piece]) -> usize {
    let missing = other.len().saturating_sub(pieces.len());
    let partners = other.iter().skip(pieces.len());
    pieces.extend(partners.map(|partner| Piece::Circle(Circle::point(partner.centroid()))));
    missing
}

#[derive(Debug, Clone, PartialEq)]
enum Frames {
    /// Nothing moves: the start description until the end.
    Constant,
    Morph { from: Vec<Command>, to: Vec<Command> },
}

/// Maps `t` in `[0, 1]` to a path description.
///
/// `t <= 0` yields the start description and `t >= 1` the end description,
/// both verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeInterpolator {
    start: String,
    end: String,
    frames: Frames,
    diagnostics: Vec<Diagnostic>,
}

impl ShapeInterpolator {
    fn constant(start: String, end: String) -> Self {
        Self {
            start,
            end,
            frames: Frames::Constant,
            diagnostics: Vec::new(),
        }
    }

    fn morph(
        start: String,
        end: String,
        from: Vec<Command>,
        to: Vec<Command>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            start,
            end,
            frames: Frames::Morph { from, to },
            diagnostics,
        }
    }

    /// Path description at `t`.
    pub fn at(&self, t: f64) -> String {
        if t.is_nan() || t <= 0.0 {
            return self.start.clone();
        }
        if t >= 1.0 {
            return self.end.clone();
        }
        match &self.frames {
            Frames::Constant => self.start.clone(),
            Frames::Morph { from, to } => to_path_string(&interpolate_commands(from, to, t)),
        }
    }

    /// Non-fatal problems met while building the interpolator.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Aligned command sequences, if the shapes actually morph.
    pub fn aligned(&self) -> Option<(&[Command], &[Command])> {
        match &self.frames {
            Frames::Constant => None,
            Frames::Morph { from, to } => Some((from.as_slice(), to.as_slice())),
        }
    }

    pub fn into_fn(self) -> impl Fn(f64) -> String + Send + Sync {
        move |t| self.at(t)
    }
}

/// Fan-out over index-paired shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapesInterpolator {
    interpolators: Vec<ShapeInterpolator>,
}

impl ShapesInterpolator {
    pub fn at(&self, t: f64) -> Vec<String> {
        self.interpolators.iter().map(|i| i.at(t)).collect()
    }

    pub fn interpolators(&self) -> &[ShapeInterpolator] {
        &self.interpolators
    }

    pub fn into_fn(self) -> impl Fn(f64) -> Vec<String> + Send + Sync {
        move |t| self.at(t)
    }
}

impl Morpher {
    /// Pair `from[i]` with `to[i]` and morph all pairs in lockstep.
    pub fn interpolate_all(
        &self,
        from: &[ShapeInput],
        to: &[ShapeInput],
    ) -> Result<ShapesInterpolator> {
        if from.len() != to.len() {
            return Err(MorphError::LengthMismatch {
                from: from.len(),
                to: to.len(),
            });
        }
        let interpolators = from
            .iter()
            .zip(to)
            .map(|(a, b)| self.interpolate(a, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(ShapesInterpolator { interpolators })
    }
}

/// Morph `from` into `to` with the default configuration.
pub fn interpolate_path(
    from: impl Into<ShapeInput>,
    to: impl Into<ShapeInput>,
) -> Result<ShapeInterpolator> {
    Morpher::default().interpolate(&from.into(), &to.into())
}

/// Morph index-paired shapes with the default configuration.
pub fn interpolate_paths(from: &[ShapeInput], to: &[ShapeInput]) -> Result<ShapesInterpolator> {
    Morpher::default().interpolate_all(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon_geom::point;
    use morph_path::CommandKind;

    const SQUARE: &str = "M -10,-10 L 10,-10 L 10,10 L -10,10 Z";

    #[test]
    fn test_identical_inputs_are_constant() {
        let interpolator = interpolate_path(SQUARE, SQUARE).unwrap();
        for t in [0.0, 0.3, 0.5, 1.0] {
            assert_eq!(interpolator.at(t), SQUARE);
        }
        assert!(interpolator.aligned().is_none());
    }

    #[test]
    fn test_circles_interpolate_through_arcs() {
        let a = Circle::new(0.0, 0.0, 10.0, false);
        let b = Circle::new(10.0, 0.0, 20.0, false);
        let interpolator = interpolate_path(a, b).unwrap();
        assert_eq!(
            recognize(&interpolator.at(0.5)),
            Some(Circle::new(5.0, 0.0, 15.0, false))
        );
    }

    #[test]
    fn test_circle_path_inputs_are_recognized() {
        let a = circle_path(&Circle::new(0.0, 0.0, 10.0, false));
        let b = circle_path(&Circle::new(0.0, 0.0, 30.0, false));
        let interpolator = interpolate_path(a.as_str(), b.as_str()).unwrap();
        let (from, _) = interpolator.aligned().unwrap();
        assert_eq!(from.len(), 3);
        assert_eq!(from[1].kind(), CommandKind::Arc);
    }

    #[test]
    fn test_circle_against_path_starts_at_path_start() {
        let circle = Circle::new(0.0, 0.0, 10.0, false);
        let interpolator = interpolate_path(circle, SQUARE).unwrap();
        let (from, to) = interpolator.aligned().unwrap();
        assert_eq!(from.len(), to.len());

        // The sampled circle begins in the square's top-left direction.
        let first = from[0].end();
        assert!(first.x < 0.0 && first.y < 0.0, "{first:?}");
        assert_eq!(to[0].end(), point(-10.0, -10.0));
        // Winding follows the square.
        assert!(from[1].end().x > first.x);
    }

    /// Cumulative boundary share reached after every command.
    fn progress(commands: &[Command]) -> Vec<f64> {
        let mut travelled = 0.0;
        let mut pen = commands.first().map_or(point(0.0, 0.0), Command::end);
        let steps: Vec<f64> = commands
            .iter()
            .map(|command| {
                travelled += pen.distance_to(command.end());
                pen = command.end();
                travelled
            })
            .collect();
        steps.iter().map(|step| step / travelled).collect()
    }

    #[test]
    fn test_circle_against_square_keeps_pace() {
        let circle = Circle::new(0.0, 0.0, 10.0, false);
        let interpolator = interpolate_path(circle, SQUARE).unwrap();
        let (from, to) = interpolator.aligned().unwrap();

        // The sides never drift apart by a sample step.
        let sample_step = 1.0 / circle.num_points(1.0) as f64;
        for (index, (a, b)) in progress(from).iter().zip(progress(to)).enumerate() {
            assert!((a - b).abs() < sample_step, "index {index}: {a} vs {b}");
        }

        // The top-right corner meets the circle a quarter turn from its start.
        let corner = to.iter().position(|c| c.end() == point(10.0, -10.0)).unwrap();
        let half_diagonal = 10.0 * std::f64::consts::FRAC_1_SQRT_2;
        let paired = from[corner].end();
        assert!(paired.distance_to(point(half_diagonal, -half_diagonal)) < 0.1, "{paired:?}");
    }

    #[test]
    fn test_segments_sorted_after_densify() {
        let data = "M0,0 L30,0 L30,30 L0,30 Z M200,0 L201,0 L202,0 Q250,100 300,0";
        let shape = Shape::classify(&ShapeInput::from(data), &MorphConfig::default()).unwrap();
        let Shape::Path { segments } = shape else {
            panic!("expected a path");
        };
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start(), point(200.0, 0.0));
        assert!(segments[0].length > segments[1].length);
    }

    #[test]
    fn test_endpoints_are_verbatim() {
        let circle = Circle::new(0.0, 0.0, 10.0, true);
        let interpolator = interpolate_path(circle, SQUARE).unwrap();
        assert_eq!(interpolator.at(0.0), circle_path(&circle));
        assert_eq!(interpolator.at(-1.0), circle_path(&circle));
        assert_eq!(interpolator.at(1.0), SQUARE);
        assert_eq!(interpolator.at(2.0), SQUARE);
    }

    #[test]
    fn test_zero_length_shapes_are_constant() {
        let interpolator = interpolate_path("M5,5 L5,5", "M7,7 Z").unwrap();
        assert_eq!(interpolator.at(0.5), "M5,5 L5,5");
        assert_eq!(interpolator.at(1.0), "M7,7 Z");
    }

    #[test]
    fn test_invalid_circle() {
        let err = interpolate_path(Circle::new(0.0, 0.0, -1.0, false), SQUARE).unwrap_err();
        assert!(matches!(err, MorphError::InvalidCircle { .. }), "got {err:?}");
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = interpolate_path("M 0,0 X 1,1", SQUARE).unwrap_err();
        assert!(matches!(err, MorphError::Path(_)), "got {err:?}");
    }

    #[test]
    fn test_padding_diagnostic() {
        let two = "M0,0 L10,0 L10,10 Z M20,20 L30,20 L30,30 Z";
        let three = "M0,0 L10,0 L10,10 Z M20,20 L30,20 L30,30 Z M50,50 L60,50 L60,60 Z";
        let interpolator = interpolate_path(two, three).unwrap();
        assert!(
            interpolator
                .diagnostics()
                .contains(&Diagnostic::SegmentsPadded { padded: 1 })
        );
    }

    #[test]
    fn test_fan_out() {
        let from = vec![ShapeInput::from(SQUARE), Circle::new(0.0, 0.0, 5.0, false).into()];
        let to = vec![Circle::new(0.0, 0.0, 5.0, false).into(), ShapeInput::from(SQUARE)];
        let interpolator = interpolate_paths(&from, &to).unwrap();
        assert_eq!(interpolator.at(0.0), vec![SQUARE.to_owned(), from[1].description()]);
        assert_eq!(interpolator.at(1.0), vec![to[0].description(), SQUARE.to_owned()]);
        assert_eq!(interpolator.at(0.5).len(), 2);

        let err = interpolate_paths(&from, &to[..1]).unwrap_err();
        assert_eq!(err, MorphError::LengthMismatch { from: 2, to: 1 });
    }

    #[test]
    fn test_into_fn() {
        let morph = interpolate_path(Circle::new(0.0, 0.0, 10.0, false), SQUARE)
            .unwrap()
            .into_fn();
        assert_eq!(morph(1.0), SQUARE);
        assert!(parse_path(&morph(0.5)).is_ok());
    }
}
