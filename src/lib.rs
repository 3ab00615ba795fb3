//! Shape morphing: time-parameterized interpolation between circles and
//! arbitrary path outlines.
//!
//! ```no_run
//! use morph::{Circle, interpolate_path};
//!
//! let morph = interpolate_path(
//!     Circle::new(0.0, 0.0, 10.0, false),
//!     "M -10,-10 L 10,-10 L 10,10 L -10,10 Z",
//! )?;
//! let halfway = morph.at(0.5);
//! # Ok::<(), morph::MorphError>(())
//! ```

pub use morph_config::{AlignmentConfig, DiagnosticsConfig, MorphConfig, SamplingConfig};
pub use morph_core::{
    AlignOptions, Alignment, Diagnostic, Interpolate, MorphError, Morpher, RadiusScale, Shape,
    ShapeAligner, ShapeInput, ShapeInterpolator, ShapesInterpolator, align, interpolate_commands,
    interpolate_path, interpolate_paths, polygon_to_circle,
};
pub use morph_path::{
    Circle, Command, CommandKind, Curve, MAX_CIRCLE_SAMPLES, PathError, Point, Segment, SplitError,
    circle_path, parse_path, recognize, sample, sample_commands, segment, sort_by_length, split,
    split_command, split_even, to_path_string,
};
