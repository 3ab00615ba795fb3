//! morph-path: path data model for shape morphing.
//!
//! - `parse`: path grammar reduction into canonical absolute commands
//! - `segment`: subpath segmentation with centroid, length and start angle
//! - `circle`: circle sampling, canonical circle paths and their recognition
//! - `bezier`: de Casteljau subdivision of lines and curves

pub mod bezier;
pub mod circle;
pub mod command;
pub mod error;
pub mod parse;
pub mod segment;

/// 2D point in path coordinates (y grows downwards).
pub type Point = lyon_geom::Point<f64>;

pub use bezier::{Curve, elevate_quadratic, split, split_command, split_even};
pub use circle::{
    Circle, MAX_CIRCLE_SAMPLES, circle_path, recognize, sample, sample_commands,
};
pub use command::{Command, CommandKind, to_path_string, total_length, write_path};
pub use error::{PathError, Result, SplitError};
pub use parse::{ParserState, parse_path};
pub use segment::{Segment, polygon_area, polygon_centroid, segment, sort_by_length};
