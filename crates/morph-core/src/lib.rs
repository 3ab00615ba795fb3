//! morph-core: shape alignment and the interpolator factory.
//!
//! - `align`: lockstep alignment of two command sequences
//! - `interpolate`: position-wise interpolation of aligned commands
//! - `morph`: shape classification, subpath pairing and interpolators
//! - `geometry`: circle sizing helpers for region-to-circle transitions

pub mod align;
pub mod error;
pub mod geometry;
pub mod interpolate;
pub mod morph;

pub use align::{AlignOptions, Alignment, ShapeAligner, align};
pub use error::{Diagnostic, MorphError, Result};
pub use geometry::{RadiusScale, polygon_to_circle};
pub use interpolate::{Interpolate, interpolate_commands};
pub use morph::{
    Morpher, Shape, ShapeInput, ShapeInterpolator, ShapesInterpolator, interpolate_path,
    interpolate_paths,
};
