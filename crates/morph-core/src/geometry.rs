//! Sizing helpers for circles that stand in for regions.

use std::f64::consts::PI;

use morph_path::{Circle, Point, polygon_area, polygon_centroid};

/// Circle placed at the polygon's centroid.
///
/// Without an explicit `radius` the circle has the polygon's area.
pub fn polygon_to_circle(polygon: &[Point], radius: Option<f64>) -> Circle {
    let center = polygon_centroid(polygon);
    let r = radius.unwrap_or_else(|| (polygon_area(polygon).abs() / PI).sqrt());
    Circle::new(center.x, center.y, r, false)
}

/// Square-root scale from values to radii, so that circle areas are
/// proportional to values.
///
/// `total_value` maps to the radius of a circle of area `total_area`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    total_value: f64,
    max_radius: f64,
}

impl RadiusScale {
    pub fn new(total_area: f64, total_value: f64) -> Self {
        Self {
            total_value,
            max_radius: (total_area / PI).sqrt(),
        }
    }

    /// Radius for `value`. Negative values mirror positive ones; an empty
    /// value domain maps everything to zero.
    pub fn radius(&self, value: f64) -> f64 {
        if self.total_value == 0.0 {
            return 0.0;
        }
        let normalized = value / self.total_value;
        normalized.signum() * normalized.abs().sqrt() * self.max_radius
    }
}
