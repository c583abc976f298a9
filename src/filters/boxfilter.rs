// pbrt
use crate::core::filter::Filter;
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::pbrt::Float;

/// Equal weight for every sample inside its support.
#[derive(Debug, Copy, Clone)]
pub struct BoxFilter {
    pub radius: Vector2f,
}

impl BoxFilter {
    pub fn new(radius: Vector2f) -> Self {
        BoxFilter { radius }
    }
}

impl Default for BoxFilter {
    /// Covers exactly one pixel.
    fn default() -> Self {
        BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })
    }
}

impl Filter for BoxFilter {
    fn evaluate(&self, _p: &Point2f) -> Float {
        1.0
    }
    fn get_radius(&self) -> Vector2f {
        self.radius
    }
}
