// pbrt
use crate::core::filter::Filter;
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::pbrt::Float;

/// Tent filter, weights fall off linearly to zero at the radius.
#[derive(Debug, Copy, Clone)]
pub struct TriangleFilter {
    pub radius: Vector2f,
}

impl TriangleFilter {
    pub fn new(radius: Vector2f) -> Self {
        TriangleFilter { radius }
    }
}

impl Default for TriangleFilter {
    fn default() -> Self {
        TriangleFilter::new(Vector2f { x: 2.0, y: 2.0 })
    }
}

impl Filter for TriangleFilter {
    fn evaluate(&self, p: &Point2f) -> Float {
        (0.0 as Float).max(self.radius.x - p.x.abs())
            * (0.0 as Float).max(self.radius.y - p.y.abs())
    }
    fn get_radius(&self) -> Vector2f {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tent_peaks_at_center() {
        let filter: TriangleFilter = TriangleFilter::default();
        assert_eq!(filter.evaluate(&Point2f { x: 0.0, y: 0.0 }), 4.0);
        assert_eq!(filter.evaluate(&Point2f { x: 2.5, y: 0.0 }), 0.0);
        assert!(filter.evaluate(&Point2f { x: 1.0, y: 1.0 }) < 4.0);
    }
}
