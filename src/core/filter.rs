//! Reconstruction filters weight each sample's contribution to the
//! pixels around it on the film.

// pbrt
use crate::core::geometry::{Point2f, Vector2f};
use crate::core::pbrt::Float;

pub trait Filter {
    /// Filter value at `p`, relative to the filter center.
    fn evaluate(&self, p: &Point2f) -> Float;
    /// Half-widths of the filter support along x and y.
    fn get_radius(&self) -> Vector2f;
}
