//! The abstract **Camera** interface. A camera turns a point on the
//! film (plus a lens position and a time) into a world-space ray and
//! owns the film the integrator writes to.

// std
use std::sync::Arc;
// pbrt
use crate::core::film::Film;
use crate::core::geometry::{Point2f, Ray};
use crate::core::pbrt::Float;

pub trait Camera {
    /// Returns the world-space ray for `sample` together with a
    /// weight the radiance along it has to be scaled by.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);
    fn get_film(&self) -> Arc<Film>;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct CameraSample {
    pub p_film: Point2f,
    pub p_lens: Point2f,
    pub time: Float,
}
