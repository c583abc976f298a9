//! **Texture** is parameterized by the return type of its evaluation
//! function, so the same code serves **Float** and **Spectrum**
//! textures.

// pbrt
use crate::core::interaction::SurfaceInteraction;

pub trait Texture<T> {
    fn evaluate(&self, si: &SurfaceInteraction) -> T;
}
