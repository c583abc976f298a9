// pbrt
use crate::core::interaction::SurfaceInteraction;
use crate::core::texture::Texture;

/// Returns the same value no matter where it is evaluated.
#[derive(Debug, Copy, Clone)]
pub struct ConstantTexture<T> {
    pub value: T,
}

impl<T: Copy> ConstantTexture<T> {
    pub fn new(value: T) -> Self {
        ConstantTexture { value }
    }
}

impl<T: Copy> Texture<T> for ConstantTexture<T> {
    fn evaluate(&self, _si: &SurfaceInteraction) -> T {
        self.value
    }
}
