// std
use std::sync::Arc;
// pbrt
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{Bsdf, Bxdf, Fresnel, FresnelNoOp, SpecularReflection};
use crate::core::texture::Texture;

/// A simple mirror, modeled with perfect specular reflection.
pub struct MirrorMaterial {
    pub kr: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 0.9
}

impl MirrorMaterial {
    pub fn new(kr: Arc<dyn Texture<Spectrum> + Sync + Send>) -> Self {
        MirrorMaterial { kr }
    }
}

impl Material for MirrorMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let mut bsdf: Bsdf = Bsdf::new(si, 1.0);
        let r: Spectrum = self.kr.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        if !r.is_black() {
            bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(
                r,
                Fresnel::NoOp(FresnelNoOp {}),
            )));
        }
        si.bsdf = Some(bsdf);
    }
}
