// std
use std::sync::Arc;
// pbrt
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::pbrt::{clamp_t, Float, Spectrum};
use crate::core::reflection::{Bsdf, Bxdf, LambertianReflection, OrenNayar};
use crate::core::texture::Texture;

/// Describes a purely diffuse surface.
pub struct MatteMaterial {
    pub kd: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 0.5
    pub sigma: Arc<dyn Texture<Float> + Sync + Send>, // default: 0.0
}

impl MatteMaterial {
    pub fn new(
        kd: Arc<dyn Texture<Spectrum> + Sync + Send>,
        sigma: Arc<dyn Texture<Float> + Sync + Send>,
    ) -> Self {
        MatteMaterial { kd, sigma }
    }
    pub fn bsdf(&self, si: &SurfaceInteraction) -> Bsdf {
        let mut bsdf: Bsdf = Bsdf::new(si, 1.0);
        let r: Spectrum = self.kd.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        let sig: Float = clamp_t(self.sigma.evaluate(si), 0.0 as Float, 90.0 as Float);
        if !r.is_black() {
            if sig == 0.0 {
                bsdf.add(Bxdf::LambertianRefl(LambertianReflection::new(r)));
            } else {
                bsdf.add(Bxdf::OrenNayarRefl(OrenNayar::new(r, sig)));
            }
        }
        bsdf
    }
}

impl Material for MatteMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        si.bsdf = Some(self.bsdf(si));
    }
}
