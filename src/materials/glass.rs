// std
use std::sync::Arc;
// pbrt
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{Bsdf, Bxdf, Fresnel, FresnelDielectric, FresnelSpecular};
use crate::core::reflection::{SpecularReflection, SpecularTransmission};
use crate::core::texture::Texture;

/// Perfectly smooth dielectric: Fresnel weighted specular
/// reflection and transmission.
pub struct GlassMaterial {
    pub kr: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 1.0
    pub kt: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 1.0
    pub index: Arc<dyn Texture<Float> + Sync + Send>, // default: 1.5
}

impl GlassMaterial {
    pub fn new(
        kr: Arc<dyn Texture<Spectrum> + Sync + Send>,
        kt: Arc<dyn Texture<Spectrum> + Sync + Send>,
        index: Arc<dyn Texture<Float> + Sync + Send>,
    ) -> Self {
        GlassMaterial { kr, kt, index }
    }
}

impl Material for GlassMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        let eta: Float = self.index.evaluate(si);
        let r: Spectrum = self.kr.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        let t: Spectrum = self.kt.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        let mut bsdf: Bsdf = Bsdf::new(si, eta);
        if r.is_black() && t.is_black() {
            si.bsdf = Some(bsdf);
            return;
        }
        if allow_multiple_lobes {
            bsdf.add(Bxdf::FresnelSpec(FresnelSpecular::new(r, t, 1.0 as Float, eta, mode)));
        } else {
            if !r.is_black() {
                let fresnel: Fresnel = Fresnel::Dielectric(FresnelDielectric {
                    eta_i: 1.0 as Float,
                    eta_t: eta,
                });
                bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(r, fresnel)));
            }
            if !t.is_black() {
                bsdf.add(Bxdf::SpecTrans(SpecularTransmission::new(t, 1.0, eta, mode)));
            }
        }
        si.bsdf = Some(bsdf);
    }
}
