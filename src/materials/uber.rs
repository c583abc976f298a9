// std
use std::sync::Arc;
// pbrt
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::{Material, TransportMode};
use crate::core::microfacet::TrowbridgeReitzDistribution;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{Bsdf, Bxdf, Fresnel, FresnelDielectric, LambertianReflection};
use crate::core::reflection::{MicrofacetReflection, SpecularReflection, SpecularTransmission};
use crate::core::texture::Texture;

/// A catch-all surface: diffuse base, glossy coat, perfect specular
/// reflection and transmission, and partial opacity, each present
/// only where its coefficient is non-black.
pub struct UberMaterial {
    pub kd: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 0.25
    pub ks: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 0.25
    pub kr: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 0.0
    pub kt: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 0.0
    pub opacity: Arc<dyn Texture<Spectrum> + Sync + Send>, // default: 1.0
    pub roughness: Arc<dyn Texture<Float> + Sync + Send>, // default: 0.1
    pub u_roughness: Option<Arc<dyn Texture<Float> + Sync + Send>>,
    pub v_roughness: Option<Arc<dyn Texture<Float> + Sync + Send>>,
    pub eta: Arc<dyn Texture<Float> + Sync + Send>, // default: 1.5
    pub remap_roughness: bool,
}

impl UberMaterial {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kd: Arc<dyn Texture<Spectrum> + Sync + Send>,
        ks: Arc<dyn Texture<Spectrum> + Sync + Send>,
        kr: Arc<dyn Texture<Spectrum> + Sync + Send>,
        kt: Arc<dyn Texture<Spectrum> + Sync + Send>,
        roughness: Arc<dyn Texture<Float> + Sync + Send>,
        u_roughness: Option<Arc<dyn Texture<Float> + Sync + Send>>,
        v_roughness: Option<Arc<dyn Texture<Float> + Sync + Send>>,
        opacity: Arc<dyn Texture<Spectrum> + Sync + Send>,
        eta: Arc<dyn Texture<Float> + Sync + Send>,
        remap_roughness: bool,
    ) -> Self {
        UberMaterial {
            kd,
            ks,
            kr,
            kt,
            opacity,
            roughness,
            u_roughness,
            v_roughness,
            eta,
            remap_roughness,
        }
    }
    fn alphas(&self, si: &SurfaceInteraction) -> (Float, Float) {
        let rough: Float = self.roughness.evaluate(si);
        let mut u_rough: Float = match self.u_roughness {
            Some(ref u_roughness) => u_roughness.evaluate(si),
            None => rough,
        };
        let mut v_rough: Float = match self.v_roughness {
            Some(ref v_roughness) => v_roughness.evaluate(si),
            None => rough,
        };
        if self.remap_roughness {
            u_rough = TrowbridgeReitzDistribution::roughness_to_alpha(u_rough);
            v_rough = TrowbridgeReitzDistribution::roughness_to_alpha(v_rough);
        }
        (u_rough, v_rough)
    }
}

impl Material for UberMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let e: Float = self.eta.evaluate(si);
        let op: Spectrum = self.opacity.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        // light passing straight through the transparent part
        let t: Spectrum = (Spectrum::new(1.0) - op).clamp(0.0 as Float, Float::INFINITY);
        // a partly transparent surface has no interior of its own
        let mut bsdf: Bsdf = Bsdf::new(si, if t.is_black() { e } else { 1.0 });
        if !t.is_black() {
            bsdf.add(Bxdf::SpecTrans(SpecularTransmission::new(t, 1.0, 1.0, mode)));
        }
        let kd: Spectrum = op * self.kd.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        if !kd.is_black() {
            bsdf.add(Bxdf::LambertianRefl(LambertianReflection::new(kd)));
        }
        let ks: Spectrum = op * self.ks.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        if !ks.is_black() {
            let (alpha_x, alpha_y) = self.alphas(si);
            bsdf.add(Bxdf::MicrofacetRefl(MicrofacetReflection::new(
                ks,
                TrowbridgeReitzDistribution::new(alpha_x, alpha_y, true),
                Fresnel::Dielectric(FresnelDielectric {
                    eta_i: 1.0 as Float,
                    eta_t: e,
                }),
            )));
        }
        let kr: Spectrum = op * self.kr.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        if !kr.is_black() {
            bsdf.add(Bxdf::SpecRefl(SpecularReflection::new(
                kr,
                Fresnel::Dielectric(FresnelDielectric {
                    eta_i: 1.0 as Float,
                    eta_t: e,
                }),
            )));
        }
        let kt: Spectrum = op * self.kt.evaluate(si).clamp(0.0 as Float, Float::INFINITY);
        if !kt.is_black() {
            bsdf.add(Bxdf::SpecTrans(SpecularTransmission::new(kt, 1.0, e, mode)));
        }
        si.bsdf = Some(bsdf);
    }
}
