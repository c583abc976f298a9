//! Rendering an image of the scene is handled by an instance of a
//! type that implements the **SamplerIntegrator** interface. This
//! module also holds the direct lighting estimators the path
//! integrator builds on.

// std
use std::sync::Arc;
// pbrt
use crate::core::geometry::vec3_abs_dot_nrmf;
use crate::core::geometry::{Point2f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::{is_delta_light, Light, LightSample};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{BsdfSample, BxdfType};
use crate::core::sampler::Sampler;
use crate::core::sampling::power_heuristic;
use crate::core::sampling::Distribution1D;
use crate::core::scene::Scene;

pub trait SamplerIntegrator {
    /// Called once before rendering starts, after the scene is
    /// complete.
    fn preprocess(&mut self, scene: &Scene);
    /// Returns the incident radiance at the origin of a given
    /// ray. Uses the scene's intersect routine to calculate a
    /// **SurfaceInteraction** and spawns rays if necessary.
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut Sampler, depth: i32) -> Spectrum;
}

/// Estimate direct lighting for only one randomly chosen light and
/// divide by the probability of having chosen it. Always consumes
/// one 1D and two 2D sample dimensions.
pub fn uniform_sample_one_light(
    it: &SurfaceInteraction,
    scene: &Scene,
    sampler: &mut Sampler,
    light_distrib: Option<&Distribution1D>,
) -> Spectrum {
    let u_choice: Float = sampler.get_1d();
    let u_light: Point2f = sampler.get_2d();
    let u_scattering: Point2f = sampler.get_2d();
    let n_lights: usize = scene.lights.len();
    if n_lights == 0_usize {
        return Spectrum::default();
    }
    let (light_num, pdf) = match light_distrib {
        Some(light_distribution) if light_distribution.count() == n_lights => {
            light_distribution.sample_discrete(u_choice)
        }
        _ => (
            std::cmp::min((u_choice * n_lights as Float) as usize, n_lights - 1),
            1.0 as Float / n_lights as Float,
        ),
    };
    if pdf == 0.0 as Float {
        return Spectrum::default();
    }
    let light: &Arc<dyn Light + Sync + Send> = &scene.lights[light_num];
    estimate_direct(it, &u_scattering, light, &u_light, scene, false) / pdf
}

/// True if `light` is the very light object attached to the
/// primitive that `isect` lies on.
fn is_light_of(isect: &SurfaceInteraction, light: &Arc<dyn Light + Sync + Send>) -> bool {
    if let Some(primitive) = isect.primitive {
        if let Some(ref area_light) = primitive.area_light {
            let pa = Arc::as_ptr(area_light) as *const u8;
            let pl = Arc::as_ptr(light) as *const u8;
            return pa == pl;
        }
    }
    false
}

/// Computes a direct lighting estimate for a single light source
/// sample, combining light and BSDF sampling with the power
/// heuristic.
pub fn estimate_direct(
    it: &SurfaceInteraction,
    u_scattering: &Point2f,
    light: &Arc<dyn Light + Sync + Send>,
    u_light: &Point2f,
    scene: &Scene,
    specular: bool,
) -> Spectrum {
    let bsdf_flags: u8 = if specular {
        BxdfType::BsdfAll as u8
    } else {
        BxdfType::BsdfAll as u8 & !(BxdfType::BsdfSpecular as u8)
    };
    let bsdf = match it.bsdf {
        Some(ref bsdf) => bsdf,
        None => return Spectrum::default(),
    };
    let wo: Vector3f = it.common.wo;
    let mut ld: Spectrum = Spectrum::default();
    // sample light source with multiple importance sampling
    let ls: LightSample = light.sample_li(&it.common, u_light);
    if ls.pdf > 0.0 as Float && !ls.li.is_black() {
        // evaluate BSDF for light sampling strategy
        let f: Spectrum =
            bsdf.f(&wo, &ls.wi, bsdf_flags) * vec3_abs_dot_nrmf(&ls.wi, &it.shading.n);
        let scattering_pdf: Float = bsdf.pdf(&wo, &ls.wi, bsdf_flags);
        if !f.is_black() && ls.vis.unoccluded(scene) {
            if is_delta_light(light.get_flags()) {
                ld += f * ls.li / ls.pdf;
            } else {
                let weight: Float = power_heuristic(1_u8, ls.pdf, 1_u8, scattering_pdf);
                ld += f * ls.li * (weight / ls.pdf);
            }
        }
    }
    // sample BSDF with multiple importance sampling
    if !is_delta_light(light.get_flags()) {
        let bs: BsdfSample = bsdf.sample_f(&wo, u_scattering, bsdf_flags);
        let f: Spectrum = bs.f * vec3_abs_dot_nrmf(&bs.wi, &it.shading.n);
        let sampled_specular: bool = (bs.sampled_type & BxdfType::BsdfSpecular as u8) != 0_u8;
        if !f.is_black() && bs.pdf > 0.0 as Float {
            // account for light contributions along sampled direction wi
            let mut weight: Float = 1.0;
            if !sampled_specular {
                let light_pdf: Float = light.pdf_li(&it.common, &bs.wi);
                if light_pdf == 0.0 as Float {
                    return ld;
                }
                weight = power_heuristic(1_u8, bs.pdf, 1_u8, light_pdf);
            }
            // add light contribution from material sampling
            let ray: Ray = it.spawn_ray(&bs.wi);
            let li: Spectrum = match scene.intersect(&ray) {
                Some(light_isect) => {
                    if is_light_of(&light_isect, light) {
                        light_isect.le(&-bs.wi)
                    } else {
                        Spectrum::default()
                    }
                }
                None => light.le(&ray),
            };
            if !li.is_black() {
                ld += f * li * (weight / bs.pdf);
            }
        }
    }
    ld
}

/// Light selection probabilities proportional to emitted power
/// (luminance of `Light::power`).
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Arc<Distribution1D>> {
    if scene.lights.is_empty() {
        return None;
    }
    let light_power: Vec<Float> = scene
        .lights
        .iter()
        .map(|light| light.power().y().max(0.0 as Float))
        .collect();
    Some(Arc::new(Distribution1D::new(light_power)))
}
