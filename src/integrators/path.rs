// std
use std::sync::Arc;
// others
use log::debug;
// pbrt
use crate::core::geometry::vec3_abs_dot_nrmf;
use crate::core::geometry::{Ray, Vector3f};
use crate::core::integrator::uniform_sample_one_light;
use crate::core::integrator::SamplerIntegrator;
use crate::core::lightdistrib::{create_light_sample_distribution, LightDistribution};
use crate::core::lightdistrib::LightSampleStrategy;
use crate::core::material::TransportMode;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{BsdfSample, BxdfType};
use crate::core::sampler::Sampler;
use crate::core::sampling::Distribution1D;
use crate::core::scene::Scene;

/// Number of bounces a path makes before Russian roulette may end it.
pub const RR_MIN_BOUNCES: u32 = 3;

/// Path Tracing (Global Illumination)
pub struct PathIntegrator {
    max_depth: u32,
    rr_threshold: Float, // 1.0
    light_sample_strategy: LightSampleStrategy,
    light_distribution: Option<Box<dyn LightDistribution + Send + Sync>>,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, rr_threshold: Float, light_sample_strategy: LightSampleStrategy) -> Self {
        PathIntegrator {
            max_depth,
            rr_threshold,
            light_sample_strategy,
            light_distribution: None,
        }
    }
    pub fn get_max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl SamplerIntegrator for PathIntegrator {
    fn preprocess(&mut self, scene: &Scene) {
        self.light_distribution = create_light_sample_distribution(self.light_sample_strategy, scene);
        debug!(
            "path integrator: max depth {}, rr threshold {}, {} light sampling",
            self.max_depth, self.rr_threshold, self.light_sample_strategy
        );
    }
    fn li(&self, r: &Ray, scene: &Scene, sampler: &mut Sampler, _depth: i32) -> Spectrum {
        let mut l: Spectrum = Spectrum::default();
        if self.max_depth == 0 {
            return l;
        }
        let mut beta: Spectrum = Spectrum::new(1.0 as Float);
        let mut ray: Ray = r.clone();
        let mut specular_bounce: bool = false;
        let mut bounces: u32 = 0_u32;
        let non_specular: u8 = BxdfType::BsdfAll as u8 & !(BxdfType::BsdfSpecular as u8);
        loop {
            // intersect ray with scene and store intersection in isect
            let mut isect = match scene.intersect(&ray) {
                Some(isect) => isect,
                None => {
                    // add emitted light from the environment
                    if bounces == 0 || specular_bounce {
                        for light in &scene.infinite_lights {
                            l += beta * light.le(&ray);
                        }
                    }
                    // terminate path if ray escaped
                    break;
                }
            };
            // possibly add emitted light at intersection
            if bounces == 0 || specular_bounce {
                l += beta * isect.le(&-ray.d);
            }
            // terminate path if max_depth was reached
            if bounces >= self.max_depth {
                break;
            }
            isect.compute_scattering_functions(TransportMode::Radiance, true);
            let bsdf = match isect.bsdf {
                Some(ref bsdf) if bsdf.num_components(BxdfType::BsdfAll as u8) > 0 => bsdf,
                // emitter only, nothing scatters
                _ => break,
            };
            // sample illumination from lights to find path
            // contribution, skipped for perfectly specular BSDFs
            if bsdf.num_components(non_specular) > 0 {
                let distrib: Option<Arc<Distribution1D>> = self
                    .light_distribution
                    .as_ref()
                    .map(|ld| ld.lookup(&isect.common.p));
                let ld: Spectrum = beta
                    * uniform_sample_one_light(&isect, scene, sampler, distrib.as_deref());
                l += ld;
            } else {
                // keep the per-bounce sample dimensions fixed
                sampler.get_1d();
                sampler.get_2d();
                sampler.get_2d();
            }
            // sample BSDF to get new path direction
            let wo: Vector3f = -ray.d;
            let bs: BsdfSample = bsdf.sample_f(&wo, &sampler.get_2d(), BxdfType::BsdfAll as u8);
            if bs.f.is_black() || bs.pdf == 0.0 as Float {
                break;
            }
            beta = beta * bs.f * (vec3_abs_dot_nrmf(&bs.wi, &isect.shading.n) / bs.pdf);
            specular_bounce = (bs.sampled_type & BxdfType::BsdfSpecular as u8) != 0_u8;
            ray = isect.spawn_ray(&bs.wi);
            // possibly terminate the path with Russian roulette
            let max_beta: Float = beta.max_component_value();
            if max_beta < self.rr_threshold && bounces > RR_MIN_BOUNCES {
                let q: Float = (0.05 as Float).max(1.0 as Float - max_beta);
                if sampler.get_1d() < q {
                    break;
                }
                beta = beta / (1.0 as Float - q);
            }
            bounces += 1_u32;
        }
        l
    }
}
