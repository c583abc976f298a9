//! Probability distributions for choosing which light to sample at a
//! shading point.

// std
use std::sync::Arc;
// others
use strum_macros::{Display, EnumIter, EnumString};
// pbrt
use crate::core::geometry::Point3f;
use crate::core::integrator::compute_light_power_distribution;
use crate::core::pbrt::Float;
use crate::core::sampling::Distribution1D;
use crate::core::scene::Scene;

#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter, clap::ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
pub enum LightSampleStrategy {
    Uniform,
    #[default]
    Power,
}

/// LightDistribution defines a general interface for classes that
/// provide probability distributions for sampling light sources at a
/// given point in space.
pub trait LightDistribution {
    fn lookup(&self, p: &Point3f) -> Arc<Distribution1D>;
}

/// Every light is equally likely, regardless of the point.
pub struct UniformLightDistribution {
    pub distrib: Arc<Distribution1D>,
}

impl UniformLightDistribution {
    pub fn new(scene: &Scene) -> Self {
        let prob: Vec<Float> = vec![1.0 as Float; scene.lights.len()];
        UniformLightDistribution {
            distrib: Arc::new(Distribution1D::new(prob)),
        }
    }
}

impl LightDistribution for UniformLightDistribution {
    fn lookup(&self, _p: &Point3f) -> Arc<Distribution1D> {
        self.distrib.clone()
    }
}

/// Sampling probability proportional to the total emitted power of
/// each light. Lights without power fall back to a uniform choice.
pub struct PowerLightDistribution {
    pub distrib: Arc<Distribution1D>,
}

impl PowerLightDistribution {
    pub fn new(scene: &Scene) -> Self {
        PowerLightDistribution {
            distrib: compute_light_power_distribution(scene)
                .unwrap_or_else(|| Arc::new(Distribution1D::new(Vec::new()))),
        }
    }
}

impl LightDistribution for PowerLightDistribution {
    fn lookup(&self, _p: &Point3f) -> Arc<Distribution1D> {
        self.distrib.clone()
    }
}

/// `None` for scenes without lights.
pub fn create_light_sample_distribution(
    strategy: LightSampleStrategy,
    scene: &Scene,
) -> Option<Box<dyn LightDistribution + Send + Sync>> {
    if scene.lights.is_empty() {
        return None;
    }
    match strategy {
        LightSampleStrategy::Uniform => Some(Box::new(UniformLightDistribution::new(scene))),
        LightSampleStrategy::Power => Some(Box::new(PowerLightDistribution::new(scene))),
    }
}
