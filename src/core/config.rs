//! Render settings shared by the library entry points and the
//! command line front end.

// others
use clap::ValueEnum;
use strum_macros::{Display, EnumIter, EnumString};
// pbrt
use crate::accelerators::bvh::SplitMethod;
use crate::core::error::ConfigError;
use crate::core::filter::Filter;
use crate::core::geometry::Vector2f;
use crate::core::lightdistrib::LightSampleStrategy;
use crate::core::pbrt::Float;
use crate::core::sampler::Sampler;
use crate::filters::boxfilter::BoxFilter;
use crate::filters::triangle::TriangleFilter;
use crate::samplers::random::RandomSampler;
use crate::samplers::stratified::StratifiedSampler;

/// Stratified sample dimensions per pixel sample; later requests are
/// plain random numbers.
pub const STRATIFIED_DIMENSIONS: usize = 8;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum SamplerKind {
    Random,
    #[default]
    Stratified,
}

/// Pixel reconstruction filter of the film.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum FilterKind {
    #[default]
    Box,
    Triangle,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum SceneKind {
    #[default]
    CornellBox,
    EmissiveSphere,
    Spheres,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub samples_per_pixel: u32,
    pub sampler: SamplerKind,
    pub filter: FilterKind,
    /// 0 renders black
    pub max_depth: u32,
    pub rr_threshold: Float,
    pub light_sample_strategy: LightSampleStrategy,
    pub split_method: SplitMethod,
    pub max_prims_in_node: usize,
    /// 0 uses every available core
    pub num_threads: usize,
    pub tile_size: i32,
    pub output: String,
    pub scene: SceneKind,
    pub progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            x_resolution: 400,
            y_resolution: 400,
            samples_per_pixel: 16,
            sampler: SamplerKind::default(),
            filter: FilterKind::default(),
            max_depth: 5,
            rr_threshold: 1.0,
            light_sample_strategy: LightSampleStrategy::default(),
            split_method: SplitMethod::default(),
            max_prims_in_node: 4,
            num_threads: 0,
            tile_size: 16,
            output: String::from("pathtracer.png"),
            scene: SceneKind::default(),
            progress: true,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_resolution <= 0 || self.y_resolution <= 0 {
            return Err(ConfigError::ZeroResolution {
                x: self.x_resolution,
                y: self.y_resolution,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.tile_size <= 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.max_prims_in_node == 0 || self.max_prims_in_node > 255 {
            return Err(ConfigError::MaxPrimsInNode(self.max_prims_in_node));
        }
        if !(0.0..=1.0).contains(&self.rr_threshold) {
            return Err(ConfigError::RrThreshold(self.rr_threshold));
        }
        if self.output.is_empty() {
            return Err(ConfigError::EmptyOutput);
        }
        Ok(())
    }
    pub fn num_cores(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }
    /// Box filter of half a pixel, or a triangle filter of two pixels.
    pub fn create_filter(&self) -> Box<dyn Filter + Sync + Send> {
        match self.filter {
            FilterKind::Box => Box::new(BoxFilter::new(Vector2f { x: 0.5, y: 0.5 })),
            FilterKind::Triangle => Box::new(TriangleFilter::new(Vector2f { x: 2.0, y: 2.0 })),
        }
    }
    /// Stratified sampling splits the pixel into the most square grid
    /// whose cell count equals `samples_per_pixel`.
    pub fn create_sampler(&self) -> Sampler {
        let spp: usize = self.samples_per_pixel.max(1) as usize;
        match self.sampler {
            SamplerKind::Random => Sampler::Random(RandomSampler::new(spp as i64)),
            SamplerKind::Stratified => {
                let mut x: usize = (spp as Float).sqrt().floor() as usize;
                while x > 1 && spp % x != 0 {
                    x -= 1;
                }
                let x: usize = x.max(1);
                Sampler::Stratified(StratifiedSampler::new(x, spp / x, true, STRATIFIED_DIMENSIONS))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let config = RenderConfig {
            y_resolution: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroResolution { x: 400, y: 0 })
        );
        let config = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSamples));
        let config = RenderConfig {
            max_prims_in_node: 256,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MaxPrimsInNode(256)));
        let config = RenderConfig {
            rr_threshold: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RrThreshold(1.5)));
    }

    #[test]
    fn stratified_grid_matches_sample_count() {
        for spp in &[1_u32, 6, 7, 16] {
            let config = RenderConfig {
                samples_per_pixel: *spp,
                ..Default::default()
            };
            assert_eq!(config.create_sampler().get_samples_per_pixel(), *spp as i64);
        }
    }

    #[test]
    fn scene_names_parse() {
        assert_eq!("cornell-box".parse::<SceneKind>(), Ok(SceneKind::CornellBox));
        assert_eq!(SceneKind::EmissiveSphere.to_string(), "emissive-sphere");
        assert_eq!(
            "uniform".parse::<LightSampleStrategy>(),
            Ok(LightSampleStrategy::Uniform)
        );
    }
}
