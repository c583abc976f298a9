//! The **Sampler** hands out the sample values a path consumes,
//! dimension by dimension. Integrators must request the same number
//! of dimensions for every sample of a pixel, otherwise stratified
//! samplers lose their structure.

// pbrt
use crate::core::camera::CameraSample;
use crate::core::geometry::{Point2f, Point2i};
use crate::core::pbrt::Float;
use crate::samplers::random::RandomSampler;
use crate::samplers::stratified::StratifiedSampler;

#[derive(Debug, Clone)]
pub enum Sampler {
    Random(RandomSampler),
    Stratified(StratifiedSampler),
}

impl Sampler {
    /// An independent copy for one worker and one tile.
    pub fn clone_with_seed(&self, seed: u64) -> Sampler {
        match self {
            Sampler::Random(sampler) => Sampler::Random(sampler.clone_with_seed(seed)),
            Sampler::Stratified(sampler) => Sampler::Stratified(sampler.clone_with_seed(seed)),
        }
    }
    pub fn start_pixel(&mut self, p: &Point2i) {
        match self {
            Sampler::Random(sampler) => sampler.start_pixel(p),
            Sampler::Stratified(sampler) => sampler.start_pixel(p),
        }
    }
    pub fn get_1d(&mut self) -> Float {
        match self {
            Sampler::Random(sampler) => sampler.get_1d(),
            Sampler::Stratified(sampler) => sampler.get_1d(),
        }
    }
    pub fn get_2d(&mut self) -> Point2f {
        match self {
            Sampler::Random(sampler) => sampler.get_2d(),
            Sampler::Stratified(sampler) => sampler.get_2d(),
        }
    }
    /// Film position (pixel plus offset), time and lens position, in
    /// that order of consumption.
    pub fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let p_film: Point2f = Point2f::from(*p_raster) + self.get_2d();
        let time: Float = self.get_1d();
        let p_lens: Point2f = self.get_2d();
        CameraSample {
            p_film,
            p_lens,
            time,
        }
    }
    /// Advance to the next sample of the current pixel; false once the
    /// pixel has received all its samples.
    pub fn start_next_sample(&mut self) -> bool {
        match self {
            Sampler::Random(sampler) => sampler.start_next_sample(),
            Sampler::Stratified(sampler) => sampler.start_next_sample(),
        }
    }
    pub fn reseed(&mut self, seed: u64) {
        match self {
            Sampler::Random(sampler) => sampler.reseed(seed),
            Sampler::Stratified(sampler) => sampler.reseed(seed),
        }
    }
    pub fn get_current_pixel(&self) -> Point2i {
        match self {
            Sampler::Random(sampler) => sampler.current_pixel,
            Sampler::Stratified(sampler) => sampler.current_pixel,
        }
    }
    pub fn get_current_sample_number(&self) -> i64 {
        match self {
            Sampler::Random(sampler) => sampler.current_pixel_sample_index,
            Sampler::Stratified(sampler) => sampler.current_pixel_sample_index,
        }
    }
    pub fn get_samples_per_pixel(&self) -> i64 {
        match self {
            Sampler::Random(sampler) => sampler.samples_per_pixel,
            Sampler::Stratified(sampler) => sampler.samples_per_pixel,
        }
    }
}
