// pbrt
use crate::core::geometry::{Point2f, Point2i};
use crate::core::pbrt::Float;
use crate::core::rng::Rng;

/// Independent uniform samples for every dimension.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    pub samples_per_pixel: i64,
    pub rng: Rng,
    pub current_pixel: Point2i,
    pub current_pixel_sample_index: i64,
}

impl RandomSampler {
    pub fn new(samples_per_pixel: i64) -> Self {
        RandomSampler {
            samples_per_pixel,
            rng: Rng::default(),
            current_pixel: Point2i::default(),
            current_pixel_sample_index: 0_i64,
        }
    }
    pub fn clone_with_seed(&self, seed: u64) -> RandomSampler {
        let mut sampler: RandomSampler = self.clone();
        sampler.reseed(seed);
        sampler
    }
    pub fn start_pixel(&mut self, p: &Point2i) {
        self.current_pixel = *p;
        self.current_pixel_sample_index = 0_i64;
    }
    pub fn get_1d(&mut self) -> Float {
        debug_assert!(self.current_pixel_sample_index < self.samples_per_pixel);
        self.rng.uniform_float()
    }
    pub fn get_2d(&mut self) -> Point2f {
        debug_assert!(self.current_pixel_sample_index < self.samples_per_pixel);
        // x first, keeps sequences stable
        let x: Float = self.rng.uniform_float();
        let y: Float = self.rng.uniform_float();
        Point2f { x, y }
    }
    pub fn reseed(&mut self, seed: u64) {
        self.rng.set_sequence(seed);
    }
    pub fn start_next_sample(&mut self) -> bool {
        self.current_pixel_sample_index += 1_i64;
        self.current_pixel_sample_index < self.samples_per_pixel
    }
}
