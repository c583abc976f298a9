// pbrt
use crate::core::geometry::{Point2f, Point2i};
use crate::core::pbrt::Float;
use crate::core::rng::Rng;
use crate::core::sampling::{shuffle, stratified_sample_1d, stratified_sample_2d};

/// Jittered stratified samples for the first `n_sampled_dimensions`
/// 1D and 2D requests of each pixel sample; later requests fall back
/// to uniform random values.
///
/// Strata of every dimension are shuffled independently per pixel so
/// that dimensions do not correlate.
#[derive(Debug, Clone)]
pub struct StratifiedSampler {
    pub samples_per_pixel: i64,
    pub x_pixel_samples: usize,
    pub y_pixel_samples: usize,
    pub jitter_samples: bool,
    pub samples_1d: Vec<Vec<Float>>,
    pub samples_2d: Vec<Vec<Point2f>>,
    pub current_1d_dimension: usize,
    pub current_2d_dimension: usize,
    pub rng: Rng,
    pub current_pixel: Point2i,
    pub current_pixel_sample_index: i64,
}

impl StratifiedSampler {
    pub fn new(
        x_pixel_samples: usize,
        y_pixel_samples: usize,
        jitter_samples: bool,
        n_sampled_dimensions: usize,
    ) -> Self {
        let spp: usize = x_pixel_samples * y_pixel_samples;
        StratifiedSampler {
            samples_per_pixel: spp as i64,
            x_pixel_samples,
            y_pixel_samples,
            jitter_samples,
            samples_1d: vec![vec![0.0 as Float; spp]; n_sampled_dimensions],
            samples_2d: vec![vec![Point2f::default(); spp]; n_sampled_dimensions],
            current_1d_dimension: 0,
            current_2d_dimension: 0,
            rng: Rng::default(),
            current_pixel: Point2i::default(),
            current_pixel_sample_index: 0_i64,
        }
    }
    pub fn clone_with_seed(&self, seed: u64) -> StratifiedSampler {
        let mut sampler: StratifiedSampler = self.clone();
        sampler.reseed(seed);
        sampler
    }
    pub fn start_pixel(&mut self, p: &Point2i) {
        let jitter: bool = self.jitter_samples;
        for samples in self.samples_1d.iter_mut() {
            stratified_sample_1d(samples, &mut self.rng, jitter);
            shuffle(samples, &mut self.rng);
        }
        for samples in self.samples_2d.iter_mut() {
            stratified_sample_2d(
                samples,
                self.x_pixel_samples,
                self.y_pixel_samples,
                &mut self.rng,
                jitter,
            );
            shuffle(samples, &mut self.rng);
        }
        self.current_pixel = *p;
        self.current_pixel_sample_index = 0_i64;
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
    }
    pub fn get_1d(&mut self) -> Float {
        let idx: usize = self.current_pixel_sample_index as usize;
        if self.current_1d_dimension < self.samples_1d.len() {
            let u: Float = self.samples_1d[self.current_1d_dimension][idx];
            self.current_1d_dimension += 1;
            u
        } else {
            self.rng.uniform_float()
        }
    }
    pub fn get_2d(&mut self) -> Point2f {
        let idx: usize = self.current_pixel_sample_index as usize;
        if self.current_2d_dimension < self.samples_2d.len() {
            let u: Point2f = self.samples_2d[self.current_2d_dimension][idx];
            self.current_2d_dimension += 1;
            u
        } else {
            let x: Float = self.rng.uniform_float();
            let y: Float = self.rng.uniform_float();
            Point2f { x, y }
        }
    }
    pub fn reseed(&mut self, seed: u64) {
        self.rng.set_sequence(seed);
    }
    pub fn start_next_sample(&mut self) -> bool {
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
        self.current_pixel_sample_index += 1_i64;
        self.current_pixel_sample_index < self.samples_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_dimension_is_stratified_per_pixel() {
        let mut sampler: StratifiedSampler = StratifiedSampler::new(2, 2, true, 2);
        sampler.reseed(11);
        sampler.start_pixel(&Point2i { x: 3, y: 4 });
        let mut values: Vec<Float> = Vec::new();
        loop {
            values.push(sampler.get_1d());
            // beyond the stratified dimensions
            sampler.get_1d();
            let extra: Float = sampler.get_1d();
            assert!((0.0..1.0).contains(&extra));
            if !sampler.start_next_sample() {
                break;
            }
        }
        assert_eq!(values.len(), 4);
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (i, v) in values.iter().enumerate() {
            assert!(*v >= i as Float * 0.25 && *v < (i + 1) as Float * 0.25);
        }
    }
}
