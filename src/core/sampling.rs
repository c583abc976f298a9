//! Draw random samples from a chosen probability distribution.
//!
//! Warping functions map canonical uniform samples in `[0, 1)^2` to
//! directions and points, each paired with the density of the result
//! so callers can weight their estimates.

// std
use std::f32::consts::PI;
// pbrt
use crate::core::geometry::{Point2f, Vector2f, Vector3f};
use crate::core::pbrt::Float;
use crate::core::pbrt::{find_interval, INV_4_PI, PI_OVER_2, PI_OVER_4};
use crate::core::rng::{Rng, FLOAT_ONE_MINUS_EPSILON};

/// Piecewise-constant 1D distribution, used to pick lights by power.
#[derive(Debug, Default, Clone)]
pub struct Distribution1D {
    pub func: Vec<Float>,
    pub cdf: Vec<Float>,
    pub func_int: Float,
}

impl Distribution1D {
    pub fn new(func: Vec<Float>) -> Self {
        let n: usize = func.len();
        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0 as Float);
        for i in 1..=n {
            let previous: Float = cdf[i - 1];
            cdf.push(previous + func[i - 1] / n as Float);
        }
        let func_int: Float = cdf[n];
        // an all-zero function degenerates to a uniform distribution
        if func_int == 0.0 as Float {
            for (i, c) in cdf.iter_mut().enumerate().skip(1) {
                *c = i as Float / n as Float;
            }
        } else {
            for c in cdf.iter_mut().skip(1) {
                *c /= func_int;
            }
        }
        Distribution1D {
            func,
            cdf,
            func_int,
        }
    }
    pub fn count(&self) -> usize {
        self.func.len()
    }
    fn offset(&self, u: Float) -> usize {
        let cdf: &[Float] = &self.cdf;
        find_interval(cdf.len() as i32, |index| cdf[index as usize] <= u) as usize
    }
    /// Returns `(x, pdf, offset)` with `x` in `[0, 1)`.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        let offset: usize = self.offset(u);
        let mut du: Float = u - self.cdf[offset];
        let width: Float = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 as Float {
            du /= width;
        }
        let pdf: Float = if self.func_int > 0.0 as Float {
            self.func[offset] / self.func_int
        } else {
            0.0 as Float
        };
        ((offset as Float + du) / self.count() as Float, pdf, offset)
    }
    /// Returns the sampled bucket and its probability.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float) {
        let offset: usize = self.offset(u);
        (offset, self.discrete_pdf(offset))
    }
    pub fn discrete_pdf(&self, index: usize) -> Float {
        if self.func_int > 0.0 as Float {
            self.func[index] / (self.func_int * self.count() as Float)
        } else {
            1.0 as Float / self.count() as Float
        }
    }
}

/// Jittered (or cell-centered) samples, one per stratum of `[0, 1)`.
pub fn stratified_sample_1d(samples: &mut [Float], rng: &mut Rng, jitter: bool) {
    let inv_n_samples: Float = 1.0 as Float / samples.len() as Float;
    for (i, s) in samples.iter_mut().enumerate() {
        let delta: Float = if jitter { rng.uniform_float() } else { 0.5 };
        *s = ((i as Float + delta) * inv_n_samples).min(FLOAT_ONE_MINUS_EPSILON);
    }
}

/// One sample per cell of an `nx` by `ny` grid over `[0, 1)^2`.
pub fn stratified_sample_2d(samples: &mut [Point2f], nx: usize, ny: usize, rng: &mut Rng, jitter: bool) {
    let dx: Float = 1.0 as Float / nx as Float;
    let dy: Float = 1.0 as Float / ny as Float;
    let mut idx: usize = 0;
    for y in 0..ny {
        for x in 0..nx {
            let jx: Float = if jitter { rng.uniform_float() } else { 0.5 };
            let jy: Float = if jitter { rng.uniform_float() } else { 0.5 };
            samples[idx] = Point2f {
                x: ((x as Float + jx) * dx).min(FLOAT_ONE_MINUS_EPSILON),
                y: ((y as Float + jy) * dy).min(FLOAT_ONE_MINUS_EPSILON),
            };
            idx += 1;
        }
    }
}

/// Fisher-Yates shuffle driven by the renderer's own generator.
pub fn shuffle<T>(samples: &mut [T], rng: &mut Rng) {
    let count: usize = samples.len();
    for i in 0..count {
        let other: usize = i + rng.uniform_uint32_bounded((count - i) as u32) as usize;
        samples.swap(i, other);
    }
}

/// Uniformly distribute samples over a unit disk (Shirley-Chiu
/// concentric mapping, which keeps strata compact).
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    let u_offset: Point2f = *u * 2.0 as Float - Vector2f { x: 1.0, y: 1.0 };
    if u_offset.x == 0.0 as Float && u_offset.y == 0.0 as Float {
        return Point2f::default();
    }
    let (r, theta) = if u_offset.x.abs() > u_offset.y.abs() {
        (u_offset.x, PI_OVER_4 * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_2 - PI_OVER_4 * (u_offset.x / u_offset.y))
    };
    Point2f {
        x: theta.cos(),
        y: theta.sin(),
    } * r
}

/// Cosine-weighted hemisphere sampling using Malley's method.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d: Point2f = concentric_sample_disk(u);
    let z: Float = (0.0 as Float).max(1.0 as Float - d.x * d.x - d.y * d.y).sqrt();
    Vector3f { x: d.x, y: d.y, z }
}

pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z: Float = 1.0 as Float - 2.0 as Float * u.x;
    let r: Float = (0.0 as Float).max(1.0 as Float - z * z).sqrt();
    let phi: Float = 2.0 as Float * PI * u.y;
    Vector3f {
        x: r * phi.cos(),
        y: r * phi.sin(),
        z,
    }
}

pub fn uniform_sphere_pdf() -> Float {
    INV_4_PI
}

/// Samples in a cone of directions about the `(0, 0, 1)` axis.
pub fn uniform_sample_cone(u: &Point2f, cos_theta_max: Float) -> Vector3f {
    let cos_theta: Float = (1.0 as Float - u.x) + u.x * cos_theta_max;
    let sin_theta: Float = (0.0 as Float).max(1.0 as Float - cos_theta * cos_theta).sqrt();
    let phi: Float = u.y * 2.0 as Float * PI;
    Vector3f {
        x: phi.cos() * sin_theta,
        y: phi.sin() * sin_theta,
        z: cos_theta,
    }
}

/// Veach's power heuristic with exponent two.
pub fn power_heuristic(nf: u8, f_pdf: Float, ng: u8, g_pdf: Float) -> Float {
    let f: Float = nf as Float * f_pdf;
    let g: Float = ng as Float * g_pdf;
    if f.is_infinite() {
        return 1.0;
    }
    let denom: Float = f * f + g * g;
    if denom == 0.0 as Float {
        0.0
    } else {
        (f * f) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn discrete_sampling_follows_weights() {
        let distrib: Distribution1D = Distribution1D::new(vec![1.0, 3.0]);
        assert_relative_eq!(distrib.discrete_pdf(0), 0.25);
        assert_relative_eq!(distrib.discrete_pdf(1), 0.75);
        assert_eq!(distrib.sample_discrete(0.1).0, 0);
        assert_eq!(distrib.sample_discrete(0.3).0, 1);
        let (x, pdf, offset) = distrib.sample_continuous(0.625);
        assert_eq!(offset, 1);
        assert_relative_eq!(pdf, 1.5);
        assert_relative_eq!(x, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn zero_function_is_uniform() {
        let distrib: Distribution1D = Distribution1D::new(vec![0.0, 0.0, 0.0, 0.0]);
        assert_relative_eq!(distrib.discrete_pdf(2), 0.25);
        assert_eq!(distrib.sample_discrete(0.6).0, 2);
    }

    #[test]
    fn warped_directions_have_unit_length() {
        let mut rng: Rng = Rng::new(3);
        for _ in 0..256 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            assert_relative_eq!(cosine_sample_hemisphere(&u).length(), 1.0, epsilon = 1e-4);
            assert_relative_eq!(uniform_sample_sphere(&u).length(), 1.0, epsilon = 1e-4);
            let w: Vector3f = uniform_sample_cone(&u, 0.9);
            assert!(w.z >= 0.9 - 1e-6);
            let d: Point2f = concentric_sample_disk(&u);
            assert!(d.x * d.x + d.y * d.y <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn stratified_samples_cover_each_stratum() {
        let mut rng: Rng = Rng::new(0);
        let mut samples: Vec<Float> = vec![0.0; 8];
        stratified_sample_1d(&mut samples, &mut rng, true);
        for (i, s) in samples.iter().enumerate() {
            assert!(*s >= i as Float / 8.0 && *s < (i + 1) as Float / 8.0);
        }
        shuffle(&mut samples, &mut rng);
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (i, s) in samples.iter().enumerate() {
            assert!(*s >= i as Float / 8.0 && *s < (i + 1) as Float / 8.0);
        }
    }

    #[test]
    fn power_heuristic_weights_sum_to_one() {
        let a: Float = power_heuristic(1, 0.3, 1, 0.7);
        let b: Float = power_heuristic(1, 0.7, 1, 0.3);
        assert_relative_eq!(a + b, 1.0, epsilon = 1e-6);
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
    }
}
