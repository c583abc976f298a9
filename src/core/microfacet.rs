//! Microfacet distributions describe rough surfaces statistically,
//! as a collection of small perfectly specular facets whose normals
//! `wh` follow the distribution `D(wh)`. All directions are in the
//! local shading frame.

// std
use std::f32::consts::PI;
// pbrt
use crate::core::geometry::{spherical_direction, vec3_dot_vec3f};
use crate::core::geometry::{Point2f, Vector3f};
use crate::core::pbrt::Float;
use crate::core::reflection::{abs_cos_theta, cos_2_phi, cos_2_theta, cos_phi, cos_theta};
use crate::core::reflection::{sin_2_phi, sin_phi, tan_2_theta, tan_theta};
use crate::core::reflection::vec3_same_hemisphere_vec3;

pub trait MicrofacetDistribution {
    /// Differential area of microfacets with normal `wh`.
    fn d(&self, wh: &Vector3f) -> Float;
    /// Invisible masked microfacet area per visible area.
    fn lambda(&self, w: &Vector3f) -> Float;
    fn g1(&self, w: &Vector3f) -> Float {
        1.0 as Float / (1.0 as Float + self.lambda(w))
    }
    /// Masking-shadowing for a pair of directions.
    fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 as Float / (1.0 as Float + self.lambda(wo) + self.lambda(wi))
    }
    fn pdf(&self, wo: &Vector3f, wh: &Vector3f) -> Float {
        if self.get_sample_visible_area() {
            self.d(wh) * self.g1(wo) * vec3_dot_vec3f(wo, wh).abs() / abs_cos_theta(wo)
        } else {
            self.d(wh) * abs_cos_theta(wh)
        }
    }
    fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f;
    fn get_sample_visible_area(&self) -> bool;
}

/// Trowbridge-Reitz (GGX) distribution, possibly anisotropic. Its
/// tails fall off more slowly than Beckmann's.
#[derive(Debug, Copy, Clone)]
pub struct TrowbridgeReitzDistribution {
    pub alpha_x: Float,
    pub alpha_y: Float,
    pub sample_visible_area: bool,
}

impl TrowbridgeReitzDistribution {
    pub fn new(alpha_x: Float, alpha_y: Float, sample_visible_area: bool) -> Self {
        // alpha 0 is a mirror, which the delta lobes handle instead
        TrowbridgeReitzDistribution {
            alpha_x: alpha_x.max(1e-4 as Float),
            alpha_y: alpha_y.max(1e-4 as Float),
            sample_visible_area,
        }
    }
    /// Map a user facing roughness in `[0, 1]` to alpha.
    pub fn roughness_to_alpha(roughness: Float) -> Float {
        let x: Float = roughness.max(1e-3 as Float).ln();
        1.62142
            + 0.819_955 * x
            + 0.1734 * x * x
            + 0.017_120_1 * x * x * x
            + 0.000_640_711 * x * x * x * x
    }
}

impl MicrofacetDistribution for TrowbridgeReitzDistribution {
    fn d(&self, wh: &Vector3f) -> Float {
        let tan_2_theta: Float = tan_2_theta(wh);
        if tan_2_theta.is_infinite() {
            return 0.0 as Float;
        }
        let cos_4_theta: Float = cos_2_theta(wh) * cos_2_theta(wh);
        let e: Float = (cos_2_phi(wh) / (self.alpha_x * self.alpha_x)
            + sin_2_phi(wh) / (self.alpha_y * self.alpha_y))
            * tan_2_theta;
        1.0 as Float / (PI * self.alpha_x * self.alpha_y * cos_4_theta * (1.0 + e) * (1.0 + e))
    }
    fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan_theta: Float = tan_theta(w).abs();
        if abs_tan_theta.is_infinite() {
            return 0.0 as Float;
        }
        let alpha: Float = (cos_2_phi(w) * self.alpha_x * self.alpha_x
            + sin_2_phi(w) * self.alpha_y * self.alpha_y)
            .sqrt();
        let alpha_2_tan_2_theta: Float = (alpha * abs_tan_theta) * (alpha * abs_tan_theta);
        ((1.0 as Float + alpha_2_tan_2_theta).sqrt() - 1.0) / 2.0
    }
    fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        if self.sample_visible_area {
            if wo.z < 0.0 as Float {
                return -sample_visible_normal(&-(*wo), self.alpha_x, self.alpha_y, u);
            }
            return sample_visible_normal(wo, self.alpha_x, self.alpha_y, u);
        }
        let (cos_theta, phi) = if self.alpha_x == self.alpha_y {
            let tan_theta2: Float = self.alpha_x * self.alpha_x * u.x / (1.0 - u.x);
            (1.0 / (1.0 + tan_theta2).sqrt(), 2.0 * PI * u.y)
        } else {
            let mut phi: Float =
                (self.alpha_y / self.alpha_x * (2.0 * PI * u.y + 0.5 * PI).tan()).atan();
            if u.y > 0.5 {
                phi += PI;
            }
            let (sin_phi, cos_phi) = phi.sin_cos();
            let alpha2: Float = 1.0
                / (cos_phi * cos_phi / (self.alpha_x * self.alpha_x)
                    + sin_phi * sin_phi / (self.alpha_y * self.alpha_y));
            let tan_theta2: Float = alpha2 * u.x / (1.0 - u.x);
            (1.0 / (1.0 + tan_theta2).sqrt(), phi)
        };
        let sin_theta: Float = (0.0 as Float).max(1.0 - cos_theta * cos_theta).sqrt();
        let wh: Vector3f = spherical_direction(sin_theta, cos_theta, phi);
        if vec3_same_hemisphere_vec3(wo, &wh) {
            wh
        } else {
            -wh
        }
    }
    fn get_sample_visible_area(&self) -> bool {
        self.sample_visible_area
    }
}

/// Slopes of a visible normal for the isotropic unit roughness
/// configuration, seen under `cos_theta`.
fn sample_unit_slopes(cos_theta: Float, u1: Float, u2: Float) -> (Float, Float) {
    // normal incidence
    if cos_theta > 0.9999 {
        let r: Float = (u1 / (1.0 - u1)).sqrt();
        let phi: Float = 2.0 * PI * u2;
        return (r * phi.cos(), r * phi.sin());
    }
    let sin_theta: Float = (0.0 as Float).max(1.0 - cos_theta * cos_theta).sqrt();
    let tan_theta: Float = sin_theta / cos_theta;
    let a: Float = 1.0 / tan_theta;
    let g1: Float = 2.0 / (1.0 + (1.0 + 1.0 / (a * a)).sqrt());
    // slope_x
    let a: Float = 2.0 * u1 / g1 - 1.0;
    let tmp: Float = (1.0 / (a * a - 1.0)).min(1e10);
    let b: Float = tan_theta;
    let d: Float = (b * b * tmp * tmp - (a * a - b * b) * tmp)
        .max(0.0 as Float)
        .sqrt();
    let slope_x_1: Float = b * tmp - d;
    let slope_x_2: Float = b * tmp + d;
    let slope_x: Float = if a < 0.0 || slope_x_2 > 1.0 / tan_theta {
        slope_x_1
    } else {
        slope_x_2
    };
    // slope_y
    let (s, u2) = if u2 > 0.5 {
        (1.0 as Float, 2.0 * (u2 - 0.5))
    } else {
        (-1.0 as Float, 2.0 * (0.5 - u2))
    };
    let z: Float = (u2 * (u2 * (u2 * 0.27385 - 0.73369) + 0.46341))
        / (u2 * (u2 * (u2 * 0.093_073 + 0.309_42) - 1.0) + 0.597_999);
    let slope_y: Float = s * z * (1.0 + slope_x * slope_x).sqrt();
    debug_assert!(slope_y.is_finite());
    (slope_x, slope_y)
}

/// Sample a microfacet normal visible from `wi` (upper hemisphere)
/// by stretching to unit roughness and back.
fn sample_visible_normal(wi: &Vector3f, alpha_x: Float, alpha_y: Float, u: &Point2f) -> Vector3f {
    let wi_stretched: Vector3f = Vector3f {
        x: alpha_x * wi.x,
        y: alpha_y * wi.y,
        z: wi.z,
    }
    .normalize();
    let (slope_x, slope_y) = sample_unit_slopes(cos_theta(&wi_stretched), u.x, u.y);
    // rotate, then unstretch
    let (cos_phi, sin_phi) = (cos_phi(&wi_stretched), sin_phi(&wi_stretched));
    let rotated_x: Float = cos_phi * slope_x - sin_phi * slope_y;
    let rotated_y: Float = sin_phi * slope_x + cos_phi * slope_y;
    Vector3f {
        x: -alpha_x * rotated_x,
        y: -alpha_y * rotated_y,
        z: 1.0,
    }
    .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use approx::assert_relative_eq;

    #[test]
    fn projected_area_is_normalized() {
        // integral of D(wh) cos(theta_h) over the hemisphere is one
        let distrib: TrowbridgeReitzDistribution = TrowbridgeReitzDistribution::new(0.3, 0.3, false);
        let mut rng: Rng = Rng::new(1);
        let n: usize = 200_000;
        let mut sum: f64 = 0.0;
        for _ in 0..n {
            let cos_theta: Float = rng.uniform_float();
            let phi: Float = 2.0 * PI * rng.uniform_float();
            let sin_theta: Float = (1.0 - cos_theta * cos_theta).sqrt();
            let wh: Vector3f = spherical_direction(sin_theta, cos_theta, phi);
            // uniform hemisphere pdf is 1 / (2 pi)
            sum += (distrib.d(&wh) * cos_theta * 2.0 * PI) as f64;
        }
        assert_relative_eq!(sum / n as f64, 1.0, epsilon = 0.05);
    }

    #[test]
    fn sampled_normals_face_wo() {
        let wo: Vector3f = Vector3f {
            x: 0.6,
            y: 0.0,
            z: 0.8,
        };
        let mut rng: Rng = Rng::new(2);
        for visible in &[true, false] {
            let distrib: TrowbridgeReitzDistribution =
                TrowbridgeReitzDistribution::new(0.5, 0.2, *visible);
            for _ in 0..200 {
                let u: Point2f = Point2f {
                    x: rng.uniform_float(),
                    y: rng.uniform_float(),
                };
                let wh: Vector3f = distrib.sample_wh(&wo, &u);
                assert_relative_eq!(wh.length(), 1.0, epsilon = 1e-4);
                assert!(wh.z > 0.0);
                assert!(distrib.pdf(&wo, &wh) >= 0.0);
            }
            let below: Vector3f = distrib.sample_wh(&-wo, &Point2f { x: 0.3, y: 0.6 });
            assert!(below.z < 0.0);
        }
    }

    #[test]
    fn smooth_limit_has_no_masking_at_normal_incidence() {
        let distrib: TrowbridgeReitzDistribution = TrowbridgeReitzDistribution::new(0.1, 0.1, true);
        let up: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        assert_eq!(distrib.lambda(&up), 0.0);
        assert_eq!(distrib.g1(&up), 1.0);
        assert!(TrowbridgeReitzDistribution::roughness_to_alpha(0.1) > 0.0);
    }
}
