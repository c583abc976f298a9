// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::efloat::quadratic_efloat;
use crate::core::efloat::EFloat;
use crate::core::error::SceneError;
use crate::core::geometry::{pnt3_distance_squaredf, pnt3_distancef, pnt3_offset_ray_origin};
use crate::core::geometry::{spherical_direction_vec3, vec3_coordinate_system};
use crate::core::geometry::{vec3_abs_dot_nrmf, vec3_cross_vec3, vec3_dot_vec3f};
use crate::core::geometry::{Bounds3f, Normal3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::pbrt::Float;
use crate::core::pbrt::{clamp_t, gamma, lerp, radians};
use crate::core::shape::Shape;
use crate::core::transform::Transform;

/// Below this value of `sin^2(theta_max)` (about 1.5 degrees) the
/// cone is so narrow that `1 - cos(theta_max)` is computed from the
/// Taylor expansion instead.
const SMALL_CONE_SIN2: Float = 0.000_685_23;

pub struct Sphere {
    pub radius: Float,
    pub z_min: Float,
    pub z_max: Float,
    pub theta_min: Float,
    pub theta_max: Float,
    pub phi_max: Float,
    object_to_world: Arc<Transform>,
    world_to_object: Arc<Transform>,
    reverse_orientation: bool,
    transform_swaps_handedness: bool,
}

impl Sphere {
    /// A (possibly partial) sphere centered at the object space
    /// origin, clipped to `[z_min, z_max]` and to `phi_max` degrees.
    pub fn new(
        object_to_world: Arc<Transform>,
        world_to_object: Arc<Transform>,
        reverse_orientation: bool,
        radius: Float,
        z_min: Float,
        z_max: Float,
        phi_max: Float,
    ) -> Result<Self, SceneError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SceneError::InvalidShape(format!(
                "sphere radius {} must be positive",
                radius
            )));
        }
        let z0: Float = clamp_t(z_min.min(z_max), -radius, radius);
        let z1: Float = clamp_t(z_min.max(z_max), -radius, radius);
        if z0 >= z1 {
            return Err(SceneError::InvalidShape(format!(
                "sphere clipping range [{}, {}] is empty",
                z_min, z_max
            )));
        }
        if !(phi_max > 0.0) {
            return Err(SceneError::InvalidShape(format!(
                "sphere phi_max {} must be positive",
                phi_max
            )));
        }
        let transform_swaps_handedness: bool = object_to_world.swaps_handedness();
        Ok(Sphere {
            radius,
            z_min: z0,
            z_max: z1,
            theta_min: clamp_t(z0 / radius, -1.0, 1.0).acos(),
            theta_max: clamp_t(z1 / radius, -1.0, 1.0).acos(),
            phi_max: radians(clamp_t(phi_max, 0.0, 360.0)),
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        })
    }
    /// Neither clipped in z nor in phi.
    pub fn is_complete(&self) -> bool {
        self.z_min <= -self.radius
            && self.z_max >= self.radius
            && self.phi_max >= 2.0 * PI - 1e-5
    }
    /// The complete sphere.
    pub fn full(
        object_to_world: Arc<Transform>,
        world_to_object: Arc<Transform>,
        reverse_orientation: bool,
        radius: Float,
    ) -> Result<Self, SceneError> {
        Sphere::new(
            object_to_world,
            world_to_object,
            reverse_orientation,
            radius,
            -radius,
            radius,
            360.0,
        )
    }
    /// Project `p` back onto the surface and return it with its
    /// azimuth.
    fn refine(&self, ray: &Ray, t: Float) -> (Point3f, Float) {
        let mut p_hit: Point3f = ray.position(t);
        p_hit *= self.radius / pnt3_distancef(&p_hit, &Point3f::default());
        if p_hit.x == 0.0 && p_hit.y == 0.0 {
            p_hit.x = 1e-5 as Float * self.radius;
        }
        let mut phi: Float = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 {
            phi += 2.0 as Float * PI;
        }
        (p_hit, phi)
    }
    fn is_clipped(&self, p_hit: &Point3f, phi: Float) -> bool {
        (self.z_min > -self.radius && p_hit.z < self.z_min)
            || (self.z_max < self.radius && p_hit.z > self.z_max)
            || phi > self.phi_max
    }
    /// Shared by `intersect` and `intersect_p`: the object space ray
    /// and the accepted root with its refined hit point and azimuth.
    fn nearest_root(&self, r: &Ray) -> Option<(Ray, EFloat, Point3f, Float)> {
        let (ray, o_err, d_err) = self.world_to_object.transform_ray_with_error(r);
        // initialize EFloat ray coordinate values
        let ox = EFloat::new(ray.o.x, o_err.x);
        let oy = EFloat::new(ray.o.y, o_err.y);
        let oz = EFloat::new(ray.o.z, o_err.z);
        let dx = EFloat::new(ray.d.x, d_err.x);
        let dy = EFloat::new(ray.d.y, d_err.y);
        let dz = EFloat::new(ray.d.z, d_err.z);
        let a: EFloat = dx * dx + dy * dy + dz * dz;
        let b: EFloat = (dx * ox + dy * oy + dz * oz) * 2.0 as Float;
        let c: EFloat = ox * ox + oy * oy + oz * oz
            - EFloat::new(self.radius, 0.0) * EFloat::new(self.radius, 0.0);
        let (t0, t1) = quadratic_efloat(a, b, c)?;
        // both roots must be trusted to lie inside the ray's interval
        let t_max: Float = ray.t_max.get();
        let t_min: Float = ray.t_min;
        if t0.upper_bound() >= t_max || t1.lower_bound() <= t_min {
            return None;
        }
        let mut t_shape_hit: EFloat = t0;
        let mut far_root: bool = false;
        if t_shape_hit.lower_bound() <= t_min {
            t_shape_hit = t1;
            far_root = true;
            if t_shape_hit.upper_bound() >= t_max {
                return None;
            }
        }
        let (mut p_hit, mut phi) = self.refine(&ray, t_shape_hit.v);
        if self.is_clipped(&p_hit, phi) {
            if far_root || t1.upper_bound() >= t_max {
                return None;
            }
            t_shape_hit = t1;
            let (p, ph) = self.refine(&ray, t_shape_hit.v);
            p_hit = p;
            phi = ph;
            if self.is_clipped(&p_hit, phi) {
                return None;
            }
        }
        Some((ray, t_shape_hit, p_hit, phi))
    }
    fn one_minus_cos_theta_max(sin2_theta_max: Float) -> Float {
        if sin2_theta_max < SMALL_CONE_SIN2 {
            sin2_theta_max / 2.0
        } else {
            1.0 - (0.0 as Float).max(1.0 - sin2_theta_max).sqrt()
        }
    }
}

impl Shape for Sphere {
    fn object_bound(&self) -> Bounds3f {
        Bounds3f {
            p_min: Point3f {
                x: -self.radius,
                y: -self.radius,
                z: self.z_min,
            },
            p_max: Point3f {
                x: self.radius,
                y: self.radius,
                z: self.z_max,
            },
        }
    }
    fn world_bound(&self) -> Bounds3f {
        self.object_to_world.transform_bounds(&self.object_bound())
    }
    fn intersect(&self, r: &Ray) -> Option<(SurfaceInteraction, Float)> {
        let (ray, t_shape_hit, p_hit, phi) = self.nearest_root(r)?;
        // parametric representation of sphere hit
        let u: Float = phi / self.phi_max;
        let theta: Float = clamp_t(p_hit.z / self.radius, -1.0, 1.0).acos();
        let v: Float = (theta - self.theta_min) / (self.theta_max - self.theta_min);
        let z_radius: Float = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        let inv_z_radius: Float = 1.0 / z_radius;
        let cos_phi: Float = p_hit.x * inv_z_radius;
        let sin_phi: Float = p_hit.y * inv_z_radius;
        let dpdu: Vector3f = Vector3f {
            x: -self.phi_max * p_hit.y,
            y: self.phi_max * p_hit.x,
            z: 0.0,
        };
        let dpdv: Vector3f = Vector3f {
            x: p_hit.z * cos_phi,
            y: p_hit.z * sin_phi,
            z: -self.radius * theta.sin(),
        } * (self.theta_max - self.theta_min);
        // second derivatives for the Weingarten equations
        let d2_p_duu: Vector3f = Vector3f {
            x: p_hit.x,
            y: p_hit.y,
            z: 0.0,
        } * (-self.phi_max * self.phi_max);
        let d2_p_duv: Vector3f = Vector3f {
            x: -sin_phi,
            y: cos_phi,
            z: 0.0,
        } * ((self.theta_max - self.theta_min) * p_hit.z * self.phi_max);
        let d2_p_dvv: Vector3f = Vector3f::from(p_hit)
            * (-(self.theta_max - self.theta_min) * (self.theta_max - self.theta_min));
        // coefficients of the fundamental forms
        let ec: Float = vec3_dot_vec3f(&dpdu, &dpdu);
        let fc: Float = vec3_dot_vec3f(&dpdu, &dpdv);
        let gc: Float = vec3_dot_vec3f(&dpdv, &dpdv);
        let nc: Vector3f = vec3_cross_vec3(&dpdu, &dpdv).normalize();
        let el: Float = vec3_dot_vec3f(&nc, &d2_p_duu);
        let fl: Float = vec3_dot_vec3f(&nc, &d2_p_duv);
        let gl: Float = vec3_dot_vec3f(&nc, &d2_p_dvv);
        let inv_egf2: Float = 1.0 / (ec * gc - fc * fc);
        let dndu: Normal3f = Normal3f::from(
            dpdu * ((fl * fc - el * gc) * inv_egf2) + dpdv * ((el * fc - fl * ec) * inv_egf2),
        );
        let dndv: Normal3f = Normal3f::from(
            dpdu * ((gl * fc - fl * gc) * inv_egf2) + dpdv * ((fl * fc - gl * ec) * inv_egf2),
        );
        let p_error: Vector3f = Vector3f::from(p_hit).abs() * gamma(5_i32);
        let si: SurfaceInteraction = SurfaceInteraction::new(
            &p_hit,
            &p_error,
            &Point2f { x: u, y: v },
            &-ray.d,
            &dpdu,
            &dpdv,
            &dndu,
            &dndv,
            ray.time,
            Some(self),
        );
        Some((
            self.object_to_world.transform_surface_interaction(&si),
            t_shape_hit.v,
        ))
    }
    fn intersect_p(&self, r: &Ray) -> bool {
        self.nearest_root(r).is_some()
    }
    fn get_reverse_orientation(&self) -> bool {
        self.reverse_orientation
    }
    fn get_transform_swaps_handedness(&self) -> bool {
        self.transform_swaps_handedness
    }
    fn area(&self) -> Float {
        self.phi_max * self.radius * (self.z_max - self.z_min)
    }
    fn sample(&self, u: &Point2f) -> (InteractionCommon, Float) {
        // zones of equal height have equal area, so z is uniform
        let z: Float = lerp(u.x, self.z_min, self.z_max);
        let phi: Float = u.y * self.phi_max;
        let r_z: Float = (0.0 as Float).max(self.radius * self.radius - z * z).sqrt();
        let mut p_obj: Point3f = Point3f {
            x: r_z * phi.cos(),
            y: r_z * phi.sin(),
            z,
        };
        let mut it: InteractionCommon = InteractionCommon::default();
        it.n = self
            .object_to_world
            .transform_normal(&Normal3f::from(Vector3f::from(p_obj)))
            .normalize();
        if self.reverse_orientation {
            it.n = -it.n;
        }
        // reproject p_obj to sphere surface and compute p_obj_error
        p_obj *= self.radius / pnt3_distancef(&p_obj, &Point3f::default());
        let p_obj_error: Vector3f = Vector3f::from(p_obj).abs() * gamma(5_i32);
        let (p, p_error) = self
            .object_to_world
            .transform_point_with_abs_error(&p_obj, &p_obj_error);
        it.p = p;
        it.p_error = p_error;
        (it, 1.0 as Float / self.area())
    }
    fn sample_with_ref_point(
        &self,
        iref: &InteractionCommon,
        u: &Point2f,
    ) -> (InteractionCommon, Float) {
        let p_center: Point3f = self.object_to_world.transform_point(&Point3f::default());
        // sample by area if the reference point is inside, or if the
        // cone would cover clipped away parts
        let p_origin: Point3f =
            pnt3_offset_ray_origin(&iref.p, &iref.p_error, &iref.n, &(p_center - iref.p));
        if !self.is_complete()
            || pnt3_distance_squaredf(&p_origin, &p_center) <= self.radius * self.radius
        {
            let (intr, pdf) = self.sample(u);
            let wi: Vector3f = intr.p - iref.p;
            if wi.length_squared() == 0.0 as Float {
                return (intr, 0.0 as Float);
            }
            let wi: Vector3f = wi.normalize();
            let pdf: Float = pdf * pnt3_distance_squaredf(&iref.p, &intr.p)
                / vec3_abs_dot_nrmf(&-wi, &intr.n);
            if pdf.is_infinite() {
                return (intr, 0.0 as Float);
            }
            return (intr, pdf);
        }
        // sample sphere uniformly inside subtended cone
        let dc: Float = pnt3_distancef(&iref.p, &p_center);
        let inv_dc: Float = 1.0 / dc;
        let wc: Vector3f = (p_center - iref.p) * inv_dc;
        let (wc_x, wc_y) = vec3_coordinate_system(&wc);
        let sin_theta_max: Float = self.radius * inv_dc;
        let sin2_theta_max: Float = sin_theta_max * sin_theta_max;
        let inv_sin_theta_max: Float = 1.0 / sin_theta_max;
        let cos_theta_max: Float = (0.0 as Float).max(1.0 - sin2_theta_max).sqrt();
        let mut cos_theta: Float = (cos_theta_max - 1.0) * u.x + 1.0;
        let mut sin2_theta: Float = 1.0 - cos_theta * cos_theta;
        if sin2_theta_max < SMALL_CONE_SIN2 {
            // fall back to a Taylor series expansion for small angles
            sin2_theta = sin2_theta_max * u.x;
            cos_theta = (1.0 - sin2_theta).sqrt();
        }
        // angle alpha from center of sphere to sampled point on surface
        let cos_alpha: Float = sin2_theta * inv_sin_theta_max
            + cos_theta
                * (0.0 as Float)
                    .max(1.0 - sin2_theta * inv_sin_theta_max * inv_sin_theta_max)
                    .sqrt();
        let sin_alpha: Float = (0.0 as Float).max(1.0 - cos_alpha * cos_alpha).sqrt();
        let phi: Float = u.y * 2.0 * PI;
        let n_world: Vector3f =
            spherical_direction_vec3(sin_alpha, cos_alpha, phi, &-wc_x, &-wc_y, &-wc);
        let p_world: Point3f = p_center + n_world * self.radius;
        let mut it: InteractionCommon = InteractionCommon {
            p: p_world,
            p_error: Vector3f::from(p_world).abs() * gamma(5_i32),
            n: Normal3f::from(n_world),
            ..Default::default()
        };
        if self.reverse_orientation {
            it.n = -it.n;
        }
        let one_minus_cos: Float = Sphere::one_minus_cos_theta_max(sin2_theta_max);
        (it, 1.0 as Float / (2.0 as Float * PI * one_minus_cos))
    }
    fn pdf_with_ref_point(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        let p_center: Point3f = self.object_to_world.transform_point(&Point3f::default());
        let p_origin: Point3f =
            pnt3_offset_ray_origin(&iref.p, &iref.p_error, &iref.n, &(p_center - iref.p));
        if !self.is_complete()
            || pnt3_distance_squaredf(&p_origin, &p_center) <= self.radius * self.radius
        {
            // same density as area sampling
            let ray: Ray = iref.spawn_ray(wi);
            return match self.intersect(&ray) {
                Some((isect_light, _t_hit)) => {
                    let pdf: Float = pnt3_distance_squaredf(&iref.p, &isect_light.common.p)
                        / (vec3_abs_dot_nrmf(
                            &-(*wi),
                            &isect_light.common.n,
                        ) * self.area());
                    if pdf.is_infinite() {
                        0.0 as Float
                    } else {
                        pdf
                    }
                }
                None => 0.0 as Float,
            };
        }
        // general sphere pdf: uniform in the cone, zero outside it
        let sin2_theta_max: Float =
            self.radius * self.radius / pnt3_distance_squaredf(&iref.p, &p_center);
        let cos_theta_max: Float = (0.0 as Float).max(1.0 - sin2_theta_max).sqrt();
        let wc: Vector3f = (p_center - iref.p).normalize();
        if vec3_dot_vec3f(wi, &wc) < cos_theta_max * (1.0 - 1e-4) {
            return 0.0 as Float;
        }
        1.0 as Float / (2.0 as Float * PI * Sphere::one_minus_cos_theta_max(sin2_theta_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use approx::assert_relative_eq;

    fn sphere_at(center: Vector3f, radius: Float) -> Sphere {
        let o2w: Transform = Transform::translate(&center);
        Sphere::full(Arc::new(o2w), Arc::new(o2w.inverse()), false, radius).unwrap()
    }

    fn ray(o: (Float, Float, Float), d: (Float, Float, Float)) -> Ray {
        Ray::new(
            Point3f {
                x: o.0,
                y: o.1,
                z: o.2,
            },
            Vector3f {
                x: d.0,
                y: d.1,
                z: d.2,
            },
        )
    }

    #[test]
    fn rejects_invalid_parameters() {
        let t: Arc<Transform> = Arc::new(Transform::default());
        assert!(Sphere::full(t.clone(), t.clone(), false, 0.0).is_err());
        assert!(Sphere::full(t.clone(), t.clone(), false, -1.0).is_err());
        assert!(Sphere::new(t.clone(), t.clone(), false, 1.0, 0.5, 0.5, 360.0).is_err());
        assert!(Sphere::new(t.clone(), t, false, 1.0, -1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn hit_from_outside() {
        let s: Sphere = sphere_at(Vector3f::default(), 1.0);
        let r: Ray = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));
        let (isect, t) = s.intersect(&r).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-4);
        assert_relative_eq!(isect.common.p.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(isect.common.n.z, -1.0, epsilon = 1e-4);
        // the shape never narrows the ray itself
        assert_eq!(r.t_max.get(), Float::INFINITY);
        assert!(s.intersect_p(&r));
    }

    #[test]
    fn hit_from_inside_uses_far_root() {
        let s: Sphere = sphere_at(Vector3f::default(), 2.0);
        let r: Ray = ray((0.0, 0.0, 0.0), (1.0, 0.0, 0.0));
        let (isect, t) = s.intersect(&r).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-4);
        assert_relative_eq!(isect.common.p.x, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn respects_ray_interval() {
        let s: Sphere = sphere_at(Vector3f::default(), 1.0);
        let r: Ray = Ray::with_t_max(
            Point3f {
                x: 0.0,
                y: 0.0,
                z: -5.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            3.5,
        );
        assert!(s.intersect(&r).is_none());
        assert!(!s.intersect_p(&r));
        let miss: Ray = ray((0.0, 2.0, -5.0), (0.0, 0.0, 1.0));
        assert!(s.intersect(&miss).is_none());
    }

    #[test]
    fn clipped_sphere_falls_back_to_far_root() {
        let t: Arc<Transform> = Arc::new(Transform::default());
        // upper hemisphere cut away
        let s: Sphere = Sphere::new(t.clone(), t, false, 1.0, -1.0, 0.0, 360.0).unwrap();
        let r: Ray = ray((0.0, 0.0, 5.0), (0.0, 0.0, -1.0));
        let (isect, t_hit) = s.intersect(&r).unwrap();
        assert_relative_eq!(t_hit, 6.0, epsilon = 1e-4);
        assert_relative_eq!(isect.common.p.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn hit_points_lie_on_surface_within_error_bounds() {
        let center: Vector3f = Vector3f {
            x: 10.0,
            y: -3.0,
            z: 7.0,
        };
        let s: Sphere = sphere_at(center, 2.5);
        let mut rng: Rng = Rng::default();
        for _ in 0..200 {
            let o: Point3f = Point3f {
                x: 10.0 + 20.0 * (rng.uniform_float() - 0.5),
                y: -3.0 + 20.0 * (rng.uniform_float() - 0.5),
                z: 7.0 + 20.0 * (rng.uniform_float() - 0.5),
            };
            let target: Point3f = Point3f::from(center)
                + Vector3f {
                    x: rng.uniform_float() - 0.5,
                    y: rng.uniform_float() - 0.5,
                    z: rng.uniform_float() - 0.5,
                };
            let r: Ray = Ray::new(o, target - o);
            if let Some((isect, _t)) = s.intersect(&r) {
                let dist: Float = pnt3_distancef(&isect.common.p, &Point3f::from(center));
                let slack: Float = isect.common.p_error.length() + 1e-5;
                assert!((dist - 2.5).abs() <= slack, "{} vs {}", dist, slack);
                let b: Bounds3f = s.world_bound();
                assert!(isect.common.p.x >= b.p_min.x - slack && isect.common.p.x <= b.p_max.x + slack);
            }
        }
    }

    #[test]
    fn cone_sampling_matches_pdf() {
        let s: Sphere = sphere_at(Vector3f::default(), 1.0);
        let iref: InteractionCommon = InteractionCommon {
            p: Point3f {
                x: 0.0,
                y: 0.0,
                z: -4.0,
            },
            ..Default::default()
        };
        let (it, pdf) = s.sample_with_ref_point(&iref, &Point2f { x: 0.3, y: 0.7 });
        assert_relative_eq!(
            pnt3_distancef(&it.p, &Point3f::default()),
            1.0,
            epsilon = 1e-4
        );
        let wi: Vector3f = (it.p - iref.p).normalize();
        let pdf2: Float = s.pdf_with_ref_point(&iref, &wi);
        assert_relative_eq!(pdf, pdf2, max_relative = 1e-3);
        let away: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: -1.0,
        };
        assert_eq!(s.pdf_with_ref_point(&iref, &away), 0.0);
    }

    #[test]
    fn distant_sphere_uses_small_angle_expansion() {
        let s: Sphere = sphere_at(Vector3f::default(), 0.01);
        let iref: InteractionCommon = InteractionCommon {
            p: Point3f {
                x: 0.0,
                y: 0.0,
                z: -100.0,
            },
            ..Default::default()
        };
        let (it, pdf) = s.sample_with_ref_point(&iref, &Point2f { x: 0.5, y: 0.5 });
        assert!(pdf.is_finite() && pdf > 0.0);
        let sin2: Float = 0.01 * 0.01 / (100.0 * 100.0);
        assert_relative_eq!(pdf, 1.0 / (PI * sin2), max_relative = 1e-3);
        assert_relative_eq!(
            pnt3_distancef(&it.p, &Point3f::default()),
            0.01,
            max_relative = 1e-2
        );
    }

    #[test]
    fn partial_sphere_samples_stay_on_clipped_surface() {
        let t: Arc<Transform> = Arc::new(Transform::default());
        // lower hemisphere, first quadrant in phi
        let s: Sphere = Sphere::new(t.clone(), t, false, 1.0, -1.0, 0.0, 90.0).unwrap();
        assert!(!s.is_complete());
        assert!(sphere_at(Vector3f::default(), 1.0).is_complete());
        assert_relative_eq!(s.area(), 0.5 * PI, epsilon = 1e-5);
        let mut rng: Rng = Rng::new(11);
        for _ in 0..500 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let (it, pdf) = s.sample(&u);
            assert_relative_eq!(pnt3_distancef(&it.p, &Point3f::default()), 1.0, epsilon = 1e-4);
            assert!(it.p.z <= 1e-5, "{:?}", it.p);
            assert!(it.p.x >= -1e-5 && it.p.y >= -1e-5, "{:?}", it.p);
            assert_relative_eq!(pdf, 1.0 / s.area(), epsilon = 1e-6);
        }
    }

    #[test]
    fn partial_sphere_ref_point_sampling_uses_area_density() {
        let t: Arc<Transform> = Arc::new(Transform::default());
        let s: Sphere = Sphere::new(t.clone(), t, false, 1.0, -1.0, 0.0, 360.0).unwrap();
        let iref: InteractionCommon = InteractionCommon {
            p: Point3f {
                x: 0.0,
                y: 0.0,
                z: -4.0,
            },
            ..Default::default()
        };
        // close to the bottom pole, directly visible from below
        let (it, pdf) = s.sample_with_ref_point(&iref, &Point2f { x: 0.1, y: 0.3 });
        assert!(it.p.z <= 1e-5);
        let wi: Vector3f = (it.p - iref.p).normalize();
        assert_relative_eq!(pdf, s.pdf_with_ref_point(&iref, &wi), max_relative = 1e-3);
    }
}
