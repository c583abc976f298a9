// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::error::SceneError;
use crate::core::geometry::{Bounds3f, Normal3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::pbrt::Float;
use crate::core::pbrt::{clamp_t, lerp, radians};
use crate::core::shape::Shape;
use crate::core::transform::Transform;

/// A disk (or annulus with `inner_radius > 0`) in the plane
/// `z = height` of its object space, facing `+z`.
pub struct Disk {
    pub height: Float,
    pub radius: Float,
    pub inner_radius: Float,
    pub phi_max: Float,
    object_to_world: Arc<Transform>,
    world_to_object: Arc<Transform>,
    reverse_orientation: bool,
    transform_swaps_handedness: bool,
}

impl Disk {
    pub fn new(
        object_to_world: Arc<Transform>,
        world_to_object: Arc<Transform>,
        reverse_orientation: bool,
        height: Float,
        radius: Float,
        inner_radius: Float,
        phi_max: Float,
    ) -> Result<Self, SceneError> {
        if !(radius > 0.0 && radius.is_finite()) || inner_radius < 0.0 || inner_radius >= radius {
            return Err(SceneError::InvalidShape(format!(
                "disk radii {} (inner) / {} (outer)",
                inner_radius, radius
            )));
        }
        if !(phi_max > 0.0) {
            return Err(SceneError::InvalidShape(format!(
                "disk phi_max {} must be positive",
                phi_max
            )));
        }
        let transform_swaps_handedness: bool = object_to_world.swaps_handedness();
        Ok(Disk {
            height,
            radius,
            inner_radius,
            phi_max: radians(clamp_t(phi_max, 0.0, 360.0)),
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        })
    }
    /// Object space ray, hit distance, hit point and azimuth.
    fn hit(&self, r: &Ray) -> Option<(Ray, Float, Point3f, Float)> {
        let (ray, _o_err, _d_err) = self.world_to_object.transform_ray_with_error(r);
        // reject disk intersections for rays parallel to the disk's plane
        if ray.d.z == 0.0 {
            return None;
        }
        let t_shape_hit: Float = (self.height - ray.o.z) / ray.d.z;
        if t_shape_hit <= ray.t_min || t_shape_hit >= ray.t_max.get() {
            return None;
        }
        // see if hit point is inside disk radii and phi_max
        let p_hit: Point3f = ray.position(t_shape_hit);
        let dist2: Float = p_hit.x * p_hit.x + p_hit.y * p_hit.y;
        if dist2 > self.radius * self.radius || dist2 < self.inner_radius * self.inner_radius {
            return None;
        }
        let mut phi: Float = p_hit.y.atan2(p_hit.x);
        if phi < 0.0 {
            phi += 2.0 as Float * PI;
        }
        if phi > self.phi_max {
            return None;
        }
        Some((ray, t_shape_hit, p_hit, phi))
    }
}

impl Shape for Disk {
    fn object_bound(&self) -> Bounds3f {
        Bounds3f {
            p_min: Point3f {
                x: -self.radius,
                y: -self.radius,
                z: self.height,
            },
            p_max: Point3f {
                x: self.radius,
                y: self.radius,
                z: self.height,
            },
        }
    }
    fn world_bound(&self) -> Bounds3f {
        self.object_to_world.transform_bounds(&self.object_bound())
    }
    fn intersect(&self, r: &Ray) -> Option<(SurfaceInteraction, Float)> {
        let (ray, t_shape_hit, mut p_hit, phi) = self.hit(r)?;
        // parametric representation of disk hit
        let u: Float = phi / self.phi_max;
        let r_hit: Float = (p_hit.x * p_hit.x + p_hit.y * p_hit.y).sqrt();
        let v: Float = (self.radius - r_hit) / (self.radius - self.inner_radius);
        let (dpdu, dpdv) = if r_hit > 0.0 {
            (
                Vector3f {
                    x: -self.phi_max * p_hit.y,
                    y: self.phi_max * p_hit.x,
                    z: 0.0,
                },
                Vector3f {
                    x: p_hit.x,
                    y: p_hit.y,
                    z: 0.0,
                } * ((self.inner_radius - self.radius) / r_hit),
            )
        } else {
            // exactly at the center any radial frame will do
            (
                Vector3f {
                    x: 0.0,
                    y: self.phi_max * (self.radius - self.inner_radius),
                    z: 0.0,
                },
                Vector3f {
                    x: self.inner_radius - self.radius,
                    y: 0.0,
                    z: 0.0,
                },
            )
        };
        // refine disk intersection point
        p_hit.z = self.height;
        let si: SurfaceInteraction = SurfaceInteraction::new(
            &p_hit,
            &Vector3f::default(),
            &Point2f { x: u, y: v },
            &-ray.d,
            &dpdu,
            &dpdv,
            &Normal3f::default(),
            &Normal3f::default(),
            ray.time,
            Some(self),
        );
        Some((
            self.object_to_world.transform_surface_interaction(&si),
            t_shape_hit,
        ))
    }
    fn intersect_p(&self, r: &Ray) -> bool {
        self.hit(r).is_some()
    }
    fn get_reverse_orientation(&self) -> bool {
        self.reverse_orientation
    }
    fn get_transform_swaps_handedness(&self) -> bool {
        self.transform_swaps_handedness
    }
    fn area(&self) -> Float {
        self.phi_max
            * 0.5 as Float
            * (self.radius * self.radius - self.inner_radius * self.inner_radius)
    }
    fn sample(&self, u: &Point2f) -> (InteractionCommon, Float) {
        // uniform in r^2 keeps the density constant over the annulus
        let r: Float = lerp(
            u.x,
            self.inner_radius * self.inner_radius,
            self.radius * self.radius,
        )
        .sqrt();
        let phi: Float = u.y * self.phi_max;
        let p_obj: Point3f = Point3f {
            x: r * phi.cos(),
            y: r * phi.sin(),
            z: self.height,
        };
        let mut n: Normal3f = self
            .object_to_world
            .transform_normal(&Normal3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            })
            .normalize();
        if self.reverse_orientation {
            n = -n;
        }
        let (p, p_error) = self
            .object_to_world
            .transform_point_with_abs_error(&p_obj, &Vector3f::default());
        (
            InteractionCommon {
                p,
                p_error,
                n,
                ..Default::default()
            },
            1.0 as Float / self.area(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use approx::assert_relative_eq;

    fn disk(inner: Float) -> Disk {
        let t: Arc<Transform> = Arc::new(Transform::default());
        Disk::new(t.clone(), t, false, 1.0, 2.0, inner, 360.0).unwrap()
    }

    #[test]
    fn annulus_hit_and_hole_miss() {
        let d: Disk = disk(0.5);
        let down: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: -1.0,
        };
        let hit: Ray = Ray::new(
            Point3f {
                x: 1.0,
                y: 0.0,
                z: 3.0,
            },
            down,
        );
        let (isect, t) = d.intersect(&hit).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-5);
        assert_eq!(isect.common.p.z, 1.0);
        assert_relative_eq!(isect.common.n.z.abs(), 1.0, epsilon = 1e-5);
        let hole: Ray = Ray::new(
            Point3f {
                x: 0.1,
                y: 0.0,
                z: 3.0,
            },
            down,
        );
        assert!(d.intersect(&hole).is_none());
        assert!(!d.intersect_p(&hole));
    }

    #[test]
    fn parallel_ray_misses() {
        let d: Disk = disk(0.0);
        let r: Ray = Ray::new(
            Point3f {
                x: -5.0,
                y: 0.0,
                z: 1.0,
            },
            Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(d.intersect(&r).is_none());
    }

    #[test]
    fn area_and_invalid_radii() {
        let d: Disk = disk(0.0);
        assert_relative_eq!(d.area(), 4.0 * PI, epsilon = 1e-4);
        let t: Arc<Transform> = Arc::new(Transform::default());
        assert!(Disk::new(t.clone(), t.clone(), false, 0.0, 1.0, 1.0, 360.0).is_err());
        assert!(Disk::new(t.clone(), t, false, 0.0, -1.0, 0.0, 360.0).is_err());
    }

    #[test]
    fn samples_lie_on_disk() {
        let d: Disk = disk(0.0);
        let (it, pdf) = d.sample(&Point2f { x: 0.2, y: 0.9 });
        assert_eq!(it.p.z, 1.0);
        assert!(it.p.x * it.p.x + it.p.y * it.p.y <= 4.0 + 1e-5);
        assert_relative_eq!(pdf, 1.0 / d.area(), epsilon = 1e-6);
    }

    #[test]
    fn annulus_samples_stay_on_ring() {
        let t: Arc<Transform> = Arc::new(Transform::default());
        let d: Disk = Disk::new(t.clone(), t, false, 0.0, 1.0, 0.9, 180.0).unwrap();
        let mut rng: Rng = Rng::new(5);
        for _ in 0..1000 {
            let u: Point2f = Point2f {
                x: rng.uniform_float(),
                y: rng.uniform_float(),
            };
            let (it, pdf) = d.sample(&u);
            let r2: Float = it.p.x * it.p.x + it.p.y * it.p.y;
            assert!(r2 >= 0.81 - 1e-4 && r2 <= 1.0 + 1e-4, "{:?}", it.p);
            assert!(it.p.y >= -1e-5, "{:?}", it.p);
            assert_relative_eq!(pdf, 1.0 / d.area(), epsilon = 1e-5);
        }
    }
}
