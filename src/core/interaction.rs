//! The geometry of a particular point on a surface is represented by
//! a **SurfaceInteraction**. Having this abstraction lets most of the
//! system work with points on surfaces without needing to consider
//! the particular type of geometric shape the points lie on.
//!
//! A **SurfaceInteraction** borrows the primitive and the shape it
//! was found on, so it can't outlive the scene and is never stored.

// pbrt
use crate::core::geometry::{pnt3_offset_ray_origin, vec3_cross_vec3};
use crate::core::geometry::{Normal3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::material::TransportMode;
use crate::core::pbrt::SHADOW_EPSILON;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::primitive::GeometricPrimitive;
use crate::core::reflection::Bsdf;
use crate::core::shape::Shape;

/// The part every interaction shares: a point with its rounding
/// error box, the outgoing direction and the geometric normal.
#[derive(Debug, Default, Copy, Clone)]
pub struct InteractionCommon {
    pub p: Point3f,
    pub time: Float,
    pub p_error: Vector3f,
    pub wo: Vector3f,
    pub n: Normal3f,
}

impl InteractionCommon {
    /// A ray leaving the surface in direction `d`, with its origin
    /// pushed outside the error box.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        let o: Point3f = pnt3_offset_ray_origin(&self.p, &self.p_error, &self.n, d);
        let mut ray: Ray = Ray::new(o, *d);
        ray.time = self.time;
        ray
    }
    /// A segment ray towards the point `p2`; `t_max` stops just short
    /// of it.
    pub fn spawn_ray_to_pnt(&self, p2: &Point3f) -> Ray {
        let d: Vector3f = *p2 - self.p;
        let o: Point3f = pnt3_offset_ray_origin(&self.p, &self.p_error, &self.n, &d);
        let d: Vector3f = *p2 - o;
        let mut ray: Ray = Ray::with_t_max(o, d, 1.0 - SHADOW_EPSILON);
        ray.time = self.time;
        ray
    }
    /// A segment ray towards another interaction; both end points
    /// are offset off their surfaces.
    pub fn spawn_ray_to(&self, it: &InteractionCommon) -> Ray {
        let origin: Point3f =
            pnt3_offset_ray_origin(&self.p, &self.p_error, &self.n, &(it.p - self.p));
        let target: Point3f = pnt3_offset_ray_origin(&it.p, &it.p_error, &it.n, &(origin - it.p));
        let d: Vector3f = target - origin;
        let mut ray: Ray = Ray::with_t_max(origin, d, 1.0 - SHADOW_EPSILON);
        ray.time = self.time;
        ray
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct Shading {
    pub n: Normal3f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
}

#[derive(Default)]
pub struct SurfaceInteraction<'a> {
    pub common: InteractionCommon,
    pub uv: Point2f,
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub dndu: Normal3f,
    pub dndv: Normal3f,
    pub shading: Shading,
    pub primitive: Option<&'a GeometricPrimitive>,
    pub shape: Option<&'a dyn Shape>,
    pub bsdf: Option<Bsdf>,
}

impl<'a> SurfaceInteraction<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: &Point3f,
        p_error: &Vector3f,
        uv: &Point2f,
        wo: &Vector3f,
        dpdu: &Vector3f,
        dpdv: &Vector3f,
        dndu: &Normal3f,
        dndv: &Normal3f,
        time: Float,
        sh: Option<&'a dyn Shape>,
    ) -> Self {
        let mut n: Normal3f = Normal3f::from(vec3_cross_vec3(dpdu, dpdv)).normalize();
        // adjust normal based on orientation and handedness
        if let Some(shape) = sh {
            if shape.get_reverse_orientation() ^ shape.get_transform_swaps_handedness() {
                n = -n;
            }
        }
        let shading: Shading = Shading {
            n,
            dpdu: *dpdu,
            dpdv: *dpdv,
            dndu: *dndu,
            dndv: *dndv,
        };
        SurfaceInteraction {
            common: InteractionCommon {
                p: *p,
                time,
                p_error: *p_error,
                wo: wo.normalize(),
                n,
            },
            uv: *uv,
            dpdu: *dpdu,
            dpdv: *dpdv,
            dndu: *dndu,
            dndv: *dndv,
            shading,
            primitive: None,
            shape: sh,
            bsdf: None,
        }
    }
    /// Ask the material of the primitive that was hit to fill in
    /// `self.bsdf`. Leaves it `None` for emitters without a material.
    pub fn compute_scattering_functions(
        &mut self,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        if let Some(primitive) = self.primitive {
            primitive.compute_scattering_functions(self, mode, allow_multiple_lobes);
        }
    }
    /// Radiance emitted from the hit point in direction `w`, if the
    /// primitive carries an area light.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        if let Some(primitive) = self.primitive {
            if let Some(ref area_light) = primitive.area_light {
                return area_light.l(&self.common, w);
            }
        }
        Spectrum::default()
    }
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.common.spawn_ray(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::vec3_dot_vec3f;

    #[test]
    fn spawned_ray_leaves_error_box() {
        let it: InteractionCommon = InteractionCommon {
            p: Point3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            p_error: Vector3f {
                x: 1e-4,
                y: 1e-4,
                z: 1e-4,
            },
            n: Normal3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            ..Default::default()
        };
        let up: Ray = it.spawn_ray(&Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        });
        assert!(up.o.z > 1.0 + 1e-4);
        let down: Ray = it.spawn_ray(&Vector3f {
            x: 0.0,
            y: 0.0,
            z: -1.0,
        });
        assert!(down.o.z < 1.0 - 1e-4);
    }

    #[test]
    fn segment_ray_stops_short_of_target() {
        let from: InteractionCommon = InteractionCommon {
            n: Normal3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
            ..Default::default()
        };
        let target: Point3f = Point3f {
            x: 0.0,
            y: 3.0,
            z: 0.0,
        };
        let ray: Ray = from.spawn_ray_to_pnt(&target);
        let end: Point3f = ray.position(ray.t_max.get());
        assert!(end.y < 3.0);
        assert!(vec3_dot_vec3f(&ray.d, &Vector3f::from(target)) > 0.0);
    }
}
