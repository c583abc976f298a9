//! All geometric shapes implement a common interface, and the rest
//! of the renderer can use this interface without needing any
//! details about the underlying shape. This separates the geometric
//! and the shading subsystem.
//!
//! Shapes work in their own object space. They never narrow a ray's
//! `t_max` themselves; the primitive does that after a confirmed hit.

// pbrt
use crate::core::geometry::{pnt3_distance_squaredf, vec3_abs_dot_nrmf};
use crate::core::geometry::{Bounds3f, Point2f, Vector3f};
use crate::core::geometry::Ray;
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::pbrt::Float;

pub trait Shape {
    fn object_bound(&self) -> Bounds3f;
    fn world_bound(&self) -> Bounds3f;
    /// Nearest hit with `t` in `(r.t_min, r.t_max)`, returned with
    /// its parametric distance.
    fn intersect(&self, r: &Ray) -> Option<(SurfaceInteraction, Float)>;
    fn intersect_p(&self, r: &Ray) -> bool;
    fn get_reverse_orientation(&self) -> bool;
    fn get_transform_swaps_handedness(&self) -> bool;
    fn area(&self) -> Float;
    /// Uniformly sample a point on the surface; the pdf is with
    /// respect to surface area.
    fn sample(&self, u: &Point2f) -> (InteractionCommon, Float);
    fn pdf(&self, _iref: &InteractionCommon) -> Float {
        1.0 as Float / self.area()
    }
    /// Sample a point as seen from `iref`; the pdf is with respect to
    /// solid angle at `iref`.
    fn sample_with_ref_point(
        &self,
        iref: &InteractionCommon,
        u: &Point2f,
    ) -> (InteractionCommon, Float) {
        let (intr, pdf) = self.sample(u);
        let wi: Vector3f = intr.p - iref.p;
        if wi.length_squared() == 0.0 as Float {
            return (intr, 0.0 as Float);
        }
        let wi: Vector3f = wi.normalize();
        // convert from area measure to solid angle measure
        let pdf: Float =
            pdf * pnt3_distance_squaredf(&iref.p, &intr.p) / vec3_abs_dot_nrmf(&-wi, &intr.n);
        if pdf.is_infinite() {
            (intr, 0.0 as Float)
        } else {
            (intr, pdf)
        }
    }
    /// Solid angle density of sampling direction `wi` from `iref`,
    /// matching `sample_with_ref_point`.
    fn pdf_with_ref_point(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        // intersect sample ray with the shape
        let ray: Ray = iref.spawn_ray(wi);
        if let Some((isect_light, _t_hit)) = self.intersect(&ray) {
            // convert light sample weight to solid angle measure
            let pdf: Float = pnt3_distance_squaredf(&iref.p, &isect_light.common.p)
                / (vec3_abs_dot_nrmf(&-(*wi), &isect_light.common.n) * self.area());
            if pdf.is_infinite() {
                0.0 as Float
            } else {
                pdf
            }
        } else {
            0.0 as Float
        }
    }
}
