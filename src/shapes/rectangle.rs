//! Axis-aligned rectangles, the building block of box-shaped rooms
//! and of rectangular area lights.
//!
//! In object space the rectangle lies in the plane `p[axis] == k`
//! and spans `[u0, u1] x [v0, v1]` along the two remaining axes,
//! taken in cyclic order (`X -> (Y, Z)`, `Y -> (Z, X)`,
//! `Z -> (X, Y)`). Its geometric normal points along `+axis` unless
//! the orientation is reversed.

// std
use std::sync::Arc;
// pbrt
use crate::core::error::SceneError;
use crate::core::geometry::{vec3_cross_vec3, XYZEnum};
use crate::core::geometry::{Bounds3f, Normal3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::interaction::{InteractionCommon, SurfaceInteraction};
use crate::core::pbrt::Float;
use crate::core::pbrt::{gamma, lerp};
use crate::core::shape::Shape;
use crate::core::transform::Transform;

pub struct Rectangle {
    pub axis: XYZEnum,
    pub u0: Float,
    pub u1: Float,
    pub v0: Float,
    pub v1: Float,
    pub k: Float,
    world_area: Float,
    object_to_world: Arc<Transform>,
    world_to_object: Arc<Transform>,
    reverse_orientation: bool,
    transform_swaps_handedness: bool,
}

/// The two in-plane axes for a rectangle perpendicular to `axis`.
fn plane_axes(axis: XYZEnum) -> (XYZEnum, XYZEnum) {
    match axis {
        XYZEnum::X => (XYZEnum::Y, XYZEnum::Z),
        XYZEnum::Y => (XYZEnum::Z, XYZEnum::X),
        XYZEnum::Z => (XYZEnum::X, XYZEnum::Y),
    }
}

fn unit(axis: XYZEnum) -> Vector3f {
    let mut v: Vector3f = Vector3f::default();
    v[axis] = 1.0;
    v
}

impl Rectangle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        object_to_world: Arc<Transform>,
        world_to_object: Arc<Transform>,
        reverse_orientation: bool,
        axis: XYZEnum,
        u: (Float, Float),
        v: (Float, Float),
        k: Float,
    ) -> Result<Self, SceneError> {
        let (u0, u1) = (u.0.min(u.1), u.0.max(u.1));
        let (v0, v1) = (v.0.min(v.1), v.0.max(v.1));
        if !(u1 > u0 && v1 > v0) || !(u0.is_finite() && u1.is_finite() && v0.is_finite() && v1.is_finite()) {
            return Err(SceneError::InvalidShape(format!(
                "degenerate rectangle [{}, {}] x [{}, {}]",
                u.0, u.1, v.0, v.1
            )));
        }
        let (u_axis, v_axis) = plane_axes(axis);
        let world_area: Float = vec3_cross_vec3(
            &object_to_world.transform_vector(&(unit(u_axis) * (u1 - u0))),
            &object_to_world.transform_vector(&(unit(v_axis) * (v1 - v0))),
        )
        .length();
        let transform_swaps_handedness: bool = object_to_world.swaps_handedness();
        Ok(Rectangle {
            axis,
            u0,
            u1,
            v0,
            v1,
            k,
            world_area,
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        })
    }
    /// Object space ray, hit distance, hit point and its error bound.
    fn hit(&self, r: &Ray) -> Option<(Ray, Float, Point3f, Vector3f)> {
        let (ray, o_err, d_err) = self.world_to_object.transform_ray_with_error(r);
        if ray.d[self.axis] == 0.0 {
            return None;
        }
        let t: Float = (self.k - ray.o[self.axis]) / ray.d[self.axis];
        if t <= ray.t_min || t >= ray.t_max.get() {
            return None;
        }
        let mut p_hit: Point3f = ray.position(t);
        let (u_axis, v_axis) = plane_axes(self.axis);
        if p_hit[u_axis] < self.u0
            || p_hit[u_axis] > self.u1
            || p_hit[v_axis] < self.v0
            || p_hit[v_axis] > self.v1
        {
            return None;
        }
        // the plane coordinate is exact, the in-plane ones carry the
        // rounding error of o + t * d and of the transformed ray
        let mut p_error: Vector3f =
            Vector3f::from(p_hit).abs() * gamma(7_i32) + o_err + d_err * t;
        p_error[self.axis] = 0.0;
        p_hit[self.axis] = self.k;
        Some((ray, t, p_hit, p_error))
    }
}

impl Shape for Rectangle {
    fn object_bound(&self) -> Bounds3f {
        let (u_axis, v_axis) = plane_axes(self.axis);
        let mut p_min: Point3f = Point3f::default();
        let mut p_max: Point3f = Point3f::default();
        p_min[u_axis] = self.u0;
        p_max[u_axis] = self.u1;
        p_min[v_axis] = self.v0;
        p_max[v_axis] = self.v1;
        p_min[self.axis] = self.k;
        p_max[self.axis] = self.k;
        Bounds3f { p_min, p_max }
    }
    fn world_bound(&self) -> Bounds3f {
        self.object_to_world.transform_bounds(&self.object_bound())
    }
    fn intersect(&self, r: &Ray) -> Option<(SurfaceInteraction, Float)> {
        let (ray, t_shape_hit, p_hit, p_error) = self.hit(r)?;
        let (u_axis, v_axis) = plane_axes(self.axis);
        let uv: Point2f = Point2f {
            x: (p_hit[u_axis] - self.u0) / (self.u1 - self.u0),
            y: (p_hit[v_axis] - self.v0) / (self.v1 - self.v0),
        };
        let dpdu: Vector3f = unit(u_axis) * (self.u1 - self.u0);
        let dpdv: Vector3f = unit(v_axis) * (self.v1 - self.v0);
        let si: SurfaceInteraction = SurfaceInteraction::new(
            &p_hit,
            &p_error,
            &uv,
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
        self.world_area
    }
    fn sample(&self, u: &Point2f) -> (InteractionCommon, Float) {
        let (u_axis, v_axis) = plane_axes(self.axis);
        let mut p_obj: Point3f = Point3f::default();
        p_obj[u_axis] = lerp(u.x, self.u0, self.u1);
        p_obj[v_axis] = lerp(u.y, self.v0, self.v1);
        p_obj[self.axis] = self.k;
        let mut p_obj_error: Vector3f = Vector3f::from(p_obj).abs() * gamma(1_i32);
        p_obj_error[self.axis] = 0.0;
        let mut n: Normal3f = self
            .object_to_world
            .transform_normal(&Normal3f::from(unit(self.axis)))
            .normalize();
        if self.reverse_orientation ^ self.transform_swaps_handedness {
            n = -n;
        }
        let (p, p_error) = self
            .object_to_world
            .transform_point_with_abs_error(&p_obj, &p_obj_error);
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
    use crate::core::geometry::pnt3_inside_bnd3;
    use approx::assert_relative_eq;

    fn rect(axis: XYZEnum, reverse: bool) -> Rectangle {
        let t: Arc<Transform> = Arc::new(Transform::default());
        Rectangle::new(t.clone(), t, reverse, axis, (0.0, 2.0), (1.0, 3.0), 5.0).unwrap()
    }

    #[test]
    fn normals_follow_cyclic_axes() {
        for axis in &[XYZEnum::X, XYZEnum::Y, XYZEnum::Z] {
            let r: Rectangle = rect(*axis, false);
            let (u_axis, v_axis) = plane_axes(*axis);
            let mut o: Point3f = Point3f::default();
            o[u_axis] = 1.0;
            o[v_axis] = 2.0;
            let mut d: Vector3f = Vector3f::default();
            d[*axis] = 1.0;
            let ray: Ray = Ray::new(o, d);
            let (isect, t) = r.intersect(&ray).unwrap();
            assert_relative_eq!(t, 5.0, epsilon = 1e-5);
            assert_eq!(isect.common.p[*axis], 5.0);
            let n: Vector3f = Vector3f::from(isect.common.n);
            assert_relative_eq!(n[*axis], 1.0, epsilon = 1e-6);
            assert_relative_eq!(isect.uv.x, 0.5, epsilon = 1e-5);
            assert_relative_eq!(isect.uv.y, 0.5, epsilon = 1e-5);
            let flipped: Rectangle = rect(*axis, true);
            let (isect, _t) = flipped.intersect(&ray).unwrap();
            assert_relative_eq!(Vector3f::from(isect.common.n)[*axis], -1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn misses_outside_extent() {
        let r: Rectangle = rect(XYZEnum::Z, false);
        let ray: Ray = Ray::new(
            Point3f {
                x: 2.5,
                y: 2.0,
                z: 0.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        assert!(r.intersect(&ray).is_none());
        assert!(!r.intersect_p(&ray));
    }

    #[test]
    fn degenerate_rectangle_is_rejected() {
        let t: Arc<Transform> = Arc::new(Transform::default());
        assert!(
            Rectangle::new(t.clone(), t, false, XYZEnum::Y, (1.0, 1.0), (0.0, 1.0), 0.0).is_err()
        );
    }

    #[test]
    fn samples_are_inside_bounds() {
        let r: Rectangle = rect(XYZEnum::Y, false);
        assert_relative_eq!(r.area(), 4.0, epsilon = 1e-5);
        let b: Bounds3f = r.world_bound();
        for u in &[0.0, 0.25, 0.999] {
            let (it, pdf) = r.sample(&Point2f { x: *u, y: 1.0 - *u });
            assert!(pnt3_inside_bnd3(&it.p, &b));
            assert_relative_eq!(pdf, 0.25, epsilon = 1e-6);
            assert_relative_eq!(it.n.y, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn hit_error_covers_transformed_origin() {
        let delta: Vector3f = Vector3f {
            x: 1000.0,
            y: -500.0,
            z: 250.0,
        };
        let o2w: Transform = Transform::translate(&delta);
        let r: Rectangle = Rectangle::new(
            Arc::new(o2w),
            Arc::new(o2w.inverse()),
            false,
            XYZEnum::Z,
            (0.0, 2.0),
            (1.0, 3.0),
            5.0,
        )
        .unwrap();
        let ray: Ray = Ray::new(
            Point3f {
                x: 1001.3,
                y: -498.1,
                z: 250.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        let (_ray, o_err, d_err) = r.world_to_object.transform_ray_with_error(&ray);
        let (_ray, t, p_hit, p_error) = r.hit(&ray).unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-3);
        assert_eq!(p_hit.z, 5.0);
        assert_eq!(p_error.z, 0.0);
        assert!(o_err.x > 0.0);
        assert!(p_error.x >= o_err.x + d_err.x * t);
        assert!(p_error.y >= o_err.y + d_err.y * t);
    }
}
