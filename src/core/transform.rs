//! Transformations between coordinate spaces.
//!
//! ## 4 x 4 Matrices
//!
//! The **Matrix4x4** structure is the low-level representation used
//! by **Transform**, which stores a matrix together with its inverse
//! so that normals and inverse mappings come for free.
//!
//! ## Error Bounds
//!
//! Transforming a point introduces rounding error which has to be
//! accounted for when the point is a ray origin or a surface hit.
//! The `*_with_error` variants return a conservative absolute error
//! bound next to the transformed value.
//!
//! ## Sharing
//!
//! Shapes hold their transforms as `Arc<Transform>`; the scene
//! builder interns them (see `Transform::key`) so that many shapes
//! placed with the same matrix refer to one object.

// std
use std::ops;
// pbrt
use crate::core::error::SceneError;
use crate::core::geometry::{
    bnd3_union_pnt3f, nrm_faceforward_nrm, vec3_cross_vec3, vec3_dot_vec3f,
};
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::Float;
use crate::core::pbrt::{gamma, radians};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl Matrix4x4 {
    pub fn transpose(&self) -> Matrix4x4 {
        let mut r: Matrix4x4 = Matrix4x4::default();
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[j][i];
            }
        }
        r
    }
    /// Gauss-Jordan elimination with full pivoting, `None` for a
    /// singular matrix.
    pub fn inverse(&self) -> Option<Matrix4x4> {
        let mut indxc: [usize; 4] = [0; 4];
        let mut indxr: [usize; 4] = [0; 4];
        let mut ipiv: [u8; 4] = [0; 4];
        let mut minv: Matrix4x4 = *self;
        for i in 0..4 {
            let mut irow: usize = 0;
            let mut icol: usize = 0;
            let mut big: Float = 0.0;
            // choose pivot
            for j in 0..4 {
                if ipiv[j] == 1 {
                    continue;
                }
                for k in 0..4 {
                    if ipiv[k] == 0 {
                        let abs: Float = minv.m[j][k].abs();
                        if abs >= big {
                            big = abs;
                            irow = j;
                            icol = k;
                        }
                    } else if ipiv[k] > 1 {
                        return None;
                    }
                }
            }
            ipiv[icol] += 1;
            if irow != icol {
                minv.m.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv.m[icol][icol] == 0.0 {
                return None;
            }
            // scale pivot row to a leading one
            let pivinv: Float = 1.0 / minv.m[icol][icol];
            minv.m[icol][icol] = 1.0;
            for j in 0..4 {
                minv.m[icol][j] *= pivinv;
            }
            // zero out the pivot column in all other rows
            for j in 0..4 {
                if j != icol {
                    let save: Float = minv.m[j][icol];
                    minv.m[j][icol] = 0.0;
                    for k in 0..4 {
                        minv.m[j][k] -= minv.m[icol][k] * save;
                    }
                }
            }
        }
        // undo the column permutation
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for k in 0..4 {
                    minv.m[k].swap(indxr[j], indxc[j]);
                }
            }
        }
        let finite: bool = minv.m.iter().flatten().all(|v| v.is_finite());
        if finite {
            Some(minv)
        } else {
            None
        }
    }
}

impl_op_ex!(*|m1: &Matrix4x4, m2: &Matrix4x4| -> Matrix4x4 {
    let mut r: Matrix4x4 = Matrix4x4::default();
    for i in 0..4 {
        for j in 0..4 {
            r.m[i][j] = m1.m[i][0] * m2.m[0][j]
                + m1.m[i][1] * m2.m[1][j]
                + m1.m[i][2] * m2.m[2][j]
                + m1.m[i][3] * m2.m[3][j];
        }
    }
    r
});

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Transform {
    /// Build from a forward matrix; singular matrices are rejected.
    pub fn new(m: Matrix4x4) -> Result<Transform, SceneError> {
        let m_inv: Matrix4x4 = m
            .inverse()
            .ok_or_else(|| SceneError::SingularTransform(format!("{:?}", m.m)))?;
        Ok(Transform { m, m_inv })
    }
    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }
    /// Bit pattern of the forward matrix, used to intern transforms.
    pub fn key(&self) -> [u32; 16] {
        let mut key: [u32; 16] = [0; 16];
        for (i, v) in self.m.m.iter().flatten().enumerate() {
            key[i] = v.to_bits();
        }
        key
    }
    pub fn is_identity(&self) -> bool {
        self.m == Matrix4x4::default()
    }
    pub fn swaps_handedness(&self) -> bool {
        let m = &self.m.m;
        let det: Float = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        det < 0.0 as Float
    }
    pub fn translate(delta: &Vector3f) -> Transform {
        let mut m: Matrix4x4 = Matrix4x4::default();
        let mut m_inv: Matrix4x4 = Matrix4x4::default();
        m.m[0][3] = delta.x;
        m.m[1][3] = delta.y;
        m.m[2][3] = delta.z;
        m_inv.m[0][3] = -delta.x;
        m_inv.m[1][3] = -delta.y;
        m_inv.m[2][3] = -delta.z;
        Transform { m, m_inv }
    }
    pub fn scale(x: Float, y: Float, z: Float) -> Result<Transform, SceneError> {
        if x == 0.0 || y == 0.0 || z == 0.0 {
            return Err(SceneError::SingularTransform(format!(
                "scale ({}, {}, {})",
                x, y, z
            )));
        }
        let mut m: Matrix4x4 = Matrix4x4::default();
        let mut m_inv: Matrix4x4 = Matrix4x4::default();
        m.m[0][0] = x;
        m.m[1][1] = y;
        m.m[2][2] = z;
        m_inv.m[0][0] = 1.0 / x;
        m_inv.m[1][1] = 1.0 / y;
        m_inv.m[2][2] = 1.0 / z;
        Ok(Transform { m, m_inv })
    }
    /// Rotation by `theta` degrees around an arbitrary `axis`.
    pub fn rotate(theta: Float, axis: &Vector3f) -> Transform {
        let a: Vector3f = axis.normalize();
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let mut m: Matrix4x4 = Matrix4x4::default();
        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;
        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;
        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;
        // rotations are orthogonal
        Transform {
            m,
            m_inv: m.transpose(),
        }
    }
    /// World-to-camera transform for a camera at `pos` looking at
    /// `look`. Fails if `up` is parallel to the viewing direction.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Result<Transform, SceneError> {
        let dir: Vector3f = (*look - *pos).normalize();
        let right: Vector3f = vec3_cross_vec3(&up.normalize(), &dir);
        if right.length() == 0.0 || dir.has_nans() {
            return Err(SceneError::InvalidCamera(format!(
                "up vector {:?} and viewing direction {:?} are parallel",
                up, dir
            )));
        }
        let left: Vector3f = right.normalize();
        let new_up: Vector3f = vec3_cross_vec3(&dir, &left);
        let mut camera_to_world: Matrix4x4 = Matrix4x4::default();
        for (col, v) in [left, new_up, dir].iter().enumerate() {
            camera_to_world.m[0][col] = v.x;
            camera_to_world.m[1][col] = v.y;
            camera_to_world.m[2][col] = v.z;
        }
        camera_to_world.m[0][3] = pos.x;
        camera_to_world.m[1][3] = pos.y;
        camera_to_world.m[2][3] = pos.z;
        Ok(Transform::new(camera_to_world)?.inverse())
    }
    /// Projective transform with the given vertical field of view (in
    /// degrees) mapping `z` in `[n, f]` to `[0, 1]`.
    pub fn perspective(fov: Float, n: Float, f: Float) -> Result<Transform, SceneError> {
        let mut persp: Matrix4x4 = Matrix4x4::default();
        persp.m[2][2] = f / (f - n);
        persp.m[2][3] = -f * n / (f - n);
        persp.m[3][2] = 1.0;
        persp.m[3][3] = 0.0;
        let inv_tan_ang: Float = 1.0 / (radians(fov) / 2.0).tan();
        Ok(Transform::scale(inv_tan_ang, inv_tan_ang, 1.0)? * Transform::new(persp)?)
    }
    fn apply(&self, p: &Point3f) -> (Float, Float, Float, Float) {
        let m = &self.m.m;
        (
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
            m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3],
        )
    }
    fn abs_sum(&self, p: &Point3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f {
            x: (m[0][0] * p.x).abs() + (m[0][1] * p.y).abs() + (m[0][2] * p.z).abs() + m[0][3].abs(),
            y: (m[1][0] * p.x).abs() + (m[1][1] * p.y).abs() + (m[1][2] * p.z).abs() + m[1][3].abs(),
            z: (m[2][0] * p.x).abs() + (m[2][1] * p.y).abs() + (m[2][2] * p.z).abs() + m[2][3].abs(),
        }
    }
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let (xp, yp, zp, wp) = self.apply(p);
        let p: Point3f = Point3f {
            x: xp,
            y: yp,
            z: zp,
        };
        if wp == 1.0 as Float {
            p
        } else {
            p / wp
        }
    }
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        }
    }
    /// Normals transform with the inverse transpose.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let mi = &self.m_inv.m;
        Normal3f {
            x: mi[0][0] * n.x + mi[1][0] * n.y + mi[2][0] * n.z,
            y: mi[0][1] * n.x + mi[1][1] * n.y + mi[2][1] * n.z,
            z: mi[0][2] * n.x + mi[1][2] * n.y + mi[2][2] * n.z,
        }
    }
    /// Conservative: the union of all eight transformed corners.
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        (0..8_u8).fold(Bounds3f::default(), |acc, corner| {
            bnd3_union_pnt3f(&acc, &self.transform_point(&b.corner(corner)))
        })
    }
    pub fn transform_point_with_error(&self, p: &Point3f) -> (Point3f, Vector3f) {
        let p_error: Vector3f = self.abs_sum(p) * gamma(3_i32);
        (self.transform_point(p), p_error)
    }
    /// Transform a point that already carries the error `pt_error`.
    pub fn transform_point_with_abs_error(
        &self,
        pt: &Point3f,
        pt_error: &Vector3f,
    ) -> (Point3f, Vector3f) {
        let m = &self.m.m;
        let carried: Vector3f = Vector3f {
            x: m[0][0].abs() * pt_error.x + m[0][1].abs() * pt_error.y + m[0][2].abs() * pt_error.z,
            y: m[1][0].abs() * pt_error.x + m[1][1].abs() * pt_error.y + m[1][2].abs() * pt_error.z,
            z: m[2][0].abs() * pt_error.x + m[2][1].abs() * pt_error.y + m[2][2].abs() * pt_error.z,
        };
        let abs_error: Vector3f =
            carried * (gamma(3_i32) + 1.0 as Float) + self.abs_sum(pt) * gamma(3_i32);
        (self.transform_point(pt), abs_error)
    }
    pub fn transform_vector_with_error(&self, v: &Vector3f) -> (Vector3f, Vector3f) {
        let m = &self.m.m;
        let abs_error: Vector3f = Vector3f {
            x: (m[0][0] * v.x).abs() + (m[0][1] * v.y).abs() + (m[0][2] * v.z).abs(),
            y: (m[1][0] * v.x).abs() + (m[1][1] * v.y).abs() + (m[1][2] * v.z).abs(),
            z: (m[2][0] * v.x).abs() + (m[2][1] * v.y).abs() + (m[2][2] * v.z).abs(),
        } * gamma(3_i32);
        (self.transform_vector(v), abs_error)
    }
    /// Transform a ray and move its origin to the far side of the
    /// rounding error box, shortening `t_max` by the same amount.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        let (mut o, o_error) = self.transform_point_with_error(&r.o);
        let d: Vector3f = self.transform_vector(&r.d);
        let length_squared: Float = d.length_squared();
        let mut t_max: Float = r.t_max.get();
        if length_squared > 0.0 as Float {
            let dt: Float = vec3_dot_vec3f(&d.abs(), &o_error) / length_squared;
            o = o + d * dt;
            t_max -= dt;
        }
        let ray: Ray = Ray::with_t_max(o, d, t_max);
        Ray {
            t_min: r.t_min,
            time: r.time,
            depth: r.depth,
            ..ray
        }
    }
    /// Like `transform_ray` but keeps `t_max` and reports the origin
    /// and direction errors, which shapes feed into **EFloat**s.
    pub fn transform_ray_with_error(&self, r: &Ray) -> (Ray, Vector3f, Vector3f) {
        let (mut o, o_error) = self.transform_point_with_error(&r.o);
        let (d, d_error) = self.transform_vector_with_error(&r.d);
        let length_squared: Float = d.length_squared();
        if length_squared > 0.0 {
            let dt: Float = vec3_dot_vec3f(&d.abs(), &o_error) / length_squared;
            o = o + d * dt;
        }
        let ray: Ray = Ray::with_t_max(o, d, r.t_max.get());
        (
            Ray {
                t_min: r.t_min,
                time: r.time,
                depth: r.depth,
                ..ray
            },
            o_error,
            d_error,
        )
    }
    /// Map an object-space hit record to world space.
    pub fn transform_surface_interaction<'a>(
        &self,
        si: &SurfaceInteraction<'a>,
    ) -> SurfaceInteraction<'a> {
        let mut ret: SurfaceInteraction<'a> = SurfaceInteraction::default();
        let (p, p_error) = self.transform_point_with_abs_error(&si.common.p, &si.common.p_error);
        ret.common.p = p;
        ret.common.p_error = p_error;
        ret.common.n = self.transform_normal(&si.common.n).normalize();
        ret.common.wo = self.transform_vector(&si.common.wo).normalize();
        ret.common.time = si.common.time;
        ret.uv = si.uv;
        ret.shape = si.shape;
        ret.primitive = si.primitive;
        ret.dpdu = self.transform_vector(&si.dpdu);
        ret.dpdv = self.transform_vector(&si.dpdv);
        ret.dndu = self.transform_normal(&si.dndu);
        ret.dndv = self.transform_normal(&si.dndv);
        ret.shading.n = self.transform_normal(&si.shading.n).normalize();
        ret.shading.dpdu = self.transform_vector(&si.shading.dpdu);
        ret.shading.dpdv = self.transform_vector(&si.shading.dpdv);
        ret.shading.dndu = self.transform_normal(&si.shading.dndu);
        ret.shading.dndv = self.transform_normal(&si.shading.dndv);
        ret.shading.n = nrm_faceforward_nrm(&ret.shading.n, &ret.common.n);
        ret
    }
}

impl_op_ex!(*|t1: &Transform, t2: &Transform| -> Transform {
    Transform {
        m: t1.m * t2.m,
        m_inv: t2.m_inv * t1.m_inv,
    }
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn singular_matrix_is_rejected() {
        let mut m: Matrix4x4 = Matrix4x4::default();
        m.m[1][1] = 0.0;
        assert!(Transform::new(m).is_err());
        assert!(Transform::scale(1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn inverse_round_trip() {
        let t: Transform = Transform::translate(&Vector3f {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        }) * Transform::rotate(30.0, &Vector3f {
            x: 0.0,
            y: 1.0,
            z: 1.0,
        });
        let full: Transform = Transform::new(t.m).unwrap();
        let p: Point3f = Point3f {
            x: -4.0,
            y: 0.5,
            z: 7.0,
        };
        let back: Point3f = full.inverse().transform_point(&full.transform_point(&p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-4);
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let eye: Point3f = Point3f {
            x: 278.0,
            y: 278.0,
            z: -800.0,
        };
        let target: Point3f = Point3f {
            x: 278.0,
            y: 278.0,
            z: 0.0,
        };
        let up: Vector3f = Vector3f {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        };
        let world_to_camera: Transform = Transform::look_at(&eye, &target, &up).unwrap();
        let origin: Point3f = world_to_camera.transform_point(&eye);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(origin.z, 0.0, epsilon = 1e-3);
        let ahead: Point3f = world_to_camera.transform_point(&target);
        assert_relative_eq!(ahead.z, 800.0, epsilon = 1e-2);
        assert!(Transform::look_at(&eye, &target, &Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        })
        .is_err());
    }

    #[test]
    fn bounds_contain_rotated_corners() {
        let b: Bounds3f = Bounds3f::new(
            Point3f {
                x: -1.0,
                y: -1.0,
                z: -1.0,
            },
            Point3f {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
        );
        let t: Transform = Transform::rotate(45.0, &Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        });
        let tb: Bounds3f = t.transform_bounds(&b);
        assert_relative_eq!(tb.p_max.x, 2.0_f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(tb.p_max.z, 1.0, epsilon = 1e-5);
    }
}
