//! Points, vectors, normals, bounding boxes and rays.
//!
//! Points and vectors share a representation but not a meaning: a
//! point is a location, a vector a direction, and a normal is a
//! vector tied to a surface (which matters once transforms are
//! applied, see **Transform**). Only the operators which make sense
//! for each pairing are implemented, so `Point3f - Point3f` yields a
//! `Vector3f` while `Point3f + Point3f` is reserved for weighted sums.
//!
//! ```rust
//! use rs_pathtracer::core::geometry::{Point3f, Ray, Vector3f};
//!
//! let ray = Ray::new(
//!     Point3f { x: 0.0, y: 0.0, z: -5.0 },
//!     Vector3f { x: 0.0, y: 0.0, z: 1.0 },
//! );
//! let p = ray.position(5.0);
//! assert_eq!(p.z, 0.0);
//! ```
//!
//! # Bounding Boxes
//!
//! **Bounds3f** is the axis-aligned box used by shapes and the BVH.
//! Its `Default` is the *empty* box (`p_min` at `+MAX`, `p_max` at
//! `-MAX`), so unions starting from the default are correct.

// std
use std::cell::Cell;
use std::ops;
use std::ops::{Index, IndexMut};
// others
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
// pbrt
use crate::core::pbrt::Float;
use crate::core::pbrt::{gamma, lerp, next_float_down, next_float_up};

#[derive(EnumIter, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

impl From<u8> for XYZEnum {
    fn from(axis: u8) -> Self {
        match axis {
            0 => XYZEnum::X,
            1 => XYZEnum::Y,
            _ => XYZEnum::Z,
        }
    }
}

// 2D

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector2f {
    pub x: Float,
    pub y: Float,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl From<Point2i> for Point2f {
    fn from(p: Point2i) -> Self {
        Point2f {
            x: p.x as Float,
            y: p.y as Float,
        }
    }
}

impl_op_ex!(+|a: &Point2f, b: &Point2f| -> Point2f {
    Point2f {
        x: a.x + b.x,
        y: a.y + b.y,
    }
});

impl_op_ex!(+|a: &Point2f, b: &Vector2f| -> Point2f {
    Point2f {
        x: a.x + b.x,
        y: a.y + b.y,
    }
});

impl_op_ex!(-|a: &Point2f, b: &Point2f| -> Vector2f {
    Vector2f {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});

impl_op_ex!(-|a: &Point2f, b: &Vector2f| -> Point2f {
    Point2f {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});

impl_op_ex!(*|a: &Point2f, s: Float| -> Point2f {
    Point2f {
        x: a.x * s,
        y: a.y * s,
    }
});

impl_op_ex!(+|a: &Point2i, b: &Point2i| -> Point2i {
    Point2i {
        x: a.x + b.x,
        y: a.y + b.y,
    }
});

impl_op_ex!(-|a: &Point2i, b: &Point2i| -> Vector2i {
    Vector2i {
        x: a.x - b.x,
        y: a.y - b.y,
    }
});

/// Apply floor component-wise.
pub fn pnt2_floor(p: Point2f) -> Point2f {
    Point2f {
        x: p.x.floor(),
        y: p.y.floor(),
    }
}

/// Apply ceil component-wise.
pub fn pnt2_ceil(p: Point2f) -> Point2f {
    Point2f {
        x: p.x.ceil(),
        y: p.y.ceil(),
    }
}

pub fn pnt2_min_pnt2i(a: Point2i, b: Point2i) -> Point2i {
    Point2i {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
    }
}

pub fn pnt2_max_pnt2i(a: Point2i, b: Point2i) -> Point2i {
    Point2i {
        x: a.x.max(b.x),
        y: a.y.max(b.y),
    }
}

/// Half-open containment test used for pixel coordinates.
pub fn pnt2_inside_exclusivei(pt: Point2i, b: &Bounds2i) -> bool {
    pt.x >= b.p_min.x && pt.x < b.p_max.x && pt.y >= b.p_min.y && pt.y < b.p_max.y
}

// 3D

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Same direction, unit length.
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Normal3f {
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Normal3f {
        *self / self.length()
    }
    pub fn abs(&self) -> Normal3f {
        Normal3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Point3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(-|a: Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, s: Float| -> Vector3f {
    Vector3f {
        x: a.x * s,
        y: a.y * s,
        z: a.z * s,
    }
});

impl_op_ex!(/|a: &Vector3f, s: Float| -> Vector3f {
    let inv: Float = 1.0 as Float / s;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(+= |a: &mut Vector3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

impl_op!(*= |a: &mut Vector3f, s: Float| {
    a.x *= s;
    a.y *= s;
    a.z *= s;
});

impl_op!(/= |a: &mut Vector3f, s: Float| {
    let inv: Float = 1.0 as Float / s;
    a.x *= inv;
    a.y *= inv;
    a.z *= inv;
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

// weighted sums of points (centroids, barycentric interpolation)
impl_op_ex!(+|a: &Point3f, b: &Point3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(*|a: &Point3f, s: Float| -> Point3f {
    Point3f {
        x: a.x * s,
        y: a.y * s,
        z: a.z * s,
    }
});

impl_op_ex!(/|a: &Point3f, s: Float| -> Point3f {
    let inv: Float = 1.0 as Float / s;
    Point3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(*= |a: &mut Point3f, s: Float| {
    a.x *= s;
    a.y *= s;
    a.z *= s;
});

impl_op!(/= |a: &mut Point3f, s: Float| {
    let inv: Float = 1.0 as Float / s;
    a.x *= inv;
    a.y *= inv;
    a.z *= inv;
});

impl_op_ex!(+|a: &Normal3f, b: &Normal3f| -> Normal3f {
    Normal3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(*|a: &Normal3f, s: Float| -> Normal3f {
    Normal3f {
        x: a.x * s,
        y: a.y * s,
        z: a.z * s,
    }
});

impl_op_ex!(/|a: &Normal3f, s: Float| -> Normal3f {
    let inv: Float = 1.0 as Float / s;
    Normal3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            XYZEnum::Z => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Vector3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            XYZEnum::Z => &mut self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            XYZEnum::Z => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Point3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            XYZEnum::Z => &mut self.z,
        }
    }
}

pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

pub fn vec3_dot_nrmf(v: &Vector3f, n: &Normal3f) -> Float {
    v.x * n.x + v.y * n.y + v.z * n.z
}

pub fn vec3_abs_dot_nrmf(v: &Vector3f, n: &Normal3f) -> Float {
    vec3_dot_nrmf(v, n).abs()
}

pub fn nrm_dot_nrmf(n1: &Normal3f, n2: &Normal3f) -> Float {
    n1.x * n2.x + n1.y * n2.y + n1.z * n2.z
}

/// Cross product, evaluated in double precision to avoid
/// catastrophic cancellation.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let (v1x, v1y, v1z) = (v1.x as f64, v1.y as f64, v1.z as f64);
    let (v2x, v2y, v2z) = (v2.x as f64, v2.y as f64, v2.z as f64);
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

/// Build an orthonormal basis around the unit vector `v1`.
pub fn vec3_coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2: Vector3f = if v1.x.abs() > v1.y.abs() {
        Vector3f {
            x: -v1.z,
            y: 0.0,
            z: v1.x,
        } / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f {
            x: 0.0,
            y: v1.z,
            z: -v1.y,
        } / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3: Vector3f = vec3_cross_vec3(v1, &v2);
    (v2, v3)
}

/// Flip `n` into the hemisphere of `v`.
pub fn nrm_faceforward_vec3(n: &Normal3f, v: &Vector3f) -> Normal3f {
    if vec3_dot_nrmf(v, n) < 0.0 as Float {
        -*n
    } else {
        *n
    }
}

pub fn nrm_faceforward_nrm(n: &Normal3f, n2: &Normal3f) -> Normal3f {
    if nrm_dot_nrmf(n, n2) < 0.0 as Float {
        -*n
    } else {
        *n
    }
}

pub fn pnt3_distancef(p1: &Point3f, p2: &Point3f) -> Float {
    (p1 - p2).length()
}

pub fn pnt3_distance_squaredf(p1: &Point3f, p2: &Point3f) -> Float {
    (p1 - p2).length_squared()
}

/// Move a spawned ray's origin out of the error box around `p`, on
/// the side of the surface `w` points to. The offset is proportional
/// to `p_error` (and so to the magnitude of `p`), then rounded one
/// ulp further away so the new origin is strictly outside.
pub fn pnt3_offset_ray_origin(
    p: &Point3f,
    p_error: &Vector3f,
    n: &Normal3f,
    w: &Vector3f,
) -> Point3f {
    let d: Float = vec3_dot_nrmf(p_error, &n.abs());
    let mut offset: Vector3f = Vector3f::from(*n) * d;
    if vec3_dot_nrmf(w, n) < 0.0 as Float {
        offset = -offset;
    }
    let mut po: Point3f = *p + offset;
    for i in XYZEnum::iter() {
        if offset[i] > 0.0 as Float {
            po[i] = next_float_up(po[i]);
        } else if offset[i] < 0.0 as Float {
            po[i] = next_float_down(po[i]);
        }
    }
    po
}

/// Direction given by spherical angles in the local frame.
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    Vector3f {
        x: sin_theta * phi.cos(),
        y: sin_theta * phi.sin(),
        z: cos_theta,
    }
}

/// Direction given by spherical angles relative to the frame `(x, y, z)`.
pub fn spherical_direction_vec3(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    *x * (sin_theta * phi.cos()) + *y * (sin_theta * phi.sin()) + *z * cos_theta
}

// Bounds

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bounds2f {
    pub p_min: Point2f,
    pub p_max: Point2f,
}

impl Bounds2f {
    pub fn diagonal(&self) -> Vector2f {
        self.p_max - self.p_min
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Bounds2i {
    pub p_min: Point2i,
    pub p_max: Point2i,
}

impl Bounds2i {
    pub fn new(p1: Point2i, p2: Point2i) -> Self {
        Bounds2i {
            p_min: pnt2_min_pnt2i(p1, p2),
            p_max: pnt2_max_pnt2i(p1, p2),
        }
    }
    pub fn diagonal(&self) -> Vector2i {
        self.p_max - self.p_min
    }
    pub fn area(&self) -> i32 {
        let d: Vector2i = self.diagonal();
        (d.x * d.y).max(0)
    }
}

/// Row-major iteration over the pixels of a `Bounds2i`.
pub struct Bounds2Iterator<'a> {
    p: Point2i,
    bounds: &'a Bounds2i,
}

impl<'a> Iterator for Bounds2Iterator<'a> {
    type Item = Point2i;

    fn next(&mut self) -> Option<Point2i> {
        if self.bounds.p_min.x >= self.bounds.p_max.x {
            return None;
        }
        self.p.x += 1;
        if self.p.x == self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        if self.p.y >= self.bounds.p_max.y {
            None
        } else {
            Some(self.p)
        }
    }
}

impl<'a> IntoIterator for &'a Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2Iterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        // start one before p_min.x, next() advances first
        Bounds2Iterator {
            p: Point2i {
                x: self.p_min.x - 1,
                y: self.p_min.y,
            },
            bounds: self,
        }
    }
}

pub fn bnd2_intersect_bnd2i(b1: &Bounds2i, b2: &Bounds2i) -> Bounds2i {
    Bounds2i {
        p_min: pnt2_max_pnt2i(b1.p_min, b2.p_min),
        p_max: pnt2_min_pnt2i(b1.p_max, b2.p_max),
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// The empty box.
    fn default() -> Bounds3f {
        Bounds3f {
            p_min: Point3f {
                x: Float::MAX,
                y: Float::MAX,
                z: Float::MAX,
            },
            p_max: Point3f {
                x: Float::MIN,
                y: Float::MIN,
                z: Float::MIN,
            },
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Bounds3f {
            p_min: Point3f {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
                z: p1.z.min(p2.z),
            },
            p_max: Point3f {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
                z: p1.z.max(p2.z),
            },
        }
    }
    /// True for the default (inverted) box and anything else with
    /// `p_min > p_max` along some axis.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }
    pub fn corner(&self, corner: u8) -> Point3f {
        Point3f {
            x: if corner & 1 == 0 {
                self.p_min.x
            } else {
                self.p_max.x
            },
            y: if corner & 2 == 0 {
                self.p_min.y
            } else {
                self.p_max.y
            },
            z: if corner & 4 == 0 {
                self.p_min.z
            } else {
                self.p_max.z
            },
        }
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn centroid(&self) -> Point3f {
        self.p_min * 0.5 + self.p_max * 0.5
    }
    pub fn surface_area(&self) -> Float {
        if self.is_empty() {
            return 0.0;
        }
        let d: Vector3f = self.diagonal();
        2.0 as Float * (d.x * d.y + d.x * d.z + d.y * d.z)
    }
    pub fn maximum_extent(&self) -> XYZEnum {
        let d: Vector3f = self.diagonal();
        if d.x > d.y && d.x > d.z {
            XYZEnum::X
        } else if d.y > d.z {
            XYZEnum::Y
        } else {
            XYZEnum::Z
        }
    }
    pub fn lerp(&self, t: &Point3f) -> Point3f {
        Point3f {
            x: lerp(t.x, self.p_min.x, self.p_max.x),
            y: lerp(t.y, self.p_min.y, self.p_max.y),
            z: lerp(t.z, self.p_min.z, self.p_max.z),
        }
    }
    /// Position of `p` relative to the box, `(0,0,0)` at `p_min` and
    /// `(1,1,1)` at `p_max`.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o: Vector3f = p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        }
        o
    }
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        if self.is_empty() {
            return (Point3f::default(), 0.0 as Float);
        }
        let center: Point3f = self.centroid();
        (center, pnt3_distancef(&center, &self.p_max))
    }
    /// Slab test returning the parametric overlap `(t0, t1)` with the
    /// ray's `[t_min, t_max]` interval.
    pub fn intersect_b(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0: Float = ray.t_min;
        let mut t1: Float = ray.t_max.get();
        for i in XYZEnum::iter() {
            let inv_ray_dir: Float = 1.0 as Float / ray.d[i];
            let mut t_near: Float = (self.p_min[i] - ray.o[i]) * inv_ray_dir;
            let mut t_far: Float = (self.p_max[i] - ray.o[i]) * inv_ray_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // conservative far value covers rounding in the slab math
            t_far *= 1.0 as Float + 2.0 as Float * gamma(3_i32);
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
    /// Fast slab test used during BVH traversal; `inv_dir` and
    /// `dir_is_neg` are precomputed once per ray.
    pub fn intersect_p(&self, ray: &Ray, inv_dir: &Vector3f, dir_is_neg: &[usize; 3]) -> bool {
        let bounds: [&Point3f; 2] = [&self.p_min, &self.p_max];
        let mut t_min: Float = (bounds[dir_is_neg[0]].x - ray.o.x) * inv_dir.x;
        let mut t_max: Float = (bounds[1 - dir_is_neg[0]].x - ray.o.x) * inv_dir.x;
        let ty_min: Float = (bounds[dir_is_neg[1]].y - ray.o.y) * inv_dir.y;
        let mut ty_max: Float = (bounds[1 - dir_is_neg[1]].y - ray.o.y) * inv_dir.y;
        t_max *= 1.0 + 2.0 * gamma(3_i32);
        ty_max *= 1.0 + 2.0 * gamma(3_i32);
        if t_min > ty_max || ty_min > t_max {
            return false;
        }
        if ty_min > t_min {
            t_min = ty_min;
        }
        if ty_max < t_max {
            t_max = ty_max;
        }
        let tz_min: Float = (bounds[dir_is_neg[2]].z - ray.o.z) * inv_dir.z;
        let mut tz_max: Float = (bounds[1 - dir_is_neg[2]].z - ray.o.z) * inv_dir.z;
        tz_max *= 1.0 + 2.0 * gamma(3_i32);
        if t_min > tz_max || tz_min > t_max {
            return false;
        }
        if tz_min > t_min {
            t_min = tz_min;
        }
        if tz_max < t_max {
            t_max = tz_max;
        }
        (t_min < ray.t_max.get()) && (t_max > ray.t_min)
    }
}

pub fn bnd3_union_pnt3f(b: &Bounds3f, p: &Point3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b.p_min.x.min(p.x),
            y: b.p_min.y.min(p.y),
            z: b.p_min.z.min(p.z),
        },
        p_max: Point3f {
            x: b.p_max.x.max(p.x),
            y: b.p_max.y.max(p.y),
            z: b.p_max.z.max(p.z),
        },
    }
}

pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b1.p_min.x.min(b2.p_min.x),
            y: b1.p_min.y.min(b2.p_min.y),
            z: b1.p_min.z.min(b2.p_min.z),
        },
        p_max: Point3f {
            x: b1.p_max.x.max(b2.p_max.x),
            y: b1.p_max.y.max(b2.p_max.y),
            z: b1.p_max.z.max(b2.p_max.z),
        },
    }
}

pub fn pnt3_inside_bnd3(p: &Point3f, b: &Bounds3f) -> bool {
    p.x >= b.p_min.x
        && p.x <= b.p_max.x
        && p.y >= b.p_min.y
        && p.y <= b.p_max.y
        && p.z >= b.p_min.z
        && p.z <= b.p_max.z
}

// Ray

/// A ray segment `o + t * d` for `t` in `[t_min, t_max]`.
///
/// `t_max` sits in a `Cell` because the nearest-hit search shrinks it
/// every time a closer hit is confirmed, while everything else
/// borrows the ray immutably. Rays are per-sample values and never
/// cross threads.
#[derive(Debug, Clone)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    pub t_min: Float,
    pub t_max: Cell<Float>,
    /// used for animations
    pub time: Float,
    /// number of scattering events on the path which spawned this ray
    pub depth: u32,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            o: Point3f::default(),
            d: Vector3f::default(),
            t_min: 0.0 as Float,
            t_max: Cell::new(Float::INFINITY),
            time: 0.0 as Float,
            depth: 0_u32,
        }
    }
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray {
            o,
            d,
            ..Default::default()
        }
    }
    pub fn with_t_max(o: Point3f, d: Vector3f, t_max: Float) -> Self {
        Ray {
            o,
            d,
            t_max: Cell::new(t_max),
            ..Default::default()
        }
    }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_bounds_union() {
        let empty: Bounds3f = Bounds3f::default();
        assert!(empty.is_empty());
        let p: Point3f = Point3f {
            x: 1.0,
            y: -2.0,
            z: 3.0,
        };
        let b: Bounds3f = bnd3_union_pnt3f(&empty, &p);
        assert_eq!(b.p_min, p);
        assert_eq!(b.p_max, p);
        assert_eq!(empty.surface_area(), 0.0);
    }

    #[test]
    fn point_vector_arithmetic() {
        let p: Point3f = Point3f {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let v: Vector3f = Vector3f {
            x: 0.5,
            y: -1.0,
            z: 2.0,
        };
        let q: Point3f = p + v * 2.0;
        assert_eq!(
            q,
            Point3f {
                x: 2.0,
                y: 0.0,
                z: 7.0,
            }
        );
        let back: Vector3f = &q - &p;
        assert_relative_eq!(back.x, 1.0);
        assert_relative_eq!(back.z, 4.0);
        let mut w: Vector3f = -v;
        w *= 2.0;
        assert_relative_eq!(w.y, 2.0);
        let uv: Point2f = Point2f { x: 0.25, y: 0.5 } * 4.0;
        assert_relative_eq!(uv.y, 2.0);
    }

    #[test]
    fn slab_tests_agree() {
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
        let ray: Ray = Ray::new(
            Point3f {
                x: 0.25,
                y: -0.5,
                z: -4.0,
            },
            Vector3f {
                x: 0.0,
                y: 0.1,
                z: 1.0,
            },
        );
        let inv_dir: Vector3f = Vector3f {
            x: 1.0 / ray.d.x,
            y: 1.0 / ray.d.y,
            z: 1.0 / ray.d.z,
        };
        let dir_is_neg: [usize; 3] = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];
        let (t0, t1) = b.intersect_b(&ray).unwrap();
        assert_relative_eq!(t0, 3.0, epsilon = 1e-5);
        assert!(t1 > t0);
        assert!(b.intersect_p(&ray, &inv_dir, &dir_is_neg));
        // segment ends before the box
        ray.t_max.set(2.5);
        assert!(b.intersect_b(&ray).is_none());
        assert!(!b.intersect_p(&ray, &inv_dir, &dir_is_neg));
    }

    #[test]
    fn offset_origin_leaves_error_box() {
        let p: Point3f = Point3f {
            x: 1000.0,
            y: 0.0,
            z: 0.0,
        };
        let n: Normal3f = Normal3f {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        };
        let p_error: Vector3f = Vector3f {
            x: 1e-3,
            y: 1e-3,
            z: 1e-3,
        };
        let out: Point3f = pnt3_offset_ray_origin(&p, &p_error, &n, &Vector3f::from(n));
        assert!(out.x > p.x + p_error.x);
        let inside: Point3f = pnt3_offset_ray_origin(&p, &p_error, &n, &-Vector3f::from(n));
        assert!(inside.x < p.x - p_error.x);
    }

    #[test]
    fn pixel_iteration_is_row_major() {
        let b: Bounds2i = Bounds2i::new(Point2i { x: 2, y: 3 }, Point2i { x: 4, y: 5 });
        let pixels: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(
            pixels,
            vec![
                Point2i { x: 2, y: 3 },
                Point2i { x: 3, y: 3 },
                Point2i { x: 2, y: 4 },
                Point2i { x: 3, y: 4 },
            ]
        );
        let empty: Bounds2i = Bounds2i::default();
        assert_eq!(empty.into_iter().count(), 0);
    }
}
