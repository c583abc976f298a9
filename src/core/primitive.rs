//! **Primitive** is the bridge between the geometry processing and
//! the shading subsystem: it binds a shape to its material and its
//! (optional) area light. Aggregates are primitives too, so a BVH can
//! hold plain geometric primitives or further BVHs.

// std
use std::sync::Arc;
// pbrt
use crate::accelerators::bvh::BVHAccel;
use crate::core::geometry::nrm_dot_nrmf;
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::AreaLight;
use crate::core::material::{Material, TransportMode};
use crate::core::shape::Shape;

pub enum Primitive {
    Geometric(Box<GeometricPrimitive>),
    BVH(Box<BVHAccel>),
}

impl Primitive {
    pub fn world_bound(&self) -> Bounds3f {
        match self {
            Primitive::Geometric(primitive) => primitive.world_bound(),
            Primitive::BVH(primitive) => primitive.world_bound(),
        }
    }
    /// Nearest hit along `ray`; shrinks `ray.t_max` to the hit
    /// distance when one is found.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        match self {
            Primitive::Geometric(primitive) => primitive.intersect(ray),
            Primitive::BVH(primitive) => primitive.intersect(ray),
        }
    }
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        match self {
            Primitive::Geometric(primitive) => primitive.intersect_p(ray),
            Primitive::BVH(primitive) => primitive.intersect_p(ray),
        }
    }
}

pub struct GeometricPrimitive {
    pub shape: Arc<dyn Shape + Send + Sync>,
    pub material: Option<Arc<dyn Material + Send + Sync>>,
    pub area_light: Option<Arc<dyn AreaLight + Send + Sync>>,
}

impl GeometricPrimitive {
    pub fn new(
        shape: Arc<dyn Shape + Send + Sync>,
        material: Option<Arc<dyn Material + Send + Sync>>,
        area_light: Option<Arc<dyn AreaLight + Send + Sync>>,
    ) -> Self {
        GeometricPrimitive {
            shape,
            material,
            area_light,
        }
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        let (mut isect, t_hit) = self.shape.intersect(ray)?;
        ray.t_max.set(t_hit);
        isect.primitive = Some(self);
        Some(isect)
    }
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.shape.intersect_p(ray)
    }
    pub fn compute_scattering_functions(
        &self,
        isect: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        if let Some(ref material) = self.material {
            material.compute_scattering_functions(isect, mode, allow_multiple_lobes);
        }
        debug_assert!(
            nrm_dot_nrmf(&isect.common.n, &isect.shading.n) >= 0.0,
            "n: {:?} dot shading.n: {:?}",
            isect.common.n,
            isect.shading.n
        );
    }
}
