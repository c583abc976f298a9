//! # Scene
//!
//! The **Scene** owns the root of the primitive hierarchy and all
//! lights. It is read-only once constructed and shared by every
//! render thread.
//!

// std
use std::sync::Arc;
// others
use log::debug;
// pbrt
use crate::core::geometry::{Bounds3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::{Light, LightFlags};
use crate::core::primitive::Primitive;

pub struct Scene {
    pub lights: Vec<Arc<dyn Light + Sync + Send>>,
    pub infinite_lights: Vec<Arc<dyn Light + Sync + Send>>,
    pub aggregate: Arc<Primitive>,
    world_bound: Bounds3f,
}

impl Scene {
    /// Every light gets its `preprocess` call here, exactly once,
    /// after the world bound is known.
    pub fn new(aggregate: Arc<Primitive>, lights: Vec<Arc<dyn Light + Sync + Send>>) -> Self {
        let world_bound: Bounds3f = aggregate.world_bound();
        let infinite_lights: Vec<Arc<dyn Light + Sync + Send>> = lights
            .iter()
            .filter(|light| (light.get_flags() & LightFlags::Infinite as u8) != 0)
            .cloned()
            .collect();
        let scene: Scene = Scene {
            lights,
            infinite_lights,
            aggregate,
            world_bound,
        };
        for light in &scene.lights {
            light.preprocess(&scene);
        }
        debug!(
            "scene with {} lights ({} infinite), bounds {:?}",
            scene.lights.len(),
            scene.infinite_lights.len(),
            scene.world_bound
        );
        scene
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }
    /// Nearest hit; `ray.t_max` is narrowed to it. Degenerate rays
    /// hit nothing.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        if ray.d == Vector3f::default() || ray.d.has_nans() {
            return None;
        }
        self.aggregate.intersect(ray)
    }
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        if ray.d == Vector3f::default() || ray.d.has_nans() {
            return false;
        }
        self.aggregate.intersect_p(ray)
    }
}
