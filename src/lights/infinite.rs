// std
use std::f32::consts::PI;
use std::sync::RwLock;
// pbrt
use crate::core::geometry::{Point2f, Point3f, Ray, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{Light, LightFlags, LightSample, VisibilityTester};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};
use crate::core::scene::Scene;

/// Constant radiance arriving from every direction, as if the scene
/// sat inside an infinitely large emitting sphere.
pub struct InfiniteAreaLight {
    pub l: Spectrum,
    world_center: RwLock<Point3f>,
    world_radius: RwLock<Float>,
    n_samples: i32,
}

impl InfiniteAreaLight {
    pub fn new(l: &Spectrum, n_samples: i32) -> Self {
        InfiniteAreaLight {
            l: *l,
            world_center: RwLock::new(Point3f::default()),
            world_radius: RwLock::new(0.0 as Float),
            n_samples: std::cmp::max(1_i32, n_samples),
        }
    }
    fn world_sphere(&self) -> (Point3f, Float) {
        let center: Point3f = match self.world_center.read() {
            Ok(center) => *center,
            Err(poisoned) => *poisoned.into_inner(),
        };
        let radius: Float = match self.world_radius.read() {
            Ok(radius) => *radius,
            Err(poisoned) => *poisoned.into_inner(),
        };
        (center, radius)
    }
}

impl Light for InfiniteAreaLight {
    fn sample_li(&self, iref: &InteractionCommon, u: &Point2f) -> LightSample {
        let wi: Vector3f = uniform_sample_sphere(u);
        let (_center, radius) = self.world_sphere();
        // a point safely outside the scene in direction wi
        let p_outside: Point3f = iref.p + wi * (2.0 as Float * radius.max(1.0 as Float));
        LightSample {
            li: self.l,
            wi,
            pdf: uniform_sphere_pdf(),
            vis: VisibilityTester::new(
                *iref,
                InteractionCommon {
                    p: p_outside,
                    time: iref.time,
                    ..Default::default()
                },
            ),
        }
    }
    fn power(&self) -> Spectrum {
        let (_center, radius) = self.world_sphere();
        self.l * (PI * radius * radius)
    }
    /// Needs the scene bounds, which are only known once all of the
    /// scene geometry has been created.
    fn preprocess(&self, scene: &Scene) {
        let (center, radius) = scene.world_bound().bounding_sphere();
        if let Ok(mut world_center) = self.world_center.write() {
            *world_center = center;
        }
        if let Ok(mut world_radius) = self.world_radius.write() {
            *world_radius = radius;
        }
    }
    fn le(&self, _ray: &Ray) -> Spectrum {
        self.l
    }
    fn pdf_li(&self, _iref: &InteractionCommon, _wi: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }
    fn get_flags(&self) -> u8 {
        LightFlags::Infinite as u8
    }
    fn get_n_samples(&self) -> i32 {
        self.n_samples
    }
}
