//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor.

// pbrt
use crate::core::geometry::{Point2f, Ray, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::scene::Scene;

#[repr(u8)]
pub enum LightFlags {
    DeltaPosition = 1,
    DeltaDirection = 2,
    Area = 4,
    Infinite = 8,
}

/// Check if LightFlags::DeltaPosition or LightFlags::DeltaDirection
/// is set.
pub fn is_delta_light(flags: u8) -> bool {
    (flags & LightFlags::DeltaPosition as u8) > 0 || (flags & LightFlags::DeltaDirection as u8) > 0
}

/// Result of sampling incident illumination at a reference point.
pub struct LightSample {
    /// incident radiance, assuming nothing is in between
    pub li: Spectrum,
    /// normalized direction towards the light
    pub wi: Vector3f,
    /// solid angle density (1 for delta lights)
    pub pdf: Float,
    pub vis: VisibilityTester,
}

impl LightSample {
    /// A sample that contributes nothing.
    pub fn none() -> Self {
        LightSample {
            li: Spectrum::default(),
            wi: Vector3f::default(),
            pdf: 0.0 as Float,
            vis: VisibilityTester::default(),
        }
    }
}

pub trait Light {
    /// Sample the radiance arriving at `iref` from this light.
    fn sample_li(&self, iref: &InteractionCommon, u: &Point2f) -> LightSample;
    /// Total emitted power.
    fn power(&self) -> Spectrum;
    /// Called once by the scene constructor, before any rendering.
    fn preprocess(&self, _scene: &Scene) {}
    /// Radiance carried along a ray that escapes the scene.
    fn le(&self, _ray: &Ray) -> Spectrum {
        Spectrum::default()
    }
    fn pdf_li(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float;
    fn get_flags(&self) -> u8;
    fn get_n_samples(&self) -> i32 {
        1
    }
}

/// A deferred shadow-ray test between two points.
#[derive(Debug, Default, Copy, Clone)]
pub struct VisibilityTester {
    pub p0: InteractionCommon,
    pub p1: InteractionCommon,
}

impl VisibilityTester {
    pub fn new(p0: InteractionCommon, p1: InteractionCommon) -> Self {
        VisibilityTester { p0, p1 }
    }
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        !scene.intersect_p(&self.p0.spawn_ray_to(&self.p1))
    }
}

/// Area lights are light sources defined by one or more **Shapes**
/// that emit light from their surface, with some directional
/// distribution of radiance at each point on the surface.
pub trait AreaLight: Light {
    /// Emitted radiance leaving point `intr` in direction `w`.
    fn l(&self, intr: &InteractionCommon, w: &Vector3f) -> Spectrum;
}
