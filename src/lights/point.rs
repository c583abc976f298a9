// std
use std::f32::consts::PI;
// pbrt
use crate::core::geometry::pnt3_distance_squaredf;
use crate::core::geometry::{Point2f, Point3f, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{Light, LightFlags, LightSample, VisibilityTester};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::transform::Transform;

/// An isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    pub p_light: Point3f,
    pub i: Spectrum,
}

impl PointLight {
    pub fn new(light_to_world: &Transform, i: &Spectrum) -> Self {
        PointLight {
            p_light: light_to_world.transform_point(&Point3f::default()),
            i: *i,
        }
    }
}

impl Light for PointLight {
    fn sample_li(&self, iref: &InteractionCommon, _u: &Point2f) -> LightSample {
        let d2: Float = pnt3_distance_squaredf(&self.p_light, &iref.p);
        if d2 == 0.0 as Float {
            return LightSample::none();
        }
        LightSample {
            li: self.i / d2,
            wi: (self.p_light - iref.p).normalize(),
            pdf: 1.0 as Float,
            vis: VisibilityTester::new(
                *iref,
                InteractionCommon {
                    p: self.p_light,
                    time: iref.time,
                    ..Default::default()
                },
            ),
        }
    }
    fn power(&self) -> Spectrum {
        self.i * (4.0 as Float * PI)
    }
    /// A delta distribution can't be hit by chance.
    fn pdf_li(&self, _iref: &InteractionCommon, _wi: &Vector3f) -> Float {
        0.0 as Float
    }
    fn get_flags(&self) -> u8 {
        LightFlags::DeltaPosition as u8
    }
}
