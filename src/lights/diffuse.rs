// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::geometry::vec3_dot_nrmf;
use crate::core::geometry::{Point2f, Vector3f};
use crate::core::interaction::InteractionCommon;
use crate::core::light::{AreaLight, Light, LightFlags, LightSample, VisibilityTester};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::shape::Shape;

/// Uniform emission from the surface of a single shape.
pub struct DiffuseAreaLight {
    pub l_emit: Spectrum,
    pub shape: Arc<dyn Shape + Send + Sync>,
    pub two_sided: bool,
    pub area: Float,
    n_samples: i32,
}

impl DiffuseAreaLight {
    pub fn new(
        l_emit: &Spectrum,
        n_samples: i32,
        shape: Arc<dyn Shape + Send + Sync>,
        two_sided: bool,
    ) -> Self {
        let area: Float = shape.area();
        DiffuseAreaLight {
            l_emit: *l_emit,
            shape,
            two_sided,
            area,
            n_samples: std::cmp::max(1_i32, n_samples),
        }
    }
}

impl Light for DiffuseAreaLight {
    fn sample_li(&self, iref: &InteractionCommon, u: &Point2f) -> LightSample {
        let (p_shape, pdf) = self.shape.sample_with_ref_point(iref, u);
        let to_light: Vector3f = p_shape.p - iref.p;
        if pdf == 0.0 as Float || to_light.length_squared() == 0.0 as Float {
            return LightSample::none();
        }
        let wi: Vector3f = to_light.normalize();
        LightSample {
            li: self.l(&p_shape, &-wi),
            wi,
            pdf,
            vis: VisibilityTester::new(*iref, p_shape),
        }
    }
    fn power(&self) -> Spectrum {
        let factor: Float = if self.two_sided { 2.0 } else { 1.0 };
        self.l_emit * (factor * self.area * PI)
    }
    fn pdf_li(&self, iref: &InteractionCommon, wi: &Vector3f) -> Float {
        self.shape.pdf_with_ref_point(iref, wi)
    }
    fn get_flags(&self) -> u8 {
        LightFlags::Area as u8
    }
    fn get_n_samples(&self) -> i32 {
        self.n_samples
    }
}

impl AreaLight for DiffuseAreaLight {
    fn l(&self, intr: &InteractionCommon, w: &Vector3f) -> Spectrum {
        if self.two_sided || vec3_dot_nrmf(w, &intr.n) > 0.0 as Float {
            self.l_emit
        } else {
            Spectrum::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Normal3f, Point3f};
    use crate::core::transform::Transform;
    use crate::shapes::sphere::Sphere;
    use approx::assert_relative_eq;

    fn unit_sphere_light(two_sided: bool) -> DiffuseAreaLight {
        let o2w: Arc<Transform> = Arc::new(Transform::default());
        let sphere: Arc<dyn Shape + Send + Sync> =
            Arc::new(Sphere::full(o2w.clone(), o2w, false, 1.0).unwrap());
        DiffuseAreaLight::new(&Spectrum::new(2.0), 1, sphere, two_sided)
    }

    #[test]
    fn emits_on_front_side_only() {
        let light: DiffuseAreaLight = unit_sphere_light(false);
        let it: InteractionCommon = InteractionCommon {
            n: Normal3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            ..Default::default()
        };
        let up: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        assert_relative_eq!(light.l(&it, &up)[0], 2.0);
        assert!(light.l(&it, &-up).is_black());
        let two_sided: DiffuseAreaLight = unit_sphere_light(true);
        assert_relative_eq!(two_sided.l(&it, &-up)[2], 2.0);
    }

    #[test]
    fn power_scales_with_area() {
        let light: DiffuseAreaLight = unit_sphere_light(false);
        assert_relative_eq!(light.power()[0], 2.0 * 4.0 * PI * PI, epsilon = 1e-3);
        let two_sided: DiffuseAreaLight = unit_sphere_light(true);
        assert_relative_eq!(two_sided.power()[0], 2.0 * light.power()[0], epsilon = 1e-3);
    }

    #[test]
    fn sample_points_towards_the_sphere() {
        let light: DiffuseAreaLight = unit_sphere_light(false);
        let iref: InteractionCommon = InteractionCommon {
            p: Point3f {
                x: 0.0,
                y: 0.0,
                z: 4.0,
            },
            ..Default::default()
        };
        let ls: LightSample = light.sample_li(&iref, &Point2f { x: 0.3, y: 0.7 });
        assert!(ls.pdf > 0.0);
        assert!(ls.wi.z < 0.0);
        assert_relative_eq!(ls.li[1], 2.0);
        let pdf: Float = light.pdf_li(&iref, &ls.wi);
        assert_relative_eq!(pdf, ls.pdf, max_relative = 1e-3);
    }
}
