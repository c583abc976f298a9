//! # Materials
//!
//! The abstract **Material** trait defines the interface that
//! material implementations must provide.
//!
//! - GlassMaterial
//! - MatteMaterial
//! - MirrorMaterial
//! - UberMaterial
//!
//! Emitters need no material of their own: a primitive with an area
//! light and no material stops paths after adding its emission.

pub mod glass;
pub mod matte;
pub mod mirror;
pub mod uber;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::glass::GlassMaterial;
    use super::matte::MatteMaterial;
    use super::mirror::MirrorMaterial;
    use super::uber::UberMaterial;
    use crate::core::geometry::{Normal3f, Point2f, Point3f, Vector3f};
    use crate::core::interaction::SurfaceInteraction;
    use crate::core::material::{Material, TransportMode};
    use crate::core::pbrt::{Float, Spectrum, INV_PI};
    use crate::core::reflection::{Bsdf, BsdfSample, BxdfType};
    use crate::textures::constant::ConstantTexture;
    use approx::assert_relative_eq;

    fn flat_hit() -> SurfaceInteraction<'static> {
        SurfaceInteraction::new(
            &Point3f::default(),
            &Vector3f::default(),
            &Point2f::default(),
            &Vector3f {
                x: 0.0,
                y: 0.6,
                z: 0.8,
            },
            &Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
            &Vector3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
            &Normal3f::default(),
            &Normal3f::default(),
            0.0,
            None,
        )
    }

    fn spectrum(v: Float) -> Arc<ConstantTexture<Spectrum>> {
        Arc::new(ConstantTexture::new(Spectrum::new(v)))
    }

    #[test]
    fn matte_is_lambertian_without_roughness() {
        let matte: MatteMaterial =
            MatteMaterial::new(spectrum(0.5), Arc::new(ConstantTexture::new(0.0 as Float)));
        let mut si = flat_hit();
        matte.compute_scattering_functions(&mut si, TransportMode::Radiance, true);
        let bsdf: &Bsdf = si.bsdf.as_ref().unwrap();
        assert_eq!(bsdf.num_components(BxdfType::BsdfAll as u8), 1);
        let wi: Vector3f = Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        };
        let f: Spectrum = bsdf.f(&si.common.wo, &wi, BxdfType::BsdfAll as u8);
        assert_relative_eq!(f[0], 0.5 * INV_PI, epsilon = 1e-6);
        // nothing below the surface
        assert!(bsdf.f(&si.common.wo, &-wi, BxdfType::BsdfAll as u8).is_black());
    }

    #[test]
    fn black_matte_has_no_lobes() {
        let matte: MatteMaterial =
            MatteMaterial::new(spectrum(0.0), Arc::new(ConstantTexture::new(0.0 as Float)));
        let mut si = flat_hit();
        matte.compute_scattering_functions(&mut si, TransportMode::Radiance, true);
        let bsdf: &Bsdf = si.bsdf.as_ref().unwrap();
        assert_eq!(bsdf.num_components(BxdfType::BsdfAll as u8), 0);
        let s: BsdfSample = bsdf.sample_f(&si.common.wo, &Point2f { x: 0.5, y: 0.5 }, BxdfType::BsdfAll as u8);
        assert_eq!(s.pdf, 0.0);
    }

    #[test]
    fn mirror_is_purely_specular() {
        let mirror: MirrorMaterial = MirrorMaterial::new(spectrum(0.9));
        let mut si = flat_hit();
        mirror.compute_scattering_functions(&mut si, TransportMode::Radiance, true);
        let bsdf: &Bsdf = si.bsdf.as_ref().unwrap();
        let non_specular: u8 = BxdfType::BsdfAll as u8 & !(BxdfType::BsdfSpecular as u8);
        assert_eq!(bsdf.num_components(non_specular), 0);
        let s: BsdfSample = bsdf.sample_f(&si.common.wo, &Point2f { x: 0.5, y: 0.5 }, BxdfType::BsdfAll as u8);
        assert_eq!(s.pdf, 1.0);
        assert!(s.sampled_type & BxdfType::BsdfSpecular as u8 != 0);
        assert_relative_eq!(s.wi.y, -0.6, epsilon = 1e-6);
        assert_relative_eq!(s.wi.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn glass_splits_lobes_on_request() {
        let glass: GlassMaterial = GlassMaterial::new(
            spectrum(1.0),
            spectrum(1.0),
            Arc::new(ConstantTexture::new(1.5 as Float)),
        );
        let mut si = flat_hit();
        glass.compute_scattering_functions(&mut si, TransportMode::Radiance, true);
        assert_eq!(si.bsdf.as_ref().unwrap().num_components(BxdfType::BsdfAll as u8), 1);
        glass.compute_scattering_functions(&mut si, TransportMode::Radiance, false);
        let bsdf: &Bsdf = si.bsdf.as_ref().unwrap();
        assert_eq!(bsdf.num_components(BxdfType::BsdfAll as u8), 2);
        assert_relative_eq!(bsdf.eta, 1.5);
    }

    fn uber(opacity: Float, kr: Float) -> UberMaterial {
        UberMaterial::new(
            spectrum(0.25),
            spectrum(0.25),
            spectrum(kr),
            spectrum(0.0),
            Arc::new(ConstantTexture::new(0.1 as Float)),
            None,
            None,
            spectrum(opacity),
            Arc::new(ConstantTexture::new(1.5 as Float)),
            true,
        )
    }

    #[test]
    fn uber_lobes_follow_coefficients() {
        let glossy: u8 = BxdfType::BsdfGlossy as u8 | BxdfType::BsdfReflection as u8;
        let specular: u8 =
            BxdfType::BsdfAll as u8 & !(BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfGlossy as u8);
        let mut si = flat_hit();
        uber(1.0, 0.0).compute_scattering_functions(&mut si, TransportMode::Radiance, true);
        let bsdf: &Bsdf = si.bsdf.as_ref().unwrap();
        // diffuse base and glossy coat
        assert_eq!(bsdf.num_components(BxdfType::BsdfAll as u8), 2);
        assert_eq!(bsdf.num_components(glossy), 1);
        assert_eq!(bsdf.num_components(specular), 0);
        assert_relative_eq!(bsdf.eta, 1.5);
        let wi: Vector3f = Vector3f {
            x: 0.0,
            y: -0.6,
            z: 0.8,
        };
        // the coat adds a highlight around the mirror direction
        let f: Spectrum = bsdf.f(&si.common.wo, &wi, BxdfType::BsdfAll as u8);
        assert!(f[0] > 0.25 * INV_PI);
        assert!(bsdf.pdf(&si.common.wo, &wi, BxdfType::BsdfAll as u8) > 0.0);
        // half transparent, with a clear coat
        let mut si = flat_hit();
        uber(0.5, 1.0).compute_scattering_functions(&mut si, TransportMode::Radiance, true);
        let bsdf: &Bsdf = si.bsdf.as_ref().unwrap();
        assert_eq!(bsdf.num_components(BxdfType::BsdfAll as u8), 4);
        assert_eq!(bsdf.num_components(specular), 2);
        assert_relative_eq!(bsdf.eta, 1.0);
    }
}
