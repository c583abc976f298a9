//! When light is incident on the surface, the surface scatters the
//! light, reflecting some of it back into the environment. There are
//! two main effects that need to be described to model this
//! reflection: the spectral distribution of the reflected light and
//! its directional distribution.
//!
//! A **Bsdf** collects the **Bxdf** lobes of one shading point and
//! works in a local frame where the shading normal is `+z`.

// others
use smallvec::SmallVec;
// pbrt
use crate::core::geometry::{nrm_faceforward_vec3, vec3_cross_vec3, vec3_dot_nrmf, vec3_dot_vec3f};
use crate::core::geometry::{Normal3f, Point2f, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::TransportMode;
use crate::core::microfacet::{MicrofacetDistribution, TrowbridgeReitzDistribution};
use crate::core::pbrt::{clamp_t, radians};
use crate::core::pbrt::{Float, Spectrum, INV_PI};
use crate::core::rng::FLOAT_ONE_MINUS_EPSILON;
use crate::core::sampling::cosine_sample_hemisphere;

/// Lobes per shading point; materials here never need more.
pub const MAX_BXDFS: usize = 8;

/// The shading normal in the local frame.
const SHADING_NORMAL: Normal3f = Normal3f {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

#[repr(u8)]
pub enum BxdfType {
    BsdfReflection = 1,
    BsdfTransmission = 2,
    BsdfDiffuse = 4,
    BsdfGlossy = 8,
    BsdfSpecular = 16,
    BsdfAll = 31,
}

/// Result of sampling a scattered direction.
#[derive(Debug, Default, Copy, Clone)]
pub struct BsdfSample {
    pub f: Spectrum,
    pub wi: Vector3f,
    pub pdf: Float,
    pub sampled_type: u8,
}

pub struct Bsdf {
    pub eta: Float,
    /// shading normal
    pub ns: Normal3f,
    /// geometric normal
    pub ng: Normal3f,
    pub ss: Vector3f,
    pub ts: Vector3f,
    pub bxdfs: SmallVec<[Bxdf; MAX_BXDFS]>,
}

impl Bsdf {
    pub fn new(si: &SurfaceInteraction, eta: Float) -> Self {
        let ss: Vector3f = si.shading.dpdu.normalize();
        Bsdf {
            eta,
            ns: si.shading.n,
            ng: si.common.n,
            ss,
            ts: vec3_cross_vec3(&Vector3f::from(si.shading.n), &ss),
            bxdfs: SmallVec::new(),
        }
    }
    pub fn add(&mut self, b: Bxdf) {
        debug_assert!(self.bxdfs.len() < MAX_BXDFS);
        self.bxdfs.push(b);
    }
    pub fn num_components(&self, flags: u8) -> u8 {
        self.bxdfs.iter().filter(|b| b.matches_flags(flags)).count() as u8
    }
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: vec3_dot_vec3f(v, &self.ss),
            y: vec3_dot_vec3f(v, &self.ts),
            z: vec3_dot_nrmf(v, &self.ns),
        }
    }
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f {
            x: self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            y: self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            z: self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        }
    }
    /// Sum of the matching lobes; reflection versus transmission is
    /// decided by the geometric normal so shading normals can't leak
    /// light through a surface.
    fn f_local(&self, wo_w: &Vector3f, wi_w: &Vector3f, wo: &Vector3f, wi: &Vector3f, flags: u8) -> Spectrum {
        let reflect: bool = vec3_dot_nrmf(wi_w, &self.ng) * vec3_dot_nrmf(wo_w, &self.ng) > 0.0 as Float;
        let mut f: Spectrum = Spectrum::default();
        for bxdf in self.bxdfs.iter() {
            let t: u8 = bxdf.get_type();
            if bxdf.matches_flags(flags)
                && ((reflect && (t & BxdfType::BsdfReflection as u8) != 0_u8)
                    || (!reflect && (t & BxdfType::BsdfTransmission as u8) != 0_u8))
            {
                f += bxdf.f(wo, wi);
            }
        }
        f
    }
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: u8) -> Spectrum {
        let wi: Vector3f = self.world_to_local(wi_w);
        let wo: Vector3f = self.world_to_local(wo_w);
        if wo.z == 0.0 as Float {
            return Spectrum::default();
        }
        self.f_local(wo_w, wi_w, &wo, &wi, flags)
    }
    /// Pick one matching lobe with `u.x`, sample it, and return the
    /// value and density of the whole BSDF for the chosen direction.
    pub fn sample_f(&self, wo_world: &Vector3f, u: &Point2f, bsdf_flags: u8) -> BsdfSample {
        let matching_comps: u8 = self.num_components(bsdf_flags);
        if matching_comps == 0 {
            return BsdfSample::default();
        }
        let comp: u8 = std::cmp::min(
            (u.x * matching_comps as Float).floor() as u8,
            matching_comps - 1_u8,
        );
        // get the n-th matching lobe
        let chosen: Option<(usize, &Bxdf)> = self
            .bxdfs
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(bsdf_flags))
            .nth(comp as usize);
        let (bxdf_index, bxdf) = match chosen {
            Some(chosen) => chosen,
            None => return BsdfSample::default(),
        };
        // remap sample u to [0,1)^2
        let u_remapped: Point2f = Point2f {
            x: (u.x * matching_comps as Float - comp as Float).min(FLOAT_ONE_MINUS_EPSILON),
            y: u.y,
        };
        let wo: Vector3f = self.world_to_local(wo_world);
        if wo.z == 0.0 as Float {
            return BsdfSample::default();
        }
        let mut sample: BsdfSample = bxdf.sample_f(&wo, &u_remapped);
        if sample.pdf == 0.0 as Float {
            return BsdfSample::default();
        }
        let wi: Vector3f = sample.wi;
        sample.wi = self.local_to_world(&wi);
        let specular: bool = bxdf.get_type() & BxdfType::BsdfSpecular as u8 != 0_u8;
        // compute overall pdf with all matching lobes
        if !specular && matching_comps > 1_u8 {
            for (i, other) in self.bxdfs.iter().enumerate() {
                if i != bxdf_index && other.matches_flags(bsdf_flags) {
                    sample.pdf += other.pdf(&wo, &wi);
                }
            }
        }
        if matching_comps > 1_u8 {
            sample.pdf /= matching_comps as Float;
        }
        if !specular {
            sample.f = self.f_local(wo_world, &sample.wi, &wo, &wi, bsdf_flags);
        }
        sample
    }
    pub fn pdf(&self, wo_world: &Vector3f, wi_world: &Vector3f, bsdf_flags: u8) -> Float {
        if self.bxdfs.is_empty() {
            return 0.0 as Float;
        }
        let wo: Vector3f = self.world_to_local(wo_world);
        let wi: Vector3f = self.world_to_local(wi_world);
        if wo.z == 0.0 as Float {
            return 0.0 as Float;
        }
        let mut pdf: Float = 0.0 as Float;
        let mut matching_comps: u8 = 0;
        for bxdf in self.bxdfs.iter() {
            if bxdf.matches_flags(bsdf_flags) {
                matching_comps += 1;
                pdf += bxdf.pdf(&wo, &wi);
            }
        }
        if matching_comps > 0 {
            pdf / matching_comps as Float
        } else {
            0.0 as Float
        }
    }
}

pub enum Bxdf {
    SpecRefl(SpecularReflection),
    SpecTrans(SpecularTransmission),
    FresnelSpec(FresnelSpecular),
    LambertianRefl(LambertianReflection),
    OrenNayarRefl(OrenNayar),
    MicrofacetRefl(MicrofacetReflection),
}

impl Bxdf {
    pub fn matches_flags(&self, t: u8) -> bool {
        self.get_type() & t == self.get_type()
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            Bxdf::SpecRefl(_) | Bxdf::SpecTrans(_) | Bxdf::FresnelSpec(_) => Spectrum::default(),
            Bxdf::LambertianRefl(bxdf) => bxdf.f(wo, wi),
            Bxdf::OrenNayarRefl(bxdf) => bxdf.f(wo, wi),
            Bxdf::MicrofacetRefl(bxdf) => bxdf.f(wo, wi),
        }
    }
    /// Sample the lobe for the given outgoing direction, using the
    /// given pair of uniform samples.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BsdfSample {
        match self {
            Bxdf::SpecRefl(bxdf) => bxdf.sample_f(wo, u),
            Bxdf::SpecTrans(bxdf) => bxdf.sample_f(wo, u),
            Bxdf::FresnelSpec(bxdf) => bxdf.sample_f(wo, u),
            Bxdf::MicrofacetRefl(bxdf) => bxdf.sample_f(wo, u),
            Bxdf::LambertianRefl(_) | Bxdf::OrenNayarRefl(_) => {
                // cosine-weighted hemisphere on the side of wo
                let mut wi: Vector3f = cosine_sample_hemisphere(u);
                if wo.z < 0.0 as Float {
                    wi.z *= -1.0 as Float;
                }
                BsdfSample {
                    f: self.f(wo, &wi),
                    wi,
                    pdf: self.pdf(wo, &wi),
                    sampled_type: self.get_type(),
                }
            }
        }
    }
    /// Evaluate the PDF for the given outgoing and incoming
    /// directions. Needs to be consistent with `sample_f()`; delta
    /// lobes report zero.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Bxdf::SpecRefl(_) | Bxdf::SpecTrans(_) | Bxdf::FresnelSpec(_) => 0.0 as Float,
            Bxdf::MicrofacetRefl(bxdf) => bxdf.pdf(wo, wi),
            Bxdf::LambertianRefl(_) | Bxdf::OrenNayarRefl(_) => {
                if vec3_same_hemisphere_vec3(wo, wi) {
                    abs_cos_theta(wi) * INV_PI
                } else {
                    0.0 as Float
                }
            }
        }
    }
    pub fn get_type(&self) -> u8 {
        match self {
            Bxdf::SpecRefl(_) => BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8,
            Bxdf::SpecTrans(_) => BxdfType::BsdfTransmission as u8 | BxdfType::BsdfSpecular as u8,
            Bxdf::FresnelSpec(_) => {
                BxdfType::BsdfReflection as u8
                    | BxdfType::BsdfTransmission as u8
                    | BxdfType::BsdfSpecular as u8
            }
            Bxdf::LambertianRefl(_) | Bxdf::OrenNayarRefl(_) => {
                BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfReflection as u8
            }
            Bxdf::MicrofacetRefl(_) => BxdfType::BsdfGlossy as u8 | BxdfType::BsdfReflection as u8,
        }
    }
}

pub enum Fresnel {
    NoOp(FresnelNoOp),
    Dielectric(FresnelDielectric),
}

impl Fresnel {
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Fresnel::NoOp(fresnel) => fresnel.evaluate(cos_theta_i),
            Fresnel::Dielectric(fresnel) => fresnel.evaluate(cos_theta_i),
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct FresnelDielectric {
    pub eta_i: Float,
    pub eta_t: Float,
}

impl FresnelDielectric {
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        Spectrum::new(fr_dielectric(cos_theta_i, self.eta_i, self.eta_t))
    }
}

/// Reflects everything; used by perfect mirrors.
#[derive(Debug, Default, Copy, Clone)]
pub struct FresnelNoOp {}

impl FresnelNoOp {
    pub fn evaluate(&self, _cos_theta_i: Float) -> Spectrum {
        Spectrum::new(1.0 as Float)
    }
}

pub struct SpecularReflection {
    pub r: Spectrum,
    pub fresnel: Fresnel,
}

impl SpecularReflection {
    pub fn new(r: Spectrum, fresnel: Fresnel) -> Self {
        SpecularReflection { r, fresnel }
    }
    pub fn sample_f(&self, wo: &Vector3f, _sample: &Point2f) -> BsdfSample {
        // compute perfect specular reflection direction
        let wi: Vector3f = Vector3f {
            x: -wo.x,
            y: -wo.y,
            z: wo.z,
        };
        BsdfSample {
            f: self.fresnel.evaluate(cos_theta(&wi)) * self.r / abs_cos_theta(&wi),
            wi,
            pdf: 1.0 as Float,
            sampled_type: BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8,
        }
    }
}

pub struct SpecularTransmission {
    pub t: Spectrum,
    pub eta_a: Float,
    pub eta_b: Float,
    pub fresnel: FresnelDielectric,
    pub mode: TransportMode,
}

impl SpecularTransmission {
    pub fn new(t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> Self {
        SpecularTransmission {
            t,
            eta_a,
            eta_b,
            fresnel: FresnelDielectric {
                eta_i: eta_a,
                eta_t: eta_b,
            },
            mode,
        }
    }
    pub fn sample_f(&self, wo: &Vector3f, _sample: &Point2f) -> BsdfSample {
        // figure out which eta is incident and which is transmitted
        let entering: bool = cos_theta(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };
        let wi: Vector3f = match refract(wo, &nrm_faceforward_vec3(&SHADING_NORMAL, wo), eta_i / eta_t) {
            Some(wi) => wi,
            None => return BsdfSample::default(),
        };
        let mut ft: Spectrum = self.t * (Spectrum::new(1.0 as Float) - self.fresnel.evaluate(cos_theta(&wi)));
        // account for non-symmetry with transmission to different medium
        if self.mode == TransportMode::Radiance {
            ft = ft * ((eta_i * eta_i) / (eta_t * eta_t));
        }
        BsdfSample {
            f: ft / abs_cos_theta(&wi),
            wi,
            pdf: 1.0 as Float,
            sampled_type: BxdfType::BsdfTransmission as u8 | BxdfType::BsdfSpecular as u8,
        }
    }
}

/// Dielectric interface choosing between reflection and refraction
/// with the Fresnel reflectance as probability.
pub struct FresnelSpecular {
    pub r: Spectrum,
    pub t: Spectrum,
    pub eta_a: Float,
    pub eta_b: Float,
    pub mode: TransportMode,
}

impl FresnelSpecular {
    pub fn new(r: Spectrum, t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> Self {
        FresnelSpecular {
            r,
            t,
            eta_a,
            eta_b,
            mode,
        }
    }
    pub fn sample_f(&self, wo: &Vector3f, sample: &Point2f) -> BsdfSample {
        let f: Float = fr_dielectric(cos_theta(wo), self.eta_a, self.eta_b);
        if sample.x < f {
            let wi: Vector3f = Vector3f {
                x: -wo.x,
                y: -wo.y,
                z: wo.z,
            };
            return BsdfSample {
                f: self.r * f / abs_cos_theta(&wi),
                wi,
                pdf: f,
                sampled_type: BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8,
            };
        }
        let entering: bool = cos_theta(wo) > 0.0 as Float;
        let (eta_i, eta_t) = if entering {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };
        let wi: Vector3f = match refract(wo, &nrm_faceforward_vec3(&SHADING_NORMAL, wo), eta_i / eta_t) {
            Some(wi) => wi,
            None => return BsdfSample::default(),
        };
        let mut ft: Spectrum = self.t * (1.0 as Float - f);
        if self.mode == TransportMode::Radiance {
            ft = ft * ((eta_i * eta_i) / (eta_t * eta_t));
        }
        BsdfSample {
            f: ft / abs_cos_theta(&wi),
            wi,
            pdf: 1.0 as Float - f,
            sampled_type: BxdfType::BsdfTransmission as u8 | BxdfType::BsdfSpecular as u8,
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct LambertianReflection {
    pub r: Spectrum,
}

impl LambertianReflection {
    pub fn new(r: Spectrum) -> Self {
        LambertianReflection { r }
    }
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        self.r * INV_PI
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct OrenNayar {
    pub r: Spectrum,
    pub a: Float,
    pub b: Float,
}

impl OrenNayar {
    /// `sigma` is the standard deviation of the microfacet angle, in
    /// degrees.
    pub fn new(r: Spectrum, sigma: Float) -> Self {
        let sigma = radians(sigma);
        let sigma2: Float = sigma * sigma;
        OrenNayar {
            r,
            a: 1.0 - (sigma2 / (2.0 * (sigma2 + 0.33))),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        }
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let sin_theta_i: Float = sin_theta(wi);
        let sin_theta_o: Float = sin_theta(wo);
        // cosine term
        let mut max_cos: Float = 0.0 as Float;
        if sin_theta_i > 1.0e-4 && sin_theta_o > 1.0e-4 {
            let d_cos: Float = cos_phi(wi) * cos_phi(wo) + sin_phi(wi) * sin_phi(wo);
            max_cos = d_cos.max(0.0 as Float);
        }
        // sine and tangent terms
        let (sin_alpha, tan_beta) = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            (sin_theta_o, sin_theta_i / abs_cos_theta(wi))
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta(wo))
        };
        self.r * (INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta))
    }
}

/// Torrance-Sparrow reflection off a rough surface of mirror-like
/// microfacets.
pub struct MicrofacetReflection {
    pub r: Spectrum,
    pub distribution: TrowbridgeReitzDistribution,
    pub fresnel: Fresnel,
}

impl MicrofacetReflection {
    pub fn new(r: Spectrum, distribution: TrowbridgeReitzDistribution, fresnel: Fresnel) -> Self {
        MicrofacetReflection {
            r,
            distribution,
            fresnel,
        }
    }
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        let cos_theta_o: Float = abs_cos_theta(wo);
        let cos_theta_i: Float = abs_cos_theta(wi);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 {
            return Spectrum::default();
        }
        let wh: Vector3f = *wi + *wo;
        if wh.length_squared() == 0.0 {
            return Spectrum::default();
        }
        let wh: Vector3f = wh.normalize();
        let f: Spectrum = self.fresnel.evaluate(vec3_dot_vec3f(wi, &wh));
        self.r * f * (self.distribution.d(&wh) * self.distribution.g(wo, wi))
            / (4.0 as Float * cos_theta_i * cos_theta_o)
    }
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BsdfSample {
        if wo.z == 0.0 as Float {
            return BsdfSample::default();
        }
        let wh: Vector3f = self.distribution.sample_wh(wo, u);
        let wi: Vector3f = reflect(wo, &wh);
        if !vec3_same_hemisphere_vec3(wo, &wi) {
            return BsdfSample::default();
        }
        BsdfSample {
            f: self.f(wo, &wi),
            wi,
            pdf: self.pdf(wo, &wi),
            sampled_type: BxdfType::BsdfGlossy as u8 | BxdfType::BsdfReflection as u8,
        }
    }
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !vec3_same_hemisphere_vec3(wo, wi) {
            return 0.0 as Float;
        }
        let wh: Vector3f = *wo + *wi;
        if wh.length_squared() == 0.0 {
            return 0.0 as Float;
        }
        let wh: Vector3f = wh.normalize();
        self.distribution.pdf(wo, &wh) / (4.0 as Float * vec3_dot_vec3f(wo, &wh))
    }
}

/// Cosine via spherical coordinates in the shading frame.
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

pub fn sin_2_theta(w: &Vector3f) -> Float {
    (0.0 as Float).max(1.0 as Float - cos_2_theta(w))
}

pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

pub fn tan_theta(w: &Vector3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

pub fn tan_2_theta(w: &Vector3f) -> Float {
    sin_2_theta(w) / cos_2_theta(w)
}

pub fn cos_phi(w: &Vector3f) -> Float {
    let sin_theta: Float = sin_theta(w);
    if sin_theta == 0.0 as Float {
        1.0 as Float
    } else {
        clamp_t(w.x / sin_theta, -1.0, 1.0)
    }
}

pub fn sin_phi(w: &Vector3f) -> Float {
    let sin_theta: Float = sin_theta(w);
    if sin_theta == 0.0 as Float {
        0.0 as Float
    } else {
        clamp_t(w.y / sin_theta, -1.0, 1.0)
    }
}

pub fn cos_2_phi(w: &Vector3f) -> Float {
    cos_phi(w) * cos_phi(w)
}

pub fn sin_2_phi(w: &Vector3f) -> Float {
    sin_phi(w) * sin_phi(w)
}

/// Mirror `wo` about `n`.
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -(*wo) + *n * (2.0 as Float * vec3_dot_vec3f(wo, n))
}

/// Refraction direction for incident direction `wi` (pointing away
/// from the surface), `None` on total internal reflection.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    // compute cos_theta_t using Snell's law
    let cos_theta_i: Float = vec3_dot_nrmf(wi, n);
    let sin2_theta_i: Float = (0.0 as Float).max(1.0 as Float - cos_theta_i * cos_theta_i);
    let sin2_theta_t: Float = eta * eta * sin2_theta_i;
    if sin2_theta_t >= 1.0 as Float {
        return None;
    }
    let cos_theta_t: Float = (1.0 as Float - sin2_theta_t).sqrt();
    Some(-(*wi) * eta + Vector3f::from(*n) * (eta * cos_theta_i - cos_theta_t))
}

/// Check that two vectors lie on the same side of the surface.
pub fn vec3_same_hemisphere_vec3(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0 as Float
}

/// Fresnel reflectance for dielectric materials and unpolarized
/// light.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp_t(cos_theta_i, -1.0, 1.0);
    let entering: bool = cos_theta_i > 0.0;
    let (eta_i, eta_t) = if entering {
        (eta_i, eta_t)
    } else {
        cos_theta_i = cos_theta_i.abs();
        (eta_t, eta_i)
    };
    let sin_theta_i: Float = (0.0 as Float).max(1.0 as Float - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t: Float = eta_i / eta_t * sin_theta_i;
    // total internal reflection
    if sin_theta_t >= 1.0 as Float {
        return 1.0 as Float;
    }
    let cos_theta_t: Float = (0.0 as Float).max(1.0 as Float - sin_theta_t * sin_theta_t).sqrt();
    let r_parl: Float = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp: Float = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Directional-hemispherical reflectance of a lobe, estimated with
/// stratified cosine samples. Only used to check energy balance.
pub fn rho_hd(bxdf: &Bxdf, wo: &Vector3f, n: usize) -> Spectrum {
    let mut r: Spectrum = Spectrum::default();
    let side: usize = (n as Float).sqrt().ceil() as usize;
    for i in 0..side {
        for j in 0..side {
            let u: Point2f = Point2f {
                x: (i as Float + 0.5) / side as Float,
                y: (j as Float + 0.5) / side as Float,
            };
            let s: BsdfSample = bxdf.sample_f(wo, &u);
            if s.pdf > 0.0 as Float {
                r += s.f * (abs_cos_theta(&s.wi) / s.pdf);
            }
        }
    }
    r / (side * side) as Float
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn up() -> Vector3f {
        Vector3f {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }
    }

    #[test]
    fn lambertian_conserves_albedo() {
        let bxdf: Bxdf = Bxdf::LambertianRefl(LambertianReflection::new(Spectrum::new(0.5)));
        let wo: Vector3f = Vector3f {
            x: 0.3,
            y: 0.1,
            z: 0.9,
        }
        .normalize();
        let rho: Spectrum = rho_hd(&bxdf, &wo, 64);
        assert_relative_eq!(rho[0], 0.5, epsilon = 1e-4);
    }

    #[test]
    fn oren_nayar_without_roughness_is_lambertian() {
        let on: OrenNayar = OrenNayar::new(Spectrum::new(1.0), 0.0);
        let wo: Vector3f = Vector3f {
            x: 0.6,
            y: 0.0,
            z: 0.8,
        };
        assert_relative_eq!(on.f(&wo, &up())[1], INV_PI, epsilon = 1e-6);
    }

    #[test]
    fn mirror_reflects_about_the_normal() {
        let bxdf: Bxdf = Bxdf::SpecRefl(SpecularReflection::new(
            Spectrum::new(1.0),
            Fresnel::NoOp(FresnelNoOp {}),
        ));
        let wo: Vector3f = Vector3f {
            x: 0.6,
            y: 0.0,
            z: 0.8,
        };
        let s: BsdfSample = bxdf.sample_f(&wo, &Point2f::default());
        assert_relative_eq!(s.wi.x, -0.6);
        assert_relative_eq!(s.wi.z, 0.8);
        assert_relative_eq!(s.f[0] * abs_cos_theta(&s.wi), 1.0, epsilon = 1e-6);
        assert_eq!(bxdf.pdf(&wo, &s.wi), 0.0);
        assert!(bxdf.matches_flags(BxdfType::BsdfAll as u8));
        assert!(!bxdf.matches_flags(BxdfType::BsdfAll as u8 & !(BxdfType::BsdfSpecular as u8)));
    }

    #[test]
    fn fresnel_at_normal_incidence() {
        // ((1.5 - 1) / (1.5 + 1))^2
        assert_relative_eq!(fr_dielectric(1.0, 1.0, 1.5), 0.04, epsilon = 1e-6);
        // total internal reflection from inside at grazing angles
        assert_eq!(fr_dielectric(-0.1, 1.0, 1.5), 1.0);
    }

    #[test]
    fn refraction_obeys_snell() {
        let wo: Vector3f = Vector3f {
            x: 0.6,
            y: 0.0,
            z: 0.8,
        };
        let eta: Float = 1.0 / 1.5;
        let wt: Vector3f = refract(&wo, &SHADING_NORMAL, eta).unwrap();
        assert!(wt.z < 0.0);
        assert_relative_eq!(sin_theta(&wt), eta * sin_theta(&wo), epsilon = 1e-6);
        assert!(refract(&wo, &SHADING_NORMAL, 2.0).is_none());
    }

    #[test]
    fn glass_energy_stays_in_unit_range() {
        let bxdf: Bxdf = Bxdf::FresnelSpec(FresnelSpecular::new(
            Spectrum::new(1.0),
            Spectrum::new(1.0),
            1.0,
            1.5,
            TransportMode::Importance,
        ));
        let wo: Vector3f = Vector3f {
            x: 0.0,
            y: 0.6,
            z: 0.8,
        };
        let rho: Spectrum = rho_hd(&bxdf, &wo, 256);
        assert_relative_eq!(rho[2], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn rough_mirror_loses_little_energy() {
        let bxdf: Bxdf = Bxdf::MicrofacetRefl(MicrofacetReflection::new(
            Spectrum::new(1.0),
            TrowbridgeReitzDistribution::new(0.3, 0.3, true),
            Fresnel::NoOp(FresnelNoOp {}),
        ));
        assert!(bxdf.matches_flags(BxdfType::BsdfGlossy as u8 | BxdfType::BsdfReflection as u8));
        let wo: Vector3f = Vector3f {
            x: 0.2,
            y: -0.1,
            z: 0.95,
        }
        .normalize();
        // every sample weighs G / G1 <= 1
        let rho: Spectrum = rho_hd(&bxdf, &wo, 4096);
        assert!(rho[0] > 0.85 && rho[0] <= 1.0 + 1e-4, "{:?}", rho);
        let wi: Vector3f = Vector3f {
            x: -0.4,
            y: 0.3,
            z: 0.7,
        }
        .normalize();
        assert_relative_eq!(bxdf.f(&wo, &wi)[0], bxdf.f(&wi, &wo)[0], max_relative = 1e-4);
        assert!(bxdf.pdf(&wo, &wi) > 0.0);
        assert_eq!(bxdf.pdf(&wo, &-wi), 0.0);
    }
}
