//! Radiance and reflectance are carried as linear RGB triples.
//!
//! **SpectrumCache** holds named spectra for the duration of one scene
//! build, so a color referenced by many materials is defined once.

// std
use std::collections::HashMap;
use std::ops;
use std::ops::{Index, IndexMut};
// pbrt
use crate::core::pbrt::clamp_t;
use crate::core::pbrt::Float;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }
    /// Luminance.
    pub fn y(&self) -> Float {
        let y_weight: [Float; 3] = [0.212_671, 0.715_160, 0.072_169];
        y_weight[0] * self.c[0] + y_weight[1] * self.c[1] + y_weight[2] * self.c[2]
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0 as Float)
    }
    pub fn clamp(&self, low: Float, high: Float) -> RGBSpectrum {
        RGBSpectrum {
            c: [
                clamp_t(self.c[0], low, high),
                clamp_t(self.c[1], low, high),
                clamp_t(self.c[2], low, high),
            ],
        }
    }
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }
    pub fn has_infs(&self) -> bool {
        self.c.iter().any(|v| v.is_infinite())
    }
    pub fn sqrt(&self) -> RGBSpectrum {
        RGBSpectrum {
            c: [self.c[0].sqrt(), self.c[1].sqrt(), self.c[2].sqrt()],
        }
    }
}

impl_op_ex!(+|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] + b.c[0], a.c[1] + b.c[1], a.c[2] + b.c[2]],
    }
});

impl_op_ex!(-|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] - b.c[0], a.c[1] - b.c[1], a.c[2] - b.c[2]],
    }
});

impl_op_ex!(*|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * b.c[0], a.c[1] * b.c[1], a.c[2] * b.c[2]],
    }
});

impl_op_ex!(*|a: &RGBSpectrum, s: Float| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * s, a.c[1] * s, a.c[2] * s],
    }
});

// component-wise, zero where the divisor is zero
impl_op_ex!(/|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    let mut ret: RGBSpectrum = RGBSpectrum::default();
    for i in 0..3 {
        if b.c[i] != 0.0 as Float {
            ret.c[i] = a.c[i] / b.c[i];
        }
    }
    ret
});

impl_op_ex!(/|a: &RGBSpectrum, s: Float| -> RGBSpectrum {
    let inv: Float = 1.0 as Float / s;
    RGBSpectrum {
        c: [a.c[0] * inv, a.c[1] * inv, a.c[2] * inv],
    }
});

impl_op!(+= |a: &mut RGBSpectrum, b: RGBSpectrum| {
    for i in 0..3 {
        a.c[i] += b.c[i];
    }
});

impl_op!(*= |a: &mut RGBSpectrum, b: RGBSpectrum| {
    for i in 0..3 {
        a.c[i] *= b.c[i];
    }
});

impl_op!(/= |a: &mut RGBSpectrum, s: Float| {
    let inv: Float = 1.0 as Float / s;
    for i in 0..3 {
        a.c[i] *= inv;
    }
});

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.c[index]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, index: usize) -> &mut Float {
        &mut self.c[index]
    }
}

impl From<Float> for RGBSpectrum {
    fn from(f: Float) -> Self {
        RGBSpectrum::new(f)
    }
}

/// Named spectra owned by one scene build. Lookups of a name return
/// the spectrum registered first, so redefinitions are ignored.
#[derive(Debug, Default, Clone)]
pub struct SpectrumCache {
    spectra: HashMap<String, RGBSpectrum>,
}

impl SpectrumCache {
    pub fn new() -> Self {
        SpectrumCache::default()
    }
    pub fn get(&self, name: &str) -> Option<RGBSpectrum> {
        self.spectra.get(name).copied()
    }
    /// Return the cached spectrum for `name`, registering `rgb` under
    /// that name on first use.
    pub fn named(&mut self, name: &str, rgb: [Float; 3]) -> RGBSpectrum {
        *self
            .spectra
            .entry(name.to_string())
            .or_insert_with(|| RGBSpectrum::rgb(rgb[0], rgb[1], rgb[2]))
    }
    pub fn len(&self) -> usize {
        self.spectra.len()
    }
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_of_white_is_one() {
        let white: RGBSpectrum = RGBSpectrum::new(1.0);
        assert!((white.y() - 1.0).abs() < 1e-5);
        assert!(RGBSpectrum::default().is_black());
    }

    #[test]
    fn division_by_zero_component_is_zero() {
        let a: RGBSpectrum = RGBSpectrum::rgb(1.0, 2.0, 3.0);
        let b: RGBSpectrum = RGBSpectrum::rgb(0.0, 2.0, 0.0);
        assert_eq!(a / b, RGBSpectrum::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn cache_keeps_first_definition() {
        let mut cache: SpectrumCache = SpectrumCache::new();
        let red: RGBSpectrum = cache.named("red", [0.65, 0.05, 0.05]);
        let again: RGBSpectrum = cache.named("red", [1.0, 1.0, 1.0]);
        assert_eq!(red, again);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("green").is_none());
    }
}
