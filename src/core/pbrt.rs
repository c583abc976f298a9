//! Type definitions of Float and Spectrum, otherwise constants and
//! helper functions shared by the whole renderer.

// std
use std::f32::consts::PI;
use std::ops::{Add, Mul, Sub};
// others
use num;
// pbrt
use crate::core::spectrum::RGBSpectrum;

pub type Spectrum = RGBSpectrum;

pub type Float = f32;

pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;
pub const SHADOW_EPSILON: Float = 0.0001;
pub const INV_PI: Float = 0.318_309_886_183_790_671_54;
pub const INV_2_PI: Float = 0.159_154_943_091_895_335_77;
pub const INV_4_PI: Float = 0.079_577_471_545_947_667_88;
pub const PI_OVER_2: Float = 1.570_796_326_794_896_619_23;
pub const PI_OVER_4: Float = 0.785_398_163_397_448_309_61;

/// Bump a floating-point value up to the next greater representable
/// floating-point value.
pub fn next_float_up(v: Float) -> Float {
    if v.is_infinite() && v > 0.0 {
        return v;
    }
    // -0.0 and 0.0 share the successor
    let v: Float = if v == -0.0 { 0.0 } else { v };
    let bits: u32 = v.to_bits();
    if v >= 0.0 {
        Float::from_bits(bits + 1)
    } else {
        Float::from_bits(bits - 1)
    }
}

/// Bump a floating-point value down to the next smaller representable
/// floating-point value.
pub fn next_float_down(v: Float) -> Float {
    if v.is_infinite() && v < 0.0 {
        return v;
    }
    let v: Float = if v == 0.0 { -0.0 } else { v };
    let bits: u32 = v.to_bits();
    if v > 0.0 {
        Float::from_bits(bits - 1)
    } else {
        Float::from_bits(bits + 1)
    }
}

/// Conservative bound on the relative error of `n` chained floating
/// point operations.
pub fn gamma(n: i32) -> Float {
    (n as Float * MACHINE_EPSILON) / (1.0 - n as Float * MACHINE_EPSILON)
}

/// Linear to sRGB transfer curve, used when writing 8-bit images.
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.003_130_8 {
        12.92 * value
    } else {
        1.055 as Float * value.powf((1.0 / 2.4) as Float) - 0.055
    }
}

/// Clamp the given value *val* to lie between the values *low* and *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Convert from angles expressed in degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Largest index `i` in `[0, size - 2]` for which `pred(i)` holds,
/// assuming `pred` is true for a prefix of the range (the behavior of
/// an upper-bound bisection).
pub fn find_interval<P>(size: i32, pred: P) -> i32
where
    P: Fn(i32) -> bool,
{
    let mut first: i32 = 0;
    let mut len: i32 = size;
    while len > 0 {
        let half: i32 = len >> 1;
        let middle: i32 = first + half;
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    clamp_t(first - 1, 0, size - 2)
}

/// Interpolate linearly between two provided values.
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
    S: num::One + Sub<S, Output = S> + Copy,
    T: Add<T, Output = T> + Mul<S, Output = T>,
{
    let one: S = num::One::one();
    a * (one - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_float_steps_one_ulp() {
        assert!(next_float_up(1.0) > 1.0);
        assert!(next_float_down(1.0) < 1.0);
        assert_eq!(next_float_down(next_float_up(1.0)), 1.0);
        assert!(next_float_up(-0.0) > 0.0);
        assert!(next_float_down(0.0) < 0.0);
        assert_eq!(next_float_up(Float::INFINITY), Float::INFINITY);
    }

    #[test]
    fn gamma_grows_with_n() {
        assert!(gamma(1) > 0.0);
        assert!(gamma(5) > gamma(3));
        assert!(gamma(5) < 1e-6);
    }

    #[test]
    fn find_interval_brackets_value() {
        let cdf: [Float; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
        assert_eq!(find_interval(5, |i| cdf[i as usize] <= 0.6), 2);
        assert_eq!(find_interval(5, |i| cdf[i as usize] <= 0.0), 0);
        assert_eq!(find_interval(5, |i| cdf[i as usize] <= 1.0), 3);
    }
}
