//! Running error analysis: an **EFloat** carries a value together
//! with a conservative interval `[low, high]` that is guaranteed to
//! contain the exact result of the computation that produced it.
//!
//! Every arithmetic operator computes the nominal value as usual and
//! widens the interval bounds by one ulp in each direction, so the
//! rounding error of the operation itself is accounted for too.

// std
use std::ops::{Add, Div, Mul, Neg, Sub};
// pbrt
use crate::core::pbrt::Float;
use crate::core::pbrt::MACHINE_EPSILON;
use crate::core::pbrt::{next_float_down, next_float_up};

#[derive(Debug, Default, Copy, Clone)]
pub struct EFloat {
    pub v: Float,
    pub low: Float,
    pub high: Float,
}

impl EFloat {
    /// `v` known to within `err` absolute error.
    pub fn new(v: Float, err: Float) -> Self {
        if err == 0.0 {
            EFloat {
                v,
                low: v,
                high: v,
            }
        } else {
            EFloat {
                v,
                low: next_float_down(v - err),
                high: next_float_up(v + err),
            }
        }
    }
    pub fn lower_bound(&self) -> Float {
        self.low
    }
    pub fn upper_bound(&self) -> Float {
        self.high
    }
    pub fn sqrt(&self) -> EFloat {
        EFloat {
            v: self.v.sqrt(),
            low: next_float_down(self.low.max(0.0).sqrt()),
            high: next_float_up(self.high.sqrt()),
        }
    }
}

impl From<EFloat> for Float {
    fn from(ef: EFloat) -> Float {
        ef.v
    }
}

impl PartialEq for EFloat {
    fn eq(&self, rhs: &EFloat) -> bool {
        self.v == rhs.v
    }
}

impl Neg for EFloat {
    type Output = EFloat;
    fn neg(self) -> EFloat {
        EFloat {
            v: -self.v,
            low: -self.high,
            high: -self.low,
        }
    }
}

impl Add for EFloat {
    type Output = EFloat;
    fn add(self, rhs: EFloat) -> EFloat {
        EFloat {
            v: self.v + rhs.v,
            low: next_float_down(self.low + rhs.low),
            high: next_float_up(self.high + rhs.high),
        }
    }
}

impl Sub for EFloat {
    type Output = EFloat;
    fn sub(self, rhs: EFloat) -> EFloat {
        EFloat {
            v: self.v - rhs.v,
            low: next_float_down(self.low - rhs.high),
            high: next_float_up(self.high - rhs.low),
        }
    }
}

impl Mul for EFloat {
    type Output = EFloat;
    fn mul(self, rhs: EFloat) -> EFloat {
        let prod: [Float; 4] = [
            self.low * rhs.low,
            self.high * rhs.low,
            self.low * rhs.high,
            self.high * rhs.high,
        ];
        EFloat {
            v: self.v * rhs.v,
            low: next_float_down(prod[0].min(prod[1]).min(prod[2].min(prod[3]))),
            high: next_float_up(prod[0].max(prod[1]).max(prod[2].max(prod[3]))),
        }
    }
}

impl Mul<Float> for EFloat {
    type Output = EFloat;
    fn mul(self, rhs: Float) -> EFloat {
        EFloat::new(rhs, 0.0) * self
    }
}

impl Div for EFloat {
    type Output = EFloat;
    fn div(self, rhs: EFloat) -> EFloat {
        if rhs.low < 0.0 && rhs.high > 0.0 {
            // divisor straddles zero, nothing can be said about the quotient
            return EFloat {
                v: self.v / rhs.v,
                low: Float::NEG_INFINITY,
                high: Float::INFINITY,
            };
        }
        let quot: [Float; 4] = [
            self.low / rhs.low,
            self.high / rhs.low,
            self.low / rhs.high,
            self.high / rhs.high,
        ];
        EFloat {
            v: self.v / rhs.v,
            low: next_float_down(quot[0].min(quot[1]).min(quot[2].min(quot[3]))),
            high: next_float_up(quot[0].max(quot[1]).max(quot[2].max(quot[3]))),
        }
    }
}

/// Solve `a t^2 + b t + c = 0` keeping error bounds on both roots.
/// The discriminant is evaluated in double precision; the roots come
/// back ordered by nominal value.
pub fn quadratic_efloat(a: EFloat, b: EFloat, c: EFloat) -> Option<(EFloat, EFloat)> {
    let discrim: f64 = b.v as f64 * b.v as f64 - 4.0_f64 * a.v as f64 * c.v as f64;
    if discrim < 0.0 {
        return None;
    }
    let root_discrim: f64 = discrim.sqrt();
    let float_root_discrim: EFloat = EFloat::new(
        root_discrim as Float,
        MACHINE_EPSILON * root_discrim as Float,
    );
    // avoid cancellation between -b and the root
    let q: EFloat = if b.v < 0.0 {
        (b - float_root_discrim) * -0.5
    } else {
        (b + float_root_discrim) * -0.5
    };
    let mut t0: EFloat = q / a;
    let mut t1: EFloat = c / q;
    if t0.v > t1.v {
        std::mem::swap(&mut t0, &mut t1);
    }
    Some((t0, t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_contain_exact_results() {
        let a: EFloat = EFloat::new(0.1, 0.0);
        let b: EFloat = EFloat::new(0.2, 0.0);
        let sum: EFloat = a + b;
        let exact: f64 = 0.1_f32 as f64 + 0.2_f32 as f64;
        assert!((sum.low as f64) <= exact && exact <= (sum.high as f64));
        let prod: EFloat = a * b;
        let exact: f64 = 0.1_f32 as f64 * 0.2_f32 as f64;
        assert!((prod.low as f64) <= exact && exact <= (prod.high as f64));
    }

    #[test]
    fn division_by_interval_around_zero_is_unbounded() {
        let one: EFloat = EFloat::new(1.0, 0.0);
        let around_zero: EFloat = EFloat::new(0.0, 1e-3);
        let q: EFloat = one / around_zero;
        assert_eq!(q.low, Float::NEG_INFINITY);
        assert_eq!(q.high, Float::INFINITY);
    }

    #[test]
    fn quadratic_roots_are_ordered_and_bracketed() {
        // (t - 1)(t - 3) = t^2 - 4t + 3
        let (t0, t1) = quadratic_efloat(
            EFloat::new(1.0, 0.0),
            EFloat::new(-4.0, 0.0),
            EFloat::new(3.0, 0.0),
        )
        .unwrap();
        assert!(t0.low <= 1.0 && 1.0 <= t0.high);
        assert!(t1.low <= 3.0 && 3.0 <= t1.high);
        assert!(quadratic_efloat(
            EFloat::new(1.0, 0.0),
            EFloat::new(0.0, 0.0),
            EFloat::new(1.0, 0.0)
        )
        .is_none());
    }
}
