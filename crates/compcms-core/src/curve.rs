//! Tone curves and their algebra
//!
//! A [`ToneCurve`] is a scalar function on encoded or linear values. Pipeline
//! curve sets hold three of them; the optimizer merges, inverts and drops
//! them, and the translator recognizes the parametric ones.
//!
//! Parametric curves evaluate negative input either by clamping to 0 or by
//! mirroring (`f(-x) = -f(x)`), selected by `clamped_input`. Formula curves
//! and tables always clamp their input to [0, 1].

use crate::icc::{CurveData, VcgtChannel};
use crate::math::gamma::{ParametricCurve, ParametricCurveType};
use crate::math::interpolation::{lerp, lut1d_interp};
use crate::math::float_eq;

/// Points used to sample curves for identity, monotonicity and inversion tests
const CURVE_TEST_POINTS: usize = 4096;

/// Largest deviation from `y = x` still treated as identity (15 in 16-bit)
///
/// Sampled curves use this instead of [`float_eq`], the way lcms2's
/// `cmsIsToneCurveLinear` does.
const IDENTITY_TOLERANCE: f64 = 15.0 / 65535.0;

/// Transfer functions with no parametric form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaCurve {
    /// SMPTE ST 2084, 1.0 = 10000 cd/m²
    Pq,
    /// ARIB STD-B67 hybrid log-gamma inverse OETF
    Hlg,
    /// Logarithmic, 100:1 range
    Log100,
    /// Logarithmic, 100·√10:1 range
    Log316,
}

mod pq {
    pub const M1: f64 = 0.1593017578125;
    pub const M2: f64 = 78.84375;
    pub const C1: f64 = 0.8359375;
    pub const C2: f64 = 18.8515625;
    pub const C3: f64 = 18.6875;
}

mod hlg {
    pub const A: f64 = 0.17883277;
    pub const B: f64 = 0.28466892;
    pub const C: f64 = 0.55991073;
}

impl FormulaCurve {
    /// Encoded → linear
    pub fn eotf(self, v: f64) -> f64 {
        let v = v.clamp(0.0, 1.0);
        match self {
            Self::Pq => {
                let n = v.powf(1.0 / pq::M2);
                let num = (n - pq::C1).max(0.0);
                let den = pq::C2 - pq::C3 * n;
                (num / den).powf(1.0 / pq::M1)
            }
            Self::Hlg => {
                if v <= 0.5 {
                    v * v / 3.0
                } else {
                    (((v - hlg::C) / hlg::A).exp() + hlg::B) / 12.0
                }
            }
            Self::Log100 => {
                if v > 0.0 {
                    10f64.powf(2.0 * (v - 1.0))
                } else {
                    0.0
                }
            }
            Self::Log316 => {
                if v > 0.0 {
                    10f64.powf(2.5 * (v - 1.0))
                } else {
                    0.0
                }
            }
        }
    }

    /// Linear → encoded
    pub fn inverse_eotf(self, l: f64) -> f64 {
        let l = l.clamp(0.0, 1.0);
        match self {
            Self::Pq => {
                let lm = l.powf(pq::M1);
                ((pq::C1 + pq::C2 * lm) / (1.0 + pq::C3 * lm)).powf(pq::M2)
            }
            Self::Hlg => {
                if l <= 1.0 / 12.0 {
                    (3.0 * l).sqrt()
                } else {
                    hlg::A * (12.0 * l - hlg::B).ln() + hlg::C
                }
            }
            Self::Log100 => {
                if l >= 0.01 {
                    1.0 + l.log10() / 2.0
                } else {
                    0.0
                }
            }
            Self::Log316 => {
                if l >= 10f64.sqrt() / 1000.0 {
                    1.0 + l.log10() / 2.5
                } else {
                    0.0
                }
            }
        }
    }
}

/// A scalar curve
#[derive(Debug, Clone, PartialEq)]
pub enum ToneCurve {
    Parametric {
        curve: ParametricCurve,
        /// Clamp input to [0, 1] instead of mirroring negative values
        clamped_input: bool,
    },
    Formula {
        tf: FormulaCurve,
        /// Evaluates the inverse EOTF
        inverse: bool,
    },
    /// Uniform samples over [0, 1]
    Tabulated(Vec<f64>),
}

impl ToneCurve {
    pub fn parametric(curve: ParametricCurve, clamped_input: bool) -> Self {
        Self::Parametric {
            curve,
            clamped_input,
        }
    }

    pub fn formula(tf: FormulaCurve) -> Self {
        Self::Formula { tf, inverse: false }
    }

    pub fn identity() -> Self {
        Self::parametric(ParametricCurve::gamma(1.0), true)
    }

    /// Curve for an ICC TRC tag
    pub fn from_icc(data: &CurveData) -> Self {
        match data {
            CurveData::Identity => Self::identity(),
            CurveData::Gamma(g) => Self::parametric(ParametricCurve::gamma(*g), true),
            CurveData::Table(table) => Self::Tabulated(table.clone()),
            CurveData::Parametric(p) => Self::parametric(*p, true),
        }
    }

    /// Curve for one channel of a `vcgt` tag
    ///
    /// The formula `min + (max - min)·x^gamma` is expressed as a type 5
    /// curve with `a = (max - min)^(1/gamma)` and `e = f = min`.
    pub fn from_vcgt(channel: &VcgtChannel) -> Self {
        match channel {
            VcgtChannel::Table(table) => Self::Tabulated(table.clone()),
            VcgtChannel::Formula { gamma, min, max } => {
                let a = if *gamma != 0.0 {
                    (max - min).max(0.0).powf(1.0 / gamma)
                } else {
                    0.0
                };
                let params = [*gamma, a, 0.0, 0.0, 0.0, *min, *min];
                match ParametricCurve::from_params(ParametricCurveType::Full, &params) {
                    Some(curve) => Self::parametric(curve, true),
                    None => Self::identity(),
                }
            }
        }
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Parametric {
                curve,
                clamped_input: true,
            } => curve.eval(x.clamp(0.0, 1.0)),
            Self::Parametric {
                curve,
                clamped_input: false,
            } => {
                if x < 0.0 {
                    -curve.eval(-x)
                } else {
                    curve.eval(x)
                }
            }
            Self::Formula { tf, inverse: false } => tf.eotf(x),
            Self::Formula { tf, inverse: true } => tf.inverse_eotf(x),
            Self::Tabulated(table) => lut1d_interp(table, x),
        }
    }

    /// `len` uniform samples of the curve over [0, 1]
    pub fn sample(&self, len: usize) -> Vec<f64> {
        let div = len.saturating_sub(1).max(1) as f64;
        (0..len).map(|i| self.eval(i as f64 / div)).collect()
    }

    /// The parametric form, when this curve has one
    pub fn as_parametric(&self) -> Option<(&ParametricCurve, bool)> {
        match self {
            Self::Parametric {
                curve,
                clamped_input,
            } => Some((curve, *clamped_input)),
            _ => None,
        }
    }

    pub fn clamped_input(&self) -> bool {
        match self {
            Self::Parametric { clamped_input, .. } => *clamped_input,
            _ => true,
        }
    }

    /// Non-decreasing over [0, 1] and not constant
    pub fn is_monotonic(&self) -> bool {
        let samples = self.sample(CURVE_TEST_POINTS);
        let non_decreasing = samples
            .windows(2)
            .all(|w| w[1] >= w[0] - IDENTITY_TOLERANCE / 16.0);
        let rising = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        };
        non_decreasing && rising && samples.iter().all(|v| v.is_finite())
    }

    /// `y = x`: pure gamma compares `g` with [`float_eq`], everything else
    /// is sampled against [`IDENTITY_TOLERANCE`]
    pub fn is_identity(&self) -> bool {
        if let Self::Parametric { curve, .. } = self {
            if curve.curve_type == ParametricCurveType::Gamma {
                return float_eq(curve.g, 1.0);
            }
        }

        let div = (CURVE_TEST_POINTS - 1) as f64;
        (0..CURVE_TEST_POINTS).all(|i| {
            let x = i as f64 / div;
            (self.eval(x) - x).abs() <= IDENTITY_TOLERANCE
        })
    }

    /// The inverse curve, or `None` when this curve is not monotonic
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_monotonic() {
            return None;
        }

        match self {
            Self::Parametric {
                curve,
                clamped_input,
            } => Some(Self::parametric(curve.inverse(), *clamped_input)),
            Self::Formula { tf, inverse } => Some(Self::Formula {
                tf: *tf,
                inverse: !inverse,
            }),
            Self::Tabulated(table) => Some(Self::Tabulated(invert_table(table, CURVE_TEST_POINTS))),
        }
    }

    /// True when applying `self` then `other` is the identity, decided on
    /// the curve definitions rather than by sampling
    pub fn is_inverse_of(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Parametric {
                    curve: a,
                    clamped_input: ca,
                },
                Self::Parametric {
                    curve: b,
                    clamped_input: cb,
                },
            ) => {
                ca == cb
                    && a.curve_type == b.curve_type
                    && a.inverted != b.inverted
                    && a.params()
                        .iter()
                        .zip(b.params().iter())
                        .all(|(x, y)| float_eq(*x, *y))
            }
            (
                Self::Formula {
                    tf: a,
                    inverse: ia,
                },
                Self::Formula {
                    tf: b,
                    inverse: ib,
                },
            ) => a == b && ia != ib,
            _ => false,
        }
    }

    /// The curve applying `self` first and then `next`
    ///
    /// Two pure power laws with matching clamping merge into one power law;
    /// anything else is resampled onto `points` samples.
    pub fn join(&self, next: &Self, points: usize) -> Self {
        if let (Some((a, clamp_a)), Some((b, clamp_b))) = (self.as_parametric(), next.as_parametric()) {
            if let (true, Some(ea), Some(eb)) = (clamp_a == clamp_b, power_exponent(a), power_exponent(b)) {
                return Self::parametric(ParametricCurve::gamma(ea * eb), clamp_a);
            }
        }

        let div = points.saturating_sub(1).max(1) as f64;
        let table = (0..points)
            .map(|i| next.eval(self.eval(i as f64 / div)))
            .collect();
        Self::Tabulated(table)
    }
}

/// Effective exponent of a type 1 or type -1 curve
fn power_exponent(curve: &ParametricCurve) -> Option<f64> {
    if curve.curve_type != ParametricCurveType::Gamma {
        return None;
    }
    if !curve.inverted {
        Some(curve.g)
    } else if curve.g != 0.0 {
        Some(1.0 / curve.g)
    } else {
        None
    }
}

/// Numerically invert a non-decreasing table onto `points` samples
fn invert_table(table: &[f64], points: usize) -> Vec<f64> {
    let n = table.len();
    if n < 2 {
        return vec![0.0; points];
    }
    let x_div = (n - 1) as f64;
    let y_div = (points - 1).max(1) as f64;

    (0..points)
        .map(|i| {
            let y = i as f64 / y_div;
            // First sample at or above y
            let hi = table.partition_point(|&v| v < y);
            if hi == 0 {
                return 0.0;
            }
            if hi >= n {
                return 1.0;
            }
            let (y0, y1) = (table[hi - 1], table[hi]);
            let t = if y1 > y0 { (y - y0) / (y1 - y0) } else { 0.0 };
            lerp((hi - 1) as f64, hi as f64, t) / x_div
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_gamma_clamping_and_mirroring() {
        let clamped = ToneCurve::parametric(ParametricCurve::gamma(2.2), true);
        let mirrored = ToneCurve::parametric(ParametricCurve::gamma(2.2), false);

        assert_eq!(clamped.eval(-0.5), 0.0);
        assert!((clamped.eval(1.5) - 1.0).abs() < EPSILON);
        assert!((mirrored.eval(-0.5) + 0.5f64.powf(2.2)).abs() < EPSILON);
        assert!((mirrored.eval(1.5) - 1.5f64.powf(2.2)).abs() < EPSILON);
    }

    #[test]
    fn test_identity_detection() {
        assert!(ToneCurve::identity().is_identity());
        assert!(!ToneCurve::parametric(ParametricCurve::gamma(2.2), true).is_identity());

        let table: Vec<f64> = (0..256).map(|i| i as f64 / 255.0).collect();
        assert!(ToneCurve::Tabulated(table).is_identity());

        // Sampled curves get the 16-bit tolerance, not the float comparator
        let near: Vec<f64> = (0..256).map(|i| i as f64 / 255.0 + 10.0 / 65535.0).collect();
        assert!(ToneCurve::Tabulated(near).is_identity());
        let off: Vec<f64> = (0..256).map(|i| i as f64 / 255.0 + 20.0 / 65535.0).collect();
        assert!(!ToneCurve::Tabulated(off).is_identity());
        assert!(!ToneCurve::parametric(ParametricCurve::gamma(1.0 + 1e-3), true).is_identity());
    }

    #[test]
    fn test_inverse_pairs() {
        let srgb = ToneCurve::parametric(ParametricCurve::srgb(), true);
        let inv = srgb.inverse().unwrap();
        assert!(srgb.is_inverse_of(&inv));
        assert!(inv.is_inverse_of(&srgb));
        assert!(!srgb.is_inverse_of(&srgb));

        let pq = ToneCurve::formula(FormulaCurve::Pq);
        assert!(pq.is_inverse_of(&pq.inverse().unwrap()));
    }

    #[test]
    fn test_mixed_clamping_is_not_inverse() {
        let a = ToneCurve::parametric(ParametricCurve::srgb(), true);
        let b = ToneCurve::parametric(ParametricCurve::srgb().inverse(), false);
        assert!(!a.is_inverse_of(&b));
    }

    #[test]
    fn test_power_laws_join_in_closed_form() {
        let a = ToneCurve::parametric(ParametricCurve::gamma(2.0), true);
        let b = ToneCurve::parametric(ParametricCurve::gamma(1.5).inverse(), true);
        match a.join(&b, 1024) {
            ToneCurve::Parametric { curve, .. } => {
                assert_eq!(curve.curve_type, ParametricCurveType::Gamma);
                assert!((curve.g - 2.0 / 1.5).abs() < EPSILON);
            }
            other => panic!("expected power law, got {:?}", other),
        }
    }

    #[test]
    fn test_join_resamples_otherwise() {
        let a = ToneCurve::parametric(ParametricCurve::srgb(), true);
        let b = ToneCurve::parametric(ParametricCurve::gamma(2.2).inverse(), true);
        let joined = a.join(&b, 1024);
        assert!(matches!(joined, ToneCurve::Tabulated(ref t) if t.len() == 1024));
        for x in [0.1, 0.5, 0.9] {
            assert!((joined.eval(x) - b.eval(a.eval(x))).abs() < 1e-3);
        }
    }

    #[test]
    fn test_table_inversion() {
        let table: Vec<f64> = (0..1024).map(|i| (i as f64 / 1023.0).powf(2.2)).collect();
        let curve = ToneCurve::Tabulated(table);
        let inv = curve.inverse().unwrap();
        for i in 1..=20 {
            let x = i as f64 / 20.0;
            assert!((inv.eval(curve.eval(x)) - x).abs() < 1.0 / 256.0, "at {}", x);
        }
    }

    #[test]
    fn test_non_monotonic_has_no_inverse() {
        let table = vec![0.0, 0.8, 0.2, 1.0];
        assert!(ToneCurve::Tabulated(table).inverse().is_none());
        assert!(ToneCurve::Tabulated(vec![0.5; 16]).inverse().is_none());
    }

    #[test]
    fn test_pq_reference_points() {
        let pq = FormulaCurve::Pq;
        assert!(pq.eotf(0.0).abs() < EPSILON);
        assert!((pq.eotf(1.0) - 1.0).abs() < 1e-9);
        // 100 cd/m² encodes near 0.508
        assert!((pq.inverse_eotf(0.01) - 0.5081).abs() < 1e-3);
        for v in [0.1, 0.4, 0.75] {
            assert!((pq.inverse_eotf(pq.eotf(v)) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hlg_continuity() {
        let hlg = FormulaCurve::Hlg;
        assert!((hlg.eotf(0.5) - 1.0 / 12.0).abs() < 1e-6);
        assert!((hlg.eotf(1.0) - 1.0).abs() < 1e-6);
        for v in [0.2, 0.5, 0.8] {
            assert!((hlg.inverse_eotf(hlg.eotf(v)) - v).abs() < 1e-7);
        }
    }

    #[test]
    fn test_log_curves() {
        assert_eq!(FormulaCurve::Log100.eotf(0.0), 0.0);
        assert!((FormulaCurve::Log100.eotf(0.5) - 0.1).abs() < EPSILON);
        assert!((FormulaCurve::Log316.eotf(1.0) - 1.0).abs() < EPSILON);
        assert!((FormulaCurve::Log100.inverse_eotf(0.1) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_vcgt_formula() {
        let curve = ToneCurve::from_vcgt(&VcgtChannel::Formula {
            gamma: 2.0,
            min: 0.1,
            max: 0.9,
        });
        assert!((curve.eval(0.0) - 0.1).abs() < EPSILON);
        assert!((curve.eval(0.5) - (0.1 + 0.8 * 0.25)).abs() < EPSILON);
        assert!((curve.eval(1.0) - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_from_icc() {
        assert!(ToneCurve::from_icc(&CurveData::Identity).is_identity());
        let g = ToneCurve::from_icc(&CurveData::Gamma(2.2));
        assert!((g.eval(0.5) - 0.2176).abs() < 1e-4);
        assert!(g.clamped_input());
    }
}
