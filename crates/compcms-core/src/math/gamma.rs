//! Parametric tone curves
//!
//! The five ICC `para` function types, numbered here the way the curve
//! algebra refers to them: ICC type 0 is type 1, ICC type 4 is type 5.
//! A negative type is the analytic inverse of the positive one.
//!
//! | type | forward                                    |
//! |------|--------------------------------------------|
//! | 1    | `Y = X^g`                                  |
//! | 2    | `Y = (aX + b)^g` for `X >= -b/a`, else 0   |
//! | 3    | `Y = (aX + b)^g + c` for `X >= -b/a`, else c |
//! | 4    | `Y = (aX + b)^g` for `X >= d`, else `cX`   |
//! | 5    | `Y = (aX + b)^g + e` for `X >= d`, else `cX + f` |
//!
//! Evaluation here covers `X >= 0`; mirroring of negative input is handled
//! by [`ToneCurve`](crate::curve::ToneCurve).

/// Parametric function family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParametricCurveType {
    /// Type 1: Y = X^g
    Gamma,
    /// Type 2: CIE 122-1966
    CIE122,
    /// Type 3: IEC 61966-3
    IEC61966_3,
    /// Type 4: IEC 61966-2.1 (sRGB-like)
    IEC61966_2_1,
    /// Type 5: full seven-parameter form
    Full,
}

impl ParametricCurveType {
    /// From the ICC `para` function type field (0..=4)
    pub fn from_icc(function_type: u16) -> Option<Self> {
        match function_type {
            0 => Some(Self::Gamma),
            1 => Some(Self::CIE122),
            2 => Some(Self::IEC61966_3),
            3 => Some(Self::IEC61966_2_1),
            4 => Some(Self::Full),
            _ => None,
        }
    }

    /// Positive curve type number (1..=5)
    pub fn type_number(&self) -> i32 {
        match self {
            Self::Gamma => 1,
            Self::CIE122 => 2,
            Self::IEC61966_3 => 3,
            Self::IEC61966_2_1 => 4,
            Self::Full => 5,
        }
    }

    /// Number of meaningful parameters
    pub fn param_count(&self) -> usize {
        match self {
            Self::Gamma => 1,
            Self::CIE122 => 3,
            Self::IEC61966_3 => 4,
            Self::IEC61966_2_1 => 5,
            Self::Full => 7,
        }
    }
}

/// A parametric curve with its parameters in `g, a, b, c, d, e, f` order
///
/// `inverted` selects the analytic inverse, i.e. the negative curve type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricCurve {
    pub curve_type: ParametricCurveType,
    pub g: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub inverted: bool,
}

impl ParametricCurve {
    /// Pure power law, type 1
    pub fn gamma(g: f64) -> Self {
        Self {
            curve_type: ParametricCurveType::Gamma,
            g,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
            inverted: false,
        }
    }

    /// Type 4 curve from its five parameters
    pub fn type4(g: f64, a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            curve_type: ParametricCurveType::IEC61966_2_1,
            g,
            a,
            b,
            c,
            d,
            e: 0.0,
            f: 0.0,
            inverted: false,
        }
    }

    /// IEC 61966-2-1 sRGB EOTF
    pub fn srgb() -> Self {
        Self::type4(2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045)
    }

    /// BT.709 / BT.1361 / xvYCC inverse OETF
    pub fn bt709() -> Self {
        Self::type4(1.0 / 0.45, 1.0 / 1.099, 0.099 / 1.099, 1.0 / 4.5, 0.081)
    }

    /// SMPTE ST 240 inverse OETF
    pub fn st240() -> Self {
        Self::type4(1.0 / 0.45, 1.0 / 1.1115, 0.1115 / 1.1115, 1.0 / 4.0, 0.0913)
    }

    /// SMPTE ST 428-1: `L = (52.37 / 48) * V^2.6`, as `(aV)^g`
    pub fn st428() -> Self {
        Self::type4(2.6, (52.37f64 / 48.0).powf(1.0 / 2.6), 0.0, 0.0, 0.0)
    }

    /// Build from a parameter slice in `g, a, b, c, d, e, f` order
    pub fn from_params(curve_type: ParametricCurveType, params: &[f64]) -> Option<Self> {
        if params.len() < curve_type.param_count() {
            return None;
        }

        let p = |i: usize, default: f64| params.get(i).copied().unwrap_or(default);
        let mut curve = Self::gamma(params[0]);
        curve.curve_type = curve_type;
        match curve_type {
            ParametricCurveType::Gamma => {}
            ParametricCurveType::CIE122 => {
                curve.a = p(1, 1.0);
                curve.b = p(2, 0.0);
            }
            ParametricCurveType::IEC61966_3 => {
                curve.a = p(1, 1.0);
                curve.b = p(2, 0.0);
                curve.c = p(3, 0.0);
            }
            ParametricCurveType::IEC61966_2_1 => {
                curve.a = p(1, 1.0);
                curve.b = p(2, 0.0);
                curve.c = p(3, 0.0);
                curve.d = p(4, 0.0);
            }
            ParametricCurveType::Full => {
                curve.a = p(1, 1.0);
                curve.b = p(2, 0.0);
                curve.c = p(3, 0.0);
                curve.d = p(4, 0.0);
                curve.e = p(5, 0.0);
                curve.f = p(6, 0.0);
            }
        }
        Some(curve)
    }

    /// Signed curve type, negative for an inverted curve
    pub fn signed_type(&self) -> i32 {
        let t = self.curve_type.type_number();
        if self.inverted { -t } else { t }
    }

    /// Parameters in `g, a, b, c, d, e, f` order
    pub fn params(&self) -> [f64; 7] {
        [self.g, self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// The analytic inverse of this curve
    pub fn inverse(&self) -> Self {
        Self {
            inverted: !self.inverted,
            ..*self
        }
    }

    /// Evaluate for a non-negative input
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        if self.inverted {
            self.eval_reverse(x)
        } else {
            self.eval_forward(x)
        }
    }

    fn eval_forward(&self, x: f64) -> f64 {
        match self.curve_type {
            ParametricCurveType::Gamma => pow_or_zero(x, self.g),
            ParametricCurveType::CIE122 => {
                if self.a != 0.0 && x >= -self.b / self.a {
                    pow_or_zero(self.a * x + self.b, self.g)
                } else {
                    0.0
                }
            }
            ParametricCurveType::IEC61966_3 => {
                if self.a != 0.0 && x >= -self.b / self.a {
                    pow_or_zero(self.a * x + self.b, self.g) + self.c
                } else {
                    self.c
                }
            }
            ParametricCurveType::IEC61966_2_1 => {
                if x >= self.d {
                    pow_or_zero(self.a * x + self.b, self.g)
                } else {
                    self.c * x
                }
            }
            ParametricCurveType::Full => {
                if x >= self.d {
                    pow_or_zero(self.a * x + self.b, self.g) + self.e
                } else {
                    self.c * x + self.f
                }
            }
        }
    }

    fn eval_reverse(&self, y: f64) -> f64 {
        if self.g == 0.0 {
            return 0.0;
        }
        let inv_g = 1.0 / self.g;

        match self.curve_type {
            ParametricCurveType::Gamma => pow_or_zero(y, inv_g),
            ParametricCurveType::CIE122 => {
                if self.a == 0.0 {
                    return 0.0;
                }
                ((pow_or_zero(y, inv_g) - self.b) / self.a).max(0.0)
            }
            ParametricCurveType::IEC61966_3 => {
                if self.a == 0.0 {
                    return 0.0;
                }
                if y >= self.c {
                    (pow_or_zero(y - self.c, inv_g) - self.b) / self.a
                } else {
                    -self.b / self.a
                }
            }
            ParametricCurveType::IEC61966_2_1 => {
                // The break point is c·d, matching the POWLIN conversion.
                if y >= self.c * self.d {
                    if self.a == 0.0 {
                        return 0.0;
                    }
                    (pow_or_zero(y, inv_g) - self.b) / self.a
                } else if self.c != 0.0 {
                    y / self.c
                } else {
                    0.0
                }
            }
            ParametricCurveType::Full => {
                if y >= self.c * self.d + self.f {
                    if self.a == 0.0 {
                        return 0.0;
                    }
                    (pow_or_zero(y - self.e, inv_g) - self.b) / self.a
                } else if self.c != 0.0 {
                    (y - self.f) / self.c
                } else {
                    0.0
                }
            }
        }
    }
}

#[inline]
fn pow_or_zero(base: f64, exp: f64) -> f64 {
    if base <= 0.0 { 0.0 } else { base.powf(exp) }
}
