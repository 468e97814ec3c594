//! Color transforms as the renderer sees them
//!
//! Every transform is three steps applied in order:
//!
//! ```text
//! pre curve (per channel) → mapping (3 → 3) → post curve (per channel)
//! ```
//!
//! Curves are either closed-form ([`ColorCurve::LinPow`],
//! [`ColorCurve::PowLin`]) or sampled; mappings are a 3x3 matrix or a
//! dense 3D LUT. Sampled forms keep their source so a renderer can ask for
//! any resolution through `realize(len)`.

pub mod cache;
mod translate;

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use tracing::info;

use crate::curve::ToneCurve;
use crate::pipeline::{Stage, describe_stages, eval_stages};
use crate::profile::ColorProfile;
use crate::properties::RenderIntent;
use crate::simd;

pub use cache::TransformCache;
pub use translate::{translate, translate_curve_set};

use cache::Registry;

/// What a transform converts between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformCategory {
    /// Surface content → linear blending space of the output
    InputToBlend,
    /// Blending space → output device values
    BlendToOutput,
    /// Surface content → output device values, no blending
    InputToOutput,
}

impl TransformCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::InputToBlend => "input-to-blend",
            Self::BlendToOutput => "blend-to-output",
            Self::InputToOutput => "input-to-output",
        }
    }
}

impl fmt::Display for TransformCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cache key of a transform
///
/// Profiles compare by identity. Blend-to-output keys carry no input
/// profile and no intent.
#[derive(Debug, Clone)]
pub struct SearchKey {
    pub category: TransformCategory,
    pub input_profile: Option<Rc<ColorProfile>>,
    pub output_profile: Rc<ColorProfile>,
    pub render_intent: Option<RenderIntent>,
}

impl SearchKey {
    pub fn matches(&self, other: &SearchKey) -> bool {
        let same_input = match (&self.input_profile, &other.input_profile) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        self.category == other.category
            && self.render_intent == other.render_intent
            && Rc::ptr_eq(&self.output_profile, &other.output_profile)
            && same_input
    }

    /// Multi-line description used in the transformation log
    pub fn describe(&self) -> String {
        let (input_id, input_desc) = match &self.input_profile {
            Some(p) => (p.id(), p.description()),
            None => (0, "none"),
        };
        let intent = self.render_intent.map_or("none", RenderIntent::desc);

        format!(
            "  category: {}\n  input profile p{}: {}\n  output profile p{}: {}\n  render intent: {}\n",
            self.category.name(),
            input_id,
            input_desc,
            self.output_profile.id(),
            self.output_profile.description(),
            intent
        )
    }
}

/// A per-channel curve step
#[derive(Debug, Clone, PartialEq)]
pub enum ColorCurve {
    Identity,
    /// Three sampled 1D LUTs; `optimal_len` is the sample count the curves
    /// need to stay accurate
    Lut3x1d {
        curves: Box<[ToneCurve; 3]>,
        optimal_len: usize,
    },
    /// `y = (a·x + b)^g` for `x >= d`, `y = c·x` below, per channel
    LinPow {
        params: [[f32; 10]; 3],
        clamped_input: bool,
    },
    /// `y = a·x^g + b` for `x >= d`, `y = c·x` below, per channel
    PowLin {
        params: [[f32; 10]; 3],
        clamped_input: bool,
    },
}

impl ColorCurve {
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    #[inline]
    pub fn eval(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Identity => rgb,
            Self::Lut3x1d { curves, .. } => {
                std::array::from_fn(|ch| curves[ch].eval(rgb[ch] as f64) as f32)
            }
            Self::LinPow {
                params,
                clamped_input,
            } => std::array::from_fn(|ch| simd::linpow(rgb[ch], &params[ch], *clamped_input)),
            Self::PowLin {
                params,
                clamped_input,
            } => std::array::from_fn(|ch| simd::powlin(rgb[ch], &params[ch], *clamped_input)),
        }
    }

    /// This curve followed by clamping to [0, 1]
    ///
    /// Curves rising from 0 to 1 over [0, 1] only need their input clamped:
    /// LINPOW and POWLIN switch on `clamped_input`, sampled curves are kept
    /// since their realized LUT clamps on lookup. Anything else is resampled
    /// at `lut_1d_points` with clamped values.
    pub fn with_output_clamp(self, lut_1d_points: usize) -> Self {
        const UNIT: [f32; 10] = [1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];

        let onto_unit = maps_unit_onto_unit(&self);
        match self {
            Self::Identity => Self::LinPow {
                params: [UNIT; 3],
                clamped_input: true,
            },
            Self::LinPow { params, .. } if onto_unit => Self::LinPow {
                params,
                clamped_input: true,
            },
            Self::PowLin { params, .. } if onto_unit => Self::PowLin {
                params,
                clamped_input: true,
            },
            curve @ Self::Lut3x1d { .. } if onto_unit => curve,
            curve => {
                let tables: [ToneCurve; 3] = std::array::from_fn(|ch| {
                    let div = lut_1d_points.saturating_sub(1).max(1) as f32;
                    let table = (0..lut_1d_points)
                        .map(|i| {
                            let mut rgb = [0.0; 3];
                            rgb[ch] = i as f32 / div;
                            curve.eval(rgb)[ch].clamp(0.0, 1.0) as f64
                        })
                        .collect();
                    ToneCurve::Tabulated(table)
                });
                Self::Lut3x1d {
                    curves: Box::new(tables),
                    optimal_len: lut_1d_points,
                }
            }
        }
    }

    /// Sample the curve at `x = i / (len - 1)`
    ///
    /// Returns `3 * len` values: the red curve, then green, then blue.
    pub fn realize(&self, len: usize) -> Vec<f32> {
        let div = len.saturating_sub(1).max(1) as f32;
        let ramp: Vec<f32> = (0..len).map(|i| i as f32 / div).collect();

        let mut out = Vec::with_capacity(3 * len);
        for ch in 0..3 {
            let start = out.len();
            out.extend_from_slice(&ramp);
            let block = &mut out[start..];
            match self {
                Self::Identity => {}
                Self::Lut3x1d { curves, .. } => {
                    for v in block.iter_mut() {
                        *v = curves[ch].eval(*v as f64) as f32;
                    }
                }
                Self::LinPow {
                    params,
                    clamped_input,
                } => simd::apply_linpow_batch(block, &params[ch], *clamped_input),
                Self::PowLin {
                    params,
                    clamped_input,
                } => simd::apply_powlin_batch(block, &params[ch], *clamped_input),
            }
        }
        out
    }
}

impl fmt::Display for ColorCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, params, clamped) = match self {
            Self::Identity => return f.write_str("identity"),
            Self::Lut3x1d { optimal_len, .. } => return write!(f, "3x1D LUT ({} points)", optimal_len),
            Self::LinPow {
                params,
                clamped_input,
            } => ("linpow", params, clamped_input),
            Self::PowLin {
                params,
                clamped_input,
            } => ("powlin", params, clamped_input),
        };

        write!(f, "{}", name)?;
        for (ch, p) in ["R", "G", "B"].iter().zip(params) {
            write!(f, " {}[g {} a {} b {} c {} d {}]", ch, p[0], p[1], p[2], p[3], p[4])?;
        }
        if *clamped {
            write!(f, ", clamped input")?;
        }
        Ok(())
    }
}

/// The stage list behind a 3D LUT mapping
#[derive(Debug, Clone)]
pub struct Lut3dMapping {
    stages: Vec<Stage>,
    optimal_len: usize,
    samples: OnceCell<Vec<f32>>,
}

impl Lut3dMapping {
    pub fn new(stages: Vec<Stage>, optimal_len: usize) -> Self {
        Self {
            stages,
            optimal_len,
            samples: OnceCell::new(),
        }
    }

    pub fn optimal_len(&self) -> usize {
        self.optimal_len
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The pipeline at `optimal_len`, sampled on first use
    fn samples(&self) -> &[f32] {
        self.samples.get_or_init(|| self.sample(self.optimal_len))
    }

    fn sample(&self, len: usize) -> Vec<f32> {
        let mut out = grid(len, |rgb| {
            let v = eval_stages(&self.stages, [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64]);
            [v[0] as f32, v[1] as f32, v[2] as f32]
        });
        simd::ensure_unorm_batch(&mut out);
        out
    }
}

/// The 3 → 3 step between the curves
#[derive(Debug, Clone)]
pub enum ColorMapping {
    Identity,
    /// Column-major: `out[r] = Σ m[c * 3 + r] · in[c]`
    Matrix([f32; 9]),
    Lut3d(Lut3dMapping),
}

impl ColorMapping {
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    pub fn is_lut3d(&self) -> bool {
        matches!(self, Self::Lut3d(_))
    }

    #[inline]
    pub fn eval(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Identity => rgb,
            Self::Matrix(m) => {
                let mut px = [rgb];
                simd::apply_column_major_batch(m, &mut px);
                px[0]
            }
            Self::Lut3d(lut) => {
                crate::math::interpolation::lut3d_interp(lut.samples(), lut.optimal_len, rgb)
            }
        }
    }

    /// Sample the mapping on a `len³` grid
    ///
    /// Blue varies slowest and red fastest; the triple for grid point
    /// `(r, g, b)` starts at `3 * (r + len * (g + len * b))`.
    pub fn realize(&self, len: usize) -> Vec<f32> {
        match self {
            Self::Lut3d(lut) => lut.sample(len),
            _ => grid(len, |rgb| self.eval(rgb)),
        }
    }
}

impl fmt::Display for ColorMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("identity"),
            Self::Matrix(m) => write!(f, "matrix {:?}", m),
            Self::Lut3d(lut) => write!(
                f,
                "3D LUT ({} points) from [{}]",
                lut.optimal_len,
                describe_stages(&lut.stages)
            ),
        }
    }
}

/// Increasing from 0 to 1 over [0, 1] on every channel, so clamping the
/// input equals clamping the output
fn maps_unit_onto_unit(curve: &ColorCurve) -> bool {
    const POINTS: usize = 64;

    curve.realize(POINTS).chunks(POINTS).all(|block| {
        block[0].abs() < 1e-6
            && (block[POINTS - 1] - 1.0).abs() < 1e-5
            && block.windows(2).all(|w| w[0] <= w[1])
    })
}

/// Sample `map` over the unit cube, b/g/r loop order
fn grid(len: usize, mut map: impl FnMut([f32; 3]) -> [f32; 3]) -> Vec<f32> {
    let div = len.saturating_sub(1).max(1) as f32;
    let mut out = Vec::with_capacity(3 * len * len * len);
    for b in 0..len {
        for g in 0..len {
            for r in 0..len {
                let rgb = [r as f32 / div, g as f32 / div, b as f32 / div];
                out.extend_from_slice(&map(rgb));
            }
        }
    }
    out
}

/// A cached, immutable color transform
///
/// Obtained from [`TransformCache::get_transform`]; dropping the last
/// reference removes it from the cache.
#[derive(Debug)]
pub struct ColorTransform {
    id: u32,
    key: SearchKey,
    pre_curve: ColorCurve,
    mapping: ColorMapping,
    post_curve: ColorCurve,
    /// Clamp final values to [0, 1]
    clamp_output: bool,
    registry: Rc<Registry>,
}

impl ColorTransform {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn key(&self) -> &SearchKey {
        &self.key
    }

    pub fn category(&self) -> TransformCategory {
        self.key.category
    }

    pub fn pre_curve(&self) -> &ColorCurve {
        &self.pre_curve
    }

    pub fn mapping(&self) -> &ColorMapping {
        &self.mapping
    }

    pub fn post_curve(&self) -> &ColorCurve {
        &self.post_curve
    }

    pub fn clamp_output(&self) -> bool {
        self.clamp_output
    }

    /// All three steps are identities and nothing is clamped
    pub fn is_identity(&self) -> bool {
        self.pre_curve.is_identity()
            && self.mapping.is_identity()
            && self.post_curve.is_identity()
            && !self.clamp_output
    }

    pub fn eval(&self, rgb: [f32; 3]) -> [f32; 3] {
        let v = self.post_curve.eval(self.mapping.eval(self.pre_curve.eval(rgb)));
        if self.clamp_output {
            v.map(|c| c.clamp(0.0, 1.0))
        } else {
            v
        }
    }

    /// Transform pixels in place
    pub fn apply(&self, pixels: &mut [[f32; 3]]) {
        if !self.pre_curve.is_identity() {
            for px in pixels.iter_mut() {
                *px = self.pre_curve.eval(*px);
            }
        }

        match &self.mapping {
            ColorMapping::Identity => {}
            ColorMapping::Matrix(m) => simd::apply_column_major_batch(m, pixels),
            mapping @ ColorMapping::Lut3d(_) => {
                for px in pixels.iter_mut() {
                    *px = mapping.eval(*px);
                }
            }
        }

        if !self.post_curve.is_identity() {
            for px in pixels.iter_mut() {
                *px = self.post_curve.eval(*px);
            }
        }

        if self.clamp_output {
            simd::clamp_unit_batch(pixels);
        }
    }

    /// One line per step
    pub fn describe(&self) -> String {
        format!(
            "pre curve: {}\n  mapping: {}\n  post curve: {}{}\n",
            self.pre_curve,
            self.mapping,
            self.post_curve,
            if self.clamp_output { "\n  output clamped" } else { "" }
        )
    }
}

impl Drop for ColorTransform {
    fn drop(&mut self) {
        info!(target: "compcms::transformations", "Destroyed color transformation t{}.", self.id);
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ParametricCurve;

    fn gamma_params(g: f32) -> [f32; 10] {
        [g, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn test_category_names() {
        assert_eq!(TransformCategory::InputToBlend.name(), "input-to-blend");
        assert_eq!(TransformCategory::BlendToOutput.to_string(), "blend-to-output");
        assert_eq!(TransformCategory::InputToOutput.name(), "input-to-output");
    }

    #[test]
    fn test_curve_realize_layout() {
        let curve = ColorCurve::LinPow {
            params: [gamma_params(1.0), gamma_params(2.0), gamma_params(3.0)],
            clamped_input: true,
        };
        let lut = curve.realize(5);
        assert_eq!(lut.len(), 15);
        // x = 0.5 in each block
        assert!((lut[2] - 0.5).abs() < 1e-6);
        assert!((lut[5 + 2] - 0.25).abs() < 1e-6);
        assert!((lut[10 + 2] - 0.125).abs() < 1e-6);
        assert_eq!(lut[4], 1.0);
    }

    #[test]
    fn test_output_clamp_in_realized_curves() {
        let clamp = ColorCurve::Identity.with_output_clamp(256);
        assert_eq!(clamp.eval([-0.5, 0.5, 1.5]), [0.0, 0.5, 1.0]);

        // Gamma keeps its form and only clamps its input
        let gamma = ColorCurve::LinPow {
            params: [gamma_params(2.2); 3],
            clamped_input: false,
        };
        let clamped = gamma.clone().with_output_clamp(256);
        assert!(matches!(clamped, ColorCurve::LinPow { clamped_input: true, .. }));
        assert_eq!(clamped.eval([-0.5, 1.5, 0.5]), [0.0, 1.0, gamma.eval([0.5; 3])[0]]);

        let c = ToneCurve::parametric(ParametricCurve::srgb(), false);
        let sampled = ColorCurve::Lut3x1d {
            curves: Box::new([c.clone(), c.clone(), c]),
            optimal_len: 1024,
        };
        assert_eq!(sampled.clone().with_output_clamp(256), sampled);

        // Doubling leaves [0, 1] and gets resampled with clamped values
        let double = ColorCurve::LinPow {
            params: [[1.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]; 3],
            clamped_input: false,
        };
        assert!(double.realize(5).iter().any(|v| *v > 1.0));
        let clamped = double.with_output_clamp(256);
        assert!(matches!(clamped, ColorCurve::Lut3x1d { optimal_len: 256, .. }));

        let lut = clamped.realize(5);
        assert!(lut.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((lut[1] - 0.5).abs() < 1e-6);
        assert_eq!(lut[3], 1.0);

        let out = clamped.eval([-1.0, 0.25, 3.0]);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn test_sampled_curve_realize() {
        let c = ToneCurve::parametric(ParametricCurve::srgb(), true);
        let curve = ColorCurve::Lut3x1d {
            curves: Box::new([c.clone(), c.clone(), c.clone()]),
            optimal_len: 1024,
        };
        let lut = curve.realize(3);
        assert!((lut[1] as f64 - c.eval(0.5)).abs() < 1e-6);
        assert!((lut[4] as f64 - c.eval(0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_mapping_realize_order() {
        let mapping = ColorMapping::Identity;
        let len = 4;
        let lut = mapping.realize(len);
        assert_eq!(lut.len(), 3 * len * len * len);

        let (r, g, b) = (1, 2, 3);
        let i = 3 * (r + len * (g + len * b));
        assert!((lut[i] - 1.0 / 3.0).abs() < 1e-6);
        assert!((lut[i + 1] - 2.0 / 3.0).abs() < 1e-6);
        assert!((lut[i + 2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_mapping_is_column_major() {
        // Column 0 is (0, 1, 0): red input lands in green output
        let m = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let out = ColorMapping::Matrix(m).eval([0.2, 0.7, 0.4]);
        assert!((out[0] - 0.7).abs() < 1e-6);
        assert!((out[1] - 0.2).abs() < 1e-6);
        assert!((out[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_lut3d_clamps_finite_values() {
        let stages = vec![Stage::matrix(crate::math::Matrix3x3::diagonal(2.0, 1.0, -1.0))];
        let mapping = ColorMapping::Lut3d(Lut3dMapping::new(stages, 9));
        let lut = mapping.realize(2);
        assert!(lut.iter().all(|v| (0.0..=1.0).contains(v)));

        let out = mapping.eval([0.75, 0.5, 0.5]);
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert_eq!(out[2], 0.0);
    }
}
