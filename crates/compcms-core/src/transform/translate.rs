//! Optimized pipeline → renderer steps
//!
//! Curve sets whose three curves share a parametric type of 1, -1, 4 or -4
//! become LINPOW or POWLIN curves:
//!
//! | type | result | parameters                                   |
//! |------|--------|----------------------------------------------|
//! | 1    | LINPOW | `a = 1, b = 0, c = 1, d = 0`                 |
//! | -1   | LINPOW | as type 1 with `g ← 1/g`                     |
//! | 4    | LINPOW | copied                                       |
//! | -4   | POWLIN | `g ← 1/g, a ← 1/a, b ← -b/a, c ← 1/c, d ← c·d` |
//!
//! Type -4 may be discontinuous at `x = d`; the power segment is used there.
//! Any other curve set is kept as a sampled 3x1D LUT.

use tracing::warn;

use crate::curve::ToneCurve;
use crate::math::ParametricCurve;
use crate::pipeline::{Optimized, PipelineShape, classify};
use crate::transform::{ColorCurve, ColorMapping, Lut3dMapping};

/// The three renderer steps of a transform
#[derive(Debug, Clone)]
pub struct Steps {
    pub pre_curve: ColorCurve,
    pub mapping: ColorMapping,
    pub post_curve: ColorCurve,
}

/// Translate an optimized pipeline, falling back to a 3D LUT of
/// `lut_3d_points` per axis when its shape is not `[curve]? [matrix]? [curve]?`
pub fn translate(optimized: &Optimized, lut_1d_points: usize, lut_3d_points: usize) -> Steps {
    let curve = |c: Option<[ToneCurve; 3]>| match c {
        Some(curves) => translate_curve_set(&curves, lut_1d_points),
        None => ColorCurve::Identity,
    };

    match classify(&optimized.stages) {
        PipelineShape::Identity => Steps {
            pre_curve: ColorCurve::Identity,
            mapping: ColorMapping::Identity,
            post_curve: ColorCurve::Identity,
        },
        PipelineShape::Simple {
            pre_curve,
            matrix,
            post_curve,
        } => Steps {
            pre_curve: curve(pre_curve),
            mapping: matrix.map_or(ColorMapping::Identity, |m| ColorMapping::Matrix(m.to_column_major())),
            post_curve: curve(post_curve),
        },
        PipelineShape::Complex => Steps {
            pre_curve: ColorCurve::Identity,
            mapping: ColorMapping::Lut3d(Lut3dMapping::new(optimized.stages.clone(), lut_3d_points)),
            post_curve: ColorCurve::Identity,
        },
    }
}

/// Translate one curve set, sampling it at `lut_1d_points` when no
/// parametric form fits
pub fn translate_curve_set(curves: &[ToneCurve; 3], lut_1d_points: usize) -> ColorCurve {
    match parametric_curve(curves) {
        Some(Ok(curve)) => return curve,
        Some(Err(msg)) => warn!(target: "compcms::transformations", "{}", msg),
        None => {}
    }

    ColorCurve::Lut3x1d {
        curves: Box::new(curves.clone()),
        optimal_len: lut_1d_points,
    }
}

/// `None` when the set has no common parametric type, `Err` when the type
/// is supported but its parameters are not
fn parametric_curve(curves: &[ToneCurve; 3]) -> Option<Result<ColorCurve, &'static str>> {
    let (r, clamped_input) = curves[0].as_parametric()?;
    let (g, g_clamped) = curves[1].as_parametric()?;
    let (b, b_clamped) = curves[2].as_parametric()?;
    let channels = [r, g, b];

    let curve_type = r.signed_type();
    if channels.iter().any(|c| c.signed_type() != curve_type) || g_clamped != clamped_input || b_clamped != clamped_input {
        return None;
    }

    let mut params = [[0.0f32; 10]; 3];
    let result = match curve_type {
        1 => {
            for (p, c) in params.iter_mut().zip(channels) {
                p[..5].copy_from_slice(&[c.g as f32, 1.0, 0.0, 1.0, 0.0]);
            }
            Ok(ColorCurve::LinPow {
                params,
                clamped_input,
            })
        }
        -1 => linpow_from_inverse_power(channels, &mut params).map(|()| ColorCurve::LinPow {
            params,
            clamped_input,
        }),
        4 => linpow_from_type_4(channels, &mut params).map(|()| ColorCurve::LinPow {
            params,
            clamped_input,
        }),
        -4 => powlin_from_inverse_type_4(channels, &mut params).map(|()| ColorCurve::PowLin {
            params,
            clamped_input,
        }),
        _ => return None,
    };
    Some(result)
}

fn gadcd(c: &ParametricCurve) -> [f32; 5] {
    [c.g as f32, c.a as f32, c.b as f32, c.c as f32, c.d as f32]
}

fn linpow_from_inverse_power(channels: [&ParametricCurve; 3], params: &mut [[f32; 10]; 3]) -> Result<(), &'static str> {
    for (p, c) in params.iter_mut().zip(channels) {
        let g = c.g as f32;
        if g == 0.0 {
            return Err("xform has a type -1 curve (inverse of pure power-law) with exponent 1 divided by 0, \
                        which is invalid");
        }
        p[..5].copy_from_slice(&[1.0 / g, 1.0, 0.0, 1.0, 0.0]);
    }
    Ok(())
}

/// Type 4 evaluates negative input as is where LINPOW mirrors it; that
/// difference is accepted.
fn linpow_from_type_4(channels: [&ParametricCurve; 3], params: &mut [[f32; 10]; 3]) -> Result<(), &'static str> {
    for (p, c) in params.iter_mut().zip(channels) {
        let [g, a, b, c, d] = gadcd(c);
        if a < 0.0 {
            return Err("xform has a type 4 curve with a < 0, which is unexpected");
        }
        if d < 0.0 {
            return Err("xform has a type 4 curve with d < 0, which is unexpected");
        }
        if a * d + b < 0.0 {
            return Err("xform has a type 4 curve with a * d + b < 0, which is invalid");
        }
        p[..5].copy_from_slice(&[g, a, b, c, d]);
    }
    Ok(())
}

/// The parameters are those of the type 4 curve being inverted.
fn powlin_from_inverse_type_4(channels: [&ParametricCurve; 3], params: &mut [[f32; 10]; 3]) -> Result<(), &'static str> {
    for (p, c) in params.iter_mut().zip(channels) {
        let [g, a, b, c, d] = gadcd(c);
        if g == 0.0 {
            return Err("xform has a type -4 curve but the param g of the original type 4 curve is zero, \
                        so the inverse is invalid");
        }
        if a == 0.0 {
            return Err("xform has a type -4 curve but the param a of the original type 4 curve is zero, \
                        so the inverse is invalid");
        }
        if c == 0.0 {
            return Err("xform has a type -4 curve but the param c of the original type 4 curve is zero, \
                        so the inverse is invalid");
        }
        p[..5].copy_from_slice(&[1.0 / g, 1.0 / a, -b / a, 1.0 / c, c * d]);
    }
    Ok(())
}
