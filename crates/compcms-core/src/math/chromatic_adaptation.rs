//! Chromatic adaptation and RGB → XYZ matrices
//!
//! Parametric profiles are connected through the D50 PCS. Their RGB → XYZ
//! matrix is derived from the gamut and then Bradford-adapted from the
//! gamut's white point to D50, the same as ICC v4 `chad` handling.

use crate::color::Xyz;
use crate::math::Matrix3x3;

/// Bradford XYZ → cone response
const BRADFORD: Matrix3x3 = Matrix3x3::new([
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
]);

/// Bradford adaptation matrix taking XYZ relative to `src_white` to XYZ
/// relative to `dst_white`: `XYZ_dst = M × XYZ_src`
pub fn adaptation_matrix(src_white: Xyz, dst_white: Xyz) -> Matrix3x3 {
    let Some(bradford_inv) = BRADFORD.inverse() else {
        return Matrix3x3::identity();
    };

    let src = BRADFORD.multiply_vec(src_white.to_array());
    let dst = BRADFORD.multiply_vec(dst_white.to_array());

    let ratio = |d: f64, s: f64| if s.abs() > 1e-10 { d / s } else { 1.0 };
    let scale = Matrix3x3::diagonal(ratio(dst[0], src[0]), ratio(dst[1], src[1]), ratio(dst[2], src[2]));

    bradford_inv.multiply(&scale.multiply(&BRADFORD))
}

/// RGB → XYZ matrix for the given xy primaries and white point
///
/// The result maps RGB (1, 1, 1) to the white point with Y = 1. Returns
/// `None` when the primaries are collinear or a y coordinate is zero.
pub fn rgb_to_xyz_matrix(primaries: [(f64, f64); 3], white: (f64, f64)) -> Option<Matrix3x3> {
    if primaries.iter().any(|&(_, y)| y == 0.0) || white.1 == 0.0 {
        return None;
    }

    let column = |(x, y): (f64, f64)| [x / y, 1.0, (1.0 - x - y) / y];
    let prim = Matrix3x3::from_columns(
        column(primaries[0]),
        column(primaries[1]),
        column(primaries[2]),
    );

    let w = Xyz::from_xyy(white.0, white.1, 1.0);
    let s = prim.inverse()?.multiply_vec(w.to_array());

    let mut m = prim;
    for row in m.m.iter_mut() {
        for (col, v) in row.iter_mut().enumerate() {
            *v *= s[col];
        }
    }
    Some(m)
}
