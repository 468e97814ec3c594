//! Tolerant floating-point comparison
//!
//! Used wherever two numerically derived values must be treated as equal:
//! matrix offsets, parametric curve parameters and inverse-pair detection.

/// Absolute tolerance, four times the smallest normal `f32`.
pub const ABS_TOLERANCE: f64 = 4.0 * f32::MIN_POSITIVE as f64;

/// Relative tolerance, scaled by the larger magnitude of the two operands.
pub const REL_TOLERANCE: f64 = 4e-5;

/// Compare two values with the shared absolute/relative tolerance.
///
/// NaN never compares equal.
#[inline]
pub fn float_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }

    let diff = (a - b).abs();
    if diff <= ABS_TOLERANCE {
        return true;
    }

    diff <= a.abs().max(b.abs()) * REL_TOLERANCE
}

/// Element-wise [`float_eq`] over two slices of equal length.
pub fn float_eq_slice(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| float_eq(x, y))
}
