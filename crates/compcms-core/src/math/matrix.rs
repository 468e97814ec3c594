//! 3x3 matrices for pipeline matrix stages
//!
//! Pipeline stages store matrices row-major in f64. The renderer-facing
//! [`ColorMapping`](crate::transform::ColorMapping) stores them column-major
//! in f32; [`Matrix3x3::to_column_major`] performs that conversion.

use std::ops::{Index, Mul};

/// Bits of precision required before a matrix counts as identity.
pub const MATRIX_PRECISION_BITS: i32 = 12;

/// A 3x3 matrix, stored row-major: `m[row][col]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    pub m: [[f64; 3]; 3],
}

impl Matrix3x3 {
    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { m: [[0.0; 3]; 3] }
    }

    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self {
            m: [[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]],
        }
    }

    /// Build a matrix whose columns are the given vectors
    pub fn from_columns(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Self {
        Self {
            m: [
                [c0[0], c1[0], c2[0]],
                [c0[1], c1[1], c2[1]],
                [c0[2], c1[2], c2[2]],
            ],
        }
    }

    /// Returns M × v
    #[inline]
    pub fn multiply_vec(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.m;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// Returns self × other
    ///
    /// As a pipeline, `next.multiply(&prev)` applies `prev` first.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = Self::zero();
        for (i, row) in result.m.iter_mut().enumerate() {
            for (j, out) in row.iter_mut().enumerate() {
                *out = (0..3).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        result
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self {
            m: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate, or `None` for a singular matrix
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-14 || !det.is_finite() {
            return None;
        }

        let inv = 1.0 / det;
        let m = &self.m;
        Some(Self {
            m: [
                [
                    (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv,
                    (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv,
                    (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv,
                ],
                [
                    (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv,
                    (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv,
                    (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv,
                ],
                [
                    (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv,
                    (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv,
                    (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv,
                ],
            ],
        })
    }

    /// Largest absolute column sum of `M - I`.
    pub fn identity_error(&self) -> f64 {
        (0..3)
            .map(|col| {
                (0..3)
                    .map(|row| {
                        let expected = if row == col { 1.0 } else { 0.0 };
                        (self.m[row][col] - expected).abs()
                    })
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }

    /// True when `-log2(‖M - I‖) >= bits`. An exact identity has zero
    /// error and always qualifies.
    pub fn is_identity_within_bits(&self, bits: i32) -> bool {
        let err = self.identity_error();
        if err == 0.0 {
            return true;
        }
        -err.log2() >= bits as f64
    }

    /// Identity test used by the optimizer
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.is_identity_within_bits(MATRIX_PRECISION_BITS)
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Column-major `f32` layout: element `[c * 3 + r]` is `m[r][c]`.
    pub fn to_column_major(&self) -> [f32; 9] {
        let mut out = [0.0f32; 9];
        for c in 0..3 {
            for r in 0..3 {
                out[c * 3 + r] = self.m[r][c] as f32;
            }
        }
        out
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for Matrix3x3 {
    type Output = [f64; 3];

    fn index(&self, row: usize) -> &Self::Output {
        &self.m[row]
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Mul<[f64; 3]> for Matrix3x3 {
    type Output = [f64; 3];

    fn mul(self, rhs: [f64; 3]) -> Self::Output {
        self.multiply_vec(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn sample() -> Matrix3x3 {
        Matrix3x3::new([
            [0.4361, 0.3851, 0.1431],
            [0.2225, 0.7169, 0.0606],
            [0.0139, 0.0971, 0.7141],
        ])
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = sample();
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Matrix3x3::identity(), 1e-10));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let m = Matrix3x3::new([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]]);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_identity_precision() {
        assert!(Matrix3x3::identity().is_identity());

        let mut almost = Matrix3x3::identity();
        almost.m[0][1] = 1.0 / 8192.0;
        assert!(almost.is_identity(), "error 2^-13 is within 12 bits");

        almost.m[0][1] = 1.0 / 1024.0;
        assert!(!almost.is_identity(), "error 2^-10 is not within 12 bits");
    }

    #[test]
    fn test_identity_error_uses_column_sums() {
        let mut m = Matrix3x3::identity();
        m.m[0][2] = 0.25;
        m.m[1][2] = 0.25;
        assert!((m.identity_error() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_column_major_layout() {
        let m = Matrix3x3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let cm = m.to_column_major();
        assert_eq!(cm, [1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_multiply_order() {
        let scale = Matrix3x3::diagonal(2.0, 2.0, 2.0);
        let swap = Matrix3x3::new([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let v = [1.0, 2.0, 3.0];

        let merged = swap.multiply(&scale);
        let expected = swap.multiply_vec(scale.multiply_vec(v));
        let got = merged.multiply_vec(v);
        for i in 0..3 {
            assert!((got[i] - expected[i]).abs() < EPSILON);
        }
    }

    #[test]
    fn test_from_columns() {
        let m = Matrix3x3::from_columns([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        assert_eq!(m.m[0], [1.0, 4.0, 7.0]);
        assert_eq!(m.transpose().m[0], [1.0, 2.0, 3.0]);
    }
}
