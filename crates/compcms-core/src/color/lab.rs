//! CIELAB relative to the D50 PCS, and its ICC encodings
//!
//! LUT-based profiles may use Lab as their connection space. Their CLUT
//! output is normalized to [0, 1] and has to be decoded before it can be
//! compared with XYZ.

use crate::color::{D50, Xyz};

const DELTA: f64 = 6.0 / 29.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn from_xyz(xyz: Xyz) -> Self {
        let fx = lab_f(xyz.x / D50.x);
        let fy = lab_f(xyz.y / D50.y);
        let fz = lab_f(xyz.z / D50.z);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    pub fn to_xyz(&self) -> Xyz {
        let fy = (self.l + 16.0) / 116.0;
        let fx = self.a / 500.0 + fy;
        let fz = fy - self.b / 200.0;

        Xyz::new(lab_f_inv(fx) * D50.x, lab_f_inv(fy) * D50.y, lab_f_inv(fz) * D50.z)
    }

    /// Decode a normalized PCS value.
    ///
    /// `legacy` selects the ICC v2 16-bit encoding, where 0xFF00 is the
    /// top of the range instead of 0xFFFF.
    pub fn from_encoded(v: [f64; 3], legacy: bool) -> Self {
        let scale = if legacy { 65535.0 / 65280.0 } else { 1.0 };
        Self {
            l: v[0] * scale * 100.0,
            a: v[1] * scale * 255.0 - 128.0,
            b: v[2] * scale * 255.0 - 128.0,
        }
    }

    /// Encode as a normalized PCS value, inverse of [`Lab::from_encoded`]
    pub fn to_encoded(&self, legacy: bool) -> [f64; 3] {
        let scale = if legacy { 65280.0 / 65535.0 } else { 1.0 };
        [
            self.l / 100.0 * scale,
            (self.a + 128.0) / 255.0 * scale,
            (self.b + 128.0) / 255.0 * scale,
        ]
    }

    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.l - other.l).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[inline]
fn lab_f_inv(t: f64) -> f64 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_white_is_100() {
        let lab = Lab::from_xyz(D50);
        assert!((lab.l - 100.0).abs() < EPSILON);
        assert!(lab.a.abs() < EPSILON);
        assert!(lab.b.abs() < EPSILON);
    }

    #[test]
    fn test_xyz_roundtrip() {
        let original = Lab::new(50.0, 25.0, -30.0);
        let roundtrip = Lab::from_xyz(original.to_xyz());
        assert!(original.approx_eq(&roundtrip, 1e-9), "{:?} vs {:?}", original, roundtrip);
    }

    #[test]
    fn test_encoding() {
        let white = Lab::from_encoded([1.0, 128.0 / 255.0, 128.0 / 255.0], false);
        assert!(white.approx_eq(&Lab::new(100.0, 0.0, 0.0), EPSILON));

        let lab = Lab::new(40.0, -20.0, 60.0);
        for legacy in [false, true] {
            let back = Lab::from_encoded(lab.to_encoded(legacy), legacy);
            assert!(lab.approx_eq(&back, 1e-9));
        }
    }
}
