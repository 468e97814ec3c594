//! Standard illuminant white points, Y normalized to 1.0

use crate::color::Xyz;

/// CIE D50, the ICC profile connection space illuminant (ICC.1:2022 values)
pub const D50: Xyz = Xyz::new(0.9642, 1.0, 0.8249);

/// CIE D65, the white point of sRGB, BT.709 and BT.2020
pub const D65: Xyz = Xyz::new(0.95047, 1.0, 1.08883);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d65_chromaticity() {
        let (x, y) = D65.to_xy().unwrap();
        assert!((x - 0.3127).abs() < 0.001);
        assert!((y - 0.3290).abs() < 0.001);
    }

    #[test]
    fn test_d50_chromaticity() {
        let (x, y) = D50.to_xy().unwrap();
        assert!((x - 0.3457).abs() < 0.001);
        assert!((y - 0.3585).abs() < 0.001);
    }
}
