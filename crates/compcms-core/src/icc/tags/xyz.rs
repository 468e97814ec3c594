//! `XYZ ` tag payload (ICC.1:2022 10.31)

use crate::color::Xyz;
use crate::icc::error::{IccError, corrupted};
use crate::icc::types::XyzNumber;

/// Parse an `XYZ ` payload, returning its first value
pub fn parse_xyz(data: &[u8]) -> Result<Xyz, IccError> {
    XyzNumber::from_bytes(data)
        .map(|n| n.to_xyz())
        .ok_or_else(|| corrupted("XYZ tag too small"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xyz() {
        let data: [u8; 12] = [
            0x00, 0x00, 0x6F, 0xA2, // 0.4360
            0x00, 0x00, 0x38, 0xF5, // 0.2225
            0x00, 0x00, 0x03, 0x90, // 0.0139
        ];
        let xyz = parse_xyz(&data).unwrap();
        assert!((xyz.x - 0.4360).abs() < 0.001);
        assert!((xyz.y - 0.2225).abs() < 0.001);
    }

    #[test]
    fn test_parse_xyz_too_small() {
        assert!(parse_xyz(&[0, 0, 0, 0]).is_err());
    }
}
