//! TRC tag payloads: `curv` (ICC.1:2022 10.6) and `para` (10.18)
//!
//! Both types decode into [`CurveData`]; a TRC tag may hold either.

use crate::icc::error::{IccError, corrupted};
use crate::icc::types::{read_s15f16, read_u16, read_u32};
use crate::math::gamma::{ParametricCurve, ParametricCurveType};

#[derive(Debug, Clone, PartialEq)]
pub enum CurveData {
    /// `curv` with no entries
    Identity,
    /// `curv` with one u8Fixed8 entry
    Gamma(f64),
    /// `curv` table, normalized from u16
    Table(Vec<f64>),
    /// `para`
    Parametric(ParametricCurve),
}

impl CurveData {
    /// Parse a `curv` payload (after type signature and reserved bytes)
    pub fn parse_curv(data: &[u8]) -> Result<Self, IccError> {
        let count = read_u32(data, 0)? as usize;

        match count {
            0 => Ok(Self::Identity),
            1 => Ok(Self::Gamma(read_u16(data, 4)? as f64 / 256.0)),
            _ => {
                let required = 4 + count * 2;
                if data.len() < required {
                    return Err(corrupted(format!(
                        "curve table needs {} bytes, have {}",
                        required,
                        data.len()
                    )));
                }
                let table = data[4..required]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]) as f64 / 65535.0)
                    .collect();
                Ok(Self::Table(table))
            }
        }
    }

    /// Parse a `para` payload
    pub fn parse_para(data: &[u8]) -> Result<Self, IccError> {
        let function_type = read_u16(data, 0)?;
        let curve_type = ParametricCurveType::from_icc(function_type)
            .ok_or_else(|| corrupted(format!("unknown parametric curve type {}", function_type)))?;

        let params = (0..curve_type.param_count())
            .map(|i| read_s15f16(data, 4 + i * 4))
            .collect::<Result<Vec<_>, _>>()?;

        ParametricCurve::from_params(curve_type, &params)
            .map(Self::Parametric)
            .ok_or_else(|| corrupted("parametric curve parameters missing"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curv_identity_and_gamma() {
        assert_eq!(CurveData::parse_curv(&[0, 0, 0, 0]).unwrap(), CurveData::Identity);

        // 2.2 as u8Fixed8 is 0x0233
        match CurveData::parse_curv(&[0, 0, 0, 1, 0x02, 0x33]).unwrap() {
            CurveData::Gamma(g) => assert!((g - 2.199).abs() < 0.01),
            other => panic!("expected gamma, got {:?}", other),
        }
    }

    #[test]
    fn test_curv_table_normalized() {
        let data = [0, 0, 0, 3, 0x00, 0x00, 0x80, 0x00, 0xFF, 0xFF];
        match CurveData::parse_curv(&data).unwrap() {
            CurveData::Table(t) => {
                assert_eq!(t.len(), 3);
                assert_eq!(t[0], 0.0);
                assert!((t[1] - 0.5).abs() < 1e-4);
                assert_eq!(t[2], 1.0);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_curv_truncated() {
        assert!(CurveData::parse_curv(&[0, 0, 0, 4, 0, 0]).is_err());
    }

    #[test]
    fn test_para_type0() {
        let mut data = vec![0, 0, 0, 0];
        data.extend_from_slice(&[0x00, 0x02, 0x33, 0x33]);
        match CurveData::parse_para(&data).unwrap() {
            CurveData::Parametric(c) => {
                assert_eq!(c.curve_type, ParametricCurveType::Gamma);
                assert!((c.eval(0.5) - 0.2176).abs() < 0.001);
            }
            other => panic!("expected parametric, got {:?}", other),
        }
    }

    #[test]
    fn test_para_missing_params() {
        // Type 3 needs five parameters
        let data = [0, 3, 0, 0, 0x00, 0x02, 0x66, 0x66];
        assert!(CurveData::parse_para(&data).is_err());
    }
}
