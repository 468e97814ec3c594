//! Tag payload parsing
//!
//! Only the tag types needed for building transforms are decoded; the rest
//! are kept as [`TagData::Unknown`].

mod curves;
mod lut;
mod text;
mod vcgt;
mod xyz;

pub use curves::CurveData;
pub use lut::LutData;
pub use vcgt::{VcgtChannel, VcgtData};

#[cfg(test)]
pub(crate) use lut::tests::identity_lut16_payload;

use crate::color::Xyz;
use crate::icc::error::{IccError, corrupted};
use crate::icc::types::{TypeSignature, read_u32};

#[derive(Debug, Clone, PartialEq)]
pub enum TagData {
    Xyz(Xyz),
    Curve(CurveData),
    Text(String),
    Lut(LutData),
    Vcgt(VcgtData),
    Unknown { type_sig: u32 },
}

impl TagData {
    /// Parse one tag, given its bytes starting at the type signature
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < 8 {
            return Err(corrupted("tag data too small for header"));
        }

        let type_sig = TypeSignature(read_u32(data, 0)?);
        let payload = &data[8..];

        Ok(match type_sig {
            TypeSignature::XYZ => Self::Xyz(xyz::parse_xyz(payload)?),
            TypeSignature::CURVE => Self::Curve(CurveData::parse_curv(payload)?),
            TypeSignature::PARA => Self::Curve(CurveData::parse_para(payload)?),
            TypeSignature::TEXT => Self::Text(text::parse_text(payload)),
            TypeSignature::DESC => Self::Text(text::parse_desc(payload)?),
            TypeSignature::MLUC => Self::Text(text::parse_mluc(data)?),
            TypeSignature::LUT8 => Self::Lut(LutData::parse_lut8(payload)?),
            TypeSignature::LUT16 => Self::Lut(LutData::parse_lut16(payload)?),
            TypeSignature::VCGT => Self::Vcgt(VcgtData::parse(payload)?),
            other => Self::Unknown { type_sig: other.0 },
        })
    }

    pub fn as_xyz(&self) -> Option<Xyz> {
        match self {
            Self::Xyz(xyz) => Some(*xyz),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&CurveData> {
        match self {
            Self::Curve(curve) => Some(curve),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_lut(&self) -> Option<&LutData> {
        match self {
            Self::Lut(lut) => Some(lut),
            _ => None,
        }
    }

    pub fn as_vcgt(&self) -> Option<&VcgtData> {
        match self {
            Self::Vcgt(vcgt) => Some(vcgt),
            _ => None,
        }
    }
}
