//! ICC profile header (128 bytes, ICC.1:2022 section 7.2)
//!
//! Device class and color space are kept even when unrecognized so that
//! profile validation can report them.

use super::error::IccError;
use super::types::{XyzNumber, read_u32};

/// Profile file signature 'acsp'
pub const PROFILE_SIGNATURE: u32 = 0x61637370;

pub const HEADER_SIZE: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct IccHeader {
    /// Profile size in bytes
    pub size: u32,
    pub version: ProfileVersion,
    pub device_class: ProfileClass,
    /// Color space of the device side
    pub color_space: ColorSpace,
    /// Profile connection space
    pub pcs: ColorSpace,
    /// Raw header rendering intent field
    pub rendering_intent: u32,
    /// PCS illuminant, D50 in conforming profiles
    pub illuminant: XyzNumber,
    pub profile_id: [u8; 16],
}

impl IccHeader {
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < HEADER_SIZE {
            return Err(IccError::TooSmall {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let signature = read_u32(data, 36)?;
        if signature != PROFILE_SIGNATURE {
            return Err(IccError::InvalidSignature(signature));
        }

        let size = read_u32(data, 0)?;
        if size as usize > data.len() {
            return Err(IccError::SizeMismatch {
                header_size: size,
                actual_size: data.len(),
            });
        }

        let mut profile_id = [0u8; 16];
        profile_id.copy_from_slice(&data[84..100]);

        Ok(Self {
            size,
            version: ProfileVersion {
                major: data[8],
                minor: data[9] >> 4,
                patch: data[9] & 0x0F,
            },
            device_class: ProfileClass::from_u32(read_u32(data, 12)?),
            color_space: ColorSpace::from_u32(read_u32(data, 16)?),
            pcs: ColorSpace::from_u32(read_u32(data, 20)?),
            rendering_intent: read_u32(data, 64)?,
            illuminant: XyzNumber::from_bytes(&data[68..80]).unwrap_or_default(),
            profile_id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ProfileVersion {
    /// Version as `major.minor`, e.g. 4.3
    pub fn as_f32(&self) -> f32 {
        self.major as f32 + self.minor as f32 / 10.0
    }
}

/// Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileClass {
    Input,
    Display,
    Output,
    Link,
    ColorSpace,
    Abstract,
    NamedColor,
    Unknown(u32),
}

impl ProfileClass {
    pub fn from_u32(val: u32) -> Self {
        match &val.to_be_bytes() {
            b"scnr" => Self::Input,
            b"mntr" => Self::Display,
            b"prtr" => Self::Output,
            b"link" => Self::Link,
            b"spac" => Self::ColorSpace,
            b"abst" => Self::Abstract,
            b"nmcl" => Self::NamedColor,
            _ => Self::Unknown(val),
        }
    }

    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Input => u32::from_be_bytes(*b"scnr"),
            Self::Display => u32::from_be_bytes(*b"mntr"),
            Self::Output => u32::from_be_bytes(*b"prtr"),
            Self::Link => u32::from_be_bytes(*b"link"),
            Self::ColorSpace => u32::from_be_bytes(*b"spac"),
            Self::Abstract => u32::from_be_bytes(*b"abst"),
            Self::NamedColor => u32::from_be_bytes(*b"nmcl"),
            Self::Unknown(val) => *val,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Display => "Display",
            Self::Output => "Output",
            Self::Link => "Link",
            Self::ColorSpace => "ColorSpace",
            Self::Abstract => "Abstract",
            Self::NamedColor => "NamedColor",
            Self::Unknown(_) => "(unknown)",
        }
    }
}

/// Data or connection color space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Xyz,
    Lab,
    Rgb,
    Gray,
    Cmyk,
    Cmy,
    YCbCr,
    Other(u32),
}

impl ColorSpace {
    pub fn from_u32(val: u32) -> Self {
        match &val.to_be_bytes() {
            b"XYZ " => Self::Xyz,
            b"Lab " => Self::Lab,
            b"RGB " => Self::Rgb,
            b"GRAY" => Self::Gray,
            b"CMYK" => Self::Cmyk,
            b"CMY " => Self::Cmy,
            b"YCbr" => Self::YCbCr,
            _ => Self::Other(val),
        }
    }

    /// Channel count; n-color spaces ('2CLR'..'FCLR') are decoded from
    /// their signature, anything unknown has none.
    pub fn channels(&self) -> u32 {
        match self {
            Self::Gray => 1,
            Self::Xyz | Self::Lab | Self::Rgb | Self::Cmy | Self::YCbCr => 3,
            Self::Cmyk => 4,
            Self::Other(val) => {
                let b = val.to_be_bytes();
                if &b[1..] != b"CLR" {
                    return 0;
                }
                match b[0] {
                    d @ b'2'..=b'9' => (d - b'0') as u32,
                    h @ b'A'..=b'F' => (h - b'A') as u32 + 10,
                    _ => 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes() -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(&(HEADER_SIZE as u32).to_be_bytes());
        data[8] = 2;
        data[9] = 0x10;
        data[12..16].copy_from_slice(b"prtr");
        data[16..20].copy_from_slice(b"6CLR");
        data[20..24].copy_from_slice(b"Lab ");
        data[36..40].copy_from_slice(&PROFILE_SIGNATURE.to_be_bytes());
        data
    }

    #[test]
    fn test_parse_keeps_unusual_fields() {
        let header = IccHeader::parse(&header_bytes()).unwrap();
        assert_eq!(header.version.major, 2);
        assert!((header.version.as_f32() - 2.1).abs() < 1e-6);
        assert_eq!(header.device_class, ProfileClass::Output);
        assert_eq!(header.device_class.name(), "Output");
        assert_eq!(header.color_space.channels(), 6);
        assert_eq!(header.pcs, ColorSpace::Lab);
    }

    #[test]
    fn test_bad_signature() {
        let mut data = header_bytes();
        data[36] = b'x';
        assert!(matches!(IccHeader::parse(&data), Err(IccError::InvalidSignature(_))));
    }

    #[test]
    fn test_size_larger_than_data() {
        let mut data = header_bytes();
        data[0..4].copy_from_slice(&4096u32.to_be_bytes());
        assert!(matches!(IccHeader::parse(&data), Err(IccError::SizeMismatch { .. })));
    }

    #[test]
    fn test_unknown_class_roundtrip() {
        let class = ProfileClass::from_u32(0x1234_5678);
        assert_eq!(class.to_u32(), 0x1234_5678);
        assert_eq!(class.name(), "(unknown)");
        assert_eq!(ProfileClass::Display.to_u32(), 0x6d6e_7472);
    }
}
