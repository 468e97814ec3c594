//! ICC number and signature types, and big-endian readers

use crate::color::Xyz;
use crate::icc::error::{IccError, corrupted};

/// ICC tag signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.0.to_be_bytes()).into_owned()
    }

    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const A2B1: Self = Self::from_bytes(*b"A2B1");
    pub const A2B2: Self = Self::from_bytes(*b"A2B2");
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const B2A1: Self = Self::from_bytes(*b"B2A1");
    pub const B2A2: Self = Self::from_bytes(*b"B2A2");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const CHAD: Self = Self::from_bytes(*b"chad");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const MEDIA_BLACK: Self = Self::from_bytes(*b"bkpt");
    pub const VCGT: Self = Self::from_bytes(*b"vcgt");
}

/// Tag type signatures understood by the tag parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARA: Self = Self::from_bytes(*b"para");
    pub const TEXT: Self = Self::from_bytes(*b"text");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const MLUC: Self = Self::from_bytes(*b"mluc");
    pub const LUT8: Self = Self::from_bytes(*b"mft1");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
    pub const SF32: Self = Self::from_bytes(*b"sf32");
    pub const VCGT: Self = Self::from_bytes(*b"vcgt");
}

/// s15Fixed16Number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    pub fn from_f64(val: f64) -> Self {
        Self((val * 65536.0).round() as i32)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }
}

/// XYZNumber: three s15Fixed16 values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzNumber {
    pub x: S15Fixed16,
    pub y: S15Fixed16,
    pub z: S15Fixed16,
}

impl XyzNumber {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            x: S15Fixed16(read_i32(bytes, 0).ok()?),
            y: S15Fixed16(read_i32(bytes, 4).ok()?),
            z: S15Fixed16(read_i32(bytes, 8).ok()?),
        })
    }

    pub fn to_xyz(&self) -> Xyz {
        Xyz::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16, IccError> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| corrupted(format!("u16 read past end at offset {}", offset)))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32, IccError> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| corrupted(format!("u32 read past end at offset {}", offset)))
}

pub(crate) fn read_i32(data: &[u8], offset: usize) -> Result<i32, IccError> {
    read_u32(data, offset).map(|v| v as i32)
}

/// Read an s15Fixed16Number as f64
pub(crate) fn read_s15f16(data: &[u8], offset: usize) -> Result<f64, IccError> {
    read_i32(data, offset).map(|raw| S15Fixed16(raw).to_f64())
}
