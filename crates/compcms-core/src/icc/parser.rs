//! ICC profile: header, tag table and decoded tags

use std::collections::HashMap;

use super::error::IccError;
use super::header::{HEADER_SIZE, IccHeader, ProfileClass};
use super::tags::{CurveData, LutData, TagData, VcgtData};
use super::types::{TagSignature, read_u32};
use crate::color::{D50, Xyz};

/// Tag table entry size: signature, offset, size
const TAG_ENTRY_SIZE: usize = 12;

/// A parsed ICC profile
#[derive(Debug, Clone)]
pub struct IccProfile {
    pub header: IccHeader,
    tags: HashMap<u32, TagData>,
    raw_data: Vec<u8>,
}

impl IccProfile {
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        let header = IccHeader::parse(data)?;

        let count = read_u32(data, HEADER_SIZE).map_err(|_| IccError::TooSmall {
            expected: HEADER_SIZE + 4,
            actual: data.len(),
        })? as usize;

        let table_end = HEADER_SIZE + 4 + count * TAG_ENTRY_SIZE;
        if data.len() < table_end {
            return Err(IccError::TooSmall {
                expected: table_end,
                actual: data.len(),
            });
        }

        let mut tags = HashMap::with_capacity(count);
        for i in 0..count {
            let entry = HEADER_SIZE + 4 + i * TAG_ENTRY_SIZE;
            let signature = read_u32(data, entry)?;
            let offset = read_u32(data, entry + 4)?;
            let size = read_u32(data, entry + 8)?;

            let start = offset as usize;
            let end = start.saturating_add(size as usize);
            let Some(tag_bytes) = data.get(start..end) else {
                return Err(IccError::TagOutOfBounds {
                    tag: signature,
                    offset,
                    size,
                    profile_size: data.len(),
                });
            };

            // A malformed tag only matters if something asks for it.
            let parsed = TagData::parse(tag_bytes).unwrap_or(TagData::Unknown {
                type_sig: read_u32(tag_bytes, 0).unwrap_or(0),
            });
            tags.insert(signature, parsed);
        }

        Ok(Self {
            header,
            tags,
            raw_data: data.to_vec(),
        })
    }

    pub fn tag(&self, sig: TagSignature) -> Option<&TagData> {
        self.tags.get(&sig.0)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn description(&self) -> Option<&str> {
        self.tag(TagSignature::DESC).and_then(TagData::as_text)
    }

    /// Colorant XYZ for channel 0 (red), 1 (green) or 2 (blue)
    pub fn colorant(&self, channel: usize) -> Option<Xyz> {
        let sig = [
            TagSignature::RED_COLORANT,
            TagSignature::GREEN_COLORANT,
            TagSignature::BLUE_COLORANT,
        ];
        self.tag(*sig.get(channel)?).and_then(TagData::as_xyz)
    }

    /// Tone reproduction curve for channel 0 (red), 1 (green) or 2 (blue)
    pub fn trc(&self, channel: usize) -> Option<&CurveData> {
        let sig = [TagSignature::RED_TRC, TagSignature::GREEN_TRC, TagSignature::BLUE_TRC];
        self.tag(*sig.get(channel)?).and_then(TagData::as_curve)
    }

    /// Media white point
    ///
    /// A missing tag, or any v2 display profile, reports D50.
    pub fn media_white_point(&self) -> Xyz {
        if self.header.version.major < 4 && self.header.device_class == ProfileClass::Display {
            return D50;
        }
        self.tag(TagSignature::MEDIA_WHITE)
            .and_then(TagData::as_xyz)
            .unwrap_or(D50)
    }

    pub fn media_black_point(&self) -> Option<Xyz> {
        self.tag(TagSignature::MEDIA_BLACK).and_then(TagData::as_xyz)
    }

    pub fn vcgt(&self) -> Option<&VcgtData> {
        self.tag(TagSignature::VCGT).and_then(TagData::as_vcgt)
    }

    /// Device → PCS LUT for an ICC intent number (0..=3), falling back to A2B0
    pub fn a2b(&self, icc_intent: u32) -> Option<&LutData> {
        let sig = match icc_intent {
            1 | 3 => TagSignature::A2B1,
            2 => TagSignature::A2B2,
            _ => TagSignature::A2B0,
        };
        self.tag(sig)
            .and_then(TagData::as_lut)
            .or_else(|| self.tag(TagSignature::A2B0).and_then(TagData::as_lut))
    }

    /// PCS → device LUT for an ICC intent number, falling back to B2A0
    pub fn b2a(&self, icc_intent: u32) -> Option<&LutData> {
        let sig = match icc_intent {
            1 | 3 => TagSignature::B2A1,
            2 => TagSignature::B2A2,
            _ => TagSignature::B2A0,
        };
        self.tag(sig)
            .and_then(TagData::as_lut)
            .or_else(|| self.tag(TagSignature::B2A0).and_then(TagData::as_lut))
    }

    /// Has colorants and TRCs for all three channels
    pub fn is_matrix_shaper(&self) -> bool {
        (0..3).all(|ch| self.colorant(ch).is_some() && self.trc(ch).is_some())
    }
}
