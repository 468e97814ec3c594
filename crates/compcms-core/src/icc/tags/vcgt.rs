//! `vcgt` video card gamma table
//!
//! Not part of ICC.1; this is the Apple private tag that display profiles
//! use to carry calibration ramps. Layout after the type signature and
//! reserved bytes:
//!
//! - u32 gamma type: 0 = table, 1 = formula
//! - table: u16 channels, u16 entry count, u16 entry size (1 or 2), data
//! - formula: per channel s15.16 gamma, min, max with
//!   `y = min + (max - min) * x^gamma`

use crate::icc::error::{IccError, corrupted};
use crate::icc::types::{read_s15f16, read_u16, read_u32};

#[derive(Debug, Clone, PartialEq)]
pub enum VcgtChannel {
    /// Uniformly sampled ramp, normalized to [0, 1]
    Table(Vec<f64>),
    Formula { gamma: f64, min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcgtData {
    /// Red, green, blue
    pub channels: [VcgtChannel; 3],
}

impl VcgtData {
    pub fn parse(data: &[u8]) -> Result<Self, IccError> {
        match read_u32(data, 0)? {
            0 => Self::parse_table(data),
            1 => Self::parse_formula(data),
            other => Err(corrupted(format!("unknown vcgt gamma type {}", other))),
        }
    }

    fn parse_table(data: &[u8]) -> Result<Self, IccError> {
        let channels = read_u16(data, 4)? as usize;
        let entries = read_u16(data, 6)? as usize;
        let entry_size = read_u16(data, 8)? as usize;

        if channels != 3 && channels != 1 {
            return Err(corrupted(format!("vcgt table with {} channels", channels)));
        }
        if entries < 2 {
            return Err(corrupted("vcgt table needs at least two entries"));
        }

        let read_entry = |offset: usize| -> Result<f64, IccError> {
            match entry_size {
                1 => data
                    .get(offset)
                    .map(|&b| b as f64 / 255.0)
                    .ok_or_else(|| corrupted("vcgt table truncated")),
                2 => Ok(read_u16(data, offset)? as f64 / 65535.0),
                _ => Err(corrupted(format!("vcgt entry size {}", entry_size))),
            }
        };

        let mut tables = Vec::with_capacity(channels);
        for ch in 0..channels {
            let base = 10 + ch * entries * entry_size;
            let table = (0..entries)
                .map(|i| read_entry(base + i * entry_size))
                .collect::<Result<Vec<_>, _>>()?;
            tables.push(VcgtChannel::Table(table));
        }

        let channels = match tables.as_slice() {
            [r, g, b] => [r.clone(), g.clone(), b.clone()],
            [one] => [one.clone(), one.clone(), one.clone()],
            _ => unreachable!("channel count checked above"),
        };
        Ok(Self { channels })
    }

    fn parse_formula(data: &[u8]) -> Result<Self, IccError> {
        let channel = |ch: usize| -> Result<VcgtChannel, IccError> {
            let base = 4 + ch * 12;
            Ok(VcgtChannel::Formula {
                gamma: read_s15f16(data, base)?,
                min: read_s15f16(data, base + 4)?,
                max: read_s15f16(data, base + 8)?,
            })
        };
        Ok(Self {
            channels: [channel(0)?, channel(1)?, channel(2)?],
        })
    }
}
