//! `mft1` / `mft2` LUT payloads (ICC.1:2022 10.10 and 10.11)
//!
//! Both decode into [`LutData`] with every table normalized to [0, 1]:
//! matrix, per-channel input tables, CLUT, per-channel output tables.
//! The matrix only applies when the input is XYZ.

use crate::icc::error::{IccError, corrupted};
use crate::icc::types::{read_s15f16, read_u16};

#[derive(Debug, Clone, PartialEq)]
pub struct LutData {
    pub input_channels: usize,
    pub output_channels: usize,
    pub grid_points: usize,
    /// Row-major
    pub matrix: [[f64; 3]; 3],
    pub input_tables: Vec<Vec<f64>>,
    /// First input channel varies slowest
    pub clut: Vec<f64>,
    pub output_tables: Vec<Vec<f64>>,
    /// 16-bit tables, which use the legacy Lab PCS encoding
    pub is_16bit: bool,
}

impl LutData {
    /// Parse an `mft1` payload (after type signature and reserved bytes)
    pub fn parse_lut8(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < 40 {
            return Err(corrupted("Lut8 tag too small"));
        }
        let (input_channels, output_channels, grid_points) = channel_counts(data)?;
        let matrix = parse_matrix(data)?;

        let mut reader = TableReader::new(data, 40, 1);
        let input_tables = reader.tables(input_channels, 256, "Lut8 input tables")?;
        let clut = reader.values(clut_len(grid_points, input_channels, output_channels), "Lut8 CLUT")?;
        let output_tables = reader.tables(output_channels, 256, "Lut8 output tables")?;

        Ok(Self {
            input_channels,
            output_channels,
            grid_points,
            matrix,
            input_tables,
            clut,
            output_tables,
            is_16bit: false,
        })
    }

    /// Parse an `mft2` payload
    pub fn parse_lut16(data: &[u8]) -> Result<Self, IccError> {
        if data.len() < 44 {
            return Err(corrupted("Lut16 tag too small"));
        }
        let (input_channels, output_channels, grid_points) = channel_counts(data)?;
        let matrix = parse_matrix(data)?;
        let input_entries = read_u16(data, 40)? as usize;
        let output_entries = read_u16(data, 42)? as usize;
        if input_entries < 2 || output_entries < 2 {
            return Err(corrupted("Lut16 tables need at least two entries"));
        }

        let mut reader = TableReader::new(data, 44, 2);
        let input_tables = reader.tables(input_channels, input_entries, "Lut16 input tables")?;
        let clut = reader.values(clut_len(grid_points, input_channels, output_channels), "Lut16 CLUT")?;
        let output_tables = reader.tables(output_channels, output_entries, "Lut16 output tables")?;

        Ok(Self {
            input_channels,
            output_channels,
            grid_points,
            matrix,
            input_tables,
            clut,
            output_tables,
            is_16bit: true,
        })
    }
}

fn channel_counts(data: &[u8]) -> Result<(usize, usize, usize), IccError> {
    let (input, output, grid) = (data[0] as usize, data[1] as usize, data[2] as usize);
    if input == 0 || output == 0 {
        return Err(corrupted("LUT without channels"));
    }
    if grid < 2 {
        return Err(corrupted(format!("LUT grid of {} points", grid)));
    }
    Ok((input, output, grid))
}

fn parse_matrix(data: &[u8]) -> Result<[[f64; 3]; 3], IccError> {
    let mut matrix = [[0.0; 3]; 3];
    for (row, values) in matrix.iter_mut().enumerate() {
        for (col, v) in values.iter_mut().enumerate() {
            *v = read_s15f16(data, 4 + (row * 3 + col) * 4)?;
        }
    }
    Ok(matrix)
}

fn clut_len(grid_points: usize, input_channels: usize, output_channels: usize) -> usize {
    grid_points.pow(input_channels as u32) * output_channels
}

/// Sequential reader over 8- or 16-bit big-endian table data
struct TableReader<'a> {
    data: &'a [u8],
    pos: usize,
    width: usize,
}

impl<'a> TableReader<'a> {
    fn new(data: &'a [u8], pos: usize, width: usize) -> Self {
        Self { data, pos, width }
    }

    fn values(&mut self, count: usize, what: &str) -> Result<Vec<f64>, IccError> {
        let end = self.pos + count * self.width;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| corrupted(format!("{} truncated", what)))?;
        self.pos = end;

        let values = if self.width == 1 {
            bytes.iter().map(|&b| b as f64 / 255.0).collect()
        } else {
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]) as f64 / 65535.0)
                .collect()
        };
        Ok(values)
    }

    fn tables(&mut self, channels: usize, entries: usize, what: &str) -> Result<Vec<Vec<f64>>, IccError> {
        (0..channels).map(|_| self.values(entries, what)).collect()
    }
}
