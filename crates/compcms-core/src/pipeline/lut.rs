//! LUT-based profile stages
//!
//! Evaluates the `mft1` / `mft2` tags of LUT-based display profiles:
//! optional matrix → input tables → CLUT → output tables. Only the
//! three-in, three-out case is used; a display profile maps RGB to PCS
//! and back.

use crate::error::{Error, Result};
use crate::icc::LutData;
use crate::math::interpolation::{clut_interp, lut1d_interp};
use crate::math::Matrix3x3;

/// A normalized 3-in, 3-out LUT pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct LutPipeline {
    /// Applied first, only when the input is PCS XYZ
    matrix: Option<Matrix3x3>,
    input_tables: Vec<Vec<f64>>,
    grid_points: usize,
    clut: Vec<f64>,
    output_tables: Vec<Vec<f64>>,
}

impl LutPipeline {
    /// Build from a parsed LUT tag
    ///
    /// `xyz_input` is true for B2A tags of XYZ-PCS profiles, the only case
    /// where the tag's matrix applies.
    pub fn new(lut: &LutData, xyz_input: bool) -> Result<Self> {
        if lut.input_channels != 3 || lut.output_channels != 3 {
            return Err(Error::Construction(format!(
                "LUT tag has {} inputs and {} outputs, need 3 and 3",
                lut.input_channels, lut.output_channels
            )));
        }
        if lut.grid_points < 2 {
            return Err(Error::Construction("LUT tag CLUT has fewer than 2 grid points".into()));
        }

        let matrix = Matrix3x3::new(lut.matrix);
        let matrix = (xyz_input && !matrix.is_identity()).then_some(matrix);

        Ok(Self {
            matrix,
            input_tables: lut.input_tables.clone(),
            grid_points: lut.grid_points,
            clut: lut.clut.clone(),
            output_tables: lut.output_tables.clone(),
        })
    }

    pub fn grid_points(&self) -> usize {
        self.grid_points
    }

    /// Evaluate one value; input and output are normalized encodings
    pub fn eval(&self, input: [f64; 3]) -> [f64; 3] {
        let mut v = match &self.matrix {
            Some(m) => m.multiply_vec(input),
            None => input,
        };

        for (x, table) in v.iter_mut().zip(&self.input_tables) {
            *x = lut1d_interp(table, *x);
        }

        let mapped = clut_interp(&self.clut, self.grid_points, 3, v);

        let mut out = [0.0; 3];
        for (ch, o) in out.iter_mut().enumerate() {
            let value = mapped.get(ch).copied().unwrap_or(0.0);
            *o = match self.output_tables.get(ch) {
                Some(table) => lut1d_interp(table, value),
                None => value,
            };
        }
        out
    }
}
