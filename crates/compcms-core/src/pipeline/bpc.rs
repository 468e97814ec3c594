//! Black point compensation
//!
//! Scales relative PCS XYZ so the source black point lands on the
//! destination black point while the D50 white stays fixed. The result is a
//! diagonal matrix with an offset, inserted between the input and output
//! profile stages.

use crate::color::{D50, Xyz};
use crate::math::Matrix3x3;
use crate::pipeline::stages::Stage;

/// Per-component scale and offset in XYZ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpcParams {
    pub scale: [f64; 3],
    pub offset: [f64; 3],
}

impl BpcParams {
    /// Parameters mapping `src_bp` to `dst_bp`, or `None` when a source
    /// black component coincides with white
    pub fn calculate(src_bp: Xyz, dst_bp: Xyz) -> Option<Self> {
        let wp = D50.to_array();
        let src = src_bp.to_array();
        let dst = dst_bp.to_array();

        let mut scale = [1.0; 3];
        let mut offset = [0.0; 3];
        for i in 0..3 {
            let t = src[i] - wp[i];
            if t.abs() < 1e-10 {
                return None;
            }
            scale[i] = (dst[i] - wp[i]) / t;
            offset[i] = -wp[i] * (dst[i] - src[i]) / t;
        }

        Some(Self { scale, offset })
    }

    #[inline]
    pub fn apply(&self, xyz: [f64; 3]) -> [f64; 3] {
        [
            self.offset[0] + xyz[0] * self.scale[0],
            self.offset[1] + xyz[1] * self.scale[1],
            self.offset[2] + xyz[2] * self.scale[2],
        ]
    }

    pub fn to_stage(&self) -> Stage {
        Stage::Matrix {
            m: Matrix3x3::diagonal(self.scale[0], self.scale[1], self.scale[2]),
            offset: self.offset,
        }
    }
}
