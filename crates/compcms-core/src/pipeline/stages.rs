//! Pipeline stages
//!
//! A transform chain is a list of stages, each mapping three channels to
//! three channels. Matrix and curve set stages are what the optimizer
//! understands; the rest only ever end up in a 3D LUT.

use std::fmt;
use std::rc::Rc;

use crate::color::{Lab, Xyz};
use crate::curve::ToneCurve;
use crate::math::Matrix3x3;
use crate::pipeline::lut::LutPipeline;

#[derive(Debug, Clone)]
pub enum Stage {
    /// `out = m × in + offset`
    Matrix { m: Matrix3x3, offset: [f64; 3] },
    /// One curve per channel
    CurveSet(Box<[ToneCurve; 3]>),
    Clut(Rc<LutPipeline>),
    /// Normalized Lab PCS encoding → XYZ
    LabToXyz { legacy: bool },
    /// XYZ → normalized Lab PCS encoding
    XyzToLab { legacy: bool },
}

impl Stage {
    pub fn matrix(m: Matrix3x3) -> Self {
        Self::Matrix {
            m,
            offset: [0.0; 3],
        }
    }

    pub fn curves(curves: [ToneCurve; 3]) -> Self {
        Self::CurveSet(Box::new(curves))
    }

    /// A matrix stage whose offset is exactly zero
    pub fn as_linear_matrix(&self) -> Option<&Matrix3x3> {
        match self {
            Self::Matrix { m, offset } if offset.iter().all(|&o| o == 0.0) => Some(m),
            _ => None,
        }
    }

    pub fn as_curve_set(&self) -> Option<&[ToneCurve; 3]> {
        match self {
            Self::CurveSet(curves) => Some(&**curves),
            _ => None,
        }
    }

    pub fn eval(&self, v: [f64; 3]) -> [f64; 3] {
        match self {
            Self::Matrix { m, offset } => {
                let r = m.multiply_vec(v);
                [r[0] + offset[0], r[1] + offset[1], r[2] + offset[2]]
            }
            Self::CurveSet(curves) => [curves[0].eval(v[0]), curves[1].eval(v[1]), curves[2].eval(v[2])],
            Self::Clut(lut) => lut.eval(v),
            Self::LabToXyz { legacy } => Lab::from_encoded(v, *legacy).to_xyz().to_array(),
            Self::XyzToLab { legacy } => Lab::from_xyz(Xyz::from_array(v)).to_encoded(*legacy),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matrix { offset, .. } if offset.iter().any(|&o| o != 0.0) => write!(f, "Matrix+offset"),
            Self::Matrix { .. } => write!(f, "Matrix"),
            Self::CurveSet(_) => write!(f, "CurveSet"),
            Self::Clut(_) => write!(f, "CLut"),
            Self::LabToXyz { .. } => write!(f, "Lab2XYZ"),
            Self::XyzToLab { .. } => write!(f, "XYZ2Lab"),
        }
    }
}

/// Run a value through every stage in order
pub fn eval_stages(stages: &[Stage], v: [f64; 3]) -> [f64; 3] {
    stages.iter().fold(v, |acc, stage| stage.eval(acc))
}

/// Stage names joined with `", "`, for logging
pub fn describe_stages(stages: &[Stage]) -> String {
    let names: Vec<String> = stages.iter().map(|s| s.to_string()).collect();
    names.join(", ")
}
