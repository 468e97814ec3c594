//! ICC profile reading
//!
//! Covers the subset needed to build display transforms: header, tag
//! table, `XYZ `, `curv`, `para`, `mft1`, `mft2`, `desc`/`mluc` and `vcgt`.
//! `mAB `/`mBA ` tags are left undecoded.

pub mod header;
pub mod tags;

mod error;
mod parser;
mod types;

pub use error::IccError;
pub use header::{ColorSpace, IccHeader, ProfileClass, ProfileVersion};
pub use parser::IccProfile;
pub use tags::{CurveData, LutData, TagData, VcgtChannel, VcgtData};
pub use types::{S15Fixed16, TagSignature, XyzNumber};

#[cfg(test)]
pub(crate) use parser::testing;
