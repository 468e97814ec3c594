//! Colorimetric value types
//!
//! - CIE XYZ tristimulus values
//! - CIELAB, as carried in the ICC Lab PCS
//! - Standard white points
//! - Chromaticity gamuts with their validity checks

pub mod gamut;
pub mod lab;
pub mod white_point;
pub mod xyz;

pub use gamut::{Chromaticity, ColorGamut};
pub use lab::Lab;
pub use white_point::{D50, D65};
pub use xyz::Xyz;
