//! Numeric building blocks for the transform engine
//!
//! - 3x3 matrices for RGB↔XYZ conversions and stage merging
//! - Parametric tone curve evaluation and analytic inversion
//! - Bradford chromatic adaptation and primaries → XYZ matrices
//! - Interpolation for CLUTs and 3D LUTs
//! - The shared tolerant float comparator

pub mod chromatic_adaptation;
pub mod float;
pub mod gamma;
pub mod interpolation;
pub mod matrix;

pub use chromatic_adaptation::{adaptation_matrix, rgb_to_xyz_matrix};
pub use float::float_eq;
pub use gamma::{ParametricCurve, ParametricCurveType};
pub use matrix::Matrix3x3;
