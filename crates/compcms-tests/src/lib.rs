//! # compcms-tests
//!
//! Cross-CMS checks for compcms.
//!
//! Transforms built by compcms are evaluated on float pixels and compared
//! against lcms2 and moxcms on the same profiles. The test targets in
//! `tests/` cover:
//!
//! - parity with lcms2 (ICC ingestion, parametric curves)
//! - parity with moxcms (sRGB → Display P3)
//! - optimizer properties on seeded random pipelines
//! - the transform cache and output outcomes
//! - the parametric profile builder
//! - curve translation into closed-form renderer curves

pub mod accuracy;
pub mod patterns;
pub mod reference;

pub use accuracy::{DiffStats, compare_pixels, delta_e_2000};
pub use patterns::{TestPattern, generate_pattern};

use compcms_core::ColorTransform;

/// Run `pixels` through `xform` and return the result
pub fn apply(xform: &ColorTransform, pixels: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let mut out = pixels.to_vec();
    xform.apply(&mut out);
    out
}
