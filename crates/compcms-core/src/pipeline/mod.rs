//! Numeric transform pipelines
//!
//! A transform is first built as a chain of [`Stage`]s from the profiles
//! involved, then simplified by the [`optimizer`], and finally either
//! translated into the renderer's three-step form or sampled into a 3D LUT.
//!
//! - [`chain`]: stage lists per transform category and rendering intent
//! - [`optimizer`]: stage merging and elimination, shape classification
//! - [`lut`]: CLUT evaluation for LUT-based ICC profiles
//! - [`bpc`]: black point compensation

pub mod bpc;
pub mod chain;
pub mod lut;
pub mod optimizer;
mod stages;

pub use chain::build_chain;
pub use lut::LutPipeline;
pub use optimizer::{Optimized, PipelineShape, classify, optimize};
pub use stages::{Stage, describe_stages, eval_stages};
