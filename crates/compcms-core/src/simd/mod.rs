//! Batch kernels for realizing and applying color transforms
//!
//! The loops are compiled for several instruction sets with `multiversion`
//! and dispatched at runtime; the scalar version is always available.
//!
//! Supported instruction sets:
//! - x86-64: SSE4.1, AVX2
//! - ARM64: NEON

mod batch;
mod curves;
mod matrix;

pub use batch::{clamp_unit_batch, ensure_unorm, ensure_unorm_batch};
pub use curves::{apply_linpow_batch, apply_powlin_batch, linpow, powlin};
pub use matrix::apply_column_major_batch;
