//! # compcms - color transform engine for compositors
//!
//! Turns pairs of color profiles into the three-step transforms a
//! compositor's renderer applies to surface pixels:
//!
//! ```text
//! pre curve → 3x3 matrix or 3D LUT → post curve
//! ```
//!
//! ## Features
//!
//! - **Profiles**: ICC v2/v4 display profiles (matrix-shaper and LUT) and
//!   parametric profiles (named or custom primaries plus a transfer
//!   function), de-duplicated by content
//! - **Optimizer**: adjacent matrices are merged, inverse curves cancel,
//!   identities disappear
//! - **Closed-form curves**: pure power and sRGB-like curves become LINPOW
//!   or POWLIN parameters instead of sampled tables
//! - **Cache**: one live transform per (category, input, output, intent)
//!
//! ## Quick Start
//!
//! ```no_run
//! use compcms_core::{ColorManager, ColorManagerConfig, IccColorManager, Output, Surface};
//!
//! let cm = IccColorManager::new(ColorManagerConfig::default())?;
//!
//! let icc_bytes: Vec<u8> = std::fs::read("display.icc")?;
//! let output = Output {
//!     color_profile: Some(cm.get_color_profile_from_icc(&icc_bytes, "DP-1")?),
//!     ..Output::new("DP-1")
//! };
//!
//! let outcome = cm.create_output_color_outcome(&output)?;
//! let surface = cm.get_surface_color_transform(&Surface::default(), &output)?;
//!
//! if let Some(xform) = surface.transform {
//!     let mut pixels = [[0.5f32, 0.25, 0.75]];
//!     xform.apply(&mut pixels);
//! }
//! # drop(outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod color;
pub mod config;
pub mod curve;
pub mod error;
pub mod icc;
pub mod id_alloc;
pub mod manager;
pub mod math;
pub mod pipeline;
pub mod profile;
pub mod properties;
pub mod simd;
pub mod transform;

pub use config::{ColorManagerConfig, MAX_ICC_SIZE, REASONABLE_1D_POINTS, REASONABLE_3D_POINTS, init_logging};
pub use error::{Error, Result};
pub use manager::{
    ColorCharacteristics, ColorManager, EotfMode, HdrMetadataType1, IccColorManager, NoopColorManager, Output,
    OutputColorOutcome, Surface, SurfaceColorTransform,
};
pub use math::matrix::MATRIX_PRECISION_BITS;
pub use profile::{
    BuilderError, BuilderErrorCode, Capabilities, ColorProfile, ColorProfileParams, ProfileParamsBuilder,
    ProfileStore,
};
pub use properties::{ColorFeature, NamedPrimaries, RenderIntent, TransferFunction};
pub use transform::{
    ColorCurve, ColorMapping, ColorTransform, SearchKey, TransformCache, TransformCategory,
};

/// Version of compcms
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
