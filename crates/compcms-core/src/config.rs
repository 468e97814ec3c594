//! Color manager configuration and logging setup
//!
//! Configuration is parsed from an in-memory JSON string; reading it from
//! disk is up to the embedding compositor.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::properties::{ColorFeature, RenderIntent};

/// Samples per channel for sampled 1D curves
pub const REASONABLE_1D_POINTS: usize = 1024;

/// Samples per axis for 3D LUTs
pub const REASONABLE_3D_POINTS: usize = 33;

/// Largest ICC profile accepted
pub const MAX_ICC_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorManagerConfig {
    pub supported_features: Vec<ColorFeature>,
    pub supported_rendering_intents: Vec<RenderIntent>,
    /// Sample count for sampled 1D curves
    pub lut_1d_points: usize,
    /// Samples per axis of the 3D LUT fallback
    pub lut_3d_points: usize,
    pub max_icc_size: usize,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"compcms=debug"`
    pub log_filter: String,
}

impl Default for ColorManagerConfig {
    fn default() -> Self {
        Self {
            supported_features: ColorFeature::ALL.to_vec(),
            supported_rendering_intents: RenderIntent::ALL.to_vec(),
            lut_1d_points: REASONABLE_1D_POINTS,
            lut_3d_points: REASONABLE_3D_POINTS,
            max_icc_size: MAX_ICC_SIZE,
            log_filter: "info".to_string(),
        }
    }
}

impl ColorManagerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.lut_1d_points < 2 || config.lut_3d_points < 2 {
            return Err(Error::Construction(format!(
                "LUT sizes must be at least 2, got {} and {}",
                config.lut_1d_points, config.lut_3d_points
            )));
        }
        Ok(config)
    }

    pub fn features_mask(&self) -> u32 {
        self.supported_features.iter().fold(0, |mask, f| mask | f.bit())
    }

    pub fn intents_mask(&self) -> u32 {
        self.supported_rendering_intents
            .iter()
            .fold(0, |mask, i| mask | i.bit())
    }
}

/// Install a global `tracing` subscriber filtered by `level`.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
