//! Parametric profile builder
//!
//! Clients describe a parametric profile one group of parameters at a time.
//! Each group can be set once. Errors accumulate instead of failing fast:
//! the first error code is kept and every message is joined with a newline,
//! so a client sees all problems with its description at once.

use std::fmt;
use std::rc::Rc;

use crate::color::ColorGamut;
use crate::config::ColorManagerConfig;
use crate::manager::ColorManager;
use crate::profile::{ColorProfile, ColorProfileParams, UNSET};
use crate::properties::{ColorFeature, NamedPrimaries, TransferFunction};

const GROUP_PRIMARIES: u32 = 0x01;
const GROUP_TF: u32 = 0x02;
const GROUP_TARGET_PRIMARIES: u32 = 0x04;
const GROUP_LUMINANCE: u32 = 0x08;
const GROUP_MAXCLL: u32 = 0x10;
const GROUP_MAXFALL: u32 = 0x20;

/// What a color manager lets clients ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Bits of [`ColorFeature::bit`]
    pub features: u32,
    /// Bits of [`NamedPrimaries::bit`]
    pub primaries_named: u32,
    /// Bits of [`TransferFunction::bit`]
    pub tf_named: u32,
}

impl Capabilities {
    pub const NONE: Self = Self {
        features: 0,
        primaries_named: 0,
        tf_named: 0,
    };

    /// Features from `config`, every named primaries set and every named
    /// transfer function without parameters
    pub fn from_config(config: &ColorManagerConfig) -> Self {
        Self {
            features: config.features_mask(),
            primaries_named: NamedPrimaries::ALL.iter().fold(0, |m, p| m | p.bit()),
            tf_named: TransferFunction::ALL
                .iter()
                .filter(|tf| !tf.has_parameters())
                .fold(0, |m, tf| m | tf.bit()),
        }
    }

    pub fn supports(&self, feature: ColorFeature) -> bool {
        self.features & feature.bit() != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderErrorCode {
    InvalidPrimaries,
    InvalidTf,
    InvalidTargetPrimaries,
    InvalidLuminance,
    AlreadySet,
    IncompleteSet,
    InconsistentSet,
    CieXyOutOfRange,
    InconsistentLuminances,
    Unsupported,
}

/// First error code and every message recorded, newline separated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BuilderError {
    pub code: BuilderErrorCode,
    pub message: String,
}

/// Accumulates parameters for one parametric profile
pub struct ProfileParamsBuilder {
    caps: Capabilities,
    params: ColorProfileParams,
    group_mask: u32,
    error: Option<BuilderError>,
}

impl fmt::Debug for ProfileParamsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileParamsBuilder")
            .field("group_mask", &format_args!("{:#04x}", self.group_mask))
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl ProfileParamsBuilder {
    pub fn new(caps: Capabilities) -> Self {
        let mut params: ColorProfileParams = bytemuck::Zeroable::zeroed();
        params.min_luminance = UNSET;
        params.max_luminance = UNSET;
        params.max_cll = UNSET;
        params.max_fall = UNSET;

        Self {
            caps,
            params,
            group_mask: 0,
            error: None,
        }
    }

    /// The errors recorded so far
    pub fn get_error(&self) -> Option<&BuilderError> {
        self.error.as_ref()
    }

    fn store_error(&mut self, code: BuilderErrorCode, message: String) {
        match &mut self.error {
            Some(err) => {
                err.message.push('\n');
                err.message.push_str(&message);
            }
            None => self.error = Some(BuilderError { code, message }),
        }
    }

    /// Record `AlreadySet` when `group` was set before
    fn check_unset(&mut self, group: u32, what: &str) -> bool {
        if self.group_mask & group == 0 {
            return true;
        }
        self.store_error(BuilderErrorCode::AlreadySet, format!("{} already set", what));
        false
    }

    pub fn set_primaries(&mut self, primaries: &ColorGamut) -> bool {
        let mut ok = true;
        if !self.caps.supports(ColorFeature::SetPrimaries) {
            self.store_error(
                BuilderErrorCode::InvalidPrimaries,
                "set_primaries not supported by the color manager".to_string(),
            );
            ok = false;
        }
        ok &= self.check_unset(GROUP_PRIMARIES, "primaries were");
        if !ok {
            return false;
        }

        self.params.set_gamut(primaries);
        self.params.set_named_primaries(None);
        self.group_mask |= GROUP_PRIMARIES;
        true
    }

    pub fn set_primaries_named(&mut self, primaries: NamedPrimaries) -> bool {
        let mut ok = true;
        if self.caps.primaries_named & primaries.bit() == 0 {
            self.store_error(
                BuilderErrorCode::InvalidPrimaries,
                format!("named primaries {} not supported by the color manager", primaries as u32),
            );
            ok = false;
        }
        ok &= self.check_unset(GROUP_PRIMARIES, "primaries were");
        if !ok {
            return false;
        }

        self.params.set_gamut(&primaries.gamut());
        self.params.set_named_primaries(Some(primaries));
        self.group_mask |= GROUP_PRIMARIES;
        true
    }

    /// Set a transfer function that takes no parameters
    pub fn set_tf_named(&mut self, tf: TransferFunction) -> bool {
        let mut ok = true;
        if self.caps.tf_named & tf.bit() == 0 || tf.has_parameters() {
            self.store_error(
                BuilderErrorCode::InvalidTf,
                format!("named tf {} not supported by the color manager", tf as u32),
            );
            ok = false;
        }
        ok &= self.check_unset(GROUP_TF, "tf was");
        if !ok {
            return false;
        }

        self.params.set_tf(tf);
        self.group_mask |= GROUP_TF;
        true
    }

    /// Pure power-law transfer function with an exponent in [1.0, 10.0]
    pub fn set_tf_power_exponent(&mut self, exponent: f32) -> bool {
        let mut ok = true;
        if !self.caps.supports(ColorFeature::SetTfPower) {
            self.store_error(
                BuilderErrorCode::InvalidTf,
                "set_tf_power not supported by the color manager".to_string(),
            );
            ok = false;
        }
        ok &= self.check_unset(GROUP_TF, "tf was");
        if !(1.0..=10.0).contains(&exponent) {
            self.store_error(
                BuilderErrorCode::InvalidTf,
                format!("tf power exponent {:.6} is not in the range [1.0, 10.0]", exponent),
            );
            ok = false;
        }
        if !ok {
            return false;
        }

        self.params.set_tf(TransferFunction::Power);
        self.params.tf_params[0] = exponent;
        self.group_mask |= GROUP_TF;
        true
    }

    /// Mastering display primaries
    pub fn set_target_primaries(&mut self, primaries: &ColorGamut) -> bool {
        let mut ok = true;
        if !self.caps.supports(ColorFeature::SetMasteringDisplayPrimaries) {
            self.store_error(
                BuilderErrorCode::InvalidTargetPrimaries,
                "set_mastering_display_primaries not supported by the color manager".to_string(),
            );
            ok = false;
        }
        ok &= self.check_unset(GROUP_TARGET_PRIMARIES, "target primaries were");
        if !ok {
            return false;
        }

        self.params.set_target_gamut(primaries);
        self.group_mask |= GROUP_TARGET_PRIMARIES;
        true
    }

    /// Mastering display luminance range in cd/m²
    pub fn set_target_luminance(&mut self, min: f32, max: f32) -> bool {
        let mut ok = self.check_unset(GROUP_LUMINANCE, "target luminance was");
        if min >= max {
            self.store_error(
                BuilderErrorCode::InvalidLuminance,
                format!("min luminance {:.6} shouldn't be greater than or equal to max {:.6}", min, max),
            );
            ok = false;
        }
        if !ok {
            return false;
        }

        self.params.min_luminance = min;
        self.params.max_luminance = max;
        self.group_mask |= GROUP_LUMINANCE;
        true
    }

    /// Maximum content light level in cd/m²
    pub fn set_max_cll(&mut self, max_cll: f32) -> bool {
        if !self.check_unset(GROUP_MAXCLL, "max cll was") {
            return false;
        }
        self.params.max_cll = max_cll;
        self.group_mask |= GROUP_MAXCLL;
        true
    }

    /// Maximum frame-average light level in cd/m²
    pub fn set_max_fall(&mut self, max_fall: f32) -> bool {
        if !self.check_unset(GROUP_MAXFALL, "max fall was") {
            return false;
        }
        self.params.max_fall = max_fall;
        self.group_mask |= GROUP_MAXFALL;
        true
    }

    /// Validate the accumulated parameters and get the matching profile
    /// from `cm`, creating it if needed
    pub fn create_color_profile(
        mut self,
        cm: &dyn ColorManager,
        name_part: &str,
    ) -> Result<Rc<ColorProfile>, BuilderError> {
        self.complete_params();
        self.validate_params_set();
        self.validate_params();

        if let Some(err) = self.error {
            return Err(err);
        }

        cm.get_color_profile_from_params(&self.params, name_part).map_err(|e| BuilderError {
            code: BuilderErrorCode::Unsupported,
            message: e.to_string(),
        })
    }

    fn complete_params(&mut self) {
        if self.group_mask & GROUP_TARGET_PRIMARIES == 0 {
            self.params.target_primaries = self.params.primaries;
        }
        if self.group_mask & GROUP_LUMINANCE == 0 {
            self.params.min_luminance = UNSET;
            self.params.max_luminance = UNSET;
        }
        if self.group_mask & GROUP_MAXCLL == 0 {
            self.params.max_cll = UNSET;
        }
        if self.group_mask & GROUP_MAXFALL == 0 {
            self.params.max_fall = UNSET;
        }
    }

    fn validate_params_set(&mut self) {
        if self.group_mask & GROUP_PRIMARIES == 0 {
            self.store_error(BuilderErrorCode::IncompleteSet, "primaries not set".to_string());
        }
        if self.group_mask & GROUP_TF == 0 {
            self.store_error(BuilderErrorCode::IncompleteSet, "transfer function not set".to_string());
        }

        // An unset transfer function is not PQ either
        let pq = self.group_mask & GROUP_TF != 0 && self.params.tf() == TransferFunction::St2084Pq;
        let luminance_groups = GROUP_LUMINANCE | GROUP_MAXCLL | GROUP_MAXFALL;
        if !pq && self.group_mask & luminance_groups != 0 {
            self.store_error(
                BuilderErrorCode::InconsistentSet,
                "luminance values were given but transfer function is not Rec. ITU-R BT.2100-2 (PQ)".to_string(),
            );
        }
    }

    fn validate_params(&mut self) {
        if self.group_mask & GROUP_PRIMARIES != 0 {
            let gamut = self.params.gamut();
            self.validate_gamut(&gamut, "primaries");
        }
        if self.group_mask & GROUP_TARGET_PRIMARIES != 0 {
            let gamut = self.params.target_gamut();
            self.validate_gamut(&gamut, "target primaries");
        }

        if self.group_mask & GROUP_LUMINANCE == 0 {
            return;
        }
        let (min, max) = (self.params.min_luminance, self.params.max_luminance);
        if self.group_mask & GROUP_MAXCLL != 0 {
            self.validate_light_level("maxCLL", self.params.max_cll, min, max);
        }
        if self.group_mask & GROUP_MAXFALL != 0 {
            self.validate_light_level("maxFALL", self.params.max_fall, min, max);
        }
    }

    fn validate_gamut(&mut self, gamut: &ColorGamut, name: &str) {
        if !gamut.in_legal_range() {
            self.store_error(BuilderErrorCode::CieXyOutOfRange, format!("invalid {}", name));
        } else if !gamut.white_point_inside() {
            self.store_error(
                BuilderErrorCode::CieXyOutOfRange,
                format!("white point out of {} volume", name),
            );
        }
    }

    fn validate_light_level(&mut self, name: &str, level: f32, min: f32, max: f32) {
        if min >= level {
            self.store_error(
                BuilderErrorCode::InconsistentLuminances,
                format!("{} ({:.6}) should be greater or equal to min luminance ({:.6})", name, level, min),
            );
        }
        if max < level {
            self.store_error(
                BuilderErrorCode::InconsistentLuminances,
                format!("{} ({:.6}) should not be greater than max luminance ({:.6})", name, level, max),
            );
        }
    }
}
