//! Color managers
//!
//! A [`ColorManager`] is the compositor's single entry point: it owns the
//! profile store and the transform cache, hands out profiles, answers
//! surface transform queries and computes everything an output needs.
//!
//! [`IccColorManager`] does real color management. [`NoopColorManager`]
//! only knows the stock sRGB profile and treats every transform as
//! identity.

use std::fmt;
use std::rc::Rc;

use tracing::{error, warn};

use crate::color::Chromaticity;
use crate::config::ColorManagerConfig;
use crate::error::{Error, Result};
use crate::profile::{Capabilities, ColorProfile, ColorProfileParams, ProfileParamsBuilder, ProfileStore};
use crate::properties::{ColorFeature, RenderIntent};
use crate::transform::{ColorTransform, SearchKey, TransformCache, TransformCategory};

/// How an output encodes its signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EotfMode {
    #[default]
    Sdr,
    TraditionalHdr,
    St2084,
    Hlg,
}

impl EotfMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sdr => "SDR",
            Self::TraditionalHdr => "traditional gamma HDR",
            Self::St2084 => "ST2084",
            Self::Hlg => "HLG",
        }
    }
}

impl fmt::Display for EotfMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display characteristics configured for an output; unset fields are
/// unknown
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorCharacteristics {
    pub primaries: Option<[Chromaticity; 3]>,
    pub white: Option<Chromaticity>,
    /// Peak luminance in cd/m²
    pub max_luminance: Option<f32>,
    pub min_luminance: Option<f32>,
    pub max_fall: Option<f32>,
}

/// What a color manager needs to know about an output
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub name: String,
    /// `None` means stock sRGB
    pub color_profile: Option<Rc<ColorProfile>>,
    pub eotf_mode: EotfMode,
    pub characteristics: ColorCharacteristics,
}

impl Output {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// What a color manager needs to know about a surface
#[derive(Debug, Clone, Default)]
pub struct Surface {
    /// `None` means stock sRGB
    pub color_profile: Option<Rc<ColorProfile>>,
    /// `None` lets the color manager choose
    pub render_intent: Option<RenderIntent>,
}

pub const HDR_GROUP_PRIMARIES: u32 = 0x01;
pub const HDR_GROUP_WHITE: u32 = 0x02;
pub const HDR_GROUP_MAXDML: u32 = 0x04;
pub const HDR_GROUP_MINDML: u32 = 0x08;
pub const HDR_GROUP_MAXCLL: u32 = 0x10;
pub const HDR_GROUP_MAXFALL: u32 = 0x20;

/// HDR static metadata type 1, sent in ST2084 mode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HdrMetadataType1 {
    /// `HDR_GROUP_*` bits of the valid fields
    pub group_mask: u32,
    pub primary: [Chromaticity; 3],
    pub white: Chromaticity,
    /// Maximum display mastering luminance, 1 - 65535 cd/m²
    pub max_dml: f32,
    /// Minimum display mastering luminance, 0.0001 - 6.5535 cd/m²
    pub min_dml: f32,
    /// Maximum content light level, 1 - 65535 cd/m²
    pub max_cll: f32,
    /// Maximum frame-average light level, 1 - 65535 cd/m²
    pub max_fall: f32,
}

/// Everything an output needs for compositing; `None` transforms are
/// identity
#[derive(Debug, Clone, Default)]
pub struct OutputColorOutcome {
    pub from_srgb_to_output: Option<Rc<ColorTransform>>,
    pub from_srgb_to_blend: Option<Rc<ColorTransform>>,
    pub from_blend_to_output: Option<Rc<ColorTransform>>,
    pub hdr_meta: HdrMetadataType1,
}

/// Surface to blending space transform
#[derive(Debug, Clone, Default)]
pub struct SurfaceColorTransform {
    /// `None` is identity
    pub transform: Option<Rc<ColorTransform>>,
    /// Source and output color spaces are the same
    pub identity_pipeline: bool,
}

pub trait ColorManager {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Bits of [`RenderIntent::bit`]
    fn supported_rendering_intents(&self) -> u32;

    fn stock_srgb_profile(&self) -> Rc<ColorProfile>;

    fn get_color_profile_from_icc(&self, data: &[u8], name_part: &str) -> Result<Rc<ColorProfile>>;

    fn get_color_profile_from_params(&self, params: &ColorProfileParams, name_part: &str) -> Result<Rc<ColorProfile>>;

    fn get_surface_color_transform(&self, surface: &Surface, output: &Output) -> Result<SurfaceColorTransform>;

    fn create_output_color_outcome(&self, output: &Output) -> Result<OutputColorOutcome>;

    /// A builder limited to what this manager supports
    fn profile_builder(&self) -> ProfileParamsBuilder {
        ProfileParamsBuilder::new(self.capabilities())
    }
}

/// Color management backed by ICC and parametric profiles
#[derive(Debug)]
pub struct IccColorManager {
    config: ColorManagerConfig,
    transforms: TransformCache,
    stock_srgb: Rc<ColorProfile>,
    store: ProfileStore,
}

impl IccColorManager {
    pub fn new(config: ColorManagerConfig) -> Result<Self> {
        let store = ProfileStore::new(&config);
        let stock_srgb = store.create_stock_srgb()?;
        Ok(Self {
            transforms: TransformCache::new(&config),
            stock_srgb,
            store,
            config,
        })
    }

    pub fn config(&self) -> &ColorManagerConfig {
        &self.config
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn transforms(&self) -> &TransformCache {
        &self.transforms
    }

    fn supports(&self, feature: ColorFeature) -> bool {
        self.config.features_mask() & feature.bit() != 0
    }

    fn profile_or_stock(&self, profile: Option<&Rc<ColorProfile>>) -> Rc<ColorProfile> {
        Rc::clone(profile.unwrap_or(&self.stock_srgb))
    }

    fn get(
        &self,
        category: TransformCategory,
        input: Option<Rc<ColorProfile>>,
        output: &Output,
        render_intent: Option<RenderIntent>,
    ) -> Result<Rc<ColorTransform>> {
        self.transforms.get_transform(&SearchKey {
            category,
            input_profile: input,
            output_profile: self.profile_or_stock(output.color_profile.as_ref()),
            render_intent,
        })
    }
}

/// The surface's intent, or perceptual when it has none
fn render_intent_or_default(surface: Option<&Surface>) -> RenderIntent {
    surface
        .and_then(|s| s.render_intent)
        .unwrap_or(RenderIntent::Perceptual)
}

impl ColorManager for IccColorManager {
    fn name(&self) -> &'static str {
        "icc"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::from_config(&self.config)
    }

    fn supported_rendering_intents(&self) -> u32 {
        self.config.intents_mask()
    }

    fn stock_srgb_profile(&self) -> Rc<ColorProfile> {
        Rc::clone(&self.stock_srgb)
    }

    fn get_color_profile_from_icc(&self, data: &[u8], name_part: &str) -> Result<Rc<ColorProfile>> {
        if !self.supports(ColorFeature::Icc) {
            return Err(Error::Unsupported("ICC profiles are unsupported.".to_string()));
        }
        self.store.get_from_icc(data, name_part)
    }

    fn get_color_profile_from_params(&self, params: &ColorProfileParams, name_part: &str) -> Result<Rc<ColorProfile>> {
        if !self.supports(ColorFeature::Parametric) {
            return Err(Error::Unsupported("parametric profiles are unsupported.".to_string()));
        }
        self.store.get_from_params(params, name_part)
    }

    fn get_surface_color_transform(&self, surface: &Surface, output: &Output) -> Result<SurfaceColorTransform> {
        let input = self.profile_or_stock(surface.color_profile.as_ref());
        let output_profile = self.profile_or_stock(output.color_profile.as_ref());
        let identity_pipeline = Rc::ptr_eq(&input, &output_profile);

        let transform = self.get(
            TransformCategory::InputToBlend,
            Some(input),
            output,
            Some(render_intent_or_default(Some(surface))),
        )?;

        Ok(SurfaceColorTransform {
            transform: Some(transform),
            identity_pipeline,
        })
    }

    fn create_output_color_outcome(&self, output: &Output) -> Result<OutputColorOutcome> {
        let hdr_meta = hdr_metadata(output);
        let intent = Some(render_intent_or_default(None));
        let srgb = Some(Rc::clone(&self.stock_srgb));

        let from_blend_to_output = self.get(TransformCategory::BlendToOutput, None, output, None)?;
        let from_srgb_to_blend = self.get(TransformCategory::InputToBlend, srgb.clone(), output, intent)?;

        let output_is_stock = output
            .color_profile
            .as_ref()
            .is_none_or(|p| Rc::ptr_eq(p, &self.stock_srgb));
        let from_srgb_to_output = if output_is_stock {
            None
        } else {
            Some(self.get(TransformCategory::InputToOutput, srgb, output, intent)?)
        };

        Ok(OutputColorOutcome {
            from_srgb_to_output,
            from_srgb_to_blend: Some(from_srgb_to_blend),
            from_blend_to_output: Some(from_blend_to_output),
            hdr_meta,
        })
    }
}

impl Drop for IccColorManager {
    fn drop(&mut self) {
        for t in self.transforms.live_transforms() {
            error!(
                target: "compcms::transformations",
                "color transformation t{} leaked at teardown:\n{}",
                t.id(),
                t.key().describe()
            );
        }
        for p in self.store.live_profiles() {
            if !Rc::ptr_eq(&p, &self.stock_srgb) {
                error!(
                    target: "compcms::profiles",
                    "color profile p{} leaked at teardown: {}",
                    p.id(),
                    p.description()
                );
            }
        }
    }
}

fn meta_clamp(value: f32, name: &str, min: f32, max: f32, output: &Output) -> f32 {
    // NaN ends up at min
    let mut clamped = value;
    if !(clamped >= min) {
        clamped = min;
    }
    if !(clamped <= max) {
        clamped = max;
    }

    if clamped != value {
        warn!(
            "output '{}' clamping {} value from {:.6} to {:.6}.",
            output.name, name, value, clamped
        );
    }
    clamped
}

/// HDR static metadata for `output`; empty unless it is in ST2084 mode
pub fn hdr_metadata(output: &Output) -> HdrMetadataType1 {
    let mut meta = HdrMetadataType1::default();
    if output.eotf_mode != EotfMode::St2084 {
        return meta;
    }

    let cc = &output.characteristics;
    let unit = |v: f32, name: &str| meta_clamp(v, name, 0.0, 1.0, output);

    if let Some(primaries) = cc.primaries {
        for (dst, src) in meta.primary.iter_mut().zip(primaries) {
            *dst = Chromaticity::new(unit(src.x, "primary"), unit(src.y, "primary"));
        }
        meta.group_mask |= HDR_GROUP_PRIMARIES;
    }

    if let Some(white) = cc.white {
        meta.white = Chromaticity::new(unit(white.x, "white"), unit(white.y, "white"));
        meta.group_mask |= HDR_GROUP_WHITE;
    }

    if let Some(max) = cc.max_luminance {
        meta.max_dml = meta_clamp(max, "maxDML", 1.0, 65535.0, output);
        meta.max_cll = meta_clamp(max, "maxCLL", 1.0, 65535.0, output);
        meta.group_mask |= HDR_GROUP_MAXDML | HDR_GROUP_MAXCLL;
    }

    if let Some(min) = cc.min_luminance {
        meta.min_dml = meta_clamp(min, "minDML", 0.0001, 6.5535, output);
        meta.group_mask |= HDR_GROUP_MINDML;
    }

    if let Some(max_fall) = cc.max_fall {
        meta.max_fall = meta_clamp(max_fall, "maxFALL", 1.0, 65535.0, output);
        meta.group_mask |= HDR_GROUP_MAXFALL;
    }

    meta
}

/// Color manager that does nothing: stock sRGB everywhere, identity
/// transforms, SDR only
#[derive(Debug)]
pub struct NoopColorManager {
    stock_srgb: Rc<ColorProfile>,
    store: ProfileStore,
}

impl NoopColorManager {
    pub fn new(config: &ColorManagerConfig) -> Result<Self> {
        let store = ProfileStore::new(config);
        let stock_srgb = store.create_stock_srgb()?;
        Ok(Self { stock_srgb, store })
    }

    fn assert_stock(&self, profile: Option<&Rc<ColorProfile>>) {
        if let Some(p) = profile {
            assert!(
                Rc::ptr_eq(p, &self.stock_srgb),
                "no-op color manager got foreign profile p{}",
                p.id()
            );
        }
    }

    fn check_eotf_mode(output: &Output) -> Result<()> {
        if output.eotf_mode == EotfMode::Sdr {
            return Ok(());
        }

        let msg = format!(
            "color manager no-op does not support EOTF mode {} of output {}.",
            output.eotf_mode, output.name
        );
        error!("{}", msg);
        Err(Error::Unsupported(msg))
    }
}

impl ColorManager for NoopColorManager {
    fn name(&self) -> &'static str {
        "no-op"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn supported_rendering_intents(&self) -> u32 {
        0
    }

    fn stock_srgb_profile(&self) -> Rc<ColorProfile> {
        Rc::clone(&self.stock_srgb)
    }

    fn get_color_profile_from_icc(&self, _data: &[u8], _name_part: &str) -> Result<Rc<ColorProfile>> {
        Err(Error::Unsupported("ICC profiles are unsupported.".to_string()))
    }

    fn get_color_profile_from_params(&self, _params: &ColorProfileParams, _name_part: &str) -> Result<Rc<ColorProfile>> {
        Err(Error::Unsupported("parametric profiles are unsupported.".to_string()))
    }

    fn get_surface_color_transform(&self, surface: &Surface, output: &Output) -> Result<SurfaceColorTransform> {
        self.assert_stock(surface.color_profile.as_ref());
        self.assert_stock(output.color_profile.as_ref());
        Self::check_eotf_mode(output)?;

        Ok(SurfaceColorTransform {
            transform: None,
            identity_pipeline: true,
        })
    }

    fn create_output_color_outcome(&self, output: &Output) -> Result<OutputColorOutcome> {
        self.assert_stock(output.color_profile.as_ref());
        Self::check_eotf_mode(output)?;
        Ok(OutputColorOutcome::default())
    }
}

impl Drop for NoopColorManager {
    fn drop(&mut self) {
        let leaked = self
            .store
            .live_profiles()
            .iter()
            .filter(|p| !Rc::ptr_eq(p, &self.stock_srgb))
            .count();
        if leaked > 0 {
            error!(target: "compcms::profiles", "{} color profiles leaked at teardown", leaked);
        }
    }
}
