//! Static tables of rendering intents, named primaries, transfer functions
//! and color features

use serde::{Deserialize, Serialize};

use crate::color::ColorGamut;
use crate::curve::{FormulaCurve, ToneCurve};
use crate::math::ParametricCurve;

/// Rendering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderIntent {
    Perceptual,
    Relative,
    Saturation,
    Absolute,
    RelativeBpc,
}

pub struct RenderIntentInfo {
    pub intent: RenderIntent,
    pub desc: &'static str,
    /// ICC intent number selecting the profile's LUT tags
    pub icc_intent: u32,
    /// Black point compensation
    pub bpc: bool,
}

static RENDER_INTENT_INFO: [RenderIntentInfo; 5] = [
    RenderIntentInfo {
        intent: RenderIntent::Perceptual,
        desc: "Perceptual",
        icc_intent: 0,
        bpc: false,
    },
    RenderIntentInfo {
        intent: RenderIntent::Relative,
        desc: "Media-relative colorimetric",
        icc_intent: 1,
        bpc: false,
    },
    RenderIntentInfo {
        intent: RenderIntent::Saturation,
        desc: "Saturation",
        icc_intent: 2,
        bpc: false,
    },
    RenderIntentInfo {
        intent: RenderIntent::Absolute,
        desc: "ICC-absolute colorimetric",
        icc_intent: 3,
        bpc: false,
    },
    RenderIntentInfo {
        intent: RenderIntent::RelativeBpc,
        desc: "Media-relative colorimetric + black point compensation",
        icc_intent: 1,
        bpc: true,
    },
];

impl RenderIntent {
    pub const ALL: [Self; 5] = [
        Self::Perceptual,
        Self::Relative,
        Self::Saturation,
        Self::Absolute,
        Self::RelativeBpc,
    ];

    pub fn info(self) -> &'static RenderIntentInfo {
        &RENDER_INTENT_INFO[self as usize]
    }

    pub fn desc(self) -> &'static str {
        self.info().desc
    }

    pub fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Named primaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedPrimaries {
    CicpSrgb,
    CicpPalM,
    CicpPal,
    CicpNtsc,
    CicpGenericFilm,
    CicpBt2020,
    CicpCie1931Xyz,
    CicpDciP3,
    CicpDisplayP3,
    AdobeRgb,
}

pub struct PrimariesInfo {
    pub primaries: NamedPrimaries,
    pub desc: &'static str,
    pub gamut: ColorGamut,
}

static PRIMARIES_INFO: [PrimariesInfo; 10] = [
    PrimariesInfo {
        primaries: NamedPrimaries::CicpSrgb,
        desc: "Color primaries for the sRGB color space as defined by the BT.709 standard",
        gamut: ColorGamut::new((0.64, 0.33), (0.30, 0.60), (0.15, 0.06), (0.3127, 0.3290)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpPalM,
        desc: "Color primaries for PAL-M as defined by the BT.470 standard",
        gamut: ColorGamut::new((0.67, 0.33), (0.21, 0.71), (0.14, 0.08), (0.3101, 0.3162)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpPal,
        desc: "Color primaries for PAL as defined by the BT.601 standard",
        gamut: ColorGamut::new((0.64, 0.33), (0.29, 0.60), (0.15, 0.06), (0.3127, 0.3290)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpNtsc,
        desc: "Color primaries for NTSC as defined by the BT.601 standard",
        gamut: ColorGamut::new((0.630, 0.340), (0.310, 0.595), (0.155, 0.070), (0.3127, 0.3290)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpGenericFilm,
        desc: "Generic film with color filters using Illuminant C",
        gamut: ColorGamut::new((0.681, 0.319), (0.243, 0.692), (0.145, 0.049), (0.3101, 0.3162)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpBt2020,
        desc: "Color primaries as defined by the BT.2020 and BT.2100 standard",
        gamut: ColorGamut::new((0.708, 0.292), (0.170, 0.797), (0.131, 0.046), (0.3127, 0.3290)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpCie1931Xyz,
        desc: "Color primaries of the full CIE 1931 XYZ color space",
        gamut: ColorGamut::new((1.0, 0.0), (0.0, 1.0), (0.0, 0.0), (0.3333, 0.3333)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpDciP3,
        desc: "Color primaries of the DCI P3 color space as defined by the SMPTE RP 431 standard",
        gamut: ColorGamut::new((0.680, 0.320), (0.265, 0.690), (0.150, 0.060), (0.314, 0.351)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::CicpDisplayP3,
        desc: "Color primaries of Display P3 variant of the DCI-P3 color space as defined by the SMPTE EG 432 standard",
        gamut: ColorGamut::new((0.680, 0.320), (0.265, 0.690), (0.150, 0.060), (0.3127, 0.3290)),
    },
    PrimariesInfo {
        primaries: NamedPrimaries::AdobeRgb,
        desc: "Color primaries of the Adobe RGB color space as defined by the ISO 12640 standard",
        gamut: ColorGamut::new((0.64, 0.33), (0.21, 0.71), (0.15, 0.06), (0.3127, 0.3290)),
    },
];

impl NamedPrimaries {
    pub const ALL: [Self; 10] = [
        Self::CicpSrgb,
        Self::CicpPalM,
        Self::CicpPal,
        Self::CicpNtsc,
        Self::CicpGenericFilm,
        Self::CicpBt2020,
        Self::CicpCie1931Xyz,
        Self::CicpDciP3,
        Self::CicpDisplayP3,
        Self::AdobeRgb,
    ];

    pub fn info(self) -> &'static PrimariesInfo {
        &PRIMARIES_INFO[self as usize]
    }

    pub fn desc(self) -> &'static str {
        self.info().desc
    }

    pub fn gamut(self) -> ColorGamut {
        self.info().gamut
    }

    pub fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Transfer function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferFunction {
    Linear,
    Gamma22,
    Gamma28,
    Srgb,
    ExtSrgb,
    Bt709,
    Bt1361,
    St240,
    St428,
    St2084Pq,
    Log100,
    Log316,
    Xvycc,
    Hlg,
    Power,
}

pub struct TfInfo {
    pub tf: TransferFunction,
    pub desc: &'static str,
    pub has_parameters: bool,
}

static TF_INFO: [TfInfo; 15] = [
    TfInfo {
        tf: TransferFunction::Linear,
        desc: "Linear transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Gamma22,
        desc: "Assumed display gamma 2.2 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Gamma28,
        desc: "Assumed display gamma 2.8 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Srgb,
        desc: "sRGB piece-wise transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::ExtSrgb,
        desc: "Extended sRGB piece-wise transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Bt709,
        desc: "BT.709 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Bt1361,
        desc: "BT.1361 extended transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::St240,
        desc: "SMPTE ST 240 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::St428,
        desc: "SMPTE ST 428 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::St2084Pq,
        desc: "Perceptual quantizer transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Log100,
        desc: "Logarithmic 100:1 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Log316,
        desc: "Logarithmic (100*Sqrt(10) : 1) transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Xvycc,
        desc: "IEC 61966-2-4 transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Hlg,
        desc: "Hybrid log-gamma transfer function",
        has_parameters: false,
    },
    TfInfo {
        tf: TransferFunction::Power,
        desc: "Parameterized power-law transfer function",
        has_parameters: true,
    },
];

impl TransferFunction {
    pub const ALL: [Self; 15] = [
        Self::Linear,
        Self::Gamma22,
        Self::Gamma28,
        Self::Srgb,
        Self::ExtSrgb,
        Self::Bt709,
        Self::Bt1361,
        Self::St240,
        Self::St428,
        Self::St2084Pq,
        Self::Log100,
        Self::Log316,
        Self::Xvycc,
        Self::Hlg,
        Self::Power,
    ];

    pub fn info(self) -> &'static TfInfo {
        &TF_INFO[self as usize]
    }

    pub fn desc(self) -> &'static str {
        self.info().desc
    }

    pub fn has_parameters(self) -> bool {
        self.info().has_parameters
    }

    pub fn bit(self) -> u32 {
        1 << self as u32
    }

    /// The EOTF as a tone curve: encoded value → linear light, with 1.0 as
    /// the reference white (10000 cd/m² for PQ).
    ///
    /// Returns `None` for [`TransferFunction::Power`] without an exponent.
    pub fn eotf(self, params: &[f32]) -> Option<ToneCurve> {
        let parametric = |curve, clamped_input| Some(ToneCurve::parametric(curve, clamped_input));

        match self {
            Self::Linear => parametric(ParametricCurve::gamma(1.0), false),
            Self::Gamma22 => parametric(ParametricCurve::gamma(2.2), true),
            Self::Gamma28 => parametric(ParametricCurve::gamma(2.8), true),
            Self::Srgb => parametric(ParametricCurve::srgb(), true),
            Self::ExtSrgb => parametric(ParametricCurve::srgb(), false),
            Self::Bt709 => parametric(ParametricCurve::bt709(), true),
            Self::Bt1361 | Self::Xvycc => parametric(ParametricCurve::bt709(), false),
            Self::St240 => parametric(ParametricCurve::st240(), true),
            Self::St428 => parametric(ParametricCurve::st428(), true),
            Self::St2084Pq => Some(ToneCurve::formula(FormulaCurve::Pq)),
            Self::Log100 => Some(ToneCurve::formula(FormulaCurve::Log100)),
            Self::Log316 => Some(ToneCurve::formula(FormulaCurve::Log316)),
            Self::Hlg => Some(ToneCurve::formula(FormulaCurve::Hlg)),
            Self::Power => {
                let exponent = *params.first()?;
                parametric(ParametricCurve::gamma(exponent as f64), true)
            }
        }
    }
}

/// Optional color manager capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFeature {
    Icc,
    Parametric,
    SetPrimaries,
    SetTfPower,
    SetMasteringDisplayPrimaries,
    ExtendedTargetVolume,
}

impl ColorFeature {
    pub const ALL: [Self; 6] = [
        Self::Icc,
        Self::Parametric,
        Self::SetPrimaries,
        Self::SetTfPower,
        Self::SetMasteringDisplayPrimaries,
        Self::ExtendedTargetVolume,
    ];

    pub fn desc(self) -> &'static str {
        match self {
            Self::Icc => "Allow clients to create color profiles from ICC files",
            Self::Parametric => "Allow clients to create parametric color profiles",
            Self::SetPrimaries => "Allow clients to set arbitrary primaries on parametric profiles",
            Self::SetTfPower => "Allow clients to use a power-law transfer function with a custom exponent",
            Self::SetMasteringDisplayPrimaries => {
                "Allow clients to set mastering display primaries and luminances"
            }
            Self::ExtendedTargetVolume => {
                "Allow target color volumes that extend outside of the primary color volume; \
                 requires SetMasteringDisplayPrimaries"
            }
        }
    }

    pub fn bit(self) -> u32 {
        1 << self as u32
    }
}
