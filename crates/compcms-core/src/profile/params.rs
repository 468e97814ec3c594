//! Parametric profile parameters
//!
//! Plain-old-data so that two parameter sets can be compared byte for
//! byte; float fields compare by bit pattern.

use bytemuck::{Pod, Zeroable};

use crate::color::{Chromaticity, ColorGamut};
use crate::properties::{NamedPrimaries, TransferFunction};

/// Marks an unset luminance field
pub const UNSET: f32 = -1.0;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorProfileParams {
    /// Red, green, blue and white xy, in that order
    pub primaries: [f32; 8],
    pub target_primaries: [f32; 8],
    pub tf_params: [f32; 10],
    /// Target luminance in cd/m²
    pub min_luminance: f32,
    pub max_luminance: f32,
    pub max_cll: f32,
    pub max_fall: f32,
    /// Index into [`TransferFunction::ALL`]
    tf: u32,
    /// Index into [`NamedPrimaries::ALL`] plus one; zero for custom
    named_primaries: u32,
}

impl ColorProfileParams {
    pub fn new(primaries: ColorGamut, tf: TransferFunction) -> Self {
        let gamut = gamut_to_array(&primaries);
        Self {
            primaries: gamut,
            target_primaries: gamut,
            tf_params: [0.0; 10],
            min_luminance: UNSET,
            max_luminance: UNSET,
            max_cll: UNSET,
            max_fall: UNSET,
            tf: tf_index(tf),
            named_primaries: 0,
        }
    }

    /// Parameters with named primaries, remembered for the description
    pub fn with_named_primaries(primaries: NamedPrimaries, tf: TransferFunction) -> Self {
        let mut params = Self::new(primaries.gamut(), tf);
        params.set_named_primaries(Some(primaries));
        params
    }

    /// Stock sRGB: sRGB primaries and piece-wise sRGB curve
    pub fn srgb() -> Self {
        Self::with_named_primaries(NamedPrimaries::CicpSrgb, TransferFunction::Srgb)
    }

    pub fn tf(&self) -> TransferFunction {
        TransferFunction::ALL
            .get(self.tf as usize)
            .copied()
            .unwrap_or(TransferFunction::Linear)
    }

    pub fn set_tf(&mut self, tf: TransferFunction) {
        self.tf = tf_index(tf);
    }

    /// The meaningful part of `tf_params`
    pub fn tf_params(&self) -> &[f32] {
        if self.tf().has_parameters() {
            &self.tf_params[..1]
        } else {
            &[]
        }
    }

    pub fn named_primaries(&self) -> Option<NamedPrimaries> {
        let index = self.named_primaries.checked_sub(1)?;
        NamedPrimaries::ALL.get(index as usize).copied()
    }

    pub fn set_named_primaries(&mut self, primaries: Option<NamedPrimaries>) {
        self.named_primaries = match primaries {
            Some(p) => NamedPrimaries::ALL
                .iter()
                .position(|&q| q == p)
                .map_or(0, |i| i as u32 + 1),
            None => 0,
        };
    }

    pub fn gamut(&self) -> ColorGamut {
        gamut_from_array(&self.primaries)
    }

    pub fn set_gamut(&mut self, gamut: &ColorGamut) {
        self.primaries = gamut_to_array(gamut);
    }

    pub fn target_gamut(&self) -> ColorGamut {
        gamut_from_array(&self.target_primaries)
    }

    pub fn set_target_gamut(&mut self, gamut: &ColorGamut) {
        self.target_primaries = gamut_to_array(gamut);
    }

    /// Byte-exact comparison, used for de-duplication
    pub fn same_as(&self, other: &Self) -> bool {
        bytemuck::bytes_of(self) == bytemuck::bytes_of(other)
    }
}

fn tf_index(tf: TransferFunction) -> u32 {
    TransferFunction::ALL.iter().position(|&t| t == tf).unwrap_or(0) as u32
}

fn gamut_to_array(gamut: &ColorGamut) -> [f32; 8] {
    let [r, g, b] = gamut.primary;
    let w = gamut.white_point;
    [r.x, r.y, g.x, g.y, b.x, b.y, w.x, w.y]
}

fn gamut_from_array(a: &[f32; 8]) -> ColorGamut {
    ColorGamut {
        primary: [
            Chromaticity::new(a[0], a[1]),
            Chromaticity::new(a[2], a[3]),
            Chromaticity::new(a[4], a[5]),
        ],
        white_point: Chromaticity::new(a[6], a[7]),
    }
}
