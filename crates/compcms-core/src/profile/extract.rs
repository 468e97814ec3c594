//! Output profile extract: EOTF, inverse EOTF and calibration curves
//!
//! An output profile is split into its linearization curves and the
//! remaining colorimetric part, so the blending space can be the output's
//! linear space.

use crate::curve::ToneCurve;
use crate::error::{Error, Result};
use crate::icc::IccProfile;
use crate::pipeline::{Stage, eval_stages};
use crate::profile::ColorProfileParams;

#[derive(Debug, Clone)]
pub struct OutputExtract {
    /// Electrical → optical, per channel
    pub eotf: [ToneCurve; 3],
    pub inv_eotf: [ToneCurve; 3],
    /// Display calibration ramp from the `vcgt` tag
    pub vcgt: Option<[ToneCurve; 3]>,
}

impl OutputExtract {
    /// Matrix-shaper profiles use their TRCs; anything else is linearized
    /// numerically on `points` samples per channel.
    ///
    /// `device_to_pcs` is the profile's device → PCS XYZ stage list, used
    /// only for the numerical path.
    pub(crate) fn from_icc(icc: &IccProfile, device_to_pcs: impl FnOnce() -> Result<Vec<Stage>>, points: usize) -> Result<Self> {
        let eotf = if icc.is_matrix_shaper() {
            let trc = |ch| {
                icc.trc(ch)
                    .map(ToneCurve::from_icc)
                    .ok_or_else(|| Error::Construction("TRC tag missing from matrix-shaper ICC profile".into()))
            };
            [trc(0)?, trc(1)?, trc(2)?]
        } else {
            let stages = device_to_pcs()?;
            linearize(&stages, points).ok_or_else(|| Error::Construction("estimating EOTF failed".into()))?
        };

        let inv_eotf = invert(&eotf)?;
        let vcgt = icc.vcgt().map(|v| {
            let [r, g, b] = &v.channels;
            [ToneCurve::from_vcgt(r), ToneCurve::from_vcgt(g), ToneCurve::from_vcgt(b)]
        });

        Ok(Self { eotf, inv_eotf, vcgt })
    }

    pub(crate) fn from_params(params: &ColorProfileParams) -> Result<Self> {
        let tf = params.tf();
        let curve = tf
            .eotf(params.tf_params())
            .ok_or_else(|| Error::Construction(format!("no EOTF for {}", tf.desc())))?;
        let eotf = [curve.clone(), curve.clone(), curve];
        let inv_eotf = invert(&eotf)?;

        Ok(Self {
            eotf,
            inv_eotf,
            vcgt: None,
        })
    }
}

fn invert(eotf: &[ToneCurve; 3]) -> Result<[ToneCurve; 3]> {
    let inv = |ch: usize| {
        eotf[ch]
            .inverse()
            .ok_or_else(|| Error::Construction("inverting EOTF failed".into()))
    };
    Ok([inv(0)?, inv(1)?, inv(2)?])
}

/// Per channel, project the XYZ of a single-channel ramp onto the XYZ of
/// the full primary: `dot(XYZ(x), XYZ(1)) / |XYZ(1)|²`
fn linearize(stages: &[Stage], points: usize) -> Option<[ToneCurve; 3]> {
    let div = points.saturating_sub(1).max(1) as f64;
    let mut curves: [Option<ToneCurve>; 3] = [None, None, None];

    for (ch, slot) in curves.iter_mut().enumerate() {
        let mut rgb = [0.0; 3];
        rgb[ch] = 1.0;
        let max = eval_stages(stages, rgb);
        let magnitude = dot(max, max);
        if magnitude <= 0.0 || !magnitude.is_finite() {
            return None;
        }

        let table = (0..points)
            .map(|i| {
                rgb[ch] = i as f64 / div;
                dot(eval_stages(stages, rgb), max) / magnitude
            })
            .collect();

        let curve = ToneCurve::Tabulated(table);
        if !curve.is_monotonic() {
            return None;
        }
        *slot = Some(curve);
    }

    let [Some(r), Some(g), Some(b)] = curves else {
        return None;
    };
    Some([r, g, b])
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
