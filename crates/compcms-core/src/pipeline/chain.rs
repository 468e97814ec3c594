//! Transform chain construction
//!
//! The blending space is the output's optical (linear) space. Surfaces go
//! input → electrical output → optical output, the blend result goes back
//! to electrical output, and the display calibration ramp comes last:
//!
//! | category        | chain                                       |
//! |-----------------|---------------------------------------------|
//! | input-to-blend  | input → PCS → output, output EOTF           |
//! | blend-to-output | output inverse EOTF, vcgt                   |
//! | input-to-output | input → PCS → output, vcgt                  |
//!
//! so that input-to-blend followed by blend-to-output equals
//! input-to-output.

use crate::color::{D50, Xyz};
use crate::error::{Error, Result};
use crate::math::Matrix3x3;
use crate::pipeline::bpc::BpcParams;
use crate::pipeline::stages::{Stage, eval_stages};
use crate::profile::ColorProfile;
use crate::properties::RenderIntent;
use crate::transform::TransformCategory;

/// Build the unoptimized stage list for a transform
///
/// `intent` is ignored for blend-to-output, which has no input profile.
pub fn build_chain(
    category: TransformCategory,
    input: Option<&ColorProfile>,
    output: &ColorProfile,
    intent: Option<RenderIntent>,
) -> Result<Vec<Stage>> {
    let extract = output.output_extract()?;
    let mut stages = Vec::new();

    match category {
        TransformCategory::InputToBlend | TransformCategory::InputToOutput => {
            let input = input.ok_or_else(|| {
                Error::Construction(format!("{} transform needs an input profile", category.name()))
            })?;
            let intent = intent.unwrap_or(RenderIntent::Perceptual);
            stages.extend(profile_to_profile(input, output, intent)?);

            if category == TransformCategory::InputToBlend {
                stages.push(Stage::curves(extract.eotf.clone()));
            } else if let Some(vcgt) = &extract.vcgt {
                stages.push(Stage::curves(vcgt.clone()));
            }
        }
        TransformCategory::BlendToOutput => {
            stages.push(Stage::curves(extract.inv_eotf.clone()));
            if let Some(vcgt) = &extract.vcgt {
                stages.push(Stage::curves(vcgt.clone()));
            }
        }
    }

    Ok(stages)
}

/// Input device → PCS → output device, with the intent's PCS adjustment
fn profile_to_profile(input: &ColorProfile, output: &ColorProfile, intent: RenderIntent) -> Result<Vec<Stage>> {
    let mut stages = input.device_to_pcs(intent)?;

    match intent {
        RenderIntent::Absolute => {
            stages.push(Stage::matrix(absolute_scaling(
                input.media_white_point(),
                output.media_white_point(),
            )));
        }
        RenderIntent::RelativeBpc => {
            let src_bp = black_point(input, intent)?;
            let dst_bp = black_point(output, intent)?;
            if let Some(bpc) = BpcParams::calculate(src_bp, dst_bp) {
                stages.push(bpc.to_stage());
            }
        }
        RenderIntent::Perceptual | RenderIntent::Relative | RenderIntent::Saturation => {}
    }

    stages.extend(output.pcs_to_device(intent)?);
    Ok(stages)
}

/// Relative XYZ of the input medium → relative XYZ of the output medium,
/// keeping absolute colorimetry
fn absolute_scaling(input_white: Xyz, output_white: Xyz) -> Matrix3x3 {
    let ratio = |i: f64, o: f64| if o.abs() > 1e-10 { i / o } else { 1.0 };
    Matrix3x3::diagonal(
        ratio(input_white.x, output_white.x),
        ratio(input_white.y, output_white.y),
        ratio(input_white.z, output_white.z),
    )
}

/// Device black in relative PCS XYZ
fn black_point(profile: &ColorProfile, intent: RenderIntent) -> Result<Xyz> {
    let stages = profile.device_to_pcs(intent)?;
    let black = Xyz::from_array(eval_stages(&stages, [0.0; 3]));
    // Black above white: no usable black point
    if black.y >= D50.y {
        return Ok(Xyz::default());
    }
    Ok(black)
}
