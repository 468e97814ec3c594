//! Reference CMS wrappers
//!
//! Float RGB transforms through lcms2 and moxcms, plus the ICC blobs the
//! parity tests feed to compcms.

use anyhow::{Context, Result, anyhow};
use lcms2::{CIExyY, CIExyYTRIPLE, Intent, PixelFormat, Profile, ToneCurve, Transform};

/// sRGB piece-wise curve as lcms2 type 4 parameters
pub const SRGB_PARAMS: [f64; 5] = [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045];

/// Display P3 primaries and white, xy
pub const DISPLAY_P3: [(f64, f64); 4] = [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060), (0.3127, 0.3290)];

fn xy(c: (f64, f64)) -> CIExyY {
    CIExyY { x: c.0, y: c.1, Y: 1.0 }
}

/// An lcms2 RGB matrix-shaper profile with the same curve on every channel
pub fn lcms2_rgb_profile(gamut: [(f64, f64); 4], curve: &ToneCurve) -> Result<Profile> {
    let primaries = CIExyYTRIPLE {
        Red: xy(gamut[0]),
        Green: xy(gamut[1]),
        Blue: xy(gamut[2]),
    };
    Profile::new_rgb(&xy(gamut[3]), &primaries, &[curve, curve, curve]).context("lcms2 rgb profile")
}

/// Display P3 with the sRGB curve, serialized as ICC
pub fn display_p3_icc() -> Result<Vec<u8>> {
    let curve = ToneCurve::new_parametric(4, &SRGB_PARAMS).context("lcms2 srgb curve")?;
    lcms2_rgb_profile(DISPLAY_P3, &curve)?.icc().context("lcms2 p3 icc")
}

/// A pure power curve profile on the given gamut, serialized as ICC
pub fn gamma_icc(gamut: [(f64, f64); 4], gamma: f64) -> Result<Vec<u8>> {
    let curve = ToneCurve::new(gamma);
    lcms2_rgb_profile(gamut, &curve)?.icc().context("lcms2 gamma icc")
}

/// lcms2's built-in sRGB, serialized as ICC
pub fn srgb_icc() -> Result<Vec<u8>> {
    Profile::new_srgb().icc().context("lcms2 srgb icc")
}

/// Transform float pixels between two ICC profiles with lcms2
pub fn transform_lcms2(src_icc: &[u8], dst_icc: &[u8], intent: Intent, pixels: &[[f32; 3]]) -> Result<Vec<[f32; 3]>> {
    let src = Profile::new_icc(src_icc).context("lcms2 src profile")?;
    let dst = Profile::new_icc(dst_icc).context("lcms2 dst profile")?;
    let xform: Transform<[f32; 3], [f32; 3]> =
        Transform::new(&src, PixelFormat::RGB_FLT, &dst, PixelFormat::RGB_FLT, intent).context("lcms2 transform")?;

    let mut out = vec![[0.0f32; 3]; pixels.len()];
    xform.transform_pixels(pixels, &mut out);
    Ok(out)
}

/// Evaluate an lcms2 parametric curve at `x`; negative types are inverses
pub fn lcms2_parametric_eval(curve_type: i32, params: &[f64], x: f32) -> Result<f32> {
    let curve = ToneCurve::new_parametric(i16::try_from(curve_type).context("lcms2 curve type")?, params).context("lcms2 parametric curve")?;
    Ok(curve.eval(x))
}

/// sRGB → Display P3 with moxcms, relative colorimetric
pub fn transform_moxcms_srgb_to_p3(pixels: &[[f32; 3]]) -> Result<Vec<[f32; 3]>> {
    use moxcms::{ColorProfile, Layout, TransformOptions};

    let src = ColorProfile::new_srgb();
    let dst = ColorProfile::new_display_p3();
    let xform = src
        .create_transform_f32(Layout::Rgb, &dst, Layout::Rgb, TransformOptions::default())
        .map_err(|e| anyhow!("moxcms transform: {:?}", e))?;

    let flat: Vec<f32> = pixels.iter().flatten().copied().collect();
    let mut out = vec![0.0f32; flat.len()];
    xform
        .transform(&flat, &mut out)
        .map_err(|e| anyhow!("moxcms execute: {:?}", e))?;

    Ok(out.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}
