//! Parity with lcms2
//!
//! ICC profiles serialized by lcms2 are ingested by compcms and the
//! resulting transforms compared against lcms2's own float transforms.

use std::rc::Rc;

use compcms_core::math::{ParametricCurve, ParametricCurveType};
use compcms_core::{
    ColorManager, ColorManagerConfig, ColorProfile, ColorTransform, ColorProfileParams, IccColorManager, NamedPrimaries,
    RenderIntent, SearchKey, TransferFunction, TransformCategory,
};
use compcms_tests::reference::{
    DISPLAY_P3, SRGB_PARAMS, display_p3_icc, gamma_icc, lcms2_parametric_eval, srgb_icc, transform_lcms2,
};
use compcms_tests::{TestPattern, apply, compare_pixels, generate_pattern};
use lcms2::Intent;

const SRGB_GAMUT: [(f64, f64); 4] = [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06), (0.3127, 0.3290)];

fn manager() -> IccColorManager {
    IccColorManager::new(ColorManagerConfig::default()).unwrap()
}

fn input_to_output(
    cm: &IccColorManager,
    input: &Rc<ColorProfile>,
    output: &Rc<ColorProfile>,
) -> Rc<ColorTransform> {
    cm.transforms()
        .get_transform(&SearchKey {
            category: TransformCategory::InputToOutput,
            input_profile: Some(Rc::clone(input)),
            output_profile: Rc::clone(output),
            render_intent: Some(RenderIntent::Relative),
        })
        .unwrap()
}

#[test]
fn test_parametric_curves_match_lcms2() {
    let cases: [(ParametricCurveType, &[f64]); 5] = [
        (ParametricCurveType::Gamma, &[2.2]),
        (ParametricCurveType::CIE122, &[2.4, 1.1, -0.1]),
        (ParametricCurveType::IEC61966_3, &[2.2, 0.9, 0.1, 0.05]),
        (ParametricCurveType::IEC61966_2_1, &SRGB_PARAMS),
        (ParametricCurveType::Full, &[2.4, 0.95, 0.05, 0.077, 0.04, 0.01, 0.002]),
    ];

    for (curve_type, params) in cases {
        let curve = ParametricCurve::from_params(curve_type, params).unwrap();
        let type_number = curve_type.type_number();

        for i in 0..=64 {
            let x = i as f32 / 64.0;
            let ours = curve.eval(x as f64) as f32;
            let theirs = lcms2_parametric_eval(type_number, params, x).unwrap();
            assert!(
                (ours - theirs).abs() < 1e-4,
                "type {} at {}: {} vs {}",
                type_number,
                x,
                ours,
                theirs
            );
        }
    }
}

#[test]
fn test_inverse_parametric_curves_match_lcms2() {
    let cases: [(ParametricCurveType, &[f64]); 4] = [
        (ParametricCurveType::Gamma, &[2.2]),
        (ParametricCurveType::CIE122, &[2.4, 1.1, -0.1]),
        (ParametricCurveType::IEC61966_3, &[2.2, 0.9, 0.1, 0.05]),
        (ParametricCurveType::IEC61966_2_1, &SRGB_PARAMS),
    ];

    for (curve_type, params) in cases {
        let inverse = ParametricCurve::from_params(curve_type, params).unwrap().inverse();
        assert_eq!(inverse.signed_type(), -curve_type.type_number());

        for i in 0..=64 {
            let y = i as f32 / 64.0;
            let ours = inverse.eval(y as f64) as f32;
            let theirs = lcms2_parametric_eval(inverse.signed_type(), params, y).unwrap();
            assert!(
                (ours - theirs).abs() < 1e-4,
                "type {} at {}: {} vs {}",
                inverse.signed_type(),
                y,
                ours,
                theirs
            );
        }
    }
}

#[test]
fn test_lcms2_srgb_matches_stock() {
    let cm = manager();
    let icc = srgb_icc().unwrap();
    let srgb_icc = cm.get_color_profile_from_icc(&icc, "lcms2 sRGB").unwrap();
    let stock = cm.stock_srgb_profile();

    let xform = input_to_output(&cm, &srgb_icc, &stock);
    let pixels = generate_pattern(TestPattern::Grid(9), 0);
    let stats = compare_pixels(&pixels, &apply(&xform, &pixels));

    assert!(stats.max_abs < 2e-3, "max abs {} at {}", stats.max_abs, stats.worst);
    assert!(stats.is_imperceptible());
}

#[test]
fn test_srgb_to_p3_icc_matches_lcms2() {
    let cm = manager();
    let src_icc = srgb_icc().unwrap();
    let dst_icc = display_p3_icc().unwrap();
    let src = cm.get_color_profile_from_icc(&src_icc, "sRGB").unwrap();
    let dst = cm.get_color_profile_from_icc(&dst_icc, "P3").unwrap();

    let xform = input_to_output(&cm, &src, &dst);
    let pixels = generate_pattern(TestPattern::Random(7), 512);
    let reference = transform_lcms2(&src_icc, &dst_icc, Intent::RelativeColorimetric, &pixels).unwrap();
    let stats = compare_pixels(&reference, &apply(&xform, &pixels));

    assert!(stats.max_abs < 2e-3, "max abs {} at {}", stats.max_abs, stats.worst);
}

#[test]
fn test_parametric_p3_matches_lcms2_icc() {
    let cm = manager();
    let stock = cm.stock_srgb_profile();
    let p3 = cm
        .get_color_profile_from_params(
            &ColorProfileParams::with_named_primaries(NamedPrimaries::CicpDisplayP3, TransferFunction::Srgb),
            "P3",
        )
        .unwrap();

    let xform = input_to_output(&cm, &stock, &p3);
    let pixels = generate_pattern(TestPattern::HueRamp, 360);
    let reference = transform_lcms2(
        &srgb_icc().unwrap(),
        &display_p3_icc().unwrap(),
        Intent::RelativeColorimetric,
        &pixels,
    )
    .unwrap();
    let stats = compare_pixels(&reference, &apply(&xform, &pixels));

    assert!(stats.max_abs < 2e-3, "max abs {} at {}", stats.max_abs, stats.worst);
}

#[test]
fn test_gamma_profiles_match_lcms2() {
    let cm = manager();
    let src_icc = gamma_icc(SRGB_GAMUT, 1.8).unwrap();
    let dst_icc = gamma_icc(DISPLAY_P3, 2.6).unwrap();
    let src = cm.get_color_profile_from_icc(&src_icc, "gamma 1.8").unwrap();
    let dst = cm.get_color_profile_from_icc(&dst_icc, "gamma 2.6").unwrap();

    let xform = input_to_output(&cm, &src, &dst);
    let pixels = generate_pattern(TestPattern::Grid(7), 0);
    let reference = transform_lcms2(&src_icc, &dst_icc, Intent::RelativeColorimetric, &pixels).unwrap();
    let stats = compare_pixels(&reference, &apply(&xform, &pixels));

    assert!(stats.max_abs < 2e-3, "max abs {} at {}", stats.max_abs, stats.worst);
}

#[test]
fn test_same_icc_bytes_same_profile() {
    let cm = manager();
    let icc = display_p3_icc().unwrap();
    let a = cm.get_color_profile_from_icc(&icc, "first").unwrap();
    let b = cm.get_color_profile_from_icc(&icc, "second").unwrap();
    assert!(Rc::ptr_eq(&a, &b));
}
