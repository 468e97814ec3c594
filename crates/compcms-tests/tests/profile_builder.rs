//! Parametric profile creation through the builder

use std::rc::Rc;

use compcms_core::color::ColorGamut;
use compcms_core::{
    BuilderErrorCode, ColorFeature, ColorManager, ColorManagerConfig, IccColorManager, NamedPrimaries, Output,
    Surface, TransferFunction,
};
use compcms_tests::reference::transform_moxcms_srgb_to_p3;
use compcms_tests::{TestPattern, apply, compare_pixels, generate_pattern};

const BT2020: ColorGamut = ColorGamut::new((0.708, 0.292), (0.170, 0.797), (0.131, 0.046), (0.3127, 0.3290));
const P3_D65: ColorGamut = ColorGamut::new((0.680, 0.320), (0.265, 0.690), (0.150, 0.060), (0.3127, 0.3290));

fn manager() -> IccColorManager {
    IccColorManager::new(ColorManagerConfig::default()).unwrap()
}

#[test]
fn test_custom_primaries_match_named() {
    let cm = manager();

    let mut builder = cm.profile_builder();
    assert!(builder.set_primaries(&P3_D65));
    assert!(builder.set_tf_named(TransferFunction::Srgb));
    let custom = builder.create_color_profile(&cm, "custom").unwrap();

    // Named primaries are remembered, so the two are different profiles
    let mut builder = cm.profile_builder();
    builder.set_primaries_named(NamedPrimaries::CicpDisplayP3);
    builder.set_tf_named(TransferFunction::Srgb);
    let named = builder.create_color_profile(&cm, "named").unwrap();
    assert!(!Rc::ptr_eq(&custom, &named));

    let output = Output {
        color_profile: Some(custom),
        ..Output::new("DP-2")
    };
    let outcome = cm.create_output_color_outcome(&output).unwrap();
    let pixels = generate_pattern(TestPattern::Grid(5), 0);
    let reference = transform_moxcms_srgb_to_p3(&pixels).unwrap();
    let stats = compare_pixels(&reference, &apply(outcome.from_srgb_to_output.as_ref().unwrap(), &pixels));
    assert!(stats.max_abs < 3e-3, "max abs {}", stats.max_abs);
}

#[test]
fn test_hdr_profile() {
    let cm = manager();

    let mut builder = cm.profile_builder();
    builder.set_primaries_named(NamedPrimaries::CicpBt2020);
    builder.set_tf_named(TransferFunction::St2084Pq);
    builder.set_target_primaries(&P3_D65);
    builder.set_target_luminance(0.005, 1000.0);
    builder.set_max_cll(800.0);
    builder.set_max_fall(400.0);
    assert!(builder.get_error().is_none());

    let profile = builder.create_color_profile(&cm, "hdr").unwrap();
    let params = profile.params().unwrap();
    assert_eq!(params.max_luminance, 1000.0);
    assert_eq!(params.max_cll, 800.0);
    assert_eq!(params.target_gamut(), P3_D65);

    let surface = Surface {
        color_profile: Some(Rc::clone(&profile)),
        render_intent: None,
    };
    let xform = cm.get_surface_color_transform(&surface, &Output::new("eDP-1")).unwrap();
    assert!(xform.transform.is_some());
}

#[test]
fn test_target_primaries_out_of_range() {
    let cm = manager();
    let mut builder = cm.profile_builder();
    builder.set_primaries(&BT2020);
    builder.set_tf_named(TransferFunction::Gamma22);
    builder.set_target_primaries(&ColorGamut::new((2.5, 0.3), (0.17, 0.797), (0.131, 0.046), (0.3127, 0.329)));

    let err = builder.create_color_profile(&cm, "x").unwrap_err();
    assert_eq!(err.code, BuilderErrorCode::CieXyOutOfRange);
    assert_eq!(err.message, "invalid target primaries");
}

#[test]
fn test_max_cll_below_min_luminance() {
    let cm = manager();
    let mut builder = cm.profile_builder();
    builder.set_primaries_named(NamedPrimaries::CicpBt2020);
    builder.set_tf_named(TransferFunction::St2084Pq);
    builder.set_target_luminance(100.0, 500.0);
    builder.set_max_cll(50.0);

    let err = builder.create_color_profile(&cm, "x").unwrap_err();
    assert_eq!(err.code, BuilderErrorCode::InconsistentLuminances);
    assert!(err.message.starts_with("maxCLL (50.000000)"), "{}", err.message);
}

#[test]
fn test_max_fall_above_max_luminance() {
    let cm = manager();
    let mut builder = cm.profile_builder();
    builder.set_primaries_named(NamedPrimaries::CicpBt2020);
    builder.set_tf_named(TransferFunction::St2084Pq);
    builder.set_target_luminance(0.1, 500.0);
    builder.set_max_fall(600.0);

    let err = builder.create_color_profile(&cm, "x").unwrap_err();
    assert_eq!(err.code, BuilderErrorCode::InconsistentLuminances);
    assert_eq!(
        err.message,
        "maxFALL (600.000000) should not be greater than max luminance (500.000000)"
    );
}

#[test]
fn test_first_error_code_wins() {
    let cm = manager();
    let mut builder = cm.profile_builder();
    assert!(builder.set_primaries_named(NamedPrimaries::CicpSrgb));
    assert!(!builder.set_primaries_named(NamedPrimaries::CicpBt2020));
    assert!(!builder.set_target_luminance(10.0, 10.0));

    let err = builder.get_error().unwrap();
    assert_eq!(err.code, BuilderErrorCode::AlreadySet);
    assert_eq!(err.message.lines().count(), 2);
}

#[test]
fn test_restricted_manager() {
    let config = ColorManagerConfig {
        supported_features: vec![ColorFeature::Icc, ColorFeature::Parametric],
        ..ColorManagerConfig::default()
    };
    let cm = IccColorManager::new(config).unwrap();

    let mut builder = cm.profile_builder();
    assert!(!builder.set_primaries(&BT2020));
    assert!(!builder.set_tf_power_exponent(2.4));
    assert!(builder.set_tf_named(TransferFunction::Gamma22));

    let err = builder.create_color_profile(&cm, "x").unwrap_err();
    assert_eq!(err.code, BuilderErrorCode::InvalidPrimaries);
}
