//! Transform sharing and output outcomes through the color manager

use std::rc::Rc;

use compcms_core::{
    ColorCurve, ColorManager, ColorManagerConfig, ColorProfileParams, EotfMode, IccColorManager, NamedPrimaries,
    Output, RenderIntent, Surface, TransferFunction,
};
use compcms_tests::reference::{display_p3_icc, gamma_icc};

fn manager() -> IccColorManager {
    IccColorManager::new(ColorManagerConfig::default()).unwrap()
}

fn output_with(cm: &IccColorManager, primaries: NamedPrimaries, tf: TransferFunction) -> Output {
    let profile = cm
        .get_color_profile_from_params(&ColorProfileParams::with_named_primaries(primaries, tf), "output")
        .unwrap();
    Output {
        color_profile: Some(profile),
        ..Output::new("HDMI-A-1")
    }
}

#[test]
fn test_surfaces_share_transforms() {
    let cm = manager();
    let output = output_with(&cm, NamedPrimaries::CicpDisplayP3, TransferFunction::Gamma22);
    let surface = Surface {
        color_profile: None,
        render_intent: Some(RenderIntent::Relative),
    };

    let a = cm.get_surface_color_transform(&surface, &output).unwrap();
    let b = cm.get_surface_color_transform(&surface, &output).unwrap();
    assert!(Rc::ptr_eq(a.transform.as_ref().unwrap(), b.transform.as_ref().unwrap()));
    assert!(!a.identity_pipeline);
    assert_eq!(cm.transforms().live_transforms().len(), 1);

    let perceptual = Surface {
        render_intent: Some(RenderIntent::Perceptual),
        ..surface.clone()
    };
    let c = cm.get_surface_color_transform(&perceptual, &output).unwrap();
    assert!(!Rc::ptr_eq(a.transform.as_ref().unwrap(), c.transform.as_ref().unwrap()));
    assert_ne!(a.transform.unwrap().id(), c.transform.unwrap().id());
}

#[test]
fn test_transforms_die_with_their_users() {
    let cm = manager();
    let output = output_with(&cm, NamedPrimaries::CicpBt2020, TransferFunction::St2084Pq);

    let outcome = cm.create_output_color_outcome(&output).unwrap();
    assert_eq!(cm.transforms().live_transforms().len(), 3);
    drop(outcome);
    assert!(cm.transforms().live_transforms().is_empty());
}

#[test]
fn test_blend_to_output_is_never_a_3d_lut() {
    let cm = manager();
    let p3_icc = display_p3_icc().unwrap();
    let gamma_icc = gamma_icc([(0.64, 0.33), (0.30, 0.60), (0.15, 0.06), (0.3127, 0.3290)], 2.4).unwrap();

    let mut outputs = vec![Output::new("stock")];
    for tf in [
        TransferFunction::St2084Pq,
        TransferFunction::Hlg,
        TransferFunction::Log100,
        TransferFunction::Bt709,
        TransferFunction::St428,
    ] {
        outputs.push(output_with(&cm, NamedPrimaries::CicpBt2020, tf));
    }
    for (name, icc) in [("p3", &p3_icc), ("gamma", &gamma_icc)] {
        outputs.push(Output {
            color_profile: Some(cm.get_color_profile_from_icc(icc, name).unwrap()),
            ..Output::new(name)
        });
    }

    for output in &outputs {
        let outcome = cm.create_output_color_outcome(output).unwrap();
        let xform = outcome.from_blend_to_output.unwrap();
        assert!(!xform.mapping().is_lut3d(), "{}", xform.describe());
    }
}

#[test]
fn test_stock_output_outcome() {
    let cm = manager();
    let outcome = cm.create_output_color_outcome(&Output::new("eDP-1")).unwrap();

    assert!(outcome.from_srgb_to_output.is_none());
    let to_blend = outcome.from_srgb_to_blend.unwrap();
    assert!(!to_blend.pre_curve().is_identity());
    assert!(to_blend.mapping().is_identity());
    assert!(to_blend.post_curve().is_identity());

    let to_output = outcome.from_blend_to_output.unwrap();
    assert!(matches!(to_output.pre_curve(), ColorCurve::PowLin { .. }));
    assert_eq!(outcome.hdr_meta.group_mask, 0);
}

#[test]
fn test_hdr_outcome_carries_metadata() {
    let cm = manager();
    let mut output = output_with(&cm, NamedPrimaries::CicpBt2020, TransferFunction::St2084Pq);
    output.eotf_mode = EotfMode::St2084;
    output.characteristics.max_luminance = Some(1000.0);
    output.characteristics.min_luminance = Some(0.005);

    let outcome = cm.create_output_color_outcome(&output).unwrap();
    assert_ne!(outcome.hdr_meta.group_mask, 0);
    assert_eq!(outcome.hdr_meta.max_dml, 1000.0);
    assert!(outcome.from_srgb_to_output.is_some());
}

#[test]
fn test_same_profile_surface_is_identity_pipeline() {
    let cm = manager();
    let output = output_with(&cm, NamedPrimaries::CicpDisplayP3, TransferFunction::Srgb);
    let surface = Surface {
        color_profile: output.color_profile.clone(),
        render_intent: None,
    };

    let xform = cm.get_surface_color_transform(&surface, &output).unwrap();
    assert!(xform.identity_pipeline);
    let steps = xform.transform.unwrap();
    assert!(steps.mapping().is_identity());
    assert!(matches!(steps.pre_curve(), ColorCurve::LinPow { .. }));
}
