//! Curve sets → renderer curves

use compcms_core::curve::ToneCurve;
use compcms_core::math::ParametricCurve;
use compcms_core::transform::translate_curve_set;
use compcms_core::{ColorCurve, REASONABLE_1D_POINTS, TransferFunction};

fn set(curve: ToneCurve) -> [ToneCurve; 3] {
    [curve.clone(), curve.clone(), curve]
}

#[test]
fn test_gamma_becomes_linpow() {
    let curves = set(ToneCurve::parametric(ParametricCurve::gamma(2.2), true));
    let translated = translate_curve_set(&curves, REASONABLE_1D_POINTS);

    let ColorCurve::LinPow { params, clamped_input } = &translated else {
        panic!("expected LINPOW, got {:?}", translated);
    };
    assert!(*clamped_input);
    for p in params {
        assert_eq!(p[..5], [2.2, 1.0, 0.0, 1.0, 0.0]);
    }

    let out = translated.eval([0.5, 0.0, 1.0]);
    assert!((out[0] - 0.2176).abs() < 1e-4, "{}", out[0]);
    assert_eq!(out[1], 0.0);
    assert!((out[2] - 1.0).abs() < 1e-6);
}

#[test]
fn test_inverse_gamma_becomes_linpow() {
    let curves = set(ToneCurve::parametric(ParametricCurve::gamma(2.0).inverse(), false));
    let translated = translate_curve_set(&curves, REASONABLE_1D_POINTS);

    let ColorCurve::LinPow { params, .. } = &translated else {
        panic!("expected LINPOW, got {:?}", translated);
    };
    assert_eq!(params[0][0], 0.5);
    assert!((translated.eval([0.25; 3])[0] - 0.5).abs() < 1e-6);
}

#[test]
fn test_srgb_pair_is_linpow_then_powlin() {
    let eotf = ToneCurve::parametric(ParametricCurve::srgb(), true);
    let inverse = eotf.inverse().unwrap();

    let decode = translate_curve_set(&set(eotf), REASONABLE_1D_POINTS);
    let encode = translate_curve_set(&set(inverse), REASONABLE_1D_POINTS);
    assert!(matches!(decode, ColorCurve::LinPow { .. }));
    assert!(matches!(encode, ColorCurve::PowLin { .. }));

    for i in 0..=255 {
        let v = i as f32 / 255.0;
        let back = encode.eval(decode.eval([v; 3]));
        assert!((back[0] - v).abs() < 1e-4, "{} → {}", v, back[0]);
    }
}

#[test]
fn test_mixed_channels_are_sampled() {
    let curves = [
        ToneCurve::parametric(ParametricCurve::gamma(2.2), true),
        ToneCurve::parametric(ParametricCurve::srgb(), true),
        ToneCurve::parametric(ParametricCurve::gamma(2.2), true),
    ];
    let translated = translate_curve_set(&curves, 256);

    let ColorCurve::Lut3x1d { optimal_len, .. } = &translated else {
        panic!("expected a sampled curve, got {:?}", translated);
    };
    assert_eq!(*optimal_len, 256);
    assert_eq!(translated.realize(256).len(), 3 * 256);
}

#[test]
fn test_formula_curves_are_sampled() {
    let pq = TransferFunction::St2084Pq.eotf(&[]).unwrap();
    let translated = translate_curve_set(&set(pq), REASONABLE_1D_POINTS);
    assert!(matches!(translated, ColorCurve::Lut3x1d { .. }));
}

#[test]
fn test_eotf_round_trips() {
    for tf in TransferFunction::ALL {
        let Some(eotf) = tf.eotf(&[2.4]) else {
            continue;
        };
        let inverse = eotf.inverse().unwrap();
        let decode = translate_curve_set(&set(eotf), REASONABLE_1D_POINTS);
        let encode = translate_curve_set(&set(inverse), REASONABLE_1D_POINTS);

        let samples = decode.realize(REASONABLE_1D_POINTS);
        assert_eq!(samples.len(), 3 * REASONABLE_1D_POINTS);

        for i in 0..=64 {
            let v = i as f32 / 64.0;
            let back = encode.eval(decode.eval([v; 3]));
            assert!(
                (back[0] - v).abs() < 1.0 / 256.0,
                "{}: {} → {}",
                tf.desc(),
                v,
                back[0]
            );
        }
    }
}
