//! Accuracy measurement for float pixel buffers
//!
//! Values are compared both numerically (max absolute channel error) and
//! perceptually, by reading them as sRGB-encoded and taking CIEDE2000.
//! The perceptual figure is only a guide for values in other encodings.

/// Statistics from comparing two pixel buffers
#[derive(Debug, Clone)]
pub struct DiffStats {
    /// Largest per-channel absolute difference
    pub max_abs: f32,
    /// Mean deltaE2000
    pub mean_de: f64,
    /// Maximum deltaE2000
    pub max_de: f64,
    /// Index of the pixel with the largest channel difference
    pub worst: usize,
    pub count: usize,
}

impl DiffStats {
    /// Below the smallest difference a trained observer can see
    pub fn is_imperceptible(&self) -> bool {
        self.max_de < 1.0
    }
}

/// CIEDE2000 difference between two Lab colors
pub fn delta_e_2000(lab1: [f64; 3], lab2: [f64; 3]) -> f64 {
    const POW25_7: f64 = 6_103_515_625.0;

    let [l1, a1, b1] = lab1;
    let [l2, a2, b2] = lab2;

    let c_bar = ((a1.hypot(b1)) + (a2.hypot(b2))) / 2.0;
    let g = 0.5 * (1.0 - (c_bar.powi(7) / (c_bar.powi(7) + POW25_7)).sqrt());

    let (a1p, a2p) = (a1 * (1.0 + g), a2 * (1.0 + g));
    let (c1p, c2p) = (a1p.hypot(b1), a2p.hypot(b2));
    let hue = |b: f64, a: f64| {
        if a == 0.0 && b == 0.0 {
            0.0
        } else {
            b.atan2(a).to_degrees().rem_euclid(360.0)
        }
    };
    let (h1p, h2p) = (hue(b1, a1p), hue(b2, a2p));

    let chroma_product = c1p * c2p;
    let dh = if chroma_product == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let dl = l2 - l1;
    let dc = c2p - c1p;
    let dh_big = 2.0 * chroma_product.sqrt() * (dh.to_radians() / 2.0).sin();

    let l_bar = (l1 + l2) / 2.0;
    let cp_bar = (c1p + c2p) / 2.0;
    let hp_bar = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (hp_bar - 30.0).to_radians().cos()
        + 0.24 * (2.0 * hp_bar).to_radians().cos()
        + 0.32 * (3.0 * hp_bar + 6.0).to_radians().cos()
        - 0.20 * (4.0 * hp_bar - 63.0).to_radians().cos();

    let l50 = (l_bar - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * cp_bar;
    let sh = 1.0 + 0.015 * cp_bar * t;

    let d_theta = 30.0 * (-((hp_bar - 275.0) / 25.0).powi(2)).exp();
    let rc = 2.0 * (cp_bar.powi(7) / (cp_bar.powi(7) + POW25_7)).sqrt();
    let rt = -rc * (2.0 * d_theta).to_radians().sin();

    let (tl, tc, th) = (dl / sl, dc / sc, dh_big / sh);
    (tl * tl + tc * tc + th * th + rt * tc * th).sqrt()
}

/// sRGB-encoded value in [0, 1] to Lab (D65)
pub fn srgb_to_lab(rgb: [f32; 3]) -> [f64; 3] {
    let lin = rgb.map(|v| {
        let v = v.clamp(0.0, 1.0) as f64;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });

    let x = 0.4124564 * lin[0] + 0.3575761 * lin[1] + 0.1804375 * lin[2];
    let y = 0.2126729 * lin[0] + 0.7151522 * lin[1] + 0.0721750 * lin[2];
    let z = 0.0193339 * lin[0] + 0.1191920 * lin[1] + 0.9503041 * lin[2];

    let f = |t: f64| {
        const DELTA: f64 = 6.0 / 29.0;
        if t > DELTA.powi(3) {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    };
    let (fx, fy, fz) = (f(x / 0.95047), f(y), f(z / 1.08883));
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Compare `result` against `reference`, pixel by pixel
pub fn compare_pixels(reference: &[[f32; 3]], result: &[[f32; 3]]) -> DiffStats {
    assert_eq!(reference.len(), result.len());

    let mut stats = DiffStats {
        max_abs: 0.0,
        mean_de: 0.0,
        max_de: 0.0,
        worst: 0,
        count: reference.len(),
    };

    for (i, (a, b)) in reference.iter().zip(result).enumerate() {
        let abs = a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0f32, f32::max);
        if abs > stats.max_abs {
            stats.max_abs = abs;
            stats.worst = i;
        }

        let de = delta_e_2000(srgb_to_lab(*a), srgb_to_lab(*b));
        stats.mean_de += de;
        stats.max_de = stats.max_de.max(de);
    }

    if stats.count > 0 {
        stats.mean_de /= stats.count as f64;
    }
    stats
}
