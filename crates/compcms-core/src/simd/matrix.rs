//! Matrix mapping over pixel batches

use multiversion::multiversion;

/// `out[r] = Σ_c m[c * 3 + r] · in[c]`, in place
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_column_major_batch(m: &[f32; 9], data: &mut [[f32; 3]]) {
    let [m00, m10, m20, m01, m11, m21, m02, m12, m22] = *m;

    for rgb in data.iter_mut() {
        let [r, g, b] = *rgb;
        rgb[0] = m00 * r + m01 * g + m02 * b;
        rgb[1] = m10 * r + m11 * g + m12 * b;
        rgb[2] = m20 * r + m21 * g + m22 * b;
    }
}
