//! Range handling for sampled transform data

use multiversion::multiversion;

/// Clamp to [0, 1], passing NaN through
///
/// Not meant for hiding NaN.
#[inline]
pub fn ensure_unorm(v: f32) -> f32 {
    if v <= 0.0 {
        0.0
    } else if v > 1.0 {
        1.0
    } else {
        v
    }
}

/// [`ensure_unorm`] over a buffer
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn ensure_unorm_batch(data: &mut [f32]) {
    for v in data.iter_mut() {
        *v = ensure_unorm(*v);
    }
}

/// Clamp RGB triples to [0, 1]
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn clamp_unit_batch(data: &mut [[f32; 3]]) {
    for rgb in data.iter_mut() {
        for v in rgb.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_unorm_keeps_nan() {
        let mut data = [-0.5f32, 0.0, 0.25, 1.0, 7.0, f32::NAN];
        ensure_unorm_batch(&mut data);
        assert_eq!(&data[..5], &[0.0, 0.0, 0.25, 1.0, 1.0]);
        assert!(data[5].is_nan());
    }

    #[test]
    fn test_clamp_unit_batch() {
        let mut data = [[1.5f32, -0.5, 0.5], [0.0, 1.0, 2.0]];
        clamp_unit_batch(&mut data);
        assert_eq!(data, [[1.0, 0.0, 0.5], [0.0, 1.0, 1.0]]);
    }
}
