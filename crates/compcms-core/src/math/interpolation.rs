//! Interpolation for sampled curves, ICC CLUTs and renderer 3D LUTs

/// Linear interpolation between two values
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Trilinear interpolation of 8 corners ordered `[000, 100, 010, 110, 001, 101, 011, 111]`
/// where the index bits are (x, y, z).
#[inline]
pub fn trilinear(c: [f64; 8], tx: f64, ty: f64, tz: f64) -> f64 {
    let c00 = lerp(c[0], c[1], tx);
    let c10 = lerp(c[2], c[3], tx);
    let c01 = lerp(c[4], c[5], tx);
    let c11 = lerp(c[6], c[7], tx);

    let c0 = lerp(c00, c10, ty);
    let c1 = lerp(c01, c11, ty);

    lerp(c0, c1, tz)
}

/// Piecewise-linear lookup in a uniformly sampled table over [0, 1]
///
/// Input outside [0, 1] is clamped to the table ends.
pub fn lut1d_interp(table: &[f64], x: f64) -> f64 {
    match table.len() {
        0 => x,
        1 => table[0],
        n => {
            let max = (n - 1) as f64;
            let pos = (x * max).clamp(0.0, max);
            let idx = (pos.floor() as usize).min(n - 2);
            let frac = pos - idx as f64;
            lerp(table[idx], table[idx + 1], frac)
        }
    }
}

/// Grid position of `v` on an axis of `len` points: (lower index, upper index, fraction)
#[inline]
fn axis(v: f64, len: usize) -> (usize, usize, f64) {
    let max = (len - 1) as f64;
    let pos = if v.is_nan() { 0.0 } else { (v * max).clamp(0.0, max) };
    let i0 = pos.floor() as usize;
    let i1 = (i0 + 1).min(len - 1);
    (i0, i1, pos - i0 as f64)
}

/// Trilinear lookup in a renderer 3D LUT
///
/// The LUT holds `len³` RGB triples with red varying fastest:
/// `index = 3 * (r + len * (g + len * b))`.
pub fn lut3d_interp(lut: &[f32], len: usize, rgb: [f32; 3]) -> [f32; 3] {
    if len < 2 || lut.len() < 3 * len * len * len {
        return rgb;
    }

    let (r0, r1, fr) = axis(rgb[0] as f64, len);
    let (g0, g1, fg) = axis(rgb[1] as f64, len);
    let (b0, b1, fb) = axis(rgb[2] as f64, len);

    let at = |r: usize, g: usize, b: usize, ch: usize| lut[3 * (r + len * (g + len * b)) + ch] as f64;

    let mut out = [0.0f32; 3];
    for (ch, o) in out.iter_mut().enumerate() {
        let corners = [
            at(r0, g0, b0, ch),
            at(r1, g0, b0, ch),
            at(r0, g1, b0, ch),
            at(r1, g1, b0, ch),
            at(r0, g0, b1, ch),
            at(r1, g0, b1, ch),
            at(r0, g1, b1, ch),
            at(r1, g1, b1, ch),
        ];
        *o = trilinear(corners, fr, fg, fb) as f32;
    }
    out
}

/// Trilinear lookup in a 3-input ICC CLUT
///
/// ICC grids vary the first input channel slowest and hold `out_channels`
/// values per grid point, already normalized to [0, 1].
pub fn clut_interp(grid: &[f64], grid_points: usize, out_channels: usize, input: [f64; 3]) -> Vec<f64> {
    if grid_points < 2 {
        return grid.iter().take(out_channels).copied().collect();
    }

    let (a0, a1, fa) = axis(input[0], grid_points);
    let (b0, b1, fb) = axis(input[1], grid_points);
    let (c0, c1, fc) = axis(input[2], grid_points);

    let at = |a: usize, b: usize, c: usize, ch: usize| {
        let idx = ((a * grid_points + b) * grid_points + c) * out_channels + ch;
        grid.get(idx).copied().unwrap_or(0.0)
    };

    (0..out_channels)
        .map(|ch| {
            // Corner bits: x = last input channel, z = first input channel.
            let corners = [
                at(a0, b0, c0, ch),
                at(a0, b0, c1, ch),
                at(a0, b1, c0, ch),
                at(a0, b1, c1, ch),
                at(a1, b0, c0, ch),
                at(a1, b0, c1, ch),
                at(a1, b1, c0, ch),
                at(a1, b1, c1, ch),
            ];
            trilinear(corners, fc, fb, fa)
        })
        .collect()
}
