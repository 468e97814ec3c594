//! LINPOW and POWLIN evaluation
//!
//! Parameters are `[g, a, b, c, d, ...]` as stored in
//! [`ColorCurve`](crate::transform::ColorCurve); the remaining five slots
//! are unused.
//!
//! ```text
//! LINPOW: y = (a·x + b)^g   x >= d
//!         y = c·x           0 <= x < d
//! POWLIN: y = a·x^g + b     x >= d
//!         y = c·x           0 <= x < d
//! ```
//!
//! Negative input is mirrored, `f(-x) = -f(x)`, unless `clamped_input`
//! clamps it to [0, 1] first.

use multiversion::multiversion;

#[inline]
fn prepare(x: f32, clamped_input: bool) -> (f32, f32) {
    if clamped_input {
        (x.clamp(0.0, 1.0), 1.0)
    } else if x < 0.0 {
        (-x, -1.0)
    } else {
        (x, 1.0)
    }
}

#[inline]
pub fn linpow(x: f32, p: &[f32; 10], clamped_input: bool) -> f32 {
    let (x, sign) = prepare(x, clamped_input);
    let [g, a, b, c, d, ..] = *p;
    let y = if x >= d { (a * x + b).powf(g) } else { c * x };
    sign * y
}

#[inline]
pub fn powlin(x: f32, p: &[f32; 10], clamped_input: bool) -> f32 {
    let (x, sign) = prepare(x, clamped_input);
    let [g, a, b, c, d, ..] = *p;
    let y = if x >= d { a * x.powf(g) + b } else { c * x };
    sign * y
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_linpow_batch(data: &mut [f32], p: &[f32; 10], clamped_input: bool) {
    for v in data.iter_mut() {
        *v = linpow(*v, p, clamped_input);
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_powlin_batch(data: &mut [f32], p: &[f32; 10], clamped_input: bool) {
    for v in data.iter_mut() {
        *v = powlin(*v, p, clamped_input);
    }
}
