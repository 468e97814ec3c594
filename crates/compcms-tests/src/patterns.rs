//! Test pixel generation
//!
//! Float RGB in [0, 1], the way compositors feed surfaces to the renderer.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// Neutral ramp from black to white
    Grayscale,
    /// The eight corners of the RGB cube
    ColorCube,
    /// Hue ramp at full saturation
    HueRamp,
    /// A regular grid through the cube, `n` steps per axis
    Grid(usize),
    /// Uniform random pixels from a seed
    Random(u64),
}

/// `count` pixels of `pattern`; grids ignore `count`
pub fn generate_pattern(pattern: TestPattern, count: usize) -> Vec<[f32; 3]> {
    let ramp = |i: usize| i as f32 / count.saturating_sub(1).max(1) as f32;

    match pattern {
        TestPattern::Grayscale => (0..count).map(|i| [ramp(i); 3]).collect(),
        TestPattern::ColorCube => (0..count)
            .map(|i| {
                let c = i % 8;
                [(c & 1) as f32, ((c >> 1) & 1) as f32, ((c >> 2) & 1) as f32]
            })
            .collect(),
        TestPattern::HueRamp => (0..count).map(|i| hue_to_rgb(ramp(i) * 360.0)).collect(),
        TestPattern::Grid(n) => {
            let div = n.saturating_sub(1).max(1) as f32;
            let mut out = Vec::with_capacity(n * n * n);
            for b in 0..n {
                for g in 0..n {
                    for r in 0..n {
                        out.push([r as f32 / div, g as f32 / div, b as f32 / div]);
                    }
                }
            }
            out
        }
        TestPattern::Random(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..count).map(|_| [rng.r#gen(), rng.r#gen(), rng.r#gen()]).collect()
        }
    }
}

/// Fully saturated color at `h` degrees
fn hue_to_rgb(h: f32) -> [f32; 3] {
    let x = 1.0 - ((h / 60.0) % 2.0 - 1.0).abs();
    match (h / 60.0) as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}
