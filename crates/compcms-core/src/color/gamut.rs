//! CIE 1931 xy chromaticity gamuts

use serde::{Deserialize, Serialize};

/// Legal range for CIE xy values. Wide enough for ACES AP0.
pub const CIE_XY_MIN: f32 = -1.0;
pub const CIE_XY_MAX: f32 = 2.0;

/// Area tolerance for the point-in-triangle test
const AREA_PRECISION: f32 = 1e-5;

/// A CIE 1931 xy chromaticity coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Chromaticity {
    pub x: f32,
    pub y: f32,
}

impl Chromaticity {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn in_legal_range(&self) -> bool {
        (CIE_XY_MIN..=CIE_XY_MAX).contains(&self.x) && (CIE_XY_MIN..=CIE_XY_MAX).contains(&self.y)
    }

    pub(crate) fn as_f64(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// Three primaries in RGB order plus a white point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorGamut {
    pub primary: [Chromaticity; 3],
    pub white_point: Chromaticity,
}

impl ColorGamut {
    pub const fn new(r: (f32, f32), g: (f32, f32), b: (f32, f32), white: (f32, f32)) -> Self {
        Self {
            primary: [
                Chromaticity::new(r.0, r.1),
                Chromaticity::new(g.0, g.1),
                Chromaticity::new(b.0, b.1),
            ],
            white_point: Chromaticity::new(white.0, white.1),
        }
    }

    /// Every coordinate lies within [-1.0, 2.0]
    pub fn in_legal_range(&self) -> bool {
        self.primary.iter().all(Chromaticity::in_legal_range) && self.white_point.in_legal_range()
    }

    /// The white point lies inside the primaries' triangle, which must not
    /// be degenerate.
    ///
    /// This accepts some points that would not make sensible white points.
    pub fn white_point_inside(&self) -> bool {
        let [p1, p2, p3] = self.primary;
        let w = self.white_point;

        let area = triangle_area(p1, p2, p3);
        if area <= AREA_PRECISION {
            return false;
        }

        let sum = triangle_area(w, p1, p2) + triangle_area(w, p1, p3) + triangle_area(w, p2, p3);
        (area - sum).abs() <= AREA_PRECISION
    }

    /// Primaries as f64 tuples, for matrix derivation
    pub fn primaries_f64(&self) -> [(f64, f64); 3] {
        [
            self.primary[0].as_f64(),
            self.primary[1].as_f64(),
            self.primary[2].as_f64(),
        ]
    }

    pub fn white_f64(&self) -> (f64, f64) {
        self.white_point.as_f64()
    }
}

/// Shoelace formula
fn triangle_area(a: Chromaticity, b: Chromaticity, c: Chromaticity) -> f32 {
    ((a.x - c.x) * (b.y - a.y) - (a.x - b.x) * (c.y - a.y)).abs() / 2.0
}
