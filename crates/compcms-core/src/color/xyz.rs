//! CIE XYZ tristimulus values
//!
//! Every transform chain passes through XYZ relative to the D50 PCS
//! illuminant, whether the profile is ICC-backed or parametric.

/// CIE 1931 XYZ tristimulus values; Y is luminance
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }

    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// xy chromaticity, or `None` for black
    pub fn to_xy(&self) -> Option<(f64, f64)> {
        let sum = self.x + self.y + self.z;
        if sum > 0.0 {
            Some((self.x / sum, self.y / sum))
        } else {
            None
        }
    }

    /// XYZ from xyY. A zero `y` chromaticity yields black.
    #[inline]
    pub fn from_xyy(x: f64, y: f64, big_y: f64) -> Self {
        if y > 0.0 {
            Self::new(x * big_y / y, big_y, (1.0 - x - y) * big_y / y)
        } else {
            Self::default()
        }
    }

    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}
