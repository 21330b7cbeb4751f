//! Conversions between sRGB and CIELAB used for perceptual color distance.
//!
//! The forward transform uses the sRGB/D65 matrix and the classic `7.787 t + 16/116`
//! linear segment, so its results differ slightly from [`palette`]'s own `Lab` conversion.

use palette::{cast, Lab, Srgb};
use std::array;

/// The rows of the linear sRGB to XYZ matrix (D65).
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// The rows of the XYZ to linear sRGB matrix (D65), the inverse of [`RGB_TO_XYZ`].
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// The D65 reference white on the `0..=100` XYZ scale.
const REFERENCE_WHITE: [f64; 3] = [95.047, 100.0, 108.883];

/// Below this normalized value the Lab nonlinearity switches to its linear segment.
const EPSILON: f64 = 0.008856;

/// The slope of the linear segment of the Lab nonlinearity.
const KAPPA: f64 = 7.787;

/// The offset of the linear segment of the Lab nonlinearity.
const OFFSET: f64 = 16.0 / 116.0;

/// Applies the dot product of a matrix with a vector.
#[inline]
fn mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
}

/// Decodes an sRGB channel in `0..=1` to linear light.
#[inline]
fn decode_gamma(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Encodes a linear light channel in `0..=1` with the sRGB transfer function.
#[inline]
fn encode_gamma(c: f64) -> f64 {
    if c > 0.0031308 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

#[inline]
fn f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA * t + OFFSET
    }
}

#[inline]
fn f_inv(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > EPSILON {
        cubed
    } else {
        (t - OFFSET) / KAPPA
    }
}

/// Converts an sRGB color to CIELAB (D65).
///
/// White maps to approximately `(100, 0, 0)` and black to `(0, 0, 0)`.
///
/// # Examples
/// ```
/// # use tinct::rgb_to_lab;
/// # use palette::Srgb;
/// let white = rgb_to_lab(Srgb::new(255, 255, 255));
/// assert!((white.l - 100.0).abs() < 1e-3);
/// assert!(white.a.abs() < 1e-3 && white.b.abs() < 1e-3);
/// ```
#[must_use]
pub fn rgb_to_lab(color: Srgb<u8>) -> Lab {
    let linear = cast::into_array(color).map(|c| decode_gamma(f64::from(c) / 255.0) * 100.0);

    let xyz = mul(&RGB_TO_XYZ, linear);
    let [fx, fy, fz] = [0, 1, 2].map(|i| f(xyz[i] / REFERENCE_WHITE[i]));

    #[allow(clippy::cast_possible_truncation)]
    Lab::new(
        (116.0 * fy - 16.0) as f32,
        (500.0 * (fx - fy)) as f32,
        (200.0 * (fy - fz)) as f32,
    )
}

/// Converts a CIELAB (D65) color back to sRGB, rounding and clamping each channel.
///
/// This is the inverse of [`rgb_to_lab`] up to rounding.
#[must_use]
pub fn lab_to_rgb(color: Lab) -> Srgb<u8> {
    let fy = (f64::from(color.l) + 16.0) / 116.0;
    let fx = fy + f64::from(color.a) / 500.0;
    let fz = fy - f64::from(color.b) / 200.0;

    let f = [fx, fy, fz];
    let xyz = array::from_fn(|i| f_inv(f[i]) * REFERENCE_WHITE[i] / 100.0);

    let [r, g, b] =
        mul(&XYZ_TO_RGB, xyz).map(|c| to_u8(encode_gamma(c.clamp(0.0, 1.0)) * 255.0));

    Srgb::new(r, g, b)
}

/// Rounds and clamps a channel value to a byte.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// The color space in which colors are clustered.
///
/// See the descriptions on each enum variant for more information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// The sRGB color space, treating each color as a point in `0..=255` cube.
    ///
    /// This is fast and is the default.
    #[default]
    Srgb,
    /// The CIELAB color space, where euclidean distance better matches perceived difference.
    ///
    /// Colors are converted with [`rgb_to_lab`] before clustering
    /// and back with [`lab_to_rgb`] afterwards.
    Lab,
}

impl ColorSpace {
    /// Converts a color into a point in this color space.
    #[must_use]
    pub fn to_point(self, color: Srgb<u8>) -> [f32; 3] {
        match self {
            ColorSpace::Srgb => cast::into_array(color).map(f32::from),
            ColorSpace::Lab => {
                let lab = rgb_to_lab(color);
                [lab.l, lab.a, lab.b]
            }
        }
    }

    /// Converts a point in this color space back into an sRGB color.
    #[must_use]
    pub fn from_point(self, point: [f32; 3]) -> Srgb<u8> {
        match self {
            ColorSpace::Srgb => {
                let [r, g, b] = point.map(|c| to_u8(f64::from(c)));
                Srgb::new(r, g, b)
            }
            ColorSpace::Lab => lab_to_rgb(Lab::new(point[0], point[1], point[2])),
        }
    }
}
