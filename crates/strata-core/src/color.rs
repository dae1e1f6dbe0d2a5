use serde::{Deserialize, Serialize};

use crate::math::{clamp, uniform_float, Range, Vec4};

/// An HSLA color. Hue is in degrees `[0, 360)`, saturation and lightness in
/// percent `[0, 100]`, alpha in `[0, 1]`.
///
/// Serialized as the plain array `[h, s, l, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color {
    pub hsla: Vec4,
}

/// Ranges used when a color is drawn at random, one per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRanges {
    pub hue: Range,
    pub saturation: Range,
    pub lightness: Range,
    pub alpha: Range,
}

impl Default for ColorRanges {
    fn default() -> Self {
        Self {
            hue: [0.0, 360.0],
            saturation: [0.0, 100.0],
            lightness: [0.0, 100.0],
            alpha: [0.0, 1.0],
        }
    }
}

impl ColorRanges {
    /// Random hue with fixed saturation, lightness and alpha.
    pub fn hue_only(s: f64, l: f64, a: f64) -> Self {
        Self {
            hue: [0.0, 360.0],
            saturation: [s, s],
            lightness: [l, l],
            alpha: [a, a],
        }
    }
}

impl Color {
    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self {
            hsla: Vec4::new(h, s, l, a),
        }
    }

    pub fn white() -> Self {
        Self::new(0.0, 100.0, 100.0, 1.0)
    }

    pub fn black() -> Self {
        Self::new(0.0, 100.0, 0.0, 1.0)
    }

    pub fn random(ranges: ColorRanges) -> Self {
        let mut color = Self::new(0.0, 0.0, 0.0, 0.0);
        color.randomize_hue(ranges.hue);
        color.randomize_saturation(ranges.saturation);
        color.randomize_lightness(ranges.lightness);
        color.randomize_alpha(ranges.alpha);
        color
    }

    pub fn hue(&self) -> f64 {
        self.hsla[0]
    }

    pub fn saturation(&self) -> f64 {
        self.hsla[1]
    }

    pub fn lightness(&self) -> f64 {
        self.hsla[2]
    }

    pub fn alpha(&self) -> f64 {
        self.hsla[3]
    }

    pub fn randomize_hue(&mut self, range: Range) {
        self.hsla[0] = clamp(uniform_float(range), [0.0, 360.0]);
    }

    pub fn randomize_saturation(&mut self, range: Range) {
        self.hsla[1] = clamp(uniform_float(range), [0.0, 100.0]);
    }

    pub fn randomize_lightness(&mut self, range: Range) {
        self.hsla[2] = clamp(uniform_float(range), [0.0, 100.0]);
    }

    pub fn randomize_alpha(&mut self, range: Range) {
        self.hsla[3] = clamp(uniform_float(range), [0.0, 1.0]);
    }

    /// A nearby color: each channel moves by a random amount within `±spread`.
    /// Hue wraps around the color wheel; the other channels are clamped.
    pub fn mutate(&self, spread: [f64; 4]) -> Self {
        let jitter = |i: usize| uniform_float([-spread[i], spread[i]]);
        Self::new(
            (self.hsla[0] + jitter(0)).rem_euclid(360.0),
            clamp(self.hsla[1] + jitter(1), [0.0, 100.0]),
            clamp(self.hsla[2] + jitter(2), [0.0, 100.0]),
            clamp(self.hsla[3] + jitter(3), [0.0, 1.0]),
        )
    }

    pub fn rotate_hue(&mut self, degrees: f64) -> &mut Self {
        self.hsla[0] = (self.hsla[0] + degrees).rem_euclid(360.0);
        self
    }

    pub fn add_saturation(&mut self, term: f64) {
        self.hsla[1] = clamp(self.hsla[1] + term, [0.0, 100.0]);
    }

    pub fn add_lightness(&mut self, term: f64) {
        self.hsla[2] = clamp(self.hsla[2] + term, [0.0, 100.0]);
    }

    pub fn add_alpha(&mut self, term: f64) {
        self.hsla[3] = clamp(self.hsla[3] + term, [0.0, 1.0]);
    }

    /// Per-channel blend from `a` toward `b`.
    pub fn interpolate(a: Color, b: Color, factor: Vec4) -> Color {
        Color {
            hsla: Vec4::interpolate(a.hsla, b.hsla, factor),
        }
    }

    pub fn add(a: Color, b: Color) -> Color {
        Color { hsla: a.hsla + b.hsla }
    }

    pub fn subtract(a: Color, b: Color) -> Color {
        Color { hsla: a.hsla - b.hsla }
    }

    /// CSS notation, e.g. `hsla(120, 50%, 50%, 1)`.
    pub fn css(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.hsla[0], self.hsla[1], self.hsla[2], self.hsla[3]
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Vec4> for Color {
    fn from(hsla: Vec4) -> Self {
        Self { hsla }
    }
}
