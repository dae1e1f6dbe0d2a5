use serde::{Deserialize, Serialize};
use strata_core::color::Color;
use strata_core::math::Vec2;

/// A 2D affine transform `[a, b, c, d, e, f]`, mapping
/// `(x, y) -> (a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [f64; 6]);

impl Transform {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// This transform followed by a scale in local coordinates.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        let [a, b, c, d, e, f] = self.0;
        Self([a * sx, b * sx, c * sy, d * sy, e, f])
    }

    /// This transform followed by a translation in local coordinates.
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        let [a, b, c, d, e, f] = self.0;
        Self([a, b, c, d, e + a * tx + c * ty, f + b * tx + d * ty])
    }

    pub fn apply_to(&self, p: Vec2) -> Vec2 {
        let [a, b, c, d, e, f] = self.0;
        Vec2::new(a * p.x() + c * p.y() + e, b * p.x() + d * p.y() + f)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Outline style for strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in current (transformed) units.
    pub width: f64,
    /// Dash pattern; empty for a solid line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: Color, width: f64, dash: Vec<f64>) -> Self {
        Self { color, width, dash }
    }
}

/// A 2D drawing target with a current transform.
pub trait Surface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform().scale(sx, sy);
        self.set_transform(t);
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        let t = self.transform().translate(tx, ty);
        self.set_transform(t);
    }

    /// Clear the whole surface.
    fn clear(&mut self);

    fn fill_polygon(&mut self, vertices: &[Vec2], color: Color);

    fn stroke_polygon(&mut self, vertices: &[Vec2], style: &StrokeStyle);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle);

    fn stroke_circle(&mut self, center: Vec2, radius: f64, style: &StrokeStyle);
}
