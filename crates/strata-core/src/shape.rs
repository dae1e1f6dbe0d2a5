use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::{Color, ColorRanges};
use crate::math::Vec2;
use crate::physics::{BodyDesc, BodyHandle, PhysicsEngine, DEFAULT_RESTITUTION};

/// Unique identifier of a shape within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Options used when a shape is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeOptions {
    pub is_static: bool,
    /// `None` picks a random hue at 50% saturation and lightness.
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub restitution: f64,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            is_static: false,
            fill_color: None,
            stroke_color: None,
            restitution: DEFAULT_RESTITUTION,
        }
    }
}

impl ShapeOptions {
    pub fn fixed() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }
}

/// A polygon in a layer. Geometry and simulation state live in the layer's
/// physics engine; the shape holds the body handle and its render colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub body: BodyHandle,
    pub fill_color: Color,
    pub stroke_color: Color,
    /// Whether the layer cursor is over the shape; refreshed on every layer update.
    pub hover: bool,
}

impl Shape {
    /// Register a body for `vertices` with `engine` and wrap it.
    pub fn create(
        engine: &mut dyn PhysicsEngine,
        vertices: Vec<Vec2>,
        options: ShapeOptions,
    ) -> Self {
        let body = engine.add_body(
            BodyDesc::new(vertices)
                .with_static(options.is_static)
                .with_restitution(options.restitution),
        );
        Self {
            id: ShapeId::new(),
            body,
            fill_color: options
                .fill_color
                .unwrap_or_else(|| Color::random(ColorRanges::hue_only(50.0, 50.0, 1.0))),
            stroke_color: options.stroke_color.unwrap_or_else(Color::white),
            hover: false,
        }
    }

    pub fn vertices<'a>(&self, engine: &'a dyn PhysicsEngine) -> &'a [Vec2] {
        engine.vertices(self.body).unwrap_or(&[])
    }

    /// Center of mass.
    pub fn position(&self, engine: &dyn PhysicsEngine) -> Option<Vec2> {
        engine.position(self.body)
    }

    pub fn set_position(&self, engine: &mut dyn PhysicsEngine, position: Vec2) {
        engine.set_position(self.body, position);
    }

    pub fn is_static(&self, engine: &dyn PhysicsEngine) -> bool {
        engine.is_static(self.body)
    }

    /// Largest extent of the shape's bounds.
    pub fn max_dim(&self, engine: &dyn PhysicsEngine) -> f64 {
        engine
            .bounds(self.body)
            .map(|b| b.width().max(b.height()))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coords;
    use crate::physics::BasicEngine;

    #[test]
    fn test_create_defaults() {
        let mut engine = BasicEngine::new();
        let ring = Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(20.0, 10.0));
        let shape = Shape::create(&mut engine, ring, ShapeOptions::default());
        assert!(!shape.is_static(&engine));
        assert!(!shape.hover);
        assert_eq!(shape.fill_color.saturation(), 50.0);
        assert_eq!(shape.fill_color.lightness(), 50.0);
        assert_eq!(shape.stroke_color, Color::white());
        assert_eq!(shape.max_dim(&engine), 20.0);
    }

    #[test]
    fn test_position_proxies_body() {
        let mut engine = BasicEngine::new();
        let ring = Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let options = ShapeOptions::fixed().with_fill(Color::black());
        let shape = Shape::create(&mut engine, ring, options);
        assert_eq!(shape.fill_color, Color::black());
        assert_eq!(shape.position(&engine), Some(Vec2::new(5.0, 5.0)));
        shape.set_position(&mut engine, Vec2::new(0.0, 0.0));
        assert_eq!(shape.vertices(&engine)[0], Vec2::new(-5.0, -5.0));
    }
}
