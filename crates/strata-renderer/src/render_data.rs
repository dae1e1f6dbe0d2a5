use serde::{Deserialize, Serialize};
use strata_core::color::Color;
use strata_core::math::Vec2;

use crate::camera::Viewport;
use crate::surface::{StrokeStyle, Surface, Transform};

/// One drawing operation, together with the transform active when it was issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    FillPolygon {
        transform: Transform,
        vertices: Vec<Vec2>,
        color: Color,
    },
    StrokePolygon {
        transform: Transform,
        vertices: Vec<Vec2>,
        style: StrokeStyle,
    },
    StrokeLine {
        transform: Transform,
        from: Vec2,
        to: Vec2,
        style: StrokeStyle,
    },
    StrokeCircle {
        transform: Transform,
        center: Vec2,
        radius: f64,
        style: StrokeStyle,
    },
}

/// A surface that records draw commands instead of rasterizing them.
/// Used by the headless binary and by tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    transform: Transform,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            transform: Transform::IDENTITY,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Package the commands recorded so far into a frame and start over.
    pub fn take_frame(&mut self, viewport: Viewport) -> RenderFrame {
        RenderFrame {
            width: self.width,
            height: self.height,
            viewport,
            commands: std::mem::take(&mut self.commands),
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_polygon(&mut self, vertices: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            transform: self.transform,
            vertices: vertices.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, vertices: &[Vec2], style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePolygon {
            transform: self.transform,
            vertices: vertices.to_vec(),
            style: style.clone(),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeLine {
            transform: self.transform,
            from,
            to,
            style: style.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f64, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeCircle {
            transform: self.transform,
            center,
            radius,
            style: style.clone(),
        });
    }
}

/// Complete render frame data, serializable for a frontend or a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub width: f64,
    pub height: f64,
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn empty(width: f64, height: f64, viewport: Viewport) -> Self {
        Self {
            width,
            height,
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPolygon { .. }))
            .count()
    }
}
