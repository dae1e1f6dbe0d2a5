//! The world file layout.
//!
//! ```json
//! { "layers": [ { "space": "world", "depth": 0, "id": "…",
//!                 "modulationColor": [h, s, l, a], "modulationFactor": [f, f, f, f],
//!                 "shapes": [ { "vertices": [[x, y], …], "fillColor": [h, s, l, a],
//!                               "isStatic": true } ] } ],
//!   "filename": "example.json" }
//! ```

use serde::{Deserialize, Serialize};
use strata_core::color::Color;
use strata_core::layer::{Layer, LayerId, Space};
use strata_core::math::{Vec2, Vec4};
use strata_core::physics::PhysicsEngine;
use strata_core::shape::{Shape, ShapeOptions};
use uuid::Uuid;

use crate::error::PersistError;

/// A whole world as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldFile {
    pub layers: Vec<LayerFile>,
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFile {
    pub space: Space,
    pub depth: f64,
    #[serde(default = "Uuid::new_v4")]
    pub id: LayerId,
    #[serde(default = "default_modulation_color")]
    pub modulation_color: Color,
    #[serde(default)]
    pub modulation_factor: Vec4,
    #[serde(default)]
    pub shapes: Vec<ShapeFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeFile {
    pub vertices: Vec<Vec2>,
    #[serde(default = "Color::white")]
    pub fill_color: Color,
    #[serde(default = "default_static")]
    pub is_static: bool,
    /// Accepted when present, never written.
    #[serde(default, skip_serializing)]
    pub stroke_color: Option<Color>,
}

fn default_modulation_color() -> Color {
    Color::new(0.0, 0.0, 50.0, 0.0)
}

fn default_static() -> bool {
    true
}

impl ShapeFile {
    pub fn from_shape(shape: &Shape, engine: &dyn PhysicsEngine) -> Self {
        Self {
            vertices: shape.vertices(engine).to_vec(),
            fill_color: shape.fill_color,
            is_static: shape.is_static(engine),
            stroke_color: None,
        }
    }

    pub fn options(&self) -> ShapeOptions {
        ShapeOptions {
            is_static: self.is_static,
            fill_color: Some(self.fill_color),
            stroke_color: self.stroke_color,
            ..ShapeOptions::default()
        }
    }
}

impl LayerFile {
    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            space: layer.space,
            depth: layer.depth,
            id: layer.id,
            modulation_color: layer.modulation_color,
            modulation_factor: layer.modulation_factor,
            shapes: layer
                .shapes()
                .iter()
                .map(|s| ShapeFile::from_shape(s, layer.engine()))
                .collect(),
        }
    }

    /// Rebuild the layer, registering a body for every shape.
    pub fn into_layer(self) -> Layer {
        let mut layer = Layer::new(self.space, self.depth)
            .with_id(self.id)
            .with_modulation(self.modulation_color, self.modulation_factor);
        for shape in self.shapes {
            let options = shape.options();
            layer.add_shape(shape.vertices, options);
        }
        layer
    }
}

impl WorldFile {
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Layer>, filename: &str) -> Self {
        Self {
            layers: layers.into_iter().map(LayerFile::from_layer).collect(),
            filename: filename.to_string(),
        }
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers.into_iter().map(LayerFile::into_layer).collect()
    }

    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(|l| l.shapes.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }
}
