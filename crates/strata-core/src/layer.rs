use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::geometry::BBox;
use crate::math::{Vec2, Vec4};
use crate::physics::{BasicEngine, BodyHandle, PhysicsEngine};
use crate::shape::{Shape, ShapeId, ShapeOptions};
use crate::spatial::{SpatialEntry, SpatialIndex};

/// A unique layer identifier.
pub type LayerId = Uuid;

/// Where a layer is drawn.
///
/// `World` layers are projected through the camera at their depth;
/// `Foreground` and `Background` layers are fixed to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    World,
    Foreground,
    Background,
}

impl Space {
    /// Iteration priority: foreground first, background last.
    pub fn priority(self) -> u8 {
        match self {
            Space::Foreground => 0,
            Space::World => 1,
            Space::Background => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Space::World => "world",
            Space::Foreground => "foreground",
            Space::Background => "background",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "world" => Some(Space::World),
            "foreground" => Some(Space::Foreground),
            "background" => Some(Space::Background),
            _ => None,
        }
    }
}

/// Content generated for a layer whenever the visible region changes.
pub trait DynamicContent: fmt::Debug {
    /// Called with the region the layer currently covers, in the layer's
    /// own coordinates.
    fn viewport_changed(&mut self, layer: &mut Layer, region: BBox);
}

/// A set of shapes sharing one physics engine, a space and a depth.
#[derive(Debug)]
pub struct Layer {
    pub id: LayerId,
    pub space: Space,
    pub depth: f64,
    pub modulation_color: Color,
    pub modulation_factor: Vec4,
    pub run_physics: bool,
    shapes: Vec<Shape>,
    engine: Box<dyn PhysicsEngine>,
    cursor: Option<Vec2>,
    first_hover: Option<ShapeId>,
    content: Option<Box<dyn DynamicContent>>,
}

impl Layer {
    pub fn new(space: Space, depth: f64) -> Self {
        Self::with_engine(space, depth, Box::new(BasicEngine::new()))
    }

    pub fn with_engine(space: Space, depth: f64, engine: Box<dyn PhysicsEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            space,
            depth,
            modulation_color: Color::new(0.0, 0.0, 50.0, 0.0),
            modulation_factor: Vec4::ZERO,
            run_physics: true,
            shapes: Vec::new(),
            engine,
            cursor: None,
            first_hover: None,
            content: None,
        }
    }

    pub fn with_id(mut self, id: LayerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_modulation(mut self, color: Color, factor: Vec4) -> Self {
        self.modulation_color = color;
        self.modulation_factor = factor;
        self
    }

    /// Render and update order: by space priority, then ascending depth.
    pub fn render_order(a: &Layer, b: &Layer) -> Ordering {
        a.space
            .priority()
            .cmp(&b.space.priority())
            .then(a.depth.total_cmp(&b.depth))
    }

    // ── Shapes ───────────────────────────────────────────────────────

    pub fn add_shape(&mut self, vertices: Vec<Vec2>, options: ShapeOptions) -> ShapeId {
        let shape = Shape::create(self.engine.as_mut(), vertices, options);
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Remove a shape and its body. Returns false when the id is unknown.
    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        let Some(pos) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        let shape = self.shapes.remove(pos);
        self.engine.remove_body(shape.body);
        if self.first_hover == Some(id) {
            self.first_hover = None;
        }
        true
    }

    /// Delete the first shape under the cursor, if any.
    pub fn delete_hovered_shape(&mut self) -> Option<ShapeId> {
        let id = self.first_hover?;
        self.delete_shape(id).then_some(id)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn vertices_of(&self, id: ShapeId) -> Option<&[Vec2]> {
        self.shape(id).and_then(|s| self.engine.vertices(s.body))
    }

    pub fn engine(&self) -> &dyn PhysicsEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn PhysicsEngine {
        self.engine.as_mut()
    }

    // ── Cursor & hover ───────────────────────────────────────────────

    /// Cursor in this layer's coordinates: depth-adjusted world coordinates
    /// for world layers, screen pixels otherwise.
    pub fn set_cursor(&mut self, cursor: Option<Vec2>) {
        self.cursor = cursor;
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// The first shape (in shape order) under the cursor at the last update.
    pub fn first_hover_shape(&self) -> Option<ShapeId> {
        self.first_hover
    }

    /// Advance the physics by `dt` seconds, then refresh hover flags.
    pub fn update(&mut self, dt: f64) {
        if self.run_physics {
            self.engine.step(dt * 1000.0);
        }
        let Some(cursor) = self.cursor else {
            return;
        };

        let entries: Vec<SpatialEntry> = self
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(shape_index, s)| {
                self.engine
                    .bounds(s.body)
                    .map(|bbox| SpatialEntry { shape_index, bbox })
            })
            .collect();
        let index = SpatialIndex::build(entries);
        let candidates: Vec<BodyHandle> = index
            .query_point(cursor)
            .into_iter()
            .map(|i| self.shapes[i].body)
            .collect();
        let hits = self.engine.query_point(&candidates, cursor);

        self.first_hover = None;
        for shape in &mut self.shapes {
            shape.hover = hits.contains(&shape.body);
            if shape.hover && self.first_hover.is_none() {
                self.first_hover = Some(shape.id);
            }
        }
    }

    /// Shapes whose bounds intersect `region`, in shape order.
    pub fn shapes_in_region(&self, region: &BBox) -> Vec<&Shape> {
        let entries: Vec<SpatialEntry> = self
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(shape_index, s)| {
                self.engine
                    .bounds(s.body)
                    .map(|bbox| SpatialEntry { shape_index, bbox })
            })
            .collect();
        SpatialIndex::build(entries)
            .query_region(region)
            .into_iter()
            .map(|i| &self.shapes[i])
            .collect()
    }

    // ── Dynamic content ──────────────────────────────────────────────

    pub fn set_content(&mut self, content: Box<dyn DynamicContent>) {
        self.content = Some(content);
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Let the content strategy, if any, react to a new visible region.
    pub fn notify_viewport(&mut self, region: BBox) {
        if let Some(mut content) = self.content.take() {
            content.viewport_changed(self, region);
            self.content = Some(content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coords;

    fn boxed(layer: &mut Layer, a: (f64, f64), b: (f64, f64)) -> ShapeId {
        layer.add_shape(
            Coords::corner_box(Vec2::new(a.0, a.1), Vec2::new(b.0, b.1)),
            ShapeOptions::fixed(),
        )
    }

    #[test]
    fn test_layer_defaults() {
        let layer = Layer::new(Space::World, 0.0);
        assert!(layer.run_physics);
        assert_eq!(layer.modulation_color, Color::new(0.0, 0.0, 50.0, 0.0));
        assert_eq!(layer.modulation_factor, Vec4::ZERO);
        assert_eq!(layer.shape_count(), 0);
        assert!(layer.cursor().is_none());
    }

    #[test]
    fn test_space_priority_and_json() {
        assert!(Space::Foreground.priority() < Space::World.priority());
        assert!(Space::World.priority() < Space::Background.priority());
        assert_eq!(serde_json::to_string(&Space::Foreground).unwrap(), "\"foreground\"");
        assert_eq!(Space::from_name("background"), Some(Space::Background));
        assert_eq!(Space::from_name("renderspace"), None);
    }

    #[test]
    fn test_hover_marks_overlapping_shapes() {
        let mut layer = Layer::new(Space::World, 0.0);
        let a = boxed(&mut layer, (0.0, 0.0), (10.0, 10.0));
        let b = boxed(&mut layer, (5.0, 5.0), (15.0, 15.0));
        let c = boxed(&mut layer, (50.0, 50.0), (60.0, 60.0));

        layer.update(0.016);
        assert!(layer.first_hover_shape().is_none());

        layer.set_cursor(Some(Vec2::new(7.0, 7.0)));
        layer.update(0.016);
        assert_eq!(layer.first_hover_shape(), Some(a));
        let hovered: Vec<ShapeId> =
            layer.shapes().iter().filter(|s| s.hover).map(|s| s.id).collect();
        assert_eq!(hovered, vec![a, b]);
        assert!(!layer.shape(c).unwrap().hover);

        layer.set_cursor(Some(Vec2::new(100.0, 100.0)));
        layer.update(0.016);
        assert!(layer.first_hover_shape().is_none());
        assert!(layer.shapes().iter().all(|s| !s.hover));
    }

    #[test]
    fn test_delete_hovered_shape() {
        let mut layer = Layer::new(Space::Foreground, 1.0);
        let a = boxed(&mut layer, (0.0, 0.0), (10.0, 10.0));
        boxed(&mut layer, (20.0, 0.0), (30.0, 10.0));
        assert!(layer.delete_hovered_shape().is_none());
        layer.set_cursor(Some(Vec2::new(5.0, 5.0)));
        layer.update(0.0);
        assert_eq!(layer.delete_hovered_shape(), Some(a));
        assert_eq!(layer.shape_count(), 1);
        assert!(layer.shape(a).is_none());
        assert!(!layer.delete_shape(a));
    }

    #[test]
    fn test_update_steps_physics_in_milliseconds() {
        let mut layer = Layer::new(Space::World, 0.0);
        let id = layer.add_shape(
            Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)),
            ShapeOptions::default(),
        );
        layer.update(0.1);
        // v = g·dt = 0.1 px/ms, dy = v·dt = 10 px
        let y = layer.shape(id).unwrap().position(layer.engine()).unwrap().y();
        assert!((y - 15.0).abs() < 1e-9);

        layer.run_physics = false;
        layer.update(0.1);
        let still = layer.shape(id).unwrap().position(layer.engine()).unwrap().y();
        assert!((still - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_shapes_in_region() {
        let mut layer = Layer::new(Space::World, 0.0);
        let a = boxed(&mut layer, (0.0, 0.0), (10.0, 10.0));
        boxed(&mut layer, (100.0, 100.0), (110.0, 110.0));
        let region = BBox::new(Vec2::new(-1.0, -1.0), Vec2::new(20.0, 20.0));
        let visible: Vec<ShapeId> = layer.shapes_in_region(&region).iter().map(|s| s.id).collect();
        assert_eq!(visible, vec![a]);
    }

    #[derive(Debug, Default)]
    struct Counter {
        calls: usize,
    }

    impl DynamicContent for Counter {
        fn viewport_changed(&mut self, layer: &mut Layer, region: BBox) {
            self.calls += 1;
            layer.add_shape(
                Coords::corner_box(region.min, region.min + Vec2::new(1.0, 1.0)),
                ShapeOptions::fixed(),
            );
        }
    }

    #[test]
    fn test_dynamic_content_invoked_on_viewport_change() {
        let mut layer = Layer::new(Space::World, 0.0);
        layer.notify_viewport(BBox::new(Vec2::ZERO, Vec2::splat(10.0)));
        assert_eq!(layer.shape_count(), 0);
        layer.set_content(Box::new(Counter::default()));
        layer.notify_viewport(BBox::new(Vec2::ZERO, Vec2::splat(10.0)));
        layer.notify_viewport(BBox::new(Vec2::ZERO, Vec2::splat(10.0)));
        assert_eq!(layer.shape_count(), 2);
        assert!(layer.has_content());
    }
}
