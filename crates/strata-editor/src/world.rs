use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use strata_core::animation::{AnimationManager, Shared};
use strata_core::geometry::BBox;
use strata_core::layer::{Layer, LayerId, Space};
use strata_core::math::Vec2;
use strata_core::shape::ShapeId;
use strata_io::format::WorldFile;
use strata_renderer::camera::Camera;
use strata_renderer::layer_render::render_layer;
use strata_renderer::render_data::{RecordingSurface, RenderFrame};
use strata_renderer::surface::{Surface, Transform};

use crate::input::{Button, InputEvent};
use crate::observer::{Observers, SubscriptionId};
use crate::workshop::{Workshop, WorkshopOutcome};

/// One row of the layer table shown to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub id: LayerId,
    pub space: Space,
    pub depth: f64,
    pub shape_count: usize,
    pub active: bool,
    pub run_physics: bool,
}

/// Keeps a shape's position equal to a shared value, e.g. one driven by
/// an animation.
#[derive(Debug, Clone)]
struct PositionBinding {
    layer: LayerId,
    shape: ShapeId,
    position: Shared<2>,
}

/// The scene: depth-ordered layers, the camera looking at them, the
/// workshop editing them and the animations moving them.
///
/// Layers are kept in render order at all times (see
/// [`Layer::render_order`]); every method that adds or removes layers
/// re-sorts and notifies the layer observers.
#[derive(Debug)]
pub struct World {
    pub camera: Camera,
    pub workshop: Workshop,
    pub animations: AnimationManager,
    pub filename: Option<String>,
    layers: Vec<Layer>,
    previous_timestamp: Option<f64>,
    pointer_seen: bool,
    follow_cursor: Option<Shared<2>>,
    position_bindings: Vec<PositionBinding>,
    layer_observers: Observers<[LayerInfo]>,
}

impl World {
    /// An empty world with no layers.
    pub fn new(camera: Camera, workshop: Workshop) -> Self {
        Self {
            camera,
            workshop,
            animations: AnimationManager::new(),
            filename: None,
            layers: Vec::new(),
            previous_timestamp: None,
            pointer_seen: false,
            follow_cursor: None,
            position_bindings: Vec::new(),
            layer_observers: Observers::new(),
        }
    }

    /// The layers every fresh world starts with: one per space, all at depth 0.
    pub fn default_layers() -> Vec<Layer> {
        vec![
            Layer::new(Space::World, 0.0),
            Layer::new(Space::Background, 0.0),
            Layer::new(Space::Foreground, 0.0),
        ]
    }

    /// Rebuild a world from its file form. The world layer, if any, becomes
    /// the workshop layer and the workshop takes focus.
    pub fn from_file(file: WorldFile, camera: Camera, workshop: Workshop) -> Self {
        let filename = (!file.filename.is_empty()).then(|| file.filename.clone());
        let mut world = Self::new(camera, workshop);
        world.filename = filename;
        world.layers = file.into_layers();
        world.sort_layers();
        world.choose_workshop_layer();
        world.workshop.focus = true;
        world.notify_viewports();
        world
    }

    pub fn to_file(&self) -> WorldFile {
        WorldFile::from_layers(&self.layers, self.filename.as_deref().unwrap_or(""))
    }

    // ── Layers ───────────────────────────────────────────────────────

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(Layer::shape_count).sum()
    }

    pub fn add_layer(&mut self, mut layer: Layer) -> LayerId {
        if layer.has_content() {
            let region = self.region_of(&layer);
            layer.notify_viewport(region);
        }
        let id = layer.id;
        self.layers.push(layer);
        self.sort_layers();
        self.notify_layers();
        id
    }

    /// Remove a layer. When it was the workshop layer another one is chosen
    /// and any command in progress is cancelled.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let pos = self.layers.iter().position(|l| l.id == id)?;
        let layer = self.layers.remove(pos);
        self.position_bindings.retain(|b| b.layer != id);
        if self.workshop.active_layer == Some(id) {
            self.choose_workshop_layer();
        }
        self.sort_layers();
        self.notify_layers();
        Some(layer)
    }

    /// Restore render order: foreground, world, background; ascending depth
    /// within each space. The sort is stable.
    pub fn sort_layers(&mut self) {
        self.layers.sort_by(Layer::render_order);
    }

    /// Pick the workshop layer: the first world layer, else the first
    /// foreground layer, else the first background layer.
    pub fn choose_workshop_layer(&mut self) -> Option<LayerId> {
        let chosen = [Space::World, Space::Foreground, Space::Background]
            .into_iter()
            .find_map(|space| self.layers.iter().find(|l| l.space == space))
            .map(|l| l.id);
        self.switch_workshop_layer(chosen);
        self.notify_layers();
        chosen
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        if self.layer(id).is_none() {
            return false;
        }
        self.switch_workshop_layer(Some(id));
        self.notify_layers();
        true
    }

    /// Collected points are in the old layer's coordinates, so a command in
    /// progress is cancelled when the workshop moves to another layer.
    fn switch_workshop_layer(&mut self, layer: Option<LayerId>) {
        if self.workshop.active_layer != layer {
            self.workshop.cancel();
        }
        self.workshop.active_layer = layer;
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.workshop.active_layer.and_then(|id| self.layer(id))
    }

    pub fn focus_workshop(&mut self, focus: bool) {
        self.workshop.focus = focus;
    }

    pub fn toggle_workshop(&mut self) -> bool {
        self.workshop.focus = !self.workshop.focus;
        self.workshop.focus
    }

    /// Switch physics on or off for every layer, or for one space only.
    pub fn run_physics(&mut self, value: bool, space: Option<Space>) {
        for layer in &mut self.layers {
            if space.map_or(true, |s| s == layer.space) {
                layer.run_physics = value;
            }
        }
        self.notify_layers();
    }

    /// Reset to the default layers and drop every animation.
    pub fn clear(&mut self) {
        self.animations.clear();
        self.position_bindings.clear();
        self.follow_cursor = None;
        self.filename = None;
        self.workshop.cancel();
        self.layers = Self::default_layers();
        self.sort_layers();
        self.choose_workshop_layer();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.set_canvas_size(width, height);
        self.notify_viewports();
    }

    /// Context-menu delete on the workshop layer.
    pub fn delete_hovered_shape(&mut self) -> Option<ShapeId> {
        let id = self.workshop.active_layer?;
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        match self.workshop.context_delete(layer) {
            WorkshopOutcome::Deleted(shape) => {
                log::info!("deleted shape {} from layer {}", shape.0, id);
                self.notify_layers();
                Some(shape)
            }
            _ => None,
        }
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe_layers(
        &mut self,
        callback: impl FnMut(&[LayerInfo]) + 'static,
    ) -> SubscriptionId {
        self.layer_observers.subscribe(callback)
    }

    pub fn unsubscribe_layers(&mut self, id: SubscriptionId) -> bool {
        self.layer_observers.unsubscribe(id)
    }

    pub fn layer_summaries(&self) -> Vec<LayerInfo> {
        self.layers
            .iter()
            .map(|l| LayerInfo {
                id: l.id,
                space: l.space,
                depth: l.depth,
                shape_count: l.shape_count(),
                active: self.workshop.active_layer == Some(l.id),
                run_physics: l.run_physics,
            })
            .collect()
    }

    fn notify_layers(&mut self) {
        if self.layer_observers.is_empty() {
            return;
        }
        let summaries = self.layer_summaries();
        self.layer_observers.notify(&summaries);
    }

    // ── Animation glue ───────────────────────────────────────────────

    /// A value that follows the world cursor, updated at the start of every
    /// frame. Created on first use.
    pub fn follow_cursor(&mut self) -> Shared<2> {
        let cursor = self.camera.real_cursor();
        Rc::clone(self.follow_cursor.get_or_insert_with(|| Rc::new(Cell::new(cursor))))
    }

    /// Move a shape to `position` on every frame, after animations ran.
    pub fn bind_shape_position(&mut self, layer: LayerId, shape: ShapeId, position: Shared<2>) {
        self.position_bindings.push(PositionBinding { layer, shape, position });
    }

    fn apply_position_bindings(&mut self) {
        let layers = &mut self.layers;
        self.position_bindings.retain(|binding| {
            let Some(layer) = layers.iter_mut().find(|l| l.id == binding.layer) else {
                return false;
            };
            let Some(body) = layer.shape(binding.shape).map(|s| s.body) else {
                return false;
            };
            layer.engine_mut().set_position(body, binding.position.get());
            true
        });
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Route one input event to the camera and the workshop.
    pub fn handle_event(&mut self, event: &InputEvent) -> WorkshopOutcome {
        match event {
            InputEvent::PointerDown { screen, button } => {
                self.pointer_at(*screen);
                match button {
                    Button::Secondary => {
                        self.camera.begin_pan(*screen);
                        WorkshopOutcome::Ignored
                    }
                    Button::Primary if self.workshop.focus => self.click(),
                    _ => WorkshopOutcome::Ignored,
                }
            }
            InputEvent::PointerMove { screen } => {
                if self.camera.drag_pan(*screen) {
                    self.notify_viewports();
                }
                self.pointer_at(*screen);
                WorkshopOutcome::Ignored
            }
            InputEvent::PointerUp { screen, button } => {
                self.pointer_at(*screen);
                if *button == Button::Secondary {
                    self.camera.end_pan();
                }
                WorkshopOutcome::Ignored
            }
            InputEvent::Wheel { delta_y } => {
                self.camera.wheel(*delta_y);
                self.notify_viewports();
                self.refresh_cursors();
                WorkshopOutcome::Ignored
            }
            InputEvent::KeyDown { key } => self.workshop.handle_key(key),
            InputEvent::ContextMenu { screen } => {
                self.pointer_at(*screen);
                match self.delete_hovered_shape() {
                    Some(id) => WorkshopOutcome::Deleted(id),
                    None => WorkshopOutcome::Ignored,
                }
            }
        }
    }

    fn pointer_at(&mut self, screen: Vec2) {
        self.pointer_seen = true;
        self.camera.update_cursor(Some(screen));
        self.refresh_cursors();
    }

    /// Push the camera cursor into every layer and the workshop.
    fn refresh_cursors(&mut self) {
        if !self.pointer_seen {
            return;
        }
        for layer in &mut self.layers {
            layer.set_cursor(Some(self.camera.cursor_in_space(layer.space, layer.depth)));
        }
        if let Some(cursor) = self.workshop_cursor() {
            self.workshop.track_cursor(cursor);
        }
    }

    /// The cursor in workshop-layer coordinates.
    fn workshop_cursor(&self) -> Option<Vec2> {
        self.active_layer()
            .map(|l| self.camera.cursor_in_space(l.space, l.depth))
    }

    fn click(&mut self) -> WorkshopOutcome {
        let Some(cursor) = self.workshop_cursor() else {
            return WorkshopOutcome::Ignored;
        };
        let Some(id) = self.workshop.active_layer else {
            return WorkshopOutcome::Ignored;
        };
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return WorkshopOutcome::Ignored;
        };
        let outcome = self.workshop.accept_point(cursor, layer);
        if matches!(outcome, WorkshopOutcome::Committed(_)) {
            self.notify_layers();
        }
        outcome
    }

    /// The region `layer` covers, in its own coordinates.
    fn region_of(&self, layer: &Layer) -> BBox {
        match layer.space {
            Space::World => self.camera.viewport_at_depth(layer.depth).bounds(),
            Space::Foreground | Space::Background => self.camera.canvas_viewport().bounds(),
        }
    }

    /// Tell every layer with generated content what it now covers.
    pub fn notify_viewports(&mut self) {
        for i in 0..self.layers.len() {
            if self.layers[i].has_content() {
                let region = self.region_of(&self.layers[i]);
                self.layers[i].notify_viewport(region);
            }
        }
    }

    // ── Frame loop ───────────────────────────────────────────────────

    /// Run one frame at `timestamp_ms` and return the seconds it advanced.
    ///
    /// Order within a frame: clear, follow cursor, animations, layers
    /// (update then render, in render order), then the workshop overlay
    /// (grid, cursor, preview) when the workshop has focus.
    pub fn frame(&mut self, timestamp_ms: f64, surface: &mut dyn Surface) -> f64 {
        surface.set_transform(Transform::IDENTITY);
        surface.clear();

        if let Some(follow) = &self.follow_cursor {
            follow.set(self.camera.real_cursor());
        }

        let dt = match self.previous_timestamp {
            Some(previous) => ((timestamp_ms - previous) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.previous_timestamp = Some(timestamp_ms);

        self.animations.update(dt);
        self.apply_position_bindings();
        self.refresh_cursors();

        for layer in &mut self.layers {
            layer.update(dt);
            render_layer(layer, &self.camera, surface);
        }

        if self.workshop.focus {
            if let Some(id) = self.workshop.active_layer {
                if let Some(layer) = self.layers.iter().find(|l| l.id == id) {
                    let cursor = self.camera.cursor_in_space(layer.space, layer.depth);
                    self.workshop.track_cursor(cursor);
                    self.workshop.render_grid(&self.camera, layer, surface);
                    self.workshop.render_cursor(&self.camera, layer, surface);
                    self.workshop.render_preview(&self.camera, layer, surface);
                }
            }
        }
        dt
    }

    /// Run `frames` frames `interval_ms` apart on a recording surface the
    /// size of the canvas and return the last one.
    pub fn render_frames(&mut self, frames: u32, interval_ms: f64) -> RenderFrame {
        let canvas = self.camera.canvas_size();
        let mut surface = RecordingSurface::new(canvas.x(), canvas.y());
        let start = self.previous_timestamp.map_or(0.0, |t| t + interval_ms);
        let mut frame = RenderFrame::empty(canvas.x(), canvas.y(), self.camera.viewport());
        for i in 0..frames {
            self.frame(start + f64::from(i) * interval_ms, &mut surface);
            frame = surface.take_frame(self.camera.viewport());
        }
        frame
    }
}

impl Default for World {
    /// The default world: one layer per space, workshop on the world layer
    /// and focused.
    fn default() -> Self {
        let mut world = Self::new(Camera::default(), Workshop::default());
        world.layers = Self::default_layers();
        world.sort_layers();
        world.choose_workshop_layer();
        world.workshop.focus = true;
        world
    }
}
