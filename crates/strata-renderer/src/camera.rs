use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};
use strata_core::geometry::BBox;
use strata_core::layer::Space;
use strata_core::math::Vec2;

use crate::surface::{Surface, Transform};

/// Multiplier applied to the camera distance per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Closest the camera, or any layer seen through it, may get to the plane.
pub const MIN_DISTANCE: f64 = 1.0;
pub const MAX_DISTANCE: f64 = 1e9;

/// The region of the world plane visible at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    /// Canvas pixels per world unit, per axis.
    pub scale: Vec2,
}

impl Viewport {
    /// The identity viewport of a canvas: one world unit per pixel.
    pub fn canvas(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            right: width,
            top: 0.0,
            bottom: height,
            width,
            height,
            scale: Vec2::new(1.0, 1.0),
        }
    }

    pub fn bounds(&self) -> BBox {
        BBox::new(Vec2::new(self.left, self.top), Vec2::new(self.right, self.bottom))
    }
}

/// Axis selector for scalar dimension conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub distance: f64,
    pub initial_position: Vec2,
    pub field_of_view: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 1000.0,
            initial_position: Vec2::ZERO,
            field_of_view: FRAC_PI_4,
        }
    }
}

/// Maps between canvas pixels and the world plane.
///
/// `distance` controls the zoom: the viewport is `distance · tan(fov)` world
/// units wide. Layers further away are drawn with the distance offset by
/// their depth, so one camera serves every depth. All depth-offset
/// conversions are computed without mutating the camera.
#[derive(Debug, Clone)]
pub struct Camera {
    distance: f64,
    look_at: Vec2,
    field_of_view: f64,
    canvas: Vec2,
    viewport: Viewport,
    screen_cursor: Vec2,
    real_cursor: Vec2,
    pan_start: Option<Vec2>,
}

impl Camera {
    pub fn new(canvas_width: f64, canvas_height: f64, settings: CameraSettings) -> Self {
        let canvas = Vec2::new(canvas_width.max(1.0), canvas_height.max(1.0));
        let mut camera = Self {
            distance: clamp_distance(settings.distance, CameraSettings::default().distance),
            look_at: settings.initial_position,
            field_of_view: settings.field_of_view,
            canvas,
            viewport: Viewport::canvas(canvas.x(), canvas.y()),
            screen_cursor: Vec2::ZERO,
            real_cursor: Vec2::ZERO,
            pan_start: None,
        };
        camera.update_viewport();
        camera
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn look_at(&self) -> Vec2 {
        self.look_at
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    pub fn canvas_viewport(&self) -> Viewport {
        Viewport::canvas(self.canvas.x(), self.canvas.y())
    }

    /// The viewport seen with the distance offset by `depth`. Layers that
    /// would end up at or behind the camera are held at [`MIN_DISTANCE`].
    pub fn viewport_at_depth(&self, depth: f64) -> Viewport {
        let distance = clamp_distance(self.distance + depth, MIN_DISTANCE);
        let aspect = self.canvas.x() / self.canvas.y();
        let width = distance * self.field_of_view.tan();
        let height = width / aspect;
        let left = self.look_at.x() - width / 2.0;
        let top = self.look_at.y() - height / 2.0;
        Viewport {
            left,
            right: left + width,
            top,
            bottom: top + height,
            width,
            height,
            scale: Vec2::new(self.canvas.x() / width, self.canvas.y() / height),
        }
    }

    fn update_viewport(&mut self) {
        self.viewport = self.viewport_at_depth(0.0);
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = Vec2::new(width.max(1.0), height.max(1.0));
        log::debug!("canvas resized to {}x{}", self.canvas.x(), self.canvas.y());
        self.update_viewport();
        self.update_cursor(None);
    }

    // ── Conversions ──────────────────────────────────────────────────

    pub fn coords_to_world(&self, screen: Vec2, depth: f64) -> Vec2 {
        let vp = self.viewport_at_depth(depth);
        screen / vp.scale + Vec2::new(vp.left, vp.top)
    }

    pub fn coords_to_screen(&self, world: Vec2, depth: f64) -> Vec2 {
        let vp = self.viewport_at_depth(depth);
        (world - Vec2::new(vp.left, vp.top)) * vp.scale
    }

    pub fn dims_to_world(&self, dims: Vec2, depth: f64) -> Vec2 {
        dims / self.viewport_at_depth(depth).scale
    }

    pub fn dims_to_screen(&self, dims: Vec2, depth: f64) -> Vec2 {
        dims * self.viewport_at_depth(depth).scale
    }

    /// A screen length along `axis` in world units.
    pub fn dim_to_world(&self, dim: f64, axis: Axis, depth: f64) -> f64 {
        dim / axis_scale(&self.viewport_at_depth(depth), axis)
    }

    /// A world length along `axis` in screen pixels.
    pub fn dim_to_screen(&self, dim: f64, axis: Axis, depth: f64) -> f64 {
        dim * axis_scale(&self.viewport_at_depth(depth), axis)
    }

    // ── Drawing transform ────────────────────────────────────────────

    /// Multiply the world transform for `depth` onto the surface and return
    /// the viewport used. Must be paired with [`Camera::restore`]; calls do
    /// not nest.
    pub fn apply(&self, surface: &mut dyn Surface, depth: f64) -> Viewport {
        let vp = self.viewport_at_depth(depth);
        surface.scale(vp.scale.x(), vp.scale.y());
        surface.translate(-vp.left, -vp.top);
        vp
    }

    /// Reset the surface to the identity transform.
    pub fn restore(&self, surface: &mut dyn Surface) {
        surface.set_transform(Transform::IDENTITY);
    }

    // ── Movement ─────────────────────────────────────────────────────

    pub fn zoom_to(&mut self, distance: f64) {
        self.distance = clamp_distance(distance, self.distance);
        self.update_viewport();
        self.update_cursor(None);
    }

    pub fn zoom_multiply(&mut self, factor: f64) {
        self.distance = clamp_distance(self.distance * factor, self.distance);
        self.update_viewport();
        self.update_cursor(None);
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.look_at = position;
        self.update_viewport();
        self.update_cursor(None);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.look_at += delta;
        self.update_viewport();
        self.update_cursor(None);
    }

    /// Center on `center` and pick the distance that shows `max_dim` world units across.
    pub fn focus_on(&mut self, center: Vec2, max_dim: Option<f64>) {
        self.look_at = center;
        if let Some(dim) = max_dim {
            self.distance = clamp_distance(dim / self.field_of_view.tan(), self.distance);
        }
        self.update_viewport();
        self.update_cursor(None);
    }

    /// Wheel input: a negative delta multiplies the distance by the zoom
    /// step, anything else by its reciprocal. The world point under the
    /// cursor stays put.
    pub fn wheel(&mut self, delta_y: f64) {
        let anchor = self.real_cursor;
        let factor = if delta_y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.distance = clamp_distance(self.distance * factor, self.distance);
        self.update_viewport();
        let drift = self.coords_to_world(self.screen_cursor, 0.0) - anchor;
        self.look_at -= drift;
        self.update_viewport();
        self.update_cursor(None);
    }

    // ── Cursor & panning ─────────────────────────────────────────────

    /// Record a new screen cursor (if given) and recompute its world position.
    pub fn update_cursor(&mut self, screen: Option<Vec2>) {
        if let Some(screen) = screen {
            self.screen_cursor = screen;
        }
        self.real_cursor = self.coords_to_world(self.screen_cursor, 0.0);
    }

    pub fn screen_cursor(&self) -> Vec2 {
        self.screen_cursor
    }

    /// The cursor on the world plane at depth zero.
    pub fn real_cursor(&self) -> Vec2 {
        self.real_cursor
    }

    pub fn real_cursor_at_depth(&self, depth: f64) -> Vec2 {
        self.coords_to_world(self.screen_cursor, depth)
    }

    /// The cursor as seen by a layer: world coordinates at the layer depth
    /// for world space, screen pixels otherwise.
    pub fn cursor_in_space(&self, space: Space, depth: f64) -> Vec2 {
        match space {
            Space::World => self.real_cursor_at_depth(depth),
            Space::Foreground | Space::Background => self.screen_cursor,
        }
    }

    /// Start a drag-pan at the current cursor. A session already in
    /// progress is replaced.
    pub fn begin_pan(&mut self, screen: Vec2) {
        self.update_cursor(Some(screen));
        self.pan_start = Some(self.real_cursor);
    }

    /// Move the view so the world point grabbed by [`Camera::begin_pan`]
    /// stays under the cursor. Returns false when no pan is active.
    pub fn drag_pan(&mut self, screen: Vec2) -> bool {
        self.update_cursor(Some(screen));
        let Some(start) = self.pan_start else {
            return false;
        };
        self.pan(start - self.real_cursor);
        true
    }

    pub fn end_pan(&mut self) -> bool {
        self.pan_start.take().is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.pan_start.is_some()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1280.0, 720.0, CameraSettings::default())
    }
}

/// Keep a distance within [`MIN_DISTANCE`, `MAX_DISTANCE`]; NaN falls back.
fn clamp_distance(distance: f64, fallback: f64) -> f64 {
    if distance.is_nan() {
        fallback
    } else {
        distance.clamp(MIN_DISTANCE, MAX_DISTANCE)
    }
}

fn axis_scale(vp: &Viewport, axis: Axis) -> f64 {
    match axis {
        Axis::X => vp.scale.x(),
        Axis::Y => vp.scale.y(),
    }
}
