//! Interactive authoring: grid snapping, point collection and shape
//! preview.
//!
//! The workshop is an explicit state machine. It is idle until a command
//! alias is accepted, then collects points fed to it by the input layer
//! ([`Workshop::accept_point`]) until the command's acquisition rule is
//! met or Escape cancels it. Collection never blocks the frame loop: the
//! loop keeps calling [`Workshop::track_cursor`] and the render methods
//! while the workshop waits.

use serde::{Deserialize, Serialize};
use strata_core::color::Color;
use strata_core::geometry::BBox;
use strata_core::layer::{Layer, LayerId, Space};
use strata_core::math::{snap_to, Vec2};
use strata_core::shape::{ShapeId, ShapeOptions};
use strata_renderer::camera::{Axis, Camera};
use strata_renderer::surface::{StrokeStyle, Surface};

use crate::commands::{CommandRegistry, PointAcquisition, WorkshopCommand};
use crate::input::Key;

/// Grid lines drawn per axis before minor lines are skipped.
const MAX_GRID_LINES: f64 = 400.0;

/// Half-size of the cursor cross, in screen pixels.
const CURSOR_SIZE: f64 = 10.0;

/// Dash pattern of the preview outline, in screen pixels.
const PREVIEW_DASH: [f64; 2] = [15.0, 5.0];

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub spacing: f64,
    pub offset: Vec2,
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: 50.0,
            offset: Vec2::ZERO,
            snap: false,
        }
    }
}

impl GridSettings {
    /// Snap a point to the grid when snapping is on; otherwise return it unchanged.
    pub fn snap_point(&self, p: Vec2) -> Vec2 {
        if !self.snap {
            return p;
        }
        Vec2::new(
            snap_to(p.x(), self.spacing, self.offset.x()),
            snap_to(p.y(), self.spacing, self.offset.y()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopSettings {
    pub create_static_shapes: bool,
    /// Distance to the first point, in layer units, that closes a polyshape.
    pub close_polyline_threshold: f64,
    pub grid: GridSettings,
}

impl Default for WorkshopSettings {
    fn default() -> Self {
        Self {
            create_static_shapes: false,
            close_polyline_threshold: 20.0,
            grid: GridSettings::default(),
        }
    }
}

// ── State ────────────────────────────────────────────────────────────

/// The command being collected and its points so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCommand {
    pub command: usize,
    pub points: Vec<Vec2>,
    pub cursor_point: Option<Vec2>,
}

impl ActiveCommand {
    fn new(command: usize) -> Self {
        Self {
            command,
            points: Vec::new(),
            cursor_point: None,
        }
    }
}

/// What an input did to the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkshopOutcome {
    /// The input was not for the workshop.
    Ignored,
    /// A point was collected; the command waits for more.
    Pending,
    /// A shape was added to the active layer.
    Committed(ShapeId),
    /// The active command was dropped without producing a shape.
    Cancelled,
    /// A shape was removed from the active layer.
    Deleted(ShapeId),
}

#[derive(Debug, Default)]
pub struct Workshop {
    pub active_layer: Option<LayerId>,
    pub settings: WorkshopSettings,
    /// Whether the workshop currently receives input and draws its overlay.
    pub focus: bool,
    snapped: Vec2,
    commands: CommandRegistry,
    active: Option<ActiveCommand>,
}

impl Workshop {
    pub fn new(settings: WorkshopSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_commands(mut self, commands: CommandRegistry) -> Self {
        self.commands = commands;
        self
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn active(&self) -> Option<&ActiveCommand> {
        self.active.as_ref()
    }

    pub fn is_collecting(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_command(&self) -> Option<&dyn WorkshopCommand> {
        self.active.as_ref().and_then(|a| self.commands.get(a.command))
    }

    /// The last cursor position after snapping.
    pub fn snapped_cursor(&self) -> Vec2 {
        self.snapped
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.settings.grid.snap = !self.settings.grid.snap;
        self.settings.grid.snap
    }

    // ── Command control ──────────────────────────────────────────────

    /// Start the command answering to `alias`. Returns false, leaving the
    /// workshop untouched, when no command matches. A command already in
    /// progress is cancelled first.
    pub fn try_command(&mut self, alias: &str) -> bool {
        let Some(index) = self.commands.find(alias) else {
            return false;
        };
        if self.active.is_some() {
            self.cancel();
        }
        if let Some(command) = self.commands.get(index) {
            log::info!("{}", command.instructions());
        }
        self.active = Some(ActiveCommand::new(index));
        true
    }

    /// Drop the active command and its points.
    pub fn cancel(&mut self) -> WorkshopOutcome {
        match self.active.take() {
            Some(active) => {
                if let Some(command) = self.commands.get(active.command) {
                    log::info!("{} cancelled", command.name());
                }
                WorkshopOutcome::Cancelled
            }
            None => WorkshopOutcome::Ignored,
        }
    }

    pub fn handle_key(&mut self, key: &Key) -> WorkshopOutcome {
        if key.is_escape() {
            self.cancel()
        } else {
            WorkshopOutcome::Ignored
        }
    }

    /// Record the cursor, in active-layer coordinates, and return it snapped.
    pub fn track_cursor(&mut self, cursor: Vec2) -> Vec2 {
        self.snapped = self.settings.grid.snap_point(cursor);
        if let Some(active) = &mut self.active {
            active.cursor_point = Some(self.snapped);
        }
        self.snapped
    }

    /// Feed one click, in `layer` coordinates, to the active command.
    pub fn accept_point(&mut self, cursor: Vec2, layer: &mut Layer) -> WorkshopOutcome {
        let point = self.track_cursor(cursor);
        let threshold = self.settings.close_polyline_threshold;
        let Some(active) = &mut self.active else {
            return WorkshopOutcome::Ignored;
        };
        let Some(command) = self.commands.get(active.command) else {
            self.active = None;
            return WorkshopOutcome::Ignored;
        };

        let complete = match command.acquisition() {
            PointAcquisition::Exactly(n) => {
                active.points.push(point);
                active.points.len() >= n
            }
            PointAcquisition::UntilClosed => {
                let closes = active.points.len() >= 3
                    && active.points[0].distance(&point) <= threshold;
                if !closes {
                    active.points.push(point);
                }
                closes
            }
        };
        if !complete {
            return WorkshopOutcome::Pending;
        }

        let vertices = command.build(&active.points);
        let options = if self.settings.create_static_shapes {
            ShapeOptions::fixed()
        } else {
            ShapeOptions::default()
        };
        let id = layer.add_shape(vertices, options);
        log::info!("{} added to layer {}", command.name(), layer.id);

        if command.repeat() {
            *active = ActiveCommand::new(active.command);
            active.cursor_point = Some(point);
        } else {
            self.active = None;
        }
        WorkshopOutcome::Committed(id)
    }

    /// Context-menu delete: remove the shape under the cursor.
    pub fn context_delete(&mut self, layer: &mut Layer) -> WorkshopOutcome {
        match layer.delete_hovered_shape() {
            Some(id) => WorkshopOutcome::Deleted(id),
            None => WorkshopOutcome::Ignored,
        }
    }

    /// Whether the next click would close the polyshape being collected.
    pub fn would_close(&self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let closing = self
            .commands
            .get(active.command)
            .is_some_and(|c| c.acquisition() == PointAcquisition::UntilClosed);
        match (closing, active.points.first(), active.cursor_point) {
            (true, Some(first), Some(cursor)) => {
                active.points.len() > 2
                    && first.distance(&cursor) <= self.settings.close_polyline_threshold
            }
            _ => false,
        }
    }

    // ── Overlay rendering ────────────────────────────────────────────

    /// Draw the grid over the region `layer` covers: origin lines solid,
    /// the rest translucent.
    pub fn render_grid(&self, camera: &Camera, layer: &Layer, surface: &mut dyn Surface) {
        let (region, unit) = begin_overlay(camera, layer, surface);
        let spacing = self.settings.grid.spacing;
        let offset = self.settings.grid.offset;

        let origin = StrokeStyle::solid(Color::white(), unit);
        surface.stroke_line(
            Vec2::new(region.min.x(), offset.y()),
            Vec2::new(region.max.x(), offset.y()),
            &origin,
        );
        surface.stroke_line(
            Vec2::new(offset.x(), region.min.y()),
            Vec2::new(offset.x(), region.max.y()),
            &origin,
        );

        if spacing > 0.0
            && region.width() / spacing <= MAX_GRID_LINES
            && region.height() / spacing <= MAX_GRID_LINES
        {
            let minor = StrokeStyle::solid(Color::new(0.0, 100.0, 100.0, 0.5), unit);
            let rows = grid_steps(region.min.y(), region.max.y(), spacing, offset.y());
            for y in rows {
                surface.stroke_line(
                    Vec2::new(region.min.x(), y),
                    Vec2::new(region.max.x(), y),
                    &minor,
                );
            }
            let columns = grid_steps(region.min.x(), region.max.x(), spacing, offset.x());
            for x in columns {
                surface.stroke_line(
                    Vec2::new(x, region.min.y()),
                    Vec2::new(x, region.max.y()),
                    &minor,
                );
            }
        } else {
            log::debug!("grid too dense at spacing {spacing}, minor lines skipped");
        }
        camera.restore(surface);
    }

    /// Draw a cross at the snapped cursor while a command is active.
    pub fn render_cursor(&self, camera: &Camera, layer: &Layer, surface: &mut dyn Surface) {
        if self.active.is_none() {
            return;
        }
        let (_, unit) = begin_overlay(camera, layer, surface);
        let c = self.snapped;
        let w = CURSOR_SIZE * unit;
        let style = StrokeStyle::solid(Color::white(), unit);
        surface.stroke_line(c + Vec2::new(-w, -w), c + Vec2::new(w, w), &style);
        surface.stroke_line(c + Vec2::new(-w, w), c + Vec2::new(w, -w), &style);
        camera.restore(surface);
    }

    /// Draw the dashed outline of the shape being collected, with the
    /// cursor as its provisional last vertex.
    pub fn render_preview(&self, camera: &Camera, layer: &Layer, surface: &mut dyn Surface) {
        let Some(active) = &self.active else {
            return;
        };
        let (Some(command), Some(cursor)) =
            (self.commands.get(active.command), active.cursor_point)
        else {
            return;
        };
        if active.points.is_empty() {
            return;
        }
        let (_, unit) = begin_overlay(camera, layer, surface);
        let dash = PREVIEW_DASH.iter().map(|d| d * unit).collect();
        let style = StrokeStyle::dashed(Color::white(), 2.0 * unit, dash);
        let outline = command.preview(&active.points, cursor);
        if !outline.is_empty() {
            surface.stroke_polygon(&outline, &style);
        }
        if self.would_close() {
            surface.stroke_circle(active.points[0], self.settings.close_polyline_threshold, &style);
        }
        camera.restore(surface);
    }
}

/// Set up the surface for drawing in `layer` coordinates. Returns the
/// visible region and the size of one screen pixel in those coordinates.
fn begin_overlay(camera: &Camera, layer: &Layer, surface: &mut dyn Surface) -> (BBox, f64) {
    match layer.space {
        Space::World => {
            let vp = camera.apply(surface, layer.depth);
            (vp.bounds(), camera.dim_to_world(1.0, Axis::X, layer.depth))
        }
        Space::Foreground | Space::Background => (camera.canvas_viewport().bounds(), 1.0),
    }
}

/// Grid coordinates `k·spacing + offset` lying within `[lo, hi]`.
fn grid_steps(lo: f64, hi: f64, spacing: f64, offset: f64) -> impl Iterator<Item = f64> {
    let first = ((lo - offset) / spacing).ceil() as i64;
    let last = ((hi - offset) / spacing).floor() as i64;
    (first..=last).map(move |k| k as f64 * spacing + offset)
}
