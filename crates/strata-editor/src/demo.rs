//! Named worlds built in code, used when no saved world is available and
//! for trying out layer ordering, animation and generated content.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use strata_core::animation::{AttractionFollow, DynamicBinding, Iterations, PathTween, TimeFunction};
use strata_core::color::{Color, ColorRanges};
use strata_core::geometry::{BBox, Coords, Path};
use strata_core::layer::{DynamicContent, Layer, Space};
use strata_core::math::Vec2;
use strata_core::shape::{ShapeId, ShapeOptions};
use strata_renderer::camera::Camera;

use crate::workshop::Workshop;
use crate::world::World;

/// Tiles generated per viewport change before generation is skipped.
const MAX_TILES_PER_UPDATE: usize = 1024;

/// Tiles kept around the visible region before they are evicted.
const EVICTION_MARGIN: i64 = 2;

/// Largest tile index generated; beyond it tile centers lose precision.
const MAX_TILE_INDEX: f64 = 1e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Default,
    LayerSorting,
    Orbit,
    Generated,
}

impl DemoKind {
    pub const ALL: [DemoKind; 4] = [
        DemoKind::Default,
        DemoKind::LayerSorting,
        DemoKind::Orbit,
        DemoKind::Generated,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::Default => "default",
            DemoKind::LayerSorting => "layer-sorting",
            DemoKind::Orbit => "orbit",
            DemoKind::Generated => "generated",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

pub fn demo_names() -> Vec<&'static str> {
    DemoKind::ALL.iter().map(|k| k.name()).collect()
}

impl World {
    /// Build the demo world `kind` around the given camera and workshop.
    pub fn demo(kind: DemoKind, camera: Camera, workshop: Workshop) -> World {
        let mut world = World::new(camera, workshop);
        match kind {
            DemoKind::Default => {
                for layer in World::default_layers() {
                    world.add_layer(layer);
                }
            }
            DemoKind::LayerSorting => layer_sorting(&mut world),
            DemoKind::Orbit => orbit(&mut world),
            DemoKind::Generated => generated(&mut world),
        }
        world.choose_workshop_layer();
        world.focus_workshop(true);
        log::info!("built demo world '{}' with {} layers", kind.name(), world.layer_count());
        world
    }
}

fn square(center: Vec2, half: f64) -> Vec<Vec2> {
    Coords::corner_box(center - Vec2::splat(half), center + Vec2::splat(half))
}

/// Layers added out of order, each holding one shape, so the draw order
/// shows the sort.
fn layer_sorting(world: &mut World) {
    let layers = [
        (Space::World, 1500.0, 120.0),
        (Space::Background, 1.0, 220.0),
        (Space::Foreground, 2.0, 30.0),
        (Space::World, 0.0, 80.0),
        (Space::Background, 0.0, 260.0),
        (Space::World, 500.0, 100.0),
        (Space::Foreground, 0.0, 20.0),
    ];
    for (i, (space, depth, half)) in layers.into_iter().enumerate() {
        let mut layer = Layer::new(space, depth);
        let center = match space {
            Space::World => Vec2::new(i as f64 * 40.0, 0.0),
            Space::Foreground | Space::Background => Vec2::new(200.0 + i as f64 * 60.0, 200.0),
        };
        let hue = 360.0 * i as f64 / layers.len() as f64;
        layer.add_shape(
            square(center, half),
            ShapeOptions::fixed().with_fill(Color::new(hue, 60.0, 50.0, 1.0)),
        );
        world.add_layer(layer);
    }
}

/// A fixed sun, a planet on a circular path tween and a moon attracted to
/// the cursor.
fn orbit(world: &mut World) {
    let mut layer = Layer::new(Space::World, 0.0);
    layer.run_physics = false;
    layer.add_shape(
        Coords::circle(Vec2::ZERO, 60.0, 48),
        ShapeOptions::fixed().with_fill(Color::new(45.0, 100.0, 55.0, 1.0)),
    );
    let planet = layer.add_shape(
        Coords::circle(Vec2::new(300.0, 0.0), 20.0, 32),
        ShapeOptions::fixed().with_fill(Color::new(210.0, 70.0, 50.0, 1.0)),
    );
    let moon = layer.add_shape(
        Coords::circle(Vec2::new(0.0, 200.0), 10.0, 24),
        ShapeOptions::fixed().with_fill(Color::new(0.0, 0.0, 80.0, 1.0)),
    );
    let layer_id = world.add_layer(layer);

    let planet_position = Rc::new(Cell::new(Vec2::new(300.0, 0.0)));
    let sink = Rc::clone(&planet_position);
    let tween = PathTween::new(
        Path::circle(Vec2::new(300.0, 300.0), Vec2::ZERO),
        [0.0, 1.0],
        10.0,
        move |p| sink.set(p),
    )
    .with_time_function(TimeFunction::Linear)
    .with_iterations(Iterations::Forever);
    world.animations.start(Box::new(tween));
    world.bind_shape_position(layer_id, planet, planet_position);

    let moon_position = Rc::new(Cell::new(Vec2::new(0.0, 200.0)));
    let follow = world.follow_cursor();
    world.animations.start(Box::new(DynamicBinding::new(
        Rc::clone(&moon_position),
        follow,
        AttractionFollow::default(),
    )));
    world.bind_shape_position(layer_id, moon, moon_position);
}

/// An endless field of tiles on a distant world layer, generated as the
/// view uncovers them.
fn generated(world: &mut World) {
    world.add_layer(Layer::new(Space::World, 0.0));
    let mut field = Layer::new(Space::World, 1000.0);
    field.run_physics = false;
    field.set_content(Box::new(TiledContent::new(200.0, 60.0)));
    world.add_layer(field);
}

/// Fills every grid tile the layer's view touches with one square, and
/// drops the squares of tiles that have scrolled well out of view.
#[derive(Debug, Clone)]
pub struct TiledContent {
    tile: f64,
    half: f64,
    generated: HashMap<(i64, i64), ShapeId>,
}

/// Inclusive tile index bounds along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileSpan {
    first: i64,
    last: i64,
}

impl TileSpan {
    fn len(self) -> usize {
        (self.last - self.first + 1) as usize
    }

    fn contains(self, index: i64, margin: i64) -> bool {
        (self.first - margin..=self.last + margin).contains(&index)
    }
}

impl TiledContent {
    pub fn new(tile: f64, size: f64) -> Self {
        Self {
            tile,
            half: size / 2.0,
            generated: HashMap::new(),
        }
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    /// Tiles covering `lo..=hi`, or `None` when there are more than one
    /// update may generate or the indices are out of range.
    fn tile_span(&self, lo: f64, hi: f64) -> Option<TileSpan> {
        let first = (lo / self.tile).floor();
        let last = (hi / self.tile).floor();
        let count = last - first + 1.0;
        if !count.is_finite() || count < 1.0 || count > MAX_TILES_PER_UPDATE as f64 {
            return None;
        }
        if first.abs() > MAX_TILE_INDEX || last.abs() > MAX_TILE_INDEX {
            return None;
        }
        Some(TileSpan {
            first: first as i64,
            last: last as i64,
        })
    }

    fn evict_outside(&mut self, layer: &mut Layer, columns: TileSpan, rows: TileSpan) {
        let before = self.generated.len();
        self.generated.retain(|&(i, j), id| {
            let keep = columns.contains(i, EVICTION_MARGIN) && rows.contains(j, EVICTION_MARGIN);
            if !keep {
                layer.delete_shape(*id);
            }
            keep
        });
        let evicted = before - self.generated.len();
        if evicted > 0 {
            log::debug!("evicted {evicted} tiles");
        }
    }
}

impl DynamicContent for TiledContent {
    fn viewport_changed(&mut self, layer: &mut Layer, region: BBox) {
        if self.tile.is_nan() || self.tile <= 0.0 {
            return;
        }
        let spans = self
            .tile_span(region.min.x(), region.max.x())
            .zip(self.tile_span(region.min.y(), region.max.y()));
        let (columns, rows) = match spans {
            Some((columns, rows)) if columns.len() * rows.len() <= MAX_TILES_PER_UPDATE => {
                (columns, rows)
            }
            _ => {
                log::debug!("too many tiles in view, generation skipped");
                return;
            }
        };
        self.evict_outside(layer, columns, rows);

        let mut added = 0;
        for i in columns.first..=columns.last {
            for j in rows.first..=rows.last {
                if self.generated.contains_key(&(i, j)) {
                    continue;
                }
                let center = Vec2::new((i as f64 + 0.5) * self.tile, (j as f64 + 0.5) * self.tile);
                let fill = Color::random(ColorRanges::hue_only(40.0, 30.0, 1.0));
                let options = ShapeOptions::fixed().with_fill(fill);
                let id = layer.add_shape(square(center, self.half), options);
                self.generated.insert((i, j), id);
                added += 1;
            }
        }
        if added > 0 {
            log::debug!("generated {added} tiles, {} total", self.generated.len());
        }
    }
}
