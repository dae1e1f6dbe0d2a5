//! The boundary to the rigid-body simulation.
//!
//! The scene model only ever talks to an engine through [`PhysicsEngine`]:
//! advance by a timestep, add/remove a body, query point containment, and
//! read or write a body's vertices and position. [`BasicEngine`] is the
//! built-in implementation (gravity on dynamic bodies, no collisions).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{polygon_centroid, polygon_contains, BBox};
use crate::math::Vec2;

/// Default bounciness of new bodies.
pub const DEFAULT_RESTITUTION: f64 = 0.5;

/// Opaque reference to a body owned by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Everything needed to create a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Vertex ring in world coordinates.
    pub vertices: Vec<Vec2>,
    pub is_static: bool,
    pub restitution: f64,
}

impl BodyDesc {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            is_static: false,
            restitution: DEFAULT_RESTITUTION,
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }
}

/// A rigid-body simulation treated as a black box.
pub trait PhysicsEngine: fmt::Debug {
    /// Advance the simulation by `dt_ms` milliseconds.
    fn step(&mut self, dt_ms: f64);

    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Returns false when the handle was unknown.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// The subset of `candidates` whose polygon contains `point`, in
    /// candidate order.
    fn query_point(&self, candidates: &[BodyHandle], point: Vec2) -> Vec<BodyHandle>;

    fn vertices(&self, handle: BodyHandle) -> Option<&[Vec2]>;

    fn set_vertices(&mut self, handle: BodyHandle, vertices: Vec<Vec2>);

    /// Center of mass.
    fn position(&self, handle: BodyHandle) -> Option<Vec2>;

    /// Move the body so its center of mass lands on `position`.
    fn set_position(&mut self, handle: BodyHandle, position: Vec2);

    fn is_static(&self, handle: BodyHandle) -> bool;

    fn restitution(&self, handle: BodyHandle) -> Option<f64>;

    fn bounds(&self, handle: BodyHandle) -> Option<BBox>;
}

#[derive(Debug, Clone)]
struct Body {
    vertices: Vec<Vec2>,
    position: Vec2,
    velocity: Vec2,
    is_static: bool,
    restitution: f64,
}

impl Body {
    fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
        self.position += delta;
    }
}

/// A minimal engine: dynamic bodies accelerate under constant gravity,
/// static bodies never move. Bodies do not collide.
#[derive(Debug, Clone)]
pub struct BasicEngine {
    bodies: HashMap<BodyHandle, Body>,
    next_id: u64,
    /// Acceleration in px/ms².
    pub gravity: Vec2,
}

impl BasicEngine {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            next_id: 1,
            gravity: Vec2::new(0.0, 0.001),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Default for BasicEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for BasicEngine {
    fn step(&mut self, dt_ms: f64) {
        if dt_ms <= 0.0 {
            return;
        }
        let gravity = self.gravity;
        for body in self.bodies.values_mut().filter(|b| !b.is_static) {
            body.velocity += gravity * dt_ms;
            let delta = body.velocity * dt_ms;
            body.translate(delta);
        }
    }

    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        let position = polygon_centroid(&desc.vertices);
        self.bodies.insert(
            handle,
            Body {
                vertices: desc.vertices,
                position,
                velocity: Vec2::ZERO,
                is_static: desc.is_static,
                restitution: desc.restitution,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies.remove(&handle).is_some()
    }

    fn query_point(&self, candidates: &[BodyHandle], point: Vec2) -> Vec<BodyHandle> {
        candidates
            .iter()
            .copied()
            .filter(|h| {
                self.bodies
                    .get(h)
                    .is_some_and(|b| polygon_contains(&b.vertices, point))
            })
            .collect()
    }

    fn vertices(&self, handle: BodyHandle) -> Option<&[Vec2]> {
        self.bodies.get(&handle).map(|b| b.vertices.as_slice())
    }

    fn set_vertices(&mut self, handle: BodyHandle, vertices: Vec<Vec2>) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = polygon_centroid(&vertices);
            body.vertices = vertices;
        }
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.position)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            let delta = position - body.position;
            body.translate(delta);
        }
    }

    fn is_static(&self, handle: BodyHandle) -> bool {
        self.bodies.get(&handle).is_some_and(|b| b.is_static)
    }

    fn restitution(&self, handle: BodyHandle) -> Option<f64> {
        self.bodies.get(&handle).map(|b| b.restitution)
    }

    fn bounds(&self, handle: BodyHandle) -> Option<BBox> {
        self.bodies
            .get(&handle)
            .and_then(|b| BBox::from_points(&b.vertices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coords;

    fn square(engine: &mut BasicEngine, is_static: bool) -> BodyHandle {
        let ring = Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        engine.add_body(BodyDesc::new(ring).with_static(is_static))
    }

    #[test]
    fn test_body_positioned_at_centroid() {
        let mut engine = BasicEngine::new();
        let h = square(&mut engine, true);
        assert_eq!(engine.position(h), Some(Vec2::new(5.0, 5.0)));
        assert_eq!(engine.vertices(h).unwrap()[2], Vec2::new(10.0, 10.0));
        assert_eq!(engine.restitution(h), Some(DEFAULT_RESTITUTION));
    }

    #[test]
    fn test_static_bodies_do_not_fall() {
        let mut engine = BasicEngine::new();
        let fixed = square(&mut engine, true);
        let falling = square(&mut engine, false);
        engine.step(100.0);
        assert_eq!(engine.position(fixed), Some(Vec2::new(5.0, 5.0)));
        let p = engine.position(falling).unwrap();
        assert!(p.y() > 5.0);
        assert_eq!(p.x(), 5.0);
    }

    #[test]
    fn test_set_position_moves_vertices() {
        let mut engine = BasicEngine::new();
        let h = square(&mut engine, true);
        engine.set_position(h, Vec2::new(105.0, 5.0));
        assert_eq!(engine.vertices(h).unwrap()[0], Vec2::new(100.0, 0.0));
        let b = engine.bounds(h).unwrap();
        assert_eq!(b.min, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_query_point_keeps_candidate_order() {
        let mut engine = BasicEngine::new();
        let a = square(&mut engine, true);
        let b = square(&mut engine, true);
        assert_eq!(engine.query_point(&[b, a], Vec2::new(5.0, 5.0)), vec![b, a]);
        assert!(engine.query_point(&[a], Vec2::new(50.0, 5.0)).is_empty());
        assert!(engine.remove_body(a));
        assert!(!engine.remove_body(a));
        assert_eq!(engine.query_point(&[a, b], Vec2::new(5.0, 5.0)), vec![b]);
    }
}
