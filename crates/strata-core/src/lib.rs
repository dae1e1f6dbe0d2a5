//! # Strata Core
//!
//! Scene kernel for the Strata editor: fixed-size vector math, HSLA colors,
//! geometry builders, the physics-engine boundary, shapes, depth-ordered
//! layers with hover tracking, and frame-driven animation scheduling.

pub mod animation;
pub mod color;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod math;
pub mod physics;
pub mod shape;
pub mod spatial;

pub use animation::{Animation, AnimationId, AnimationManager};
pub use color::Color;
pub use error::CoreError;
pub use geometry::{BBox, Coords, Path};
pub use layer::{DynamicContent, Layer, LayerId, Space};
pub use math::{Vec2, Vec4, Vector};
pub use physics::{BasicEngine, BodyDesc, BodyHandle, PhysicsEngine};
pub use shape::{Shape, ShapeId, ShapeOptions};
