//! # Strata Renderer
//!
//! Depth-aware camera and 2D drawing for the Strata editor.
//!
//! Drawing goes through the [`Surface`] trait. [`RecordingSurface`] captures
//! JSON-serializable draw commands, which is what the headless binary and
//! the tests consume.

pub mod camera;
pub mod layer_render;
pub mod render_data;
pub mod surface;

pub use camera::{Axis, Camera, CameraSettings, Viewport};
pub use layer_render::render_layer;
pub use render_data::{DrawCommand, RecordingSurface, RenderFrame};
pub use surface::{StrokeStyle, Surface, Transform};
