use strata_core::color::Color;
use strata_core::layer::{Layer, Space};

use crate::camera::{Axis, Camera};
use crate::surface::{StrokeStyle, Surface};

/// Draw every shape of `layer` in shape order.
///
/// World layers are drawn through the camera at the layer depth and the
/// surface is restored to identity afterwards. Fills are tinted toward the
/// layer modulation color; only hovered shapes get an outline, one screen
/// pixel wide.
pub fn render_layer(layer: &Layer, camera: &Camera, surface: &mut dyn Surface) {
    let in_world = layer.space == Space::World;
    let outline_width = if in_world {
        camera.apply(surface, layer.depth);
        camera.dim_to_world(1.0, Axis::X, layer.depth)
    } else {
        1.0
    };

    for shape in layer.shapes() {
        let vertices = shape.vertices(layer.engine());
        let fill =
            Color::interpolate(shape.fill_color, layer.modulation_color, layer.modulation_factor);
        surface.fill_polygon(vertices, fill);
        if shape.hover {
            let outline = StrokeStyle::solid(shape.stroke_color, outline_width);
            surface.stroke_polygon(vertices, &outline);
        }
    }

    if in_world {
        camera.restore(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::geometry::Coords;
    use strata_core::math::{Vec2, Vec4};
    use strata_core::shape::ShapeOptions;

    use crate::camera::CameraSettings;
    use crate::render_data::{DrawCommand, RecordingSurface};
    use crate::surface::Transform;

    fn layer_with_square(space: Space, depth: f64) -> Layer {
        let mut layer = Layer::new(space, depth);
        layer.add_shape(
            Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)),
            ShapeOptions::fixed().with_fill(Color::new(200.0, 50.0, 50.0, 1.0)),
        );
        layer
    }

    #[test]
    fn test_world_layer_uses_camera_transform() {
        let camera = Camera::new(1000.0, 1000.0, CameraSettings::default());
        let layer = layer_with_square(Space::World, 500.0);
        let mut surface = RecordingSurface::new(1000.0, 1000.0);
        render_layer(&layer, &camera, &mut surface);

        let vp = camera.viewport_at_depth(500.0);
        match &surface.commands()[0] {
            DrawCommand::FillPolygon { transform, .. } => {
                assert!((transform.0[0] - vp.scale.x()).abs() < 1e-9);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(surface.transform(), Transform::IDENTITY);
    }

    #[test]
    fn test_screen_layer_draws_untransformed() {
        let camera = Camera::default();
        let layer = layer_with_square(Space::Foreground, 3.0);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        render_layer(&layer, &camera, &mut surface);
        match &surface.commands()[0] {
            DrawCommand::FillPolygon { transform, .. } => {
                assert_eq!(*transform, Transform::IDENTITY)
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_modulation_and_hover_outline() {
        let camera = Camera::default();
        let mut layer = layer_with_square(Space::Background, 0.0)
            .with_modulation(Color::new(0.0, 0.0, 0.0, 0.0), Vec4::new(0.0, 0.0, 1.0, 0.0));
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        render_layer(&layer, &camera, &mut surface);
        assert_eq!(surface.commands().len(), 1);
        match &surface.commands()[0] {
            DrawCommand::FillPolygon { color, .. } => {
                assert_eq!(*color, Color::new(200.0, 50.0, 0.0, 1.0))
            }
            other => panic!("unexpected command {other:?}"),
        }

        layer.set_cursor(Some(Vec2::new(5.0, 5.0)));
        layer.update(0.0);
        let mut surface = RecordingSurface::new(1280.0, 720.0);
        render_layer(&layer, &camera, &mut surface);
        match &surface.commands()[1] {
            DrawCommand::StrokePolygon { style, .. } => {
                assert_eq!(style.color, Color::white());
                assert_eq!(style.width, 1.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
