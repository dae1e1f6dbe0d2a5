use strata_core::geometry::Coords;
use strata_core::math::Vec2;
use strata_core::shape::ShapeOptions;
use strata_editor::{Button, InputEvent, World, WorkshopOutcome};
use strata_renderer::render_data::RecordingSurface;

const EPS: f64 = 1e-6;

/// Click at a point given in world coordinates of the workshop layer.
fn click_world(world: &mut World, p: Vec2) -> WorkshopOutcome {
    let depth = world.active_layer().unwrap().depth;
    let screen = world.camera.coords_to_screen(p, depth);
    world.handle_event(&InputEvent::click(screen))
}

fn committed(outcome: WorkshopOutcome) -> strata_core::shape::ShapeId {
    match outcome {
        WorkshopOutcome::Committed(id) => id,
        other => panic!("expected a committed shape, got {other:?}"),
    }
}

fn assert_close(actual: &[Vec2], expected: &[Vec2]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.distance(e) < EPS, "{a:?} != {e:?}");
    }
}

#[test]
fn rectangle_from_two_corners() {
    let mut world = World::default();
    assert!(world.workshop.try_command("rect"));
    assert_eq!(click_world(&mut world, Vec2::new(0.0, 0.0)), WorkshopOutcome::Pending);
    let id = committed(click_world(&mut world, Vec2::new(10.0, 20.0)));

    let layer = world.active_layer().unwrap();
    assert_close(
        layer.vertices_of(id).unwrap(),
        &[
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 20.0),
            Vec2::new(0.0, 20.0),
        ],
    );
    // Repeats until cancelled.
    assert!(world.workshop.is_collecting());
}

#[test]
fn circle_from_center_and_rim() {
    let mut world = World::default();
    world.workshop.try_command("c");
    click_world(&mut world, Vec2::ZERO);
    let id = committed(click_world(&mut world, Vec2::new(10.0, 0.0)));

    let vertices = world.active_layer().unwrap().vertices_of(id).unwrap();
    assert_eq!(vertices.len(), 48);
    for v in vertices {
        assert!((v.distance(&Vec2::ZERO) - 10.0).abs() < EPS);
    }
}

#[test]
fn polyshape_closes_without_closing_click() {
    let mut world = World::default();
    world.workshop.try_command("polyshape");
    for p in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)] {
        assert_eq!(click_world(&mut world, Vec2::new(p.0, p.1)), WorkshopOutcome::Pending);
    }
    let id = committed(click_world(&mut world, Vec2::new(3.0, -2.0)));
    assert_close(
        world.active_layer().unwrap().vertices_of(id).unwrap(),
        &[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0)],
    );
}

#[test]
fn escape_drops_partial_points() {
    let mut world = World::default();
    world.workshop.try_command("r");
    click_world(&mut world, Vec2::ZERO);
    assert_eq!(world.handle_event(&InputEvent::key("Escape")), WorkshopOutcome::Cancelled);
    assert!(!world.workshop.is_collecting());
    assert_eq!(click_world(&mut world, Vec2::new(10.0, 10.0)), WorkshopOutcome::Ignored);
    assert_eq!(world.shape_count(), 0);
}

#[test]
fn clicks_are_ignored_without_focus() {
    let mut world = World::default();
    world.focus_workshop(false);
    world.workshop.try_command("r");
    assert_eq!(click_world(&mut world, Vec2::ZERO), WorkshopOutcome::Ignored);
    assert!(world.workshop.active().unwrap().points.is_empty());
}

#[test]
fn snapped_clicks_land_on_grid() {
    let mut world = World::default();
    world.workshop.settings.grid.snap = true;
    world.workshop.try_command("r");
    click_world(&mut world, Vec2::new(4.0, -3.0));
    let id = committed(click_world(&mut world, Vec2::new(53.0, 77.0)));
    assert_eq!(
        world.active_layer().unwrap().vertices_of(id).unwrap(),
        &[
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(0.0, 100.0)
        ]
    );
}

#[test]
fn static_setting_applies_to_new_shapes() {
    let mut world = World::default();
    world.workshop.settings.create_static_shapes = true;
    world.workshop.try_command("r");
    click_world(&mut world, Vec2::ZERO);
    let id = committed(click_world(&mut world, Vec2::new(40.0, 40.0)));
    let layer = world.active_layer().unwrap();
    assert!(layer.shape(id).unwrap().is_static(layer.engine()));
}

#[test]
fn context_menu_deletes_hovered_shape() {
    let mut world = World::default();
    let layer_id = world.workshop.active_layer.unwrap();
    let shape = world
        .layer_mut(layer_id)
        .unwrap()
        .add_shape(
            Coords::corner_box(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0)),
            ShapeOptions::fixed(),
        );

    let center = world.camera.coords_to_screen(Vec2::ZERO, 0.0);
    world.handle_event(&InputEvent::PointerMove { screen: center });
    let mut surface = RecordingSurface::new(1280.0, 720.0);
    world.frame(0.0, &mut surface);
    assert_eq!(world.layer(layer_id).unwrap().first_hover_shape(), Some(shape));

    assert_eq!(
        world.handle_event(&InputEvent::ContextMenu { screen: center }),
        WorkshopOutcome::Deleted(shape)
    );
    assert_eq!(world.shape_count(), 0);
}

#[test]
fn secondary_drag_pans_the_camera() {
    let mut world = World::default();
    let scale = world.camera.viewport().scale.x();
    world.handle_event(&InputEvent::PointerDown {
        screen: Vec2::new(100.0, 100.0),
        button: Button::Secondary,
    });
    world.handle_event(&InputEvent::PointerMove {
        screen: Vec2::new(200.0, 100.0),
    });
    assert!((world.camera.look_at().x() + 100.0 / scale).abs() < EPS);
    world.handle_event(&InputEvent::PointerUp {
        screen: Vec2::new(200.0, 100.0),
        button: Button::Secondary,
    });
    assert!(!world.camera.is_panning());

    let before = world.camera.look_at();
    world.handle_event(&InputEvent::PointerMove {
        screen: Vec2::new(400.0, 300.0),
    });
    assert_eq!(world.camera.look_at(), before);
}

#[test]
fn wheel_keeps_point_under_cursor() {
    let mut world = World::default();
    let screen = Vec2::new(900.0, 200.0);
    world.handle_event(&InputEvent::PointerMove { screen });
    let anchor = world.camera.real_cursor();
    let distance = world.camera.distance();

    world.handle_event(&InputEvent::Wheel { delta_y: 120.0 });
    assert!(world.camera.distance() < distance);
    assert!(world.camera.coords_to_world(screen, 0.0).distance(&anchor) < EPS);

    world.handle_event(&InputEvent::Wheel { delta_y: -120.0 });
    assert!((world.camera.distance() - distance).abs() < EPS);
}
