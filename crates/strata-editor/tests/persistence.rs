use serde_json::{json, Value};
use strata_core::color::Color;
use strata_core::geometry::Coords;
use strata_core::layer::{Layer, Space};
use strata_core::math::{Vec2, Vec4};
use strata_core::shape::ShapeOptions;
use strata_editor::{EditorConfig, Session, World};
use tempfile::TempDir;

fn open_session() -> (TempDir, Session) {
    let dir = TempDir::new().unwrap();
    let config = EditorConfig {
        database_dir: dir.path().to_path_buf(),
        ..EditorConfig::default()
    };
    (dir, Session::open(config).unwrap())
}

/// Two layers, three shapes, with fixed colors.
fn sample_world() -> World {
    let mut world = World::new(Default::default(), Default::default());
    let mut near = Layer::new(Space::World, 0.0)
        .with_modulation(Color::new(200.0, 50.0, 50.0, 1.0), Vec4::new(0.0, 0.0, 0.5, 0.0));
    near.add_shape(
        Coords::corner_box(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0)),
        ShapeOptions::fixed().with_fill(Color::new(120.0, 50.0, 50.0, 1.0)),
    );
    near.add_shape(
        vec![Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(15.0, 25.0)],
        ShapeOptions::fixed().with_fill(Color::new(240.0, 80.0, 40.0, 0.5)),
    );
    let mut far = Layer::new(Space::Background, 3.0);
    far.add_shape(
        Coords::corner_box(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0)),
        ShapeOptions::fixed().with_fill(Color::new(0.0, 100.0, 50.0, 1.0)),
    );
    world.add_layer(far);
    world.add_layer(near);
    world
}

#[test]
fn world_round_trips_through_the_database() {
    let (_dir, mut session) = open_session();
    session.world = sample_world();
    session.save_world("pair.json").unwrap();

    session.world.clear();
    assert!(session.load_world("pair.json"));
    let original = sample_world();
    let loaded = &session.world;

    assert_eq!(loaded.layer_count(), 2);
    assert_eq!(loaded.shape_count(), 3);
    for (a, b) in original.layers().iter().zip(loaded.layers()) {
        assert_eq!(a.space, b.space);
        assert_eq!(a.depth, b.depth);
        assert_eq!(a.modulation_color, b.modulation_color);
        assert_eq!(a.modulation_factor, b.modulation_factor);
        assert_eq!(a.shape_count(), b.shape_count());
        for (sa, sb) in a.shapes().iter().zip(b.shapes()) {
            assert_eq!(sa.vertices(a.engine()), sb.vertices(b.engine()));
            assert_eq!(sa.fill_color, sb.fill_color);
            assert_eq!(sa.is_static(a.engine()), sb.is_static(b.engine()));
        }
    }
    assert_eq!(loaded.active_layer().unwrap().space, Space::World);
}

#[test]
fn saved_json_uses_the_world_layout() {
    let (_dir, mut session) = open_session();
    session.world = sample_world();
    session.save_world("layout.json").unwrap();

    let saved: Value = session.database().get_json("layout.json").unwrap();
    assert_eq!(saved["filename"], "layout.json");
    let layer = &saved["layers"][0];
    assert_eq!(layer["space"], "world");
    assert_eq!(layer["depth"], json!(0.0));
    assert!(layer["id"].is_string());
    assert_eq!(layer["modulationColor"], json!([200.0, 50.0, 50.0, 1.0]));
    assert_eq!(layer["modulationFactor"], json!([0.0, 0.0, 0.5, 0.0]));
    let shape = &layer["shapes"][0];
    assert_eq!(shape["vertices"], json!([[0.0, 0.0], [10.0, 0.0], [10.0, 20.0], [0.0, 20.0]]));
    assert_eq!(shape["fillColor"], json!([120.0, 50.0, 50.0, 1.0]));
    assert_eq!(shape["isStatic"], json!(true));
    assert_eq!(saved["layers"][1]["space"], "background");
}

#[test]
fn layer_ids_survive_a_round_trip() {
    let (_dir, mut session) = open_session();
    session.world = sample_world();
    let ids: Vec<_> = session.world.layers().iter().map(|l| l.id).collect();
    session.save_world("ids.json").unwrap();
    session.load_world("ids.json");
    let loaded: Vec<_> = session.world.layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, loaded);
}

#[test]
fn hand_written_files_fill_in_defaults() {
    let (_dir, mut session) = open_session();
    let file = json!({
        "layers": [
            {
                "space": "foreground",
                "depth": 1,
                "shapes": [ { "vertices": [[0, 0], [4, 0], [0, 4]] } ]
            },
            { "space": "world", "depth": 10 }
        ]
    });
    session.database().add_file("hand.json", &file.to_string()).unwrap();
    assert!(session.load_world("hand.json"));

    let world = &session.world;
    assert_eq!(world.layers()[0].space, Space::Foreground);
    let shape = &world.layers()[0].shapes()[0];
    assert_eq!(shape.fill_color, Color::white());
    assert!(shape.is_static(world.layers()[0].engine()));
    assert_eq!(world.active_layer().unwrap().depth, 10.0);
}

#[test]
fn corrupt_or_missing_worlds_fall_back_to_default() {
    let (_dir, mut session) = open_session();
    session.database().add_file("broken.json", "{ \"layers\": [ {").unwrap();

    session.world = sample_world();
    assert!(!session.load_world("broken.json"));
    assert_eq!(session.world.layer_count(), 3);
    assert_eq!(session.world.shape_count(), 0);
    assert!(session.world.workshop.focus);

    session.world = sample_world();
    assert!(!session.load_world("absent.json"));
    assert_eq!(session.world.layer_count(), 3);
    assert!(!session.load_world("../escape.json"));
}

#[test]
fn remote_calls_reach_the_session_database() {
    let (_dir, mut session) = open_session();
    session.save_world("a.json").unwrap();

    let names: Value = serde_json::from_str(
        &session.call(r#"{"target":"worldDatabase","method":"getFileNames"}"#),
    )
    .unwrap();
    assert_eq!(names, json!(["a.json"]));

    let missing: Value = serde_json::from_str(&session.call(r#"{"target":"nope"}"#)).unwrap();
    assert_eq!(missing, json!({ "targetExists": false }));

    let request = r#"{"target":"ServerDatabase","method":"openDatabases"}"#;
    let open: Value = serde_json::from_str(&session.call(request)).unwrap();
    assert_eq!(open, json!(["worldDatabase"]));

    let file: Value = serde_json::from_str(
        &session.call(r#"{"target":"worldDatabase","method":"getFile","arguments":["a.json"]}"#),
    )
    .unwrap();
    assert_eq!(file["filename"], "a.json");
    assert_eq!(file["layers"].as_array().unwrap().len(), 3);
}
