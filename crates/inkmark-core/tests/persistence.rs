use std::fs;
use std::sync::Arc;

use inkmark_core::shapes::{TextBackground, TextBorder};
use inkmark_core::storage::snapshot;
use inkmark_core::{
    FileStorage, Modifiers, MouseButton, PointerEvent, Scene, SceneConfig, SerializableColor,
    Shape, Storage, StorageError, StorageResult, Stroke, StrokeKind, TextBox, ToolKind,
};
use kurbo::{Point, Rect};

fn draw(scene: &mut Scene, points: &[(f64, f64)]) {
    let at = |&(x, y): &(f64, f64)| Point::new(x, y);
    scene.handle_pointer(
        PointerEvent::Down {
            position: at(&points[0]),
            button: MouseButton::Left,
        },
        Modifiers::NONE,
    );
    for p in &points[1..] {
        scene.handle_pointer(PointerEvent::Move { position: at(p) }, Modifiers::NONE);
    }
    scene.handle_pointer(
        PointerEvent::Up {
            position: at(points.last().unwrap()),
            button: MouseButton::Left,
        },
        Modifiers::NONE,
    );
}

fn mixed_shapes() -> Vec<Shape> {
    let mut brush = Stroke::new(StrokeKind::Brush, SerializableColor::new(10, 20, 30, 255), 6.0);
    brush.add_timed_point(Point::new(0.0, 0.0), 0.0);
    brush.add_timed_point(Point::new(3.5, -2.25), 16.0);
    brush.add_timed_point(Point::new(7.0, 1.0), 33.0);

    let mut text = TextBox::new(Rect::new(5.0, 5.0, 125.0, 45.0), "note\nsecond line")
        .with_color(SerializableColor::new(200, 0, 0, 255));
    text.rotation = 0.25;
    text.background = Some(TextBackground {
        color: SerializableColor::white(),
        opacity: 0.5,
    });
    text.border = Some(TextBorder {
        color: SerializableColor::black(),
        width: 2.0,
    });

    // Pointer positions mapped into scene space at 1.1^n zoom
    let zoomed = (-6..=6)
        .flat_map(|n| {
            let scale = 1.1f64.powi(n);
            (0..40).map(move |k| {
                let px = f64::from(k) * 13.0 + 0.25;
                Point::new((px * 0.73 - 311.0) / scale, (px * 1.37 - 42.0) / scale)
            })
        })
        .collect();

    vec![
        Shape::Stroke(Stroke::from_points(
            StrokeKind::Highlighter,
            vec![Point::new(-1.0, 0.0), Point::new(1.0, 0.0)],
        )),
        Shape::Stroke(brush),
        Shape::TextBox(text),
        Shape::Stroke(Stroke::from_points(StrokeKind::Pen, zoomed)),
    ]
}

#[test]
fn save_load_save_is_stable() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let storage = FileStorage::new(dir.path().to_path_buf()).expect("open storage");
    let shapes = mixed_shapes();

    storage.save("board", &shapes).unwrap();
    let first = fs::read_to_string(dir.path().join("board.json")).unwrap();
    let loaded = storage.load("board").unwrap();
    assert_eq!(loaded, shapes);

    storage.save("board", &loaded).unwrap();
    let second = fs::read_to_string(dir.path().join("board.json")).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, snapshot::to_json(&shapes).unwrap());
}

#[test]
fn scene_survives_reopen() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = SceneConfig {
        storage_key: "lecture".to_string(),
        ..SceneConfig::default()
    };

    {
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let mut scene = Scene::open(config.clone(), Arc::new(storage));
        scene.set_tool(ToolKind::Pen);
        draw(&mut scene, &[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)]);
        scene.set_tool(ToolKind::Text);
        draw(&mut scene, &[(40.0, 40.0), (140.0, 90.0)]);
        assert!(scene.commit_text("hello"));
        assert!(scene.last_persist_error().is_none());
    }

    let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
    let scene = Scene::open(config, Arc::new(storage));
    assert!(scene.load_error().is_none());
    assert_eq!(scene.shapes().len(), 2);
    assert_eq!(scene.shapes()[0].as_stroke().unwrap().len(), 3);
    assert_eq!(scene.shapes()[1].as_text_box().unwrap().value, "hello");
    // History is not persisted
    assert!(!scene.store().can_undo());
}

#[test]
fn missing_scene_opens_empty_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
    let scene = Scene::open(SceneConfig::default(), Arc::new(storage));
    assert!(scene.shapes().is_empty());
    assert!(scene.load_error().is_none());
}

#[test]
fn corrupt_scene_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inkmark_shapes.json"), "[{\"type\":\"stroke\"").unwrap();
    let storage = Arc::new(FileStorage::new(dir.path().to_path_buf()).unwrap());

    let mut scene = Scene::open(SceneConfig::default(), storage.clone());
    assert!(scene.shapes().is_empty());
    assert!(matches!(scene.load_error(), Some(StorageError::Serialization(_))));

    // The next edit overwrites the bad snapshot
    scene.set_tool(ToolKind::Highlighter);
    draw(&mut scene, &[(0.0, 0.0), (50.0, 0.0)]);
    assert_eq!(storage.load("inkmark_shapes").unwrap().len(), 1);
}

#[test]
fn stored_degenerate_strokes_are_pruned_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path().to_path_buf()).unwrap());
    let mut shapes = mixed_shapes();
    shapes.push(Shape::Stroke(Stroke::from_points(
        StrokeKind::Pen,
        vec![Point::new(1.0, 1.0)],
    )));
    storage.save("inkmark_shapes", &shapes).unwrap();

    let scene = Scene::open(SceneConfig::default(), storage);
    assert_eq!(scene.shapes().len(), 4);
}

struct ReadOnlyStorage;

impl Storage for ReadOnlyStorage {
    fn save(&self, _key: &str, _shapes: &[Shape]) -> StorageResult<()> {
        Err(StorageError::Io("read-only".to_string()))
    }

    fn load(&self, key: &str) -> StorageResult<Vec<Shape>> {
        Err(StorageError::NotFound(key.to_string()))
    }

    fn delete(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn exists(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }
}

#[test]
fn failed_save_keeps_the_edit() {
    let mut scene = Scene::open(SceneConfig::default(), Arc::new(ReadOnlyStorage));
    scene.set_tool(ToolKind::Pen);
    draw(&mut scene, &[(0.0, 0.0), (10.0, 10.0)]);

    assert_eq!(scene.shapes().len(), 1);
    assert!(matches!(scene.last_persist_error(), Some(StorageError::Io(_))));
    assert!(scene.undo());
    assert!(scene.shapes().is_empty());
}
