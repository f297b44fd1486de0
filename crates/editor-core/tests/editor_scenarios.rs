//! End-to-end editor scenarios driven through the public API.

use editor_core::fixtures::{locked_object_at, object_at, RecordingBackend};
use editor_core::{Editor, EditorAction, EditorSettings, GraphicsBackend, InputEvent};
use glam::Vec3;
use shared::{ShapeKind, TransformMode};

fn editor() -> Editor<RecordingBackend> {
    Editor::with_backend(EditorSettings::default(), RecordingBackend::default()).with_seed(11)
}

/// Viewport pixel under a world point
fn screen_of<B: GraphicsBackend>(ed: &Editor<B>, point: [f32; 3]) -> (f32, f32) {
    let ndc = ed.driver().camera().project(Vec3::from(point)).unwrap();
    let size = ed.driver().size();
    ((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
}

#[test]
fn spawned_shapes_are_counted_and_selectable() {
    let mut ed = Editor::new();
    for kind in ShapeKind::ALL {
        let before = ed.object_count();
        let id = ed.add_shape(kind);
        assert_eq!(ed.object_count(), before + 1);
        assert!(ed.object(&id).unwrap().selectable);
    }
}

#[test]
fn click_on_spawned_shape_selects_it() {
    let mut ed = editor();
    for kind in ShapeKind::ALL {
        let id = ed.add_shape(kind);
        let pos = ed.object(&id).unwrap().transform.position;
        let (x, y) = screen_of(&ed, pos);
        assert_eq!(ed.pick_at(x, y).as_ref(), Some(&id), "{kind:?} not picked");
        ed.remove_object(&id);
    }
}

#[test]
fn click_on_empty_space_selects_nothing() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));

    // Top-left corner looks over the grid into empty sky
    assert_eq!(ed.pick_at(1.0, 1.0), None);
    assert_eq!(ed.click(1.0, 1.0), None);
    assert!(ed.backend().calls.is_empty());
}

#[test]
fn grid_and_axes_never_picked() {
    let mut ed = editor();
    let (x, y) = screen_of(&ed, [2.0, 0.0, 0.0]);
    assert_eq!(ed.click(x, y), None);

    let (x, y) = screen_of(&ed, [3.0, 0.0, 3.0]);
    assert_eq!(ed.click(x, y), None);
}

#[test]
fn selecting_a_then_b_leaves_one_attachment() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [-1.5, 0.0, 0.0]));
    ed.insert_object(object_at("b", ShapeKind::Cube, [1.5, 0.0, 0.0]));

    let (ax, ay) = screen_of(&ed, [-1.5, 0.0, 0.0]);
    let (bx, by) = screen_of(&ed, [1.5, 0.0, 0.0]);
    assert_eq!(ed.click(ax, ay).as_deref(), Some("a"));
    assert_eq!(ed.click(bx, by).as_deref(), Some("b"));

    assert_eq!(ed.backend().attachment_count(), 1);
    assert_eq!(ed.backend().gizmo_target(), Some("b"));
}

#[test]
fn delete_key_on_picked_cube_empties_scene() {
    let mut ed = editor();
    let id = ed.add_shape(ShapeKind::Cube);
    let pos = ed.object(&id).unwrap().transform.position;
    let (x, y) = screen_of(&ed, pos);

    ed.handle(&InputEvent::PointerClick { x, y }).unwrap();
    assert_eq!(ed.selected(), Some(&id));

    let action = ed.key_down("Delete", false).unwrap();
    assert_eq!(action, Some(EditorAction::DeleteSelected));
    assert_eq!(ed.object_count(), 0);
    assert!(ed.selected().is_none());
    assert!(ed.backend().gizmo_target().is_none());
}

#[test]
fn ctrl_d_duplicates_and_keeps_original_selected() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Sphere, [0.5, 0.5, 0.0]));
    ed.select("a");

    ed.key_down("d", true).unwrap();
    assert_eq!(ed.object_count(), 2);
    assert_eq!(ed.selected().map(String::as_str), Some("a"));

    let copy = ed.store().objects().iter().find(|o| o.id != "a").unwrap();
    let original = ed.object("a").unwrap();
    let moved: Vec<usize> = (0..3)
        .filter(|&i| copy.transform.position[i] != original.transform.position[i])
        .collect();
    assert_eq!(moved, vec![0]);
    assert!((copy.transform.position[0] - original.transform.position[0] - 1.0).abs() < 1e-6);
}

#[test]
fn delete_and_duplicate_without_selection_are_noops() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));

    assert_eq!(ed.key_down("Delete", false).unwrap(), Some(EditorAction::DeleteSelected));
    assert_eq!(ed.key_down("d", true).unwrap(), Some(EditorAction::DuplicateSelected));
    assert_eq!(ed.object_count(), 1);
}

#[test]
fn nearer_object_wins_along_view_ray() {
    let mut ed = editor();
    let eye = ed.driver().camera().eye_position();
    // Two cubes on the line from the eye to the origin
    let far = Vec3::ZERO;
    let near = eye * 0.5;
    ed.insert_object(object_at("far", ShapeKind::Cube, far.to_array()));
    ed.insert_object(object_at("near", ShapeKind::Cube, near.to_array()));

    let (x, y) = screen_of(&ed, far.to_array());
    assert_eq!(ed.click(x, y).as_deref(), Some("near"));
}

#[test]
fn locked_object_in_front_is_skipped() {
    let mut ed = editor();
    let eye = ed.driver().camera().eye_position();
    ed.insert_object(object_at("behind", ShapeKind::Cube, [0.0; 3]));
    ed.insert_object(locked_object_at("front", ShapeKind::Cube, (eye * 0.5).to_array()));

    let (x, y) = screen_of(&ed, [0.0; 3]);
    assert_eq!(ed.click(x, y).as_deref(), Some("behind"));
}

#[test]
fn mode_switches_are_idempotent_and_independent_of_selection() {
    let mut ed = editor();
    ed.key_down("r", false).unwrap();
    ed.key_down("r", false).unwrap();
    assert_eq!(ed.mode(), TransformMode::Rotate);

    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
    ed.select("a");
    assert_eq!(ed.backend().gizmo().mode, TransformMode::Rotate);

    ed.key_down("S", false).unwrap();
    assert_eq!(ed.backend().gizmo().mode, TransformMode::Scale);
    ed.clear_selection();
    ed.key_down("t", false).unwrap();
    assert_eq!(ed.mode(), TransformMode::Translate);
}

#[test]
fn miss_behaviour_follows_settings() {
    let mut settings = EditorSettings::default();
    settings.selection.deselect_on_miss = true;
    let mut ed = Editor::with_backend(settings, RecordingBackend::default());
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
    ed.select("a");

    assert_eq!(ed.click(1.0, 1.0), None);
    assert!(ed.backend().gizmo_target().is_none());

    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
    ed.select("a");
    assert_eq!(ed.click(1.0, 1.0).as_deref(), Some("a"));
}

#[test]
fn unbound_keys_are_ignored() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
    ed.select("a");
    assert_eq!(ed.key_down("x", false).unwrap(), None);
    assert_eq!(ed.key_down("Delete", true).unwrap(), None);
    assert_eq!(ed.object_count(), 1);
}

#[test]
fn escape_clears_selection() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
    ed.select("a");
    ed.key_down("Escape", false).unwrap();
    assert!(ed.selected().is_none());
    assert_eq!(ed.object_count(), 1);
}

#[test]
fn resize_then_pick_uses_new_viewport() {
    let mut ed = editor();
    ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
    ed.handle(&InputEvent::Resize { width: 400.0, height: 400.0 }).unwrap();
    assert!((ed.driver().camera().aspect - 1.0).abs() < 1e-6);

    assert_eq!(ed.pick_at(200.0, 200.0).as_deref(), Some("a"));
    assert!(ed.resize(0.0, 0.0).is_err());
    assert_eq!(ed.driver().size(), glam::Vec2::new(400.0, 400.0));
}

#[test]
fn frames_tick_continuously() {
    let mut ed = editor();
    let first = ed.frame();
    ed.add_shape(ShapeKind::Cube);
    ed.handle(&InputEvent::Frame).unwrap();
    let third = ed.frame();
    assert_eq!(first.frame, 1);
    assert_eq!(third.frame, 3);
    assert!(third.scene_version > first.scene_version);
}

#[test]
fn out_of_range_settings_never_break_the_editor() {
    assert!(EditorSettings::from_json(r#"{"spawn":{"extent":2e38}}"#).is_err());
    assert!(EditorSettings::from_json(r#"{"camera":{"near":0,"far":0}}"#).is_err());

    let mut settings = EditorSettings::default();
    settings.spawn.extent = 2e38;
    settings.camera.near = 0.0;
    settings.camera.far = 0.0;
    let mut ed = Editor::with_settings(settings);
    assert_eq!(ed.settings(), &EditorSettings::default());

    let spawned = ed.add_shape(ShapeKind::Cube);
    assert!(ed.remove_object(&spawned).is_some());
    ed.insert_object(object_at("center", ShapeKind::Cube, [0.0; 3]));
    let (x, y) = screen_of(&ed, [0.0; 3]);
    assert_eq!(ed.pick_at(x, y).as_deref(), Some("center"));
}
