//! Editor root: owns the scene, the selection session and every service
//! around them. All state changes go through `&mut Editor`.

use glam::{Vec2, Vec3};
use shared::{ObjectId, SceneHelper, SceneObject, ShapeKind, TransformMode};

use crate::backend::{GraphicsBackend, MeshBackend};
use crate::error::{EditorError, EditorResult};
use crate::factory::ShapeFactory;
use crate::input::{EditorAction, InputEvent, InputRouter};
use crate::render_driver::{FrameInfo, RenderDriver};
use crate::state::scene::SceneStore;
use crate::state::session::TransformSession;
use crate::state::settings::EditorSettings;
use crate::viewport::gizmo::{build_gizmo_lines, drag_amount, gizmo_hit_test, GizmoAxis};
use crate::viewport::mesh::{axes, grid, LineMeshData, ObjectDraw};
use crate::viewport::picking::pick;

pub struct Editor<B: GraphicsBackend = MeshBackend> {
    settings: EditorSettings,
    store: SceneStore,
    session: TransformSession,
    factory: ShapeFactory,
    router: InputRouter,
    driver: RenderDriver,
    backend: B,
}

impl Editor<MeshBackend> {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self::with_backend(settings, MeshBackend::new())
    }
}

impl Default for Editor<MeshBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GraphicsBackend> Editor<B> {
    /// Invalid settings are replaced by the defaults
    pub fn with_backend(settings: EditorSettings, backend: B) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                tracing::warn!("Using default settings: {e}");
                EditorSettings::default()
            }
        };

        let mut helpers = Vec::new();
        if settings.grid.visible {
            helpers.push(SceneHelper::Grid {
                size: settings.grid.size,
                divisions: settings.grid.divisions,
            });
        }
        if settings.axes.visible {
            helpers.push(SceneHelper::Axes {
                length: settings.axes.length,
            });
        }

        let [width, height] = settings.viewport.initial_size;
        Self {
            store: SceneStore::with_helpers(helpers),
            session: TransformSession::new(settings.selection.deselect_on_miss),
            factory: ShapeFactory::new(settings.spawn.extent),
            router: InputRouter::with_defaults(),
            driver: RenderDriver::new(&settings.camera, width, height),
            backend,
            settings,
        }
    }

    /// Replace the spawn RNG with a seeded one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.factory = ShapeFactory::with_seed(self.settings.spawn.extent, seed);
        self
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Settings with the camera and window size as they are now,
    /// so the next session opens where this one left off
    pub fn current_settings(&self) -> EditorSettings {
        let mut settings = self.settings.clone();
        let camera = self.driver.camera();
        settings.camera.position = camera.eye_position().to_array();
        settings.camera.target = camera.target.to_array();
        settings.viewport.initial_size = self.driver.size().to_array();
        settings
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn session(&self) -> &TransformSession {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn driver(&self) -> &RenderDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut RenderDriver {
        &mut self.driver
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut InputRouter {
        &mut self.router
    }

    pub fn object_count(&self) -> usize {
        self.store.len()
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.store.get(id)
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        self.session.selected()
    }

    pub fn mode(&self) -> TransformMode {
        self.session.mode()
    }

    // ── Shapes ───────────────────────────────────────────────

    /// Spawn a shape with a random color and position; returns its id
    pub fn add_shape(&mut self, kind: ShapeKind) -> ObjectId {
        let object = self.factory.spawn(kind);
        tracing::info!(
            "Added {} {} at ({:.2}, {:.2})",
            kind.name(),
            object.id,
            object.transform.position[0],
            object.transform.position[1]
        );
        self.store.add(object)
    }

    /// Spawn a shape by name. Unknown names create nothing.
    pub fn add_shape_named(&mut self, kind: &str) -> EditorResult<ObjectId> {
        let kind = ShapeKind::from_name(kind).ok_or_else(|| {
            tracing::warn!("Rejected unknown shape kind '{kind}'");
            EditorError::InvalidShapeKind(kind.to_string())
        })?;
        Ok(self.add_shape(kind))
    }

    /// Insert a prepared object as-is. An object with the same id is replaced;
    /// if that object was selected and the new one is locked, the selection is dropped.
    pub fn insert_object(&mut self, object: SceneObject) -> ObjectId {
        if self.session.is_selected(&object.id) && !object.selectable {
            self.clear_selection();
        }
        self.store.add(object)
    }

    /// Remove any object. Removing the selected one also detaches the gizmo.
    pub fn remove_object(&mut self, id: &str) -> Option<SceneObject> {
        if self.session.is_selected(id) {
            self.delete_selected()
        } else {
            self.store.remove(id)
        }
    }

    // ── Picking and selection ────────────────────────────────

    /// Nearest selectable object under a viewport pixel, without selecting it
    pub fn pick_at(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.pick_ndc(self.driver.ndc_from_screen(x, y))
    }

    pub fn pick_ndc(&self, ndc: Vec2) -> Option<ObjectId> {
        pick(self.driver.camera(), ndc, &self.store, &self.backend)
    }

    /// Pick under a viewport pixel and select the hit. Returns the selection afterwards.
    pub fn click(&mut self, x: f32, y: f32) -> Option<ObjectId> {
        let hit = self.pick_at(x, y);
        tracing::debug!("Click at ({x:.0}, {y:.0}) hit {hit:?}");
        self.session.handle_pick(hit.as_deref(), &mut self.backend);
        self.session.selected().cloned()
    }

    /// Select an object by id. Unknown or locked objects are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        match self.store.get(id) {
            Some(object) if object.selectable => {
                self.session.select(id, &mut self.backend);
                true
            }
            _ => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.session.deselect(&mut self.backend);
    }

    pub fn delete_selected(&mut self) -> Option<SceneObject> {
        let removed = self.session.delete_selected(&mut self.store, &mut self.backend);
        if let Some(object) = &removed {
            tracing::info!("Deleted {} {}", object.kind.name(), object.id);
        }
        removed
    }

    pub fn duplicate_selected(&mut self) -> Option<ObjectId> {
        let copy = self
            .session
            .duplicate_selected(&mut self.store, self.settings.spawn.duplicate_offset);
        if let Some(id) = &copy {
            tracing::info!("Duplicated selection as {id}");
        }
        copy
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        if mode != self.session.mode() {
            tracing::info!("Transform mode: {}", mode.name());
        }
        self.session.set_mode(mode, &mut self.backend);
    }

    pub fn set_mode_named(&mut self, mode: &str) -> EditorResult<()> {
        let mode = TransformMode::from_name(mode)
            .ok_or_else(|| EditorError::InvalidTransformMode(mode.to_string()))?;
        self.set_mode(mode);
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────

    /// Route a raw event through the dispatch table and apply the result
    pub fn handle(&mut self, event: &InputEvent) -> EditorResult<Option<EditorAction>> {
        let Some(action) = self.router.route(event) else {
            return Ok(None);
        };
        self.apply(action)?;
        Ok(Some(action))
    }

    pub fn apply(&mut self, action: EditorAction) -> EditorResult<()> {
        match action {
            EditorAction::Pick { x, y } => {
                self.click(x, y);
            }
            EditorAction::DeleteSelected => {
                self.delete_selected();
            }
            EditorAction::DuplicateSelected => {
                self.duplicate_selected();
            }
            EditorAction::SetMode(mode) => self.set_mode(mode),
            EditorAction::ClearSelection => self.clear_selection(),
            EditorAction::Resize { width, height } => self.resize(width, height)?,
            EditorAction::Frame => {
                self.frame();
            }
        }
        Ok(())
    }

    pub fn key_down(&mut self, key: &str, ctrl: bool) -> EditorResult<Option<EditorAction>> {
        self.handle(&InputEvent::KeyDown {
            key: key.to_string(),
            ctrl,
        })
    }

    // ── Viewport ─────────────────────────────────────────────

    pub fn resize(&mut self, width: f32, height: f32) -> EditorResult<()> {
        self.driver.resize(width, height)
    }

    /// Advance one display refresh
    pub fn frame(&mut self) -> FrameInfo {
        self.driver.tick(self.store.version())
    }

    /// Per-object draw records over the shared shape meshes
    pub fn draw_list(&self) -> Vec<ObjectDraw> {
        self.store.objects().iter().map(ObjectDraw::of).collect()
    }

    /// Grid and axes line geometry
    pub fn helper_lines(&self) -> LineMeshData {
        let mut lines = LineMeshData::default();
        for helper in self.store.helpers() {
            let mesh = match helper {
                SceneHelper::Grid { size, divisions } => grid(*size, *divisions, self.settings.grid.opacity),
                SceneHelper::Axes { length } => axes(*length),
            };
            lines.vertices.extend_from_slice(&mesh.vertices);
        }
        lines
    }

    /// Gizmo line geometry, when attached to an object
    pub fn gizmo_lines(&self) -> Option<LineMeshData> {
        let center = self.gizmo_center()?;
        let gizmo = self.backend.gizmo();
        Some(build_gizmo_lines(center, gizmo.mode, gizmo.active_axis, &self.settings.gizmo))
    }

    // ── Gizmo drag ───────────────────────────────────────────

    fn gizmo_center(&self) -> Option<Vec3> {
        self.store.position_of(self.backend.gizmo_target()?)
    }

    /// Gizmo handle under a viewport pixel, if the gizmo is attached
    pub fn gizmo_axis_at(&self, x: f32, y: f32) -> Option<GizmoAxis> {
        let center = self.gizmo_center()?;
        let ray = self
            .driver
            .camera()
            .ray_from_ndc(self.driver.ndc_from_screen(x, y));
        gizmo_hit_test(&ray, center, self.backend.gizmo().mode, &self.settings.gizmo)
    }

    /// Start dragging if the pointer is over a gizmo handle.
    /// Orbit controls stay suspended until the drag ends.
    pub fn begin_gizmo_drag(&mut self, x: f32, y: f32) -> bool {
        let Some(axis) = self.gizmo_axis_at(x, y) else {
            return false;
        };

        self.backend.gizmo_mut().begin_drag(axis);
        self.driver.set_orbit_enabled(false);
        tracing::debug!("Gizmo drag on {axis:?} ({})", self.backend.gizmo().mode.name());
        true
    }

    /// Apply a pointer delta (pixels) to the dragged object
    pub fn drag_gizmo(&mut self, dx: f32, dy: f32) -> bool {
        let gizmo = self.backend.gizmo();
        let (Some(axis), true) = (gizmo.active_axis, gizmo.dragging) else {
            return false;
        };
        let mode = gizmo.mode;
        let Some(id) = self.backend.gizmo_target().map(str::to_string) else {
            return false;
        };
        let Some(center) = self.store.position_of(&id) else {
            return false;
        };

        let amount = drag_amount(
            self.driver.camera(),
            center,
            axis,
            mode,
            Vec2::new(dx, dy),
            self.driver.size(),
        );
        self.store.apply_transform_delta(&id, mode, axis, amount)
    }

    pub fn end_gizmo_drag(&mut self) {
        self.backend.gizmo_mut().end_drag();
        self.driver.set_orbit_enabled(true);
    }

    pub fn is_dragging_gizmo(&self) -> bool {
        self.backend.gizmo().dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{object_at, BackendCall, RecordingBackend};

    fn editor() -> Editor<RecordingBackend> {
        Editor::with_backend(EditorSettings::default(), RecordingBackend::default()).with_seed(1)
    }

    #[test]
    fn test_add_every_kind() {
        let mut ed = Editor::new();
        for (i, kind) in ShapeKind::ALL.into_iter().enumerate() {
            let id = ed.add_shape(kind);
            assert_eq!(ed.object_count(), i + 1);
            let obj = ed.object(&id).unwrap();
            assert_eq!(obj.kind, kind);
            assert!(obj.selectable);
        }
    }

    #[test]
    fn test_add_shape_named_rejects_unknown() {
        let mut ed = Editor::new();
        let err = ed.add_shape_named("torus").unwrap_err();
        assert_eq!(err, EditorError::InvalidShapeKind("torus".into()));
        assert_eq!(ed.object_count(), 0);
        assert!(ed.add_shape_named("Cylinder").is_ok());
    }

    #[test]
    fn test_select_ignores_locked_and_unknown() {
        let mut ed = editor();
        let mut locked = object_at("locked", ShapeKind::Cube, [0.0; 3]);
        locked.selectable = false;
        ed.insert_object(locked);

        assert!(!ed.select("locked"));
        assert!(!ed.select("missing"));
        assert!(ed.selected().is_none());
    }

    #[test]
    fn test_remove_selected_object_detaches() {
        let mut ed = editor();
        let id = ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
        ed.select(&id);
        ed.backend_mut().calls.clear();

        assert!(ed.remove_object(&id).is_some());
        assert!(ed.selected().is_none());
        assert_eq!(ed.backend().calls, vec![BackendCall::Detach]);
    }

    #[test]
    fn test_remove_unselected_keeps_selection() {
        let mut ed = editor();
        ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
        ed.insert_object(object_at("b", ShapeKind::Cube, [3.0, 0.0, 0.0]));
        ed.select("a");

        assert!(ed.remove_object("b").is_some());
        assert_eq!(ed.selected().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_insert_existing_id_replaces_object() {
        let mut ed = editor();
        ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
        ed.select("a");
        ed.insert_object(object_at("a", ShapeKind::Sphere, [1.0, 0.0, 0.0]));

        assert_eq!(ed.object_count(), 1);
        assert_eq!(ed.object("a").unwrap().kind, ShapeKind::Sphere);
        assert_eq!(ed.selected().map(String::as_str), Some("a"));

        let mut locked = object_at("a", ShapeKind::Cube, [0.0; 3]);
        locked.selectable = false;
        ed.insert_object(locked);
        assert_eq!(ed.object_count(), 1);
        assert!(ed.selected().is_none());
        assert!(ed.backend().gizmo_target().is_none());

        assert!(ed.remove_object("a").is_some());
        assert_eq!(ed.object_count(), 0);
    }

    #[test]
    fn test_draw_list_tracks_drag_without_new_geometry() {
        let mut ed = editor();
        ed.insert_object(object_at("a", ShapeKind::Sphere, [0.0; 3]));
        ed.insert_object(object_at("b", ShapeKind::Cube, [3.0, 0.0, 0.0]));

        ed.store.apply_transform_delta("a", TransformMode::Translate, GizmoAxis::Y, 2.0);
        let draws = ed.draw_list();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].kind, ShapeKind::Sphere);
        assert!((draws[0].model.w_axis.truncate() - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
        assert!((draws[1].model.w_axis.truncate() - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_current_settings_capture_view() {
        let mut ed = editor();
        ed.resize(800.0, 600.0).unwrap();
        ed.driver_mut().orbit(30.0, 10.0);
        ed.driver_mut().pan(0.5, 0.0);

        let saved = ed.current_settings();
        assert!(saved.validate().is_ok());
        assert_eq!(saved.viewport.initial_size, [800.0, 600.0]);
        assert_eq!(saved.spawn, ed.settings().spawn);

        // Reopening with the saved settings reproduces the view
        let reopened = Editor::with_settings(saved);
        let (a, b) = (ed.driver().camera(), reopened.driver().camera());
        assert!((a.eye_position() - b.eye_position()).length() < 1e-3);
        assert!((a.target - b.target).length() < 1e-5);
    }

    #[test]
    fn test_resize_action_propagates_error() {
        let mut ed = editor();
        let event = InputEvent::Resize { width: -5.0, height: 10.0 };
        assert!(matches!(ed.handle(&event), Err(EditorError::InvalidViewport { .. })));
    }

    #[test]
    fn test_gizmo_drag_translates_and_suspends_orbit() {
        let mut ed = editor();
        ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
        ed.select("a");

        // Grab the X handle near its tip
        let size = ed.driver().size();
        let tip = ed.driver().camera().project(Vec3::new(1.2, 0.0, 0.0)).unwrap();
        let (x, y) = ((tip.x + 1.0) * 0.5 * size.x, (1.0 - tip.y) * 0.5 * size.y);

        assert!(ed.begin_gizmo_drag(x, y));
        assert!(!ed.driver().orbit_enabled());
        assert!(ed.drag_gizmo(40.0, 0.0));
        assert!(ed.object("a").unwrap().transform.position[0] > 0.0);

        ed.end_gizmo_drag();
        assert!(ed.driver().orbit_enabled());
        assert!(!ed.drag_gizmo(40.0, 0.0));
    }

    #[test]
    fn test_gizmo_lines_follow_selection() {
        let mut ed = editor();
        assert!(ed.gizmo_lines().is_none());
        ed.insert_object(object_at("a", ShapeKind::Cube, [0.0; 3]));
        ed.select("a");
        assert!(ed.gizmo_lines().is_some());
        ed.clear_selection();
        assert!(ed.gizmo_lines().is_none());
    }

    #[test]
    fn test_helper_lines_respect_visibility() {
        let mut settings = EditorSettings::default();
        settings.grid.visible = false;
        let ed = Editor::with_settings(settings);
        assert_eq!(ed.store().helpers().len(), 1);
        assert_eq!(ed.helper_lines().vertex_count(), 6);
    }
}
