//! Selection/transform session: at most one selected object, with the
//! transform gizmo attached to it.

use shared::{ObjectId, SceneObject, TransformMode};

use super::scene::SceneStore;
use crate::backend::GraphicsBackend;

/// Suffix appended to the name of a duplicated object
const COPY_SUFFIX: &str = " Copy";

/// Idle when nothing is selected, Active while one object carries the gizmo.
#[derive(Debug, Default)]
pub struct TransformSession {
    selected: Option<ObjectId>,
    /// Global mode register; survives selection changes
    mode: TransformMode,
    deselect_on_miss: bool,
}

impl TransformSession {
    pub fn new(deselect_on_miss: bool) -> Self {
        Self {
            deselect_on_miss,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn deselect_on_miss(&self) -> bool {
        self.deselect_on_miss
    }

    /// Select an object, moving the gizmo onto it.
    /// The previous attachment is always released first.
    pub fn select(&mut self, id: &str, backend: &mut dyn GraphicsBackend) {
        backend.detach_gizmo();
        backend.attach_gizmo(id, self.mode);
        self.selected = Some(id.to_string());
        tracing::debug!("Selected {id} ({})", self.mode.name());
    }

    /// Apply the result of a pick. Returns true if the selection changed.
    pub fn handle_pick(&mut self, hit: Option<&str>, backend: &mut dyn GraphicsBackend) -> bool {
        match hit {
            Some(id) => {
                let changed = !self.is_selected(id);
                self.select(id, backend);
                changed
            }
            None if self.deselect_on_miss && self.is_active() => {
                self.deselect(backend);
                true
            }
            None => false,
        }
    }

    pub fn deselect(&mut self, backend: &mut dyn GraphicsBackend) {
        if self.selected.take().is_some() {
            backend.detach_gizmo();
        }
    }

    /// Remove the selected object, detach the gizmo and clear the selection.
    /// No-op when Idle.
    pub fn delete_selected(
        &mut self,
        store: &mut SceneStore,
        backend: &mut dyn GraphicsBackend,
    ) -> Option<SceneObject> {
        let id = self.selected.as_deref()?;
        let removed = store.remove(id);
        backend.detach_gizmo();
        self.selected = None;
        removed
    }

    /// Clone the selected object `offset` units along X and register the copy.
    /// The original stays selected. No-op when Idle.
    pub fn duplicate_selected(&self, store: &mut SceneStore, offset: f32) -> Option<ObjectId> {
        let original = store.get(self.selected.as_deref()?)?;

        let mut copy = original.clone();
        copy.id = uuid::Uuid::new_v4().to_string();
        copy.name = format!("{}{COPY_SUFFIX}", original.name);
        copy.transform.position[0] += offset;

        Some(store.add(copy))
    }

    /// Switch the gizmo mode. Applies whether or not anything is selected.
    pub fn set_mode(&mut self, mode: TransformMode, backend: &mut dyn GraphicsBackend) {
        self.mode = mode;
        backend.set_gizmo_mode(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{object_at, BackendCall, RecordingBackend};
    use shared::ShapeKind;

    fn store_with(ids: &[&str]) -> SceneStore {
        let mut store = SceneStore::default();
        for (i, id) in ids.iter().enumerate() {
            store.add(object_at(id, ShapeKind::Cube, [i as f32 * 2.0, 0.0, 0.0]));
        }
        store
    }

    #[test]
    fn test_select_detaches_before_attach() {
        let mut backend = RecordingBackend::default();
        let mut session = TransformSession::default();

        session.select("a", &mut backend);
        session.select("b", &mut backend);

        assert_eq!(
            backend.calls,
            vec![
                BackendCall::Detach,
                BackendCall::Attach("a".into(), TransformMode::Translate),
                BackendCall::Detach,
                BackendCall::Attach("b".into(), TransformMode::Translate),
            ]
        );
        assert_eq!(backend.gizmo_target(), Some("b"));
        assert!(session.is_selected("b"));
    }

    #[test]
    fn test_miss_keeps_selection_by_default() {
        let mut backend = RecordingBackend::default();
        let mut session = TransformSession::default();
        session.select("a", &mut backend);

        assert!(!session.handle_pick(None, &mut backend));
        assert!(session.is_selected("a"));
        assert_eq!(backend.gizmo_target(), Some("a"));
    }

    #[test]
    fn test_miss_deselects_when_enabled() {
        let mut backend = RecordingBackend::default();
        let mut session = TransformSession::new(true);
        session.select("a", &mut backend);

        assert!(session.handle_pick(None, &mut backend));
        assert!(!session.is_active());
        assert!(backend.gizmo_target().is_none());
    }

    #[test]
    fn test_delete_order_and_idle_noop() {
        let mut store = store_with(&["a"]);
        let mut backend = RecordingBackend::default();
        let mut session = TransformSession::default();

        assert!(session.delete_selected(&mut store, &mut backend).is_none());
        assert_eq!(store.len(), 1);
        assert!(backend.calls.is_empty());

        session.select("a", &mut backend);
        backend.calls.clear();
        let removed = session.delete_selected(&mut store, &mut backend).unwrap();
        assert_eq!(removed.id, "a");
        assert!(store.is_empty());
        assert!(session.selected().is_none());
        assert_eq!(backend.calls, vec![BackendCall::Detach]);
    }

    #[test]
    fn test_duplicate_keeps_original_selected() {
        let mut store = store_with(&["a"]);
        let mut backend = RecordingBackend::default();
        let mut session = TransformSession::default();

        assert!(session.duplicate_selected(&mut store, 1.0).is_none());

        session.select("a", &mut backend);
        let copy_id = session.duplicate_selected(&mut store, 1.0).unwrap();
        assert_ne!(copy_id, "a");
        assert_eq!(store.len(), 2);
        assert!(session.is_selected("a"));

        let original = store.get("a").unwrap();
        let copy = store.get(&copy_id).unwrap();
        assert_eq!(copy.transform.position, [1.0, 0.0, 0.0]);
        assert_eq!(copy.kind, original.kind);
        assert_eq!(copy.color, original.color);
        assert_eq!(copy.name, format!("{} Copy", original.name));
    }

    #[test]
    fn test_mode_is_global_register() {
        let mut backend = RecordingBackend::default();
        let mut session = TransformSession::default();

        session.set_mode(TransformMode::Rotate, &mut backend);
        session.set_mode(TransformMode::Rotate, &mut backend);
        assert_eq!(session.mode(), TransformMode::Rotate);

        session.select("a", &mut backend);
        assert_eq!(backend.gizmo().mode, TransformMode::Rotate);
        session.deselect(&mut backend);
        assert_eq!(session.mode(), TransformMode::Rotate);
    }
}
